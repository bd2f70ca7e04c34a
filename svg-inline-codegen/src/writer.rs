//! Indentation- and scope-aware text builder.
//!
//! Every emission step writes through a [`CodeWriter`]. Braced scopes are
//! opened with [`CodeWriter::begin_scope`], which returns a [`Scope`] guard;
//! the closing brace is written when the guard is dropped, so a scope is
//! closed exactly once on every exit path.
//!
//! # Example
//!
//! ```rust
//! use svg_inline_codegen::writer::CodeWriter;
//!
//! let mut writer = CodeWriter::new();
//! {
//!     let mut scope = writer.begin_scope("fn main()");
//!     scope.append_line("println!(\"hi\");");
//! }
//! assert_eq!(writer.as_str(), "fn main() {\n    println!(\"hi\");\n}\n");
//! ```

use std::fmt;
use std::ops::{Deref, DerefMut};

/// Number of spaces written per indentation level.
pub const INDENT_WIDTH: usize = 4;

/// Mutable text accumulator with a current indentation level.
#[derive(Debug, Default, Clone)]
pub struct CodeWriter {
    content: String,
    indent_level: usize,
}

impl CodeWriter {
    /// Create an empty writer at indentation level zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current indentation level.
    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    /// Append raw text to the current line.
    pub fn append(&mut self, text: &str) {
        self.content.push_str(text);
    }

    /// Write a full line at the current indentation.
    pub fn append_line(&mut self, line: &str) {
        self.start_line();
        self.content.push_str(line);
        self.end_line();
    }

    /// Write an empty line without indentation.
    pub fn empty_line(&mut self) {
        self.end_line();
    }

    /// Write the indentation for a line built with [`append`](Self::append).
    pub fn start_line(&mut self) {
        let width = INDENT_WIDTH * self.indent_level;
        self.content.extend(std::iter::repeat(' ').take(width));
    }

    /// Terminate the current line.
    pub fn end_line(&mut self) {
        self.content.push('\n');
    }

    /// Open a braced scope.
    ///
    /// Writes `header {` (or a lone `{` for an empty header) and increases the
    /// indentation. The returned guard dereferences to this writer and writes
    /// the closing brace when dropped.
    pub fn begin_scope(&mut self, header: &str) -> Scope<'_> {
        if header.is_empty() {
            self.append_line("{");
        } else {
            self.start_line();
            self.content.push_str(header);
            self.content.push_str(" {");
            self.end_line();
        }
        self.indent_level += 1;
        Scope { writer: self }
    }

    /// Increase the indentation without writing braces.
    pub fn indent(&mut self) -> Indented<'_> {
        self.indent_level += 1;
        Indented { writer: self }
    }

    /// The accumulated text.
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Consume the writer and return the accumulated text.
    pub fn into_string(self) -> String {
        self.content
    }

    fn end_scope(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
        self.append_line("}");
    }
}

impl fmt::Display for CodeWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

/// Guard for an open braced scope. Dropping it closes the scope.
#[must_use = "the scope is closed as soon as the guard is dropped"]
pub struct Scope<'a> {
    writer: &'a mut CodeWriter,
}

impl Deref for Scope<'_> {
    type Target = CodeWriter;

    fn deref(&self) -> &CodeWriter {
        self.writer
    }
}

impl DerefMut for Scope<'_> {
    fn deref_mut(&mut self) -> &mut CodeWriter {
        self.writer
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.writer.end_scope();
    }
}

/// Guard for an extra indentation level without braces.
#[must_use = "the indentation is restored as soon as the guard is dropped"]
pub struct Indented<'a> {
    writer: &'a mut CodeWriter,
}

impl Deref for Indented<'_> {
    type Target = CodeWriter;

    fn deref(&self) -> &CodeWriter {
        self.writer
    }
}

impl DerefMut for Indented<'_> {
    fn deref_mut(&mut self) -> &mut CodeWriter {
        self.writer
    }
}

impl Drop for Indented<'_> {
    fn drop(&mut self) {
        self.writer.indent_level = self.writer.indent_level.saturating_sub(1);
    }
}
