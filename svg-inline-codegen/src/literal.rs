//! Rust string literal emission.
//!
//! Generated code embeds asset attributes and markup as string literals.
//! [`string_literal`] produces a double-quoted literal that the Rust
//! compiler reads back as exactly the input text.

use std::fmt::Write;

/// Render `text` as a double-quoted Rust string literal.
///
/// `\` and `"` are escaped, `\n`, `\r`, `\t` and `\0` use their short escapes
/// and every other control character is written as `\u{..}`. All remaining
/// characters, including non-ASCII ones, are copied unchanged.
pub fn string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{{{:x}}}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        assert_eq!(string_literal("viewBox"), "\"viewBox\"");
    }

    #[test]
    fn test_quotes_and_backslashes() {
        assert_eq!(
            string_literal(r#"<path d="M0 0"/>"#),
            r#""<path d=\"M0 0\"/>""#
        );
        assert_eq!(string_literal(r"a\b"), r#""a\\b""#);
    }

    #[test]
    fn test_control_characters() {
        assert_eq!(string_literal("a\nb\tc\r"), r#""a\nb\tc\r""#);
        assert_eq!(string_literal("\u{7}"), r#""\u{7}""#);
    }

    #[test]
    fn test_unicode_is_kept() {
        assert_eq!(string_literal("café ✓"), "\"café ✓\"");
    }

    #[test]
    fn test_reparses_with_syn() {
        let text = "<text x=\"1\">a\\b\n\u{1b}</text>";
        let lit: syn::LitStr = syn::parse_str(&string_literal(text)).unwrap();
        assert_eq!(lit.value(), text);
    }
}
