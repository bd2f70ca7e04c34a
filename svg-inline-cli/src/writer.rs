//! File writer for generated units.
//!
//! Writes generated Rust files to disk, skipping files whose content is
//! already current, and removes generated files that are no longer
//! produced. Supports dry-run mode.

use crate::error::{CliResult, WriteError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Suffix shared by every generated file.
pub const GENERATED_SUFFIX: &str = ".g.rs";

/// Result of a write operation.
#[derive(Debug)]
pub enum WriteResult {
    /// File was written successfully.
    Written {
        /// Path to the written file.
        path: PathBuf,
        /// Number of bytes written.
        bytes: usize,
    },
    /// File already had this content.
    Unchanged {
        /// Path to the existing file.
        path: PathBuf,
    },
    /// A generated file that is no longer produced was deleted.
    Removed {
        /// Path to the deleted file.
        path: PathBuf,
    },
    /// Dry run - content was not written.
    DryRun {
        /// Content that would have been written; empty for a removal.
        content: String,
        /// Path where content would have been written.
        path: PathBuf,
    },
}

/// File writer with dry-run support.
#[derive(Debug)]
pub struct FileWriter {
    /// Whether to run in dry-run mode.
    dry_run: bool,
}

impl FileWriter {
    /// Create a new file writer.
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Write content to a file unless it already holds exactly that content.
    ///
    /// In dry-run mode, returns the content without writing.
    pub fn write(&self, path: &Path, content: &str) -> CliResult<WriteResult> {
        if std::fs::read_to_string(path).is_ok_and(|existing| existing == content) {
            return Ok(WriteResult::Unchanged {
                path: path.to_path_buf(),
            });
        }

        if self.dry_run {
            return Ok(WriteResult::DryRun {
                content: content.to_string(),
                path: path.to_path_buf(),
            });
        }

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        std::fs::write(path, content).map_err(|e| WriteError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::debug!(path = %path.display(), bytes = content.len(), "file written");
        Ok(WriteResult::Written {
            path: path.to_path_buf(),
            bytes: content.len(),
        })
    }

    /// Delete generated files in `dir` whose names are not in `keep`.
    ///
    /// Only files ending in `.g.rs` are considered.
    pub fn prune(&self, dir: &Path, keep: &[&str]) -> CliResult<Vec<WriteResult>> {
        let mut results = Vec::new();
        for path in stale_files(dir, keep)? {
            if self.dry_run {
                results.push(WriteResult::DryRun {
                    content: String::new(),
                    path,
                });
                continue;
            }
            std::fs::remove_file(&path).map_err(|e| WriteError::RemoveFile {
                path: path.clone(),
                source: e,
            })?;
            tracing::debug!(path = %path.display(), "stale file removed");
            results.push(WriteResult::Removed { path });
        }
        Ok(results)
    }

    /// Check if running in dry-run mode.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

/// Generated files in `dir` whose names are not in `keep`, sorted.
pub fn stale_files(dir: &Path, keep: &[&str]) -> CliResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let keep: HashSet<&str> = keep.iter().copied().collect();
    let mut stale = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if path.is_file() && name.ends_with(GENERATED_SUFFIX) && !keep.contains(name) {
            stale.push(path);
        }
    }
    stale.sort();
    Ok(stale)
}

impl WriteResult {
    /// Get the path associated with this result.
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path, .. }
            | WriteResult::Unchanged { path }
            | WriteResult::Removed { path }
            | WriteResult::DryRun { path, .. } => path,
        }
    }

    /// Check if the file on disk changed.
    pub fn was_written(&self) -> bool {
        matches!(self, WriteResult::Written { .. } | WriteResult::Removed { .. })
    }

    /// Get the number of bytes written (0 unless written).
    pub fn bytes(&self) -> usize {
        match self {
            WriteResult::Written { bytes, .. } => *bytes,
            _ => 0,
        }
    }

    /// Short status label.
    pub fn status(&self) -> &'static str {
        match self {
            WriteResult::Written { .. } => "written",
            WriteResult::Unchanged { .. } => "unchanged",
            WriteResult::Removed { .. } => "removed",
            WriteResult::DryRun { .. } => "dry-run",
        }
    }
}
