//! File scanner for discovering sources and assets.
//!
//! This module recursively scans a directory for files with one extension,
//! respecting `.gitignore` patterns and an optional glob filter. The same
//! scanner finds `.rs` sources and `.svg` assets.

use crate::error::{CliResult, ScanError};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// A discovered file with its content.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path to the file, as reached from the scan root.
    pub path: PathBuf,

    /// Path relative to the scan root.
    pub relative_path: PathBuf,

    /// File content.
    pub content: String,
}

/// Scanner for discovering files of one kind.
#[derive(Debug)]
pub struct SourceScanner {
    /// Root directory to scan.
    root: PathBuf,

    /// Extension to collect, without the dot.
    extension: String,

    /// Whether to respect .gitignore files.
    respect_gitignore: bool,

    /// Optional glob filter pattern.
    filter: Option<glob::Pattern>,
}

impl SourceScanner {
    /// Create a scanner for Rust sources under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: "rs".to_string(),
            respect_gitignore: true,
            filter: None,
        }
    }

    /// Collect files with `extension` instead of `.rs`.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Set whether to respect .gitignore files.
    pub fn with_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Set a glob filter pattern for files.
    ///
    /// Only files whose relative path matches the pattern will be included.
    pub fn with_filter(mut self, pattern: &str) -> Result<Self, ScanError> {
        let glob_pattern = glob::Pattern::new(pattern)
            .map_err(|e| ScanError::invalid_pattern(pattern, e.to_string()))?;
        self.filter = Some(glob_pattern);
        Ok(self)
    }

    /// Scan the directory and return every matching file, sorted by path.
    pub fn scan(&self) -> CliResult<Vec<SourceFile>> {
        if !self.root.exists() {
            return Err(ScanError::not_found(self.root.clone()).into());
        }

        let mut files = Vec::new();

        let walker = WalkBuilder::new(&self.root)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .hidden(false)
            .build();

        for entry in walker {
            let entry = entry.map_err(ScanError::Walk)?;
            let path = entry.path();

            if !path.is_file() || !self.matches_extension(path) {
                continue;
            }

            let relative = self.relative_path(path);
            if let Some(ref pattern) = self.filter {
                if !pattern.matches_path(&relative) {
                    continue;
                }
            }

            let content = std::fs::read_to_string(path).map_err(|e| ScanError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

            files.push(SourceFile {
                path: path.to_path_buf(),
                relative_path: relative,
                content,
            });
        }

        if files.is_empty() {
            return Err(ScanError::no_files(self.root.clone(), self.extension.clone()).into());
        }

        // walk order depends on the file system
        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        tracing::debug!(
            root = %self.root.display(),
            extension = %self.extension,
            count = files.len(),
            "scan finished"
        );
        Ok(files)
    }

    /// Scan without failing on empty results.
    ///
    /// Returns an empty vector if no files are found.
    pub fn scan_allow_empty(&self) -> CliResult<Vec<SourceFile>> {
        match self.scan() {
            Ok(files) => Ok(files),
            Err(crate::error::CliError::Scan(ScanError::NoFiles { .. })) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Whether `path` carries the scanned extension.
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }

    /// Get the relative path from root.
    fn relative_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root).unwrap_or(path).to_path_buf()
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
