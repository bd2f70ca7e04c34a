//! File watcher for development mode.
//!
//! Watches the asset and source roots and reports changes to files the
//! generator reads, so the CLI can rerun its incremental pipeline.

use crate::error::{CliResult, WatchError};
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, Debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

/// Event types for file changes.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// A file was created or modified.
    Modified(PathBuf),
    /// A file was deleted.
    Deleted(PathBuf),
    /// An error occurred.
    Error(String),
}

/// File watcher for the generator inputs.
pub struct FileWatcher {
    /// Directories to watch recursively.
    roots: Vec<PathBuf>,
    /// Extensions that trigger an event, without the dot.
    extensions: Vec<String>,
    /// Debounce duration in milliseconds.
    debounce_ms: u64,
}

impl FileWatcher {
    /// Create a watcher for Rust sources under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            roots: vec![root.into()],
            extensions: vec!["rs".to_string()],
            debounce_ms: 500,
        }
    }

    /// Watch another directory as well.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        if !self.roots.contains(&root) {
            self.roots.push(root);
        }
        self
    }

    /// Also report changes to files with `extension`.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        if !self.extensions.contains(&extension) {
            self.extensions.push(extension);
        }
        self
    }

    /// Set the debounce duration in milliseconds.
    pub fn with_debounce(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Start watching for file changes.
    ///
    /// The returned debouncer must be kept alive for events to arrive.
    pub fn watch(&self) -> CliResult<(Debouncer<RecommendedWatcher>, Receiver<WatchEvent>)> {
        let (tx, rx) = channel::<WatchEvent>();
        let extensions = self.extensions.clone();

        let mut debouncer = new_debouncer(
            Duration::from_millis(self.debounce_ms),
            move |result: Result<Vec<DebouncedEvent>, notify::Error>| match result {
                Ok(events) => {
                    for event in events {
                        let path = event.path;
                        if !has_extension(&path, &extensions) {
                            continue;
                        }

                        let watch_event = if path.exists() {
                            WatchEvent::Modified(path)
                        } else {
                            WatchEvent::Deleted(path)
                        };

                        // receiver gone means the CLI is shutting down
                        let _ = tx.send(watch_event);
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatchEvent::Error(e.to_string()));
                }
            },
        )
        .map_err(|e| WatchError::Init(e.to_string()))?;

        for root in &self.roots {
            debouncer
                .watcher()
                .watch(root, RecursiveMode::Recursive)
                .map_err(|e| WatchError::Notify(format!("{}: {e}", root.display())))?;
            tracing::debug!(root = %root.display(), "watching");
        }

        Ok((debouncer, rx))
    }

    /// Get the directories being watched.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

impl WatchEvent {
    /// Get the path associated with this event.
    pub fn path(&self) -> Option<&Path> {
        match self {
            WatchEvent::Modified(p) | WatchEvent::Deleted(p) => Some(p),
            WatchEvent::Error(_) => None,
        }
    }

    /// Check if this is an error event.
    pub fn is_error(&self) -> bool {
        matches!(self, WatchEvent::Error(_))
    }

    /// Get the error message if this is an error event.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            WatchEvent::Error(msg) => Some(msg),
            _ => None,
        }
    }
}
