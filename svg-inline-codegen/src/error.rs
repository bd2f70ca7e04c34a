//! Error types for the generator core.
//!
//! Only asset loading can fail outright. Every other problem is reported as a
//! [`Diagnostic`](crate::diagnostic::Diagnostic) instead.

use std::path::PathBuf;
use thiserror::Error;

/// An asset file stem that cannot be turned into an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    /// The stem is empty.
    #[error("file name is empty")]
    Empty,

    /// A leading, trailing or doubled hyphen.
    #[error("'{stem}' has an empty segment at position {index}")]
    EmptySegment { stem: String, index: usize },

    /// A character outside ASCII letters, digits and `-`.
    #[error("'{stem}' contains unsupported character '{character}'")]
    InvalidCharacter { stem: String, character: char },
}

/// Failure to load one asset file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    /// The content is not well-formed XML.
    #[error("malformed XML in {path} at byte {position}: {message}")]
    Malformed {
        path: PathBuf,
        position: u64,
        message: String,
    },

    /// The document has no root element.
    #[error("no root element in {path}")]
    NoRoot { path: PathBuf },

    /// Text or a second element outside the single root element.
    #[error("content outside the root element in {path}")]
    OutsideRoot { path: PathBuf },

    /// The file name does not map to an identifier.
    #[error("invalid asset name {path}: {source}")]
    InvalidName {
        path: PathBuf,
        #[source]
        source: NamingError,
    },
}

impl AssetError {
    /// Create a malformed XML error.
    pub fn malformed(path: PathBuf, position: u64, message: impl Into<String>) -> Self {
        Self::Malformed {
            path,
            position,
            message: message.into(),
        }
    }

    /// Path of the asset that failed.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Malformed { path, .. }
            | Self::NoRoot { path }
            | Self::OutsideRoot { path }
            | Self::InvalidName { path, .. } => path,
        }
    }
}

/// Failure of a whole pipeline run.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// An asset failed to load while strict asset handling is enabled.
    #[error("asset failed to load: {0}")]
    Asset(#[from] AssetError),
}
