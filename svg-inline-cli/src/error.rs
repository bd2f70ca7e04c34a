//! Error types for the CLI.
//!
//! Every failure the CLI can hit is one of the enums below, wrapped by
//! [`CliError`]. Generator warnings are not errors; they travel as
//! diagnostics in the run report.

use std::path::PathBuf;
use svg_inline_codegen::PipelineError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Main error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error during file scanning.
    #[error("Failed to scan directory: {0}")]
    Scan(#[from] ScanError),

    /// Error during Rust source parsing.
    #[error("Failed to parse source file: {0}")]
    Parse(#[from] ParseError),

    /// The generator refused the inputs.
    #[error("Failed to generate code: {0}")]
    Generate(#[from] PipelineError),

    /// Error loading configuration.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// Error writing output files.
    #[error("Failed to write output: {0}")]
    Write(#[from] WriteError),

    /// Error during file watching.
    #[error("Watch error: {0}")]
    Watch(#[from] WatchError),

    /// Validation failed (generated files out of date).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error during file scanning.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Directory does not exist.
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// No file with the wanted extension.
    #[error("No .{extension} files found in: {path}")]
    NoFiles { path: PathBuf, extension: String },

    /// Invalid filter pattern.
    #[error("Invalid filter pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// IO error during scanning.
    #[error("IO error scanning {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from ignore crate walker.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),
}

/// Error during Rust source parsing.
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    /// Syntax error in Rust source.
    #[error("Syntax error in {file}:{line}:{column}: {message}")]
    Syntax {
        file: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// Malformed generation directive.
    #[error("Invalid attribute in {file}:{line}:{column}: {message}")]
    Attribute {
        file: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// Multiple parse errors collected.
    #[error("Multiple parse errors:\n{}", format_errors(.0))]
    Multiple(Vec<ParseError>),
}

/// Error loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid TOML syntax.
    #[error("Invalid TOML in {path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// IO error reading config.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error writing output files.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("Failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to remove a stale generated file.
    #[error("Failed to remove file {path}: {source}")]
    RemoveFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error during file watching.
#[derive(Debug, Error)]
pub enum WatchError {
    /// Failed to initialize watcher.
    #[error("Failed to initialize file watcher: {0}")]
    Init(String),

    /// Error from notify crate.
    #[error("Watch notification error: {0}")]
    Notify(String),
}

/// Format multiple errors for display.
fn format_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, e)| format!("  {}. {}", i + 1, e))
        .collect::<Vec<_>>()
        .join("\n")
}

impl ParseError {
    /// Create a syntax error with location information.
    pub fn syntax(file: PathBuf, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            file,
            line,
            column,
            message: message.into(),
        }
    }

    /// Create an attribute error.
    pub fn attribute(file: PathBuf, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Attribute {
            file,
            line,
            column,
            message: message.into(),
        }
    }
}

impl ScanError {
    /// Create a directory not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::DirectoryNotFound { path }
    }

    /// Create a no files error.
    pub fn no_files(path: PathBuf, extension: impl Into<String>) -> Self {
        Self::NoFiles {
            path,
            extension: extension.into(),
        }
    }

    /// Create an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}

impl ConfigError {
    /// Create a not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::NotFound { path }
    }

    /// Create an invalid TOML error.
    pub fn invalid_toml(path: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path,
            message: message.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}
