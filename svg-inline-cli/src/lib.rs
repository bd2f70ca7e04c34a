//! # svg-inline-cli
//!
//! CLI library for inlining SVG assets into Rust render code.
//!
//! This crate provides the pieces behind the `svg-inline` binary: it finds
//! component structs marked with `#[generate_svg(kind, attributes)]` in a
//! crate's sources, collects the SVG assets, and writes the units produced by
//! [`svg_inline_codegen`] into an output directory. The attribute itself comes
//! from `svg-inline-macros`.
//!
//! ## Architecture
//!
//! - [`config`] - Configuration management and TOML parsing
//! - [`scanner`] - Source and asset discovery
//! - [`parser`] - Rust source parsing into declarations
//! - [`generator`] - Incremental generation over scanned inputs
//! - [`writer`] - File output, pruning and dry-run support
//! - [`watcher`] - File system watching for development mode
//! - [`report`] - JSON run summaries
//! - [`error`] - Error types and handling

pub mod config;
pub mod error;
pub mod generator;
pub mod parser;
pub mod report;
pub mod scanner;
pub mod watcher;
pub mod writer;

// Re-export main types for convenience
pub use config::{Config, ConfigManager};
pub use error::{CliError, CliResult};
pub use generator::{GeneratedOutput, SvgGenerator};
pub use parser::{ParsedComponent, RustParser};
pub use scanner::{SourceFile, SourceScanner};
pub use watcher::FileWatcher;
pub use writer::FileWriter;
