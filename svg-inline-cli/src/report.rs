//! Machine-readable run summary for `--format json`.

use crate::generator::GeneratedOutput;
use crate::writer::WriteResult;
use serde::Serialize;
use std::path::PathBuf;
use svg_inline_codegen::{Diagnostic, DiagnosticCode, RunStats, Severity, SourceLocation};

/// How the CLI reports results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Colored text for terminals.
    #[default]
    Human,
    /// One JSON document on stdout.
    Json,
}

/// Summary of one generate run.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub assets: usize,
    pub sources: usize,
    pub definitions: usize,
    pub files: Vec<FileSummary>,
    pub diagnostics: Vec<DiagnosticSummary>,
    pub parse_errors: Vec<String>,
    pub stats: RunStats,
}

/// What happened to one output file.
#[derive(Debug, Serialize)]
pub struct FileSummary {
    pub path: PathBuf,
    pub status: &'static str,
    pub bytes: usize,
}

/// A diagnostic with its rendered message.
#[derive(Debug, Serialize)]
pub struct DiagnosticSummary {
    /// Stable identifier such as `SVG004`.
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
    pub args: Vec<String>,
    pub location: SourceLocation,
}

impl From<&Diagnostic> for DiagnosticSummary {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            code: diagnostic.code,
            severity: diagnostic.severity,
            message: diagnostic.message(),
            args: diagnostic.args.clone(),
            location: diagnostic.location.clone(),
        }
    }
}

impl Summary {
    /// Build a summary from a run and its write results.
    pub fn new(output: &GeneratedOutput, writes: &[WriteResult]) -> Self {
        Self {
            assets: output.asset_files,
            sources: output.source_files,
            definitions: output.declarations,
            files: writes
                .iter()
                .map(|result| FileSummary {
                    path: result.path().to_path_buf(),
                    status: result.status(),
                    bytes: result.bytes(),
                })
                .collect(),
            diagnostics: output.report.diagnostics.iter().map(DiagnosticSummary::from).collect(),
            parse_errors: output.parse_errors.iter().map(|e| e.to_string()).collect(),
            stats: output.report.stats,
        }
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
