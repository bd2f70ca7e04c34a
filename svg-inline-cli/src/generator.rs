//! Glue between the file system and the generator core.
//!
//! [`SvgGenerator`] scans the asset and source directories, parses the
//! sources into declarations and runs them through a long-lived
//! [`Pipeline`], so repeated runs in watch mode reuse unchanged work.

use crate::config::Config;
use crate::error::{CliResult, ParseError};
use crate::parser::RustParser;
use crate::scanner::SourceScanner;
use crate::writer::stale_files;
use std::path::{Path, PathBuf};
use svg_inline_codegen::{AssetFile, GeneratedUnit, Inputs, Pipeline, RunReport};

/// Output of one generation run.
#[derive(Debug)]
pub struct GeneratedOutput {
    /// Report from the generator core.
    pub report: RunReport,

    /// Source files that failed to parse; they contribute no declarations.
    pub parse_errors: Vec<ParseError>,

    /// Number of asset files found.
    pub asset_files: usize,

    /// Number of source files parsed.
    pub source_files: usize,

    /// Number of component declarations found.
    pub declarations: usize,
}

impl GeneratedOutput {
    /// Generated units, index last.
    pub fn units(&self) -> &[GeneratedUnit] {
        &self.report.units
    }

    /// Whether the run produced anything worth warning about.
    pub fn has_warnings(&self) -> bool {
        !self.parse_errors.is_empty() || !self.report.diagnostics.is_empty()
    }
}

/// Scanned and parsed inputs, before generation.
#[derive(Debug, Default)]
pub struct CollectedInputs {
    pub inputs: Inputs,
    pub parse_errors: Vec<ParseError>,
    pub source_files: usize,
}

/// Incremental generator bound to one configuration.
#[derive(Debug)]
pub struct SvgGenerator {
    config: Config,
    parser: RustParser,
    pipeline: Pipeline,
}

impl SvgGenerator {
    /// Create a generator for the given configuration.
    pub fn new(config: Config) -> Self {
        let parser = RustParser::new().with_directive(config.input.directive.clone());
        let pipeline = Pipeline::new(config.pipeline_options());
        Self {
            config,
            parser,
            pipeline,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Scan assets and sources and parse the sources.
    pub fn collect_inputs(&self) -> CliResult<CollectedInputs> {
        let input = &self.config.input;

        let assets = SourceScanner::new(&input.assets)
            .with_extension(input.asset_extension.clone())
            .scan_allow_empty()?;

        let mut sources = SourceScanner::new(&input.sources);
        if let Some(pattern) = &input.filter {
            sources = sources.with_filter(pattern)?;
        }
        let sources = sources.scan_allow_empty()?;

        let (declarations, parse_errors) = self.parser.parse_files(&sources);
        tracing::debug!(
            assets = assets.len(),
            sources = sources.len(),
            declarations = declarations.len(),
            parse_errors = parse_errors.len(),
            "inputs collected"
        );

        Ok(CollectedInputs {
            inputs: Inputs {
                assets: assets
                    .into_iter()
                    .map(|file| AssetFile::new(file.path, file.content))
                    .collect(),
                declarations,
            },
            parse_errors,
            source_files: sources.len(),
        })
    }

    /// Collect inputs and run the pipeline over them.
    pub fn generate(&mut self) -> CliResult<GeneratedOutput> {
        let collected = self.collect_inputs()?;
        let report = self.pipeline.run(&collected.inputs)?;

        Ok(GeneratedOutput {
            report,
            parse_errors: collected.parse_errors,
            asset_files: collected.inputs.assets.len(),
            source_files: collected.source_files,
            declarations: collected.inputs.declarations.len(),
        })
    }

    /// Where a unit is written.
    pub fn unit_path(&self, unit: &GeneratedUnit) -> PathBuf {
        self.config.output.dir.join(&unit.hint_name)
    }
}

/// Files in `output_dir` that do not match `units`.
///
/// Lists units whose file is missing or differs, then generated files that
/// no unit produces any more.
pub fn out_of_date(output_dir: &Path, units: &[GeneratedUnit]) -> CliResult<Vec<PathBuf>> {
    let mut outdated = Vec::new();
    for unit in units {
        let path = output_dir.join(&unit.hint_name);
        let current = std::fs::read_to_string(&path).is_ok_and(|existing| existing == unit.source);
        if !current {
            outdated.push(path);
        }
    }

    let keep: Vec<&str> = units.iter().map(|unit| unit.hint_name.as_str()).collect();
    outdated.extend(stale_files(output_dir, &keep)?);
    Ok(outdated)
}
