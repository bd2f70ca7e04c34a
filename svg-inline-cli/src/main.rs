//! # svg-inline
//!
//! CLI tool for inlining SVG assets into Rust render code.
//!
//! ## Usage
//!
//! ```bash
//! # Generate from ./assets and ./src into ./generated
//! svg-inline generate
//!
//! # Custom locations
//! svg-inline generate --assets ./icons --sources ./src --output ./src/generated
//!
//! # Watch mode for development
//! svg-inline generate --watch
//!
//! # Dry run to preview changes
//! svg-inline generate --dry-run
//!
//! # Initialize configuration
//! svg-inline init
//!
//! # Check that generated files are up-to-date (exit code 2 if not)
//! svg-inline validate
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use svg_inline_cli::{
    config::{CliArgs, Config, ConfigManager},
    error::CliError,
    generator::{out_of_date, GeneratedOutput, SvgGenerator},
    report::{OutputFormat, Summary},
    watcher::FileWatcher,
    writer::{FileWriter, WriteResult},
};

#[derive(Parser)]
#[command(name = "svg-inline")]
#[command(author, version, about = "Inline SVG assets into Rust render code", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate render dispatch from component structs and SVG assets
    Generate {
        /// Directory containing SVG assets
        #[arg(short, long)]
        assets: Option<PathBuf>,

        /// Crate source root containing the component structs
        #[arg(short, long)]
        sources: Option<PathBuf>,

        /// Output directory for generated files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Filter source files by path pattern (glob, relative to the source root)
        #[arg(long)]
        filter: Option<String>,

        /// Watch for file changes and regenerate
        #[arg(short, long)]
        watch: bool,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fail on assets that are not well-formed SVG
        #[arg(long)]
        strict_assets: bool,

        /// Also generate the asset catalog enum
        #[arg(long)]
        catalog: bool,
    },

    /// Initialize a new svg-inline configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "svg-inline.toml")]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Validate that generated files are up-to-date
    Validate {
        /// Directory containing SVG assets
        #[arg(short, long)]
        assets: Option<PathBuf>,

        /// Crate source root containing the component structs
        #[arg(short, long)]
        sources: Option<PathBuf>,

        /// Directory holding the generated files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            match e {
                CliError::Validation(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let format = cli.format;
    match cli.command {
        Commands::Generate {
            assets,
            sources,
            output,
            filter,
            watch,
            dry_run,
            config,
            strict_assets,
            catalog,
        } => {
            let args = CliArgs {
                assets,
                sources,
                filter,
                output,
                strict_assets: strict_assets.then_some(true),
                catalog: catalog.then_some(true),
            };
            cmd_generate(&args, config.as_deref(), watch, dry_run, format)
        }

        Commands::Init { output, force } => cmd_init(output, force),

        Commands::Validate {
            assets,
            sources,
            output,
            config,
        } => {
            let args = CliArgs {
                assets,
                sources,
                output,
                ..Default::default()
            };
            cmd_validate(&args, config.as_deref(), format)
        }
    }
}

fn load_config(path: Option<&Path>, args: &CliArgs) -> Result<Config, CliError> {
    let config = ConfigManager::load(path)?;
    let config = ConfigManager::merge_cli_args(config, args);
    ConfigManager::validate(&config)?;
    Ok(config)
}

/// Generate command implementation.
fn cmd_generate(
    args: &CliArgs,
    config_path: Option<&Path>,
    watch: bool,
    dry_run: bool,
    format: OutputFormat,
) -> Result<(), CliError> {
    let config = load_config(config_path, args)?;
    let mut generator = SvgGenerator::new(config);

    if watch {
        run_watch_mode(&mut generator, dry_run, format)
    } else {
        run_generate(&mut generator, dry_run, format)
    }
}

/// Run generation once and write the results.
fn run_generate(
    generator: &mut SvgGenerator,
    dry_run: bool,
    format: OutputFormat,
) -> Result<(), CliError> {
    let human = format == OutputFormat::Human;
    if human {
        println!("{}", "Scanning assets and sources...".cyan());
    }

    let output = generator.generate()?;
    let writes = write_output(generator, &output, dry_run)?;

    match format {
        OutputFormat::Human => print_generate_summary(&output, &writes),
        OutputFormat::Json => {
            let json = Summary::new(&output, &writes)
                .to_json()
                .map_err(|e| CliError::Io(e.into()))?;
            println!("{json}");
        }
    }

    Ok(())
}

/// Write every unit, then prune generated files that are no longer produced.
fn write_output(
    generator: &SvgGenerator,
    output: &GeneratedOutput,
    dry_run: bool,
) -> Result<Vec<WriteResult>, CliError> {
    let writer = FileWriter::new(dry_run);
    let mut results = Vec::new();

    for unit in output.units() {
        results.push(writer.write(&generator.unit_path(unit), &unit.source)?);
    }

    let keep: Vec<&str> = output
        .units()
        .iter()
        .map(|unit| unit.hint_name.as_str())
        .collect();
    results.extend(writer.prune(&generator.config().output.dir, &keep)?);

    Ok(results)
}

fn print_generate_summary(output: &GeneratedOutput, writes: &[WriteResult]) {
    println!(
        "  Found {} asset(s), {} source file(s), {} component(s)",
        output.asset_files.to_string().green(),
        output.source_files.to_string().green(),
        output.declarations.to_string().green()
    );

    if !output.parse_errors.is_empty() {
        println!(
            "{} {} parse error(s):",
            "Warning:".yellow(),
            output.parse_errors.len()
        );
        for error in &output.parse_errors {
            println!("  {error}");
        }
    }

    for diagnostic in &output.report.diagnostics {
        println!("{} {}", "Warning:".yellow(), diagnostic);
    }

    for result in writes {
        match result {
            WriteResult::Written { path, bytes } => {
                println!(
                    "{} Written {} bytes to {}",
                    "✓".green(),
                    bytes,
                    path.display()
                );
            }
            WriteResult::Removed { path } => {
                println!("{} Removed {}", "✓".green(), path.display());
            }
            WriteResult::Unchanged { path } => {
                println!("  {} {}", "unchanged".dimmed(), path.display());
            }
            WriteResult::DryRun { content, path } if content.is_empty() => {
                println!(
                    "{} Would remove {}",
                    "[dry-run]".yellow(),
                    path.display()
                );
            }
            WriteResult::DryRun { content, path } => {
                println!(
                    "{} Would write to {}:",
                    "[dry-run]".yellow(),
                    path.display()
                );
                println!("{}", "─".repeat(60).dimmed());
                println!("{content}");
                println!("{}", "─".repeat(60).dimmed());
            }
        }
    }
}

/// Run in watch mode.
fn run_watch_mode(
    generator: &mut SvgGenerator,
    dry_run: bool,
    format: OutputFormat,
) -> Result<(), CliError> {
    let input = generator.config().input.clone();
    println!("{}", "Starting watch mode...".cyan());
    println!("  Watching: {}", input.assets.display());
    println!("  Watching: {}", input.sources.display());
    println!("  Press Ctrl+C to stop\n");

    // Initial generation
    run_generate(generator, dry_run, format)?;

    let watcher = FileWatcher::new(&input.sources)
        .with_root(&input.assets)
        .with_extension(input.asset_extension.clone());
    let (_debouncer, rx) = watcher.watch()?;

    println!("\n{}", "Watching for changes...".cyan());

    while let Ok(event) = rx.recv() {
        if event.is_error() {
            println!(
                "{} {}",
                "Watch error:".red(),
                event.error_message().unwrap_or("Unknown error")
            );
            continue;
        }

        if let Some(path) = event.path() {
            println!("\n{} {}", "File changed:".cyan(), path.display());
        }

        // the generator keeps its memo tables, so only changed inputs are redone
        if let Err(e) = run_generate(generator, dry_run, format) {
            println!("{} {}", "Generation error:".red(), e);
        }

        println!("\n{}", "Watching for changes...".cyan());
    }

    Ok(())
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        println!(
            "{} Configuration file already exists: {}",
            "Error:".red(),
            output.display()
        );
        println!("  Use --force to overwrite");
        return Err(CliError::Validation(
            "Configuration file already exists".to_string(),
        ));
    }

    let content = ConfigManager::default_config_content();
    std::fs::write(&output, content)?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );

    Ok(())
}

/// Validate command implementation.
fn cmd_validate(
    args: &CliArgs,
    config_path: Option<&Path>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let config = load_config(config_path, args)?;
    let output_dir = config.output.dir.clone();

    if format == OutputFormat::Human {
        println!("{}", "Validating generated files...".cyan());
    }

    let output = SvgGenerator::new(config).generate()?;
    let outdated = out_of_date(&output_dir, output.units())?;

    if format == OutputFormat::Json {
        let json = serde_json::json!({
            "up_to_date": outdated.is_empty(),
            "outdated": outdated,
        });
        println!("{json}");
    }

    if outdated.is_empty() {
        if format == OutputFormat::Human {
            println!("{} Generated files are up-to-date", "✓".green());
        }
        return Ok(());
    }

    if format == OutputFormat::Human {
        println!("{} Generated files are out of date", "✗".red());
        for path in &outdated {
            println!("  {}", path.display());
        }
        println!("  Run 'svg-inline generate' to update");
    }
    Err(CliError::Validation(format!(
        "{} generated file(s) out of date",
        outdated.len()
    )))
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
