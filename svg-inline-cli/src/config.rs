//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `svg-inline.toml` files
//! and merging with command-line arguments.

use crate::error::{CliResult, ConfigError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use svg_inline_codegen::{CatalogOptions, EmitOptions, PipelineOptions};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "svg-inline.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input locations.
    pub input: InputConfig,

    /// Output location and render API paths.
    pub output: OutputConfig,

    /// Generation switches.
    pub generation: GenerationConfig,
}

/// Input configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory holding the SVG assets.
    pub assets: PathBuf,

    /// Crate source root (`src`), used to derive module paths.
    pub sources: PathBuf,

    /// Extension of asset files.
    pub asset_extension: String,

    /// Attribute that marks a component struct.
    pub directive: String,

    /// Optional glob filter for source files, relative to `sources`.
    pub filter: Option<String>,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory for generated files.
    pub dir: PathBuf,

    /// Trait implemented by the generated dispatch.
    pub component_trait: String,

    /// Builder type passed to the render method.
    pub builder_type: String,

    /// Render method name.
    pub render_method: String,
}

/// Generation configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Fail on malformed assets instead of skipping them.
    pub strict_assets: bool,

    /// Emit an enum listing every asset.
    pub catalog: bool,

    /// Name of the catalog enum.
    pub catalog_enum: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            assets: PathBuf::from("./assets"),
            sources: PathBuf::from("./src"),
            asset_extension: "svg".to_string(),
            directive: "generate_svg".to_string(),
            filter: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        let emit = EmitOptions::default();
        Self {
            dir: PathBuf::from("./generated"),
            component_trait: emit.component_trait,
            builder_type: emit.builder_type,
            render_method: emit.render_method,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            strict_assets: false,
            catalog: false,
            catalog_enum: CatalogOptions::default().enum_name,
        }
    }
}

impl Config {
    /// Options for the generator core.
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            asset_extension: self.input.asset_extension.clone(),
            strict_assets: self.generation.strict_assets,
            catalog: self.generation.catalog.then(|| CatalogOptions {
                enum_name: self.generation.catalog_enum.clone(),
            }),
            emit: EmitOptions {
                component_trait: self.output.component_trait.clone(),
                builder_type: self.output.builder_type.clone(),
                render_method: self.output.render_method.clone(),
            },
        }
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// If the path is None, attempts to load from the default location.
    /// If no config file exists, returns default configuration.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

        if !config_path.exists() {
            if path.is_some() {
                return Err(ConfigError::not_found(config_path).into());
            }
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_toml(config_path, e.to_string()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Reject values the generator cannot work with.
    pub fn validate(config: &Config) -> CliResult<()> {
        let extension = &config.input.asset_extension;
        if extension.is_empty() || extension.starts_with('.') {
            return Err(ConfigError::invalid_value(
                "input.asset_extension",
                format!("expected an extension without a leading dot, got '{extension}'"),
            )
            .into());
        }

        for (key, value) in [
            ("input.directive", &config.input.directive),
            ("output.render_method", &config.output.render_method),
            ("generation.catalog_enum", &config.generation.catalog_enum),
        ] {
            if syn::parse_str::<syn::Ident>(value).is_err() {
                return Err(ConfigError::invalid_value(
                    key,
                    format!("'{value}' is not a Rust identifier"),
                )
                .into());
            }
        }

        for (key, value) in [
            ("output.component_trait", &config.output.component_trait),
            ("output.builder_type", &config.output.builder_type),
        ] {
            if syn::parse_str::<syn::Path>(value).is_err() {
                return Err(ConfigError::invalid_value(
                    key,
                    format!("'{value}' is not a Rust path"),
                )
                .into());
            }
        }

        Ok(())
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref assets) = args.assets {
            config.input.assets = assets.clone();
        }

        if let Some(ref sources) = args.sources {
            config.input.sources = sources.clone();
        }

        if let Some(ref filter) = args.filter {
            config.input.filter = Some(filter.clone());
        }

        if let Some(ref output) = args.output {
            config.output.dir = output.clone();
        }

        if let Some(strict_assets) = args.strict_assets {
            config.generation.strict_assets = strict_assets;
        }

        if let Some(catalog) = args.catalog {
            config.generation.catalog = catalog;
        }

        config
    }

    /// Get default configuration.
    pub fn default_config() -> Config {
        Config::default()
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# svg-inline configuration file

[input]
# Directory containing the SVG assets (searched recursively)
assets = "./assets"

# Crate source root; module paths are derived relative to it
sources = "./src"

# Extension of asset files
asset_extension = "svg"

# Attribute marking component structs: #[generate_svg(kind, attributes)] from
# svg-inline-macros. Set this when the attribute is imported under another name.
directive = "generate_svg"

[output]
# Output directory for generated files; include `svg_inline.g.rs` from your crate
dir = "./generated"

# Rendering API the generated code targets
component_trait = "crate::component::Component"
builder_type = "crate::component::RenderTreeBuilder"
render_method = "build_render_tree"

[generation]
# Fail instead of skipping assets that are not well-formed XML
strict_assets = false

# Also generate an enum listing every asset with its inline markup
catalog = false
catalog_enum = "IconType"
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Asset directory override.
    pub assets: Option<PathBuf>,

    /// Source directory override.
    pub sources: Option<PathBuf>,

    /// Source filter override.
    pub filter: Option<String>,

    /// Output directory override.
    pub output: Option<PathBuf>,

    /// Strict asset handling override.
    pub strict_assets: Option<bool>,

    /// Catalog generation override.
    pub catalog: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.assets, PathBuf::from("./assets"));
        assert_eq!(config.input.sources, PathBuf::from("./src"));
        assert_eq!(config.input.asset_extension, "svg");
        assert_eq!(config.input.directive, "generate_svg");
        assert_eq!(config.output.dir, PathBuf::from("./generated"));
        assert_eq!(config.output.component_trait, "crate::component::Component");
        assert_eq!(config.output.render_method, "build_render_tree");
        assert!(!config.generation.strict_assets);
        assert!(!config.generation.catalog);
        assert_eq!(config.generation.catalog_enum, "IconType");
    }

    #[test]
    fn test_default_content_matches_defaults() {
        let parsed: Config = toml::from_str(ConfigManager::default_config_content()).unwrap();
        let defaults = Config::default();

        assert_eq!(parsed.input.assets, defaults.input.assets);
        assert_eq!(parsed.output.dir, defaults.output.dir);
        assert_eq!(parsed.output.builder_type, defaults.output.builder_type);
        assert_eq!(parsed.generation.catalog_enum, defaults.generation.catalog_enum);
        assert!(ConfigManager::validate(&parsed).is_ok());
    }

    #[test]
    fn test_merge_cli_args_output() {
        let config = Config::default();
        let args = CliArgs {
            output: Some(PathBuf::from("./custom")),
            catalog: Some(true),
            ..Default::default()
        };

        let merged = ConfigManager::merge_cli_args(config, &args);
        assert_eq!(merged.output.dir, PathBuf::from("./custom"));
        assert!(merged.generation.catalog);
    }

    #[test]
    fn test_merge_cli_args_preserves_unset() {
        let config = Config::default();
        let args = CliArgs::default();

        let merged = ConfigManager::merge_cli_args(config.clone(), &args);
        assert_eq!(merged.input.assets, config.input.assets);
        assert_eq!(merged.output.dir, config.output.dir);
        assert_eq!(merged.generation.strict_assets, config.generation.strict_assets);
    }

    #[test]
    fn test_parse_toml_config() {
        let toml = r#"
[input]
assets = "./icons"
directive = "inline_svg"

[output]
dir = "./src/generated"
component_trait = "ui::Render"

[generation]
strict_assets = true
catalog = true
catalog_enum = "Glyph"
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.input.assets, PathBuf::from("./icons"));
        assert_eq!(config.input.directive, "inline_svg");
        // unset keys keep their defaults
        assert_eq!(config.input.asset_extension, "svg");
        assert_eq!(config.output.dir, PathBuf::from("./src/generated"));
        assert_eq!(config.output.render_method, "build_render_tree");

        let options = config.pipeline_options();
        assert!(options.strict_assets);
        assert_eq!(options.catalog.unwrap().enum_name, "Glyph");
        assert_eq!(options.emit.component_trait, "ui::Render");
    }

    #[test]
    fn test_catalog_disabled_by_default() {
        assert!(Config::default().pipeline_options().catalog.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.input.asset_extension = ".svg".to_string();
        assert!(ConfigManager::validate(&config).is_err());

        let mut config = Config::default();
        config.generation.catalog_enum = "Icon Type".to_string();
        assert!(ConfigManager::validate(&config).is_err());

        let mut config = Config::default();
        config.output.builder_type = "crate::".to_string();
        assert!(ConfigManager::validate(&config).is_err());
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let explicit = dir.path().join("missing.toml");
        assert!(ConfigManager::load(Some(&explicit)).is_err());
    }
}
