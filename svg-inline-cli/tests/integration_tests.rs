//! Integration tests for svg-inline-cli.
//!
//! These tests run the scan, parse, generate and write steps against the
//! fixture project in `tests/fixtures/project`.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use svg_inline_cli::{
    config::{Config, ConfigManager},
    generator::{out_of_date, SvgGenerator},
    parser::RustParser,
    scanner::SourceScanner,
    writer::{FileWriter, WriteResult},
};
use svg_inline_codegen::{DefinitionId, DiagnosticCode};

/// Get the path to the fixture project.
fn fixture_project() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/project")
}

/// Config pointing at a project root.
fn config_for(root: &Path) -> Config {
    let mut config = Config::default();
    config.input.assets = root.join("assets");
    config.input.sources = root.join("src");
    config.output.dir = root.join("generated");
    config
}

/// Copy the fixture project into a temporary directory.
fn copy_fixture() -> TempDir {
    fn copy_dir(from: &Path, to: &Path) {
        fs::create_dir_all(to).unwrap();
        for entry in fs::read_dir(from).unwrap() {
            let entry = entry.unwrap();
            let target = to.join(entry.file_name());
            if entry.file_type().unwrap().is_dir() {
                copy_dir(&entry.path(), &target);
            } else {
                fs::copy(entry.path(), target).unwrap();
            }
        }
    }

    let dir = TempDir::new().unwrap();
    copy_dir(&fixture_project(), dir.path());
    dir
}

/// Generate and write every unit the way the `generate` command does.
fn generate_and_write(generator: &mut SvgGenerator) -> Vec<WriteResult> {
    let output = generator.generate().unwrap();
    let writer = FileWriter::new(false);
    let mut results: Vec<WriteResult> = output
        .units()
        .iter()
        .map(|unit| writer.write(&generator.unit_path(unit), &unit.source).unwrap())
        .collect();
    let keep: Vec<&str> = output.units().iter().map(|u| u.hint_name.as_str()).collect();
    results.extend(writer.prune(&generator.config().output.dir, &keep).unwrap());
    results
}

fn codes(generator: &mut SvgGenerator) -> Vec<DiagnosticCode> {
    let output = generator.generate().unwrap();
    let mut codes: Vec<_> = output.report.diagnostics.iter().map(|d| d.code).collect();
    codes.sort_by_key(|code| code.id());
    codes
}

// =============================================================================
// Scanner and Parser Integration Tests
// =============================================================================

#[test]
fn test_scanner_finds_fixture_assets() {
    let files = SourceScanner::new(fixture_project().join("assets"))
        .with_extension("svg")
        .scan()
        .unwrap();

    let names: Vec<_> = files
        .iter()
        .map(|f| f.relative_path.to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(
        names,
        vec!["broken.svg", "home.svg", "layout-list.svg", "nav/back.svg"]
    );
}

#[test]
fn test_parser_finds_fixture_components() {
    let files = SourceScanner::new(fixture_project().join("src")).scan().unwrap();
    let (declarations, errors) = RustParser::new().parse_files(&files);

    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");

    let mut ids: Vec<_> = declarations.iter().map(|d| d.id().to_string()).collect();
    ids.sort();
    assert_eq!(
        ids,
        vec![
            "shared::icons::Icon",
            "shared::icons::OptionalIcon",
            "shared::nav::NamedIcon",
            "shared::nav::NavButton",
        ]
    );
}

// =============================================================================
// Generation Tests
// =============================================================================

#[test]
fn test_generate_fixture_project() {
    let mut generator = SvgGenerator::new(config_for(&fixture_project()));
    let output = generator.generate().unwrap();

    assert_eq!(output.asset_files, 4);
    assert_eq!(output.declarations, 4);

    let hints: Vec<_> = output.units().iter().map(|u| u.hint_name.as_str()).collect();
    assert_eq!(
        hints,
        vec![
            "generate_svg_attribute.g.rs",
            "shared__icons__icon.g.rs",
            "shared__icons__optional_icon.g.rs",
            "svg_inline.g.rs",
        ]
    );

    let icon = output
        .report
        .result(&DefinitionId::new("shared::icons", "Icon"))
        .and_then(|result| result.source.clone())
        .unwrap();
    assert!(icon.contains("impl crate::component::Component for crate::shared::icons::Icon"));
    assert!(icon.contains("crate::shared::icons::IconKind::Home => {"));
    assert!(icon.contains("crate::shared::icons::IconKind::LayoutList => {"));
    assert!(!icon.contains("IconKind::Plus"));
    assert!(icon.contains("builder.add_attribute(\"viewBox\", \"0 0 24 24\");"));
    assert!(icon.contains("let extras = &self.attributes;"));

    let optional = output
        .report
        .result(&DefinitionId::new("shared::icons", "OptionalIcon"))
        .and_then(|result| result.source.clone())
        .unwrap();
    assert!(optional.contains("if let Some(extras) = &self.attributes {"));
}

#[test]
fn test_fixture_diagnostics() {
    let mut generator = SvgGenerator::new(config_for(&fixture_project()));

    assert_eq!(
        codes(&mut generator),
        vec![
            DiagnosticCode::AdditionalAttributesPropertyNotFound,
            DiagnosticCode::TypePropertyIsNotAnEnum,
            DiagnosticCode::AdditionalFilesNotFound,
            DiagnosticCode::AdditionalFilesNotFound,
            DiagnosticCode::AssetSkipped,
        ]
    );
}

#[test]
fn test_strict_assets_fails_on_broken_asset() {
    let mut config = config_for(&fixture_project());
    config.generation.strict_assets = true;

    let result = SvgGenerator::new(config).generate();

    assert!(matches!(
        result,
        Err(svg_inline_cli::CliError::Generate(_))
    ));
}

#[test]
fn test_catalog_unit_lists_valid_assets() {
    let mut config = config_for(&fixture_project());
    config.generation.catalog = true;

    let output = SvgGenerator::new(config).generate().unwrap();
    let catalog = output
        .units()
        .iter()
        .find(|unit| unit.hint_name == "icon_type.g.rs")
        .unwrap();

    assert!(catalog.source.contains("pub enum IconType"));
    assert!(catalog.source.contains("Back = 1,"));
    assert!(catalog.source.contains("Home,"));
    assert!(catalog.source.contains("LayoutList,"));
    assert!(!catalog.source.contains("Broken"));
}

#[test]
fn test_filter_limits_sources() {
    let mut config = config_for(&fixture_project());
    config.input.filter = Some("shared/icons.rs".to_string());

    let output = SvgGenerator::new(config).generate().unwrap();

    assert_eq!(output.source_files, 1);
    assert_eq!(output.declarations, 2);
}

// =============================================================================
// Write and Validate Tests
// =============================================================================

#[test]
fn test_written_files_validate() {
    let project = copy_fixture();
    let config = config_for(project.path());
    let output_dir = config.output.dir.clone();
    let mut generator = SvgGenerator::new(config.clone());

    let first = generate_and_write(&mut generator);
    assert!(first.iter().all(|result| result.was_written()));
    assert!(output_dir.join("svg_inline.g.rs").exists());

    let index = fs::read_to_string(output_dir.join("svg_inline.g.rs")).unwrap();
    assert!(index.contains("include!(\"shared__icons__icon.g.rs\");"));

    let fresh = SvgGenerator::new(config).generate().unwrap();
    assert!(out_of_date(&output_dir, fresh.units()).unwrap().is_empty());

    let second = generate_and_write(&mut generator);
    assert!(second
        .iter()
        .all(|result| matches!(result, WriteResult::Unchanged { .. })));
}

#[test]
fn test_new_asset_makes_files_out_of_date() {
    let project = copy_fixture();
    let config = config_for(project.path());
    let output_dir = config.output.dir.clone();
    let mut generator = SvgGenerator::new(config.clone());
    generate_and_write(&mut generator);

    fs::write(
        project.path().join("assets/plus.svg"),
        r#"<svg viewBox="0 0 24 24"><path d="M5 12h14"/></svg>"#,
    )
    .unwrap();

    let fresh = SvgGenerator::new(config).generate().unwrap();
    let outdated = out_of_date(&output_dir, fresh.units()).unwrap();
    assert_eq!(
        outdated,
        vec![
            output_dir.join("shared__icons__icon.g.rs"),
            output_dir.join("shared__icons__optional_icon.g.rs"),
        ]
    );

    let rewritten = generate_and_write(&mut generator);
    let written: Vec<_> = rewritten
        .iter()
        .filter(|result| result.was_written())
        .map(|result| result.path().to_path_buf())
        .collect();
    assert_eq!(written, outdated);
}

#[test]
fn test_removed_component_prunes_its_file() {
    let project = copy_fixture();
    let config = config_for(project.path());
    let output_dir = config.output.dir.clone();
    let mut generator = SvgGenerator::new(config);
    generate_and_write(&mut generator);
    assert!(output_dir.join("shared__icons__optional_icon.g.rs").exists());

    let icons = project.path().join("src/shared/icons.rs");
    let source = fs::read_to_string(&icons).unwrap();
    let trimmed = source
        .split("#[generate_svg(kind, attributes)]\npub struct OptionalIcon")
        .next()
        .unwrap()
        .to_string();
    fs::write(&icons, trimmed).unwrap();

    let results = generate_and_write(&mut generator);

    assert!(results.iter().any(|result| matches!(
        result,
        WriteResult::Removed { path } if path.ends_with("shared__icons__optional_icon.g.rs")
    )));
    assert!(!output_dir.join("shared__icons__optional_icon.g.rs").exists());
}

#[test]
fn test_dry_run_writes_nothing() {
    let project = copy_fixture();
    let config = config_for(project.path());
    let mut generator = SvgGenerator::new(config.clone());
    let output = generator.generate().unwrap();

    let writer = FileWriter::new(true);
    for unit in output.units() {
        let result = writer.write(&generator.unit_path(unit), &unit.source).unwrap();
        assert!(matches!(result, WriteResult::DryRun { .. }));
    }

    assert!(!config.output.dir.exists());
}

// =============================================================================
// Configuration Tests
// =============================================================================

#[test]
fn test_config_file_drives_generation() {
    let project = copy_fixture();
    let config_path = project.path().join("svg-inline.toml");
    fs::write(
        &config_path,
        format!(
            r#"
[input]
assets = "{assets}"
sources = "{sources}"

[output]
dir = "{output}"
component_trait = "crate::component::Render"

[generation]
catalog = true
catalog_enum = "Glyph"
"#,
            assets = project.path().join("assets").display().to_string().replace('\\', "/"),
            sources = project.path().join("src").display().to_string().replace('\\', "/"),
            output = project.path().join("out").display().to_string().replace('\\', "/"),
        ),
    )
    .unwrap();

    let config = ConfigManager::load(Some(&config_path)).unwrap();
    let output = SvgGenerator::new(config).generate().unwrap();

    assert!(output.units().iter().any(|unit| unit.hint_name == "glyph.g.rs"));
    let icon = output
        .units()
        .iter()
        .find(|unit| unit.hint_name == "shared__icons__icon.g.rs")
        .unwrap();
    assert!(icon.source.contains("impl crate::component::Render for"));
}
