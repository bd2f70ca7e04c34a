//! The generation pipeline.
//!
//! A [`Pipeline`] owns one memo table per stage:
//!
//! 1. assets: path and content to a loaded [`AssetEntry`]
//! 2. definitions: declaration to an [`Analysis`]
//! 3. results: analysis plus the matched assets to a [`GenerationResult`]
//!
//! Each stage looks up every input by key and fingerprint first, computes
//! only the stale inputs in parallel, then stores the new outputs. Running the
//! same pipeline again with unchanged inputs reuses every entry.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;
use std::path::PathBuf;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analyzer::{analyze, Analysis};
use crate::asset::{load_asset, AssetEntry, AssetIndex};
use crate::cache::{Fingerprint, FingerprintBuilder, Memo, MemoStats};
use crate::declaration::{Declaration, DefinitionId, SourceLocation};
use crate::diagnostic::Diagnostic;
use crate::emit::{
    catalog_hint_name, emit_catalog, emit_definition, emit_directive, emit_index, hint_name,
    CatalogOptions, EmitOptions, GeneratedUnit, GenerationResult, DIRECTIVE_HINT, INDEX_HINT,
};
use crate::error::{AssetError, PipelineError};

/// One asset file as supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFile {
    pub path: PathBuf,
    pub content: String,
}

impl AssetFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Everything one run reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inputs {
    pub assets: Vec<AssetFile>,
    pub declarations: Vec<Declaration>,
}

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Only files with this extension are treated as assets.
    pub asset_extension: String,

    /// Fail the run on a malformed asset instead of skipping it.
    pub strict_assets: bool,

    /// Emit the asset catalog unit.
    pub catalog: Option<CatalogOptions>,

    pub emit: EmitOptions,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            asset_extension: "svg".to_string(),
            strict_assets: false,
            catalog: None,
            emit: EmitOptions::default(),
        }
    }
}

/// Reuse counters for every stage of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub assets: MemoStats,
    pub definitions: MemoStats,
    pub results: MemoStats,
}

impl RunStats {
    /// Whether the run recomputed nothing.
    pub fn fully_reused(&self) -> bool {
        self.assets.computed == 0 && self.definitions.computed == 0 && self.results.computed == 0
    }
}

/// Output of one run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Per-definition results, ordered by definition identity.
    pub results: Vec<Arc<GenerationResult>>,

    /// Every generated unit; the index unit comes last.
    pub units: Vec<GeneratedUnit>,

    /// Asset diagnostics followed by per-definition diagnostics.
    pub diagnostics: Vec<Diagnostic>,

    pub stats: RunStats,
}

impl RunReport {
    /// Look up the result for one definition.
    pub fn result(&self, id: &DefinitionId) -> Option<&GenerationResult> {
        self.results
            .iter()
            .find(|result| &result.id == id)
            .map(|result| result.as_ref())
    }
}

const DIRECTIVE_KEY: &str = "directive";
const CATALOG_KEY: &str = "catalog";

/// Incremental generator. Keep one instance alive across runs to reuse work.
#[derive(Debug)]
pub struct Pipeline {
    options: PipelineOptions,
    assets: Memo<PathBuf, Result<Arc<AssetEntry>, AssetError>>,
    analyses: Memo<DefinitionId, Analysis>,
    results: Memo<DefinitionId, GenerationResult>,
    units: Memo<&'static str, GeneratedUnit>,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            options,
            assets: Memo::new(),
            analyses: Memo::new(),
            results: Memo::new(),
            units: Memo::new(),
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Run every stage over `inputs`.
    pub fn run(&mut self, inputs: &Inputs) -> Result<RunReport, PipelineError> {
        let mut stats = RunStats::default();
        let mut diagnostics = Vec::new();

        let collected = self.collect_assets(inputs, &mut stats, &mut diagnostics)?;
        let analyses = self.analyze_declarations(inputs, &mut stats);
        let mut results = self.generate(&analyses, &collected, &mut stats);
        self.assign_unique_hint_names(&mut results);

        for result in &results {
            diagnostics.extend(result.diagnostics.iter().cloned());
        }

        let units = self.assemble_units(&results, &collected);

        tracing::info!(
            assets = collected.index.len(),
            definitions = results.len(),
            units = units.len(),
            diagnostics = diagnostics.len(),
            recomputed = stats.results.computed,
            "generation finished"
        );

        Ok(RunReport {
            results,
            units,
            diagnostics,
            stats,
        })
    }

    fn collect_assets(
        &mut self,
        inputs: &Inputs,
        stats: &mut RunStats,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<CollectedAssets, PipelineError> {
        let extension = &self.options.asset_extension;
        let mut files: Vec<&AssetFile> = inputs
            .assets
            .iter()
            .filter(|file| {
                file.path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
            })
            .collect();
        files.sort_by(|a, b| a.path.cmp(&b.path));
        files.dedup_by(|a, b| a.path == b.path);

        let items: Vec<_> = files
            .iter()
            .map(|file| {
                let fingerprint = FingerprintBuilder::new()
                    .str(&file.path.to_string_lossy())
                    .str(&file.content)
                    .finish();
                (file.path.clone(), fingerprint, *file)
            })
            .collect();

        let (loaded, stage) = run_stage(&mut self.assets, &items, "asset", |file: &AssetFile| {
            load_asset(&file.path, &file.content).map(Arc::new)
        });
        stats.assets = stage;

        let mut collected = CollectedAssets::default();
        let mut owners: HashMap<String, PathBuf> = HashMap::new();

        for ((path, fingerprint, _), outcome) in items.iter().zip(loaded) {
            let entry = match &*outcome {
                Ok(entry) => entry,
                Err(error) if self.options.strict_assets => {
                    return Err(PipelineError::Asset(error.clone()));
                }
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "asset skipped");
                    diagnostics.push(Diagnostic::asset_skipped(
                        &path.display().to_string(),
                        &error.to_string(),
                        SourceLocation::new(path, 1, 1),
                    ));
                    continue;
                }
            };

            if let Some(owner) = owners.get(&entry.identifier) {
                tracing::warn!(
                    path = %path.display(),
                    identifier = %entry.identifier,
                    "duplicate asset identifier"
                );
                diagnostics.push(Diagnostic::asset_skipped(
                    &path.display().to_string(),
                    &format!(
                        "identifier '{}' is already provided by {}",
                        entry.identifier,
                        owner.display()
                    ),
                    SourceLocation::new(path, 1, 1),
                ));
                continue;
            }

            owners.insert(entry.identifier.clone(), path.clone());
            collected
                .fingerprints
                .insert(entry.identifier.clone(), *fingerprint);
            collected
                .index
                .insert(entry.identifier.clone(), Arc::clone(entry));
        }

        Ok(collected)
    }

    fn analyze_declarations(&mut self, inputs: &Inputs, stats: &mut RunStats) -> Vec<Arc<Analysis>> {
        let mut declarations: Vec<&Declaration> = inputs.declarations.iter().collect();
        declarations.sort_by_key(|declaration| declaration.id());

        let mut seen = HashSet::new();
        let items: Vec<_> = declarations
            .into_iter()
            .filter(|declaration| {
                let id = declaration.id();
                if seen.insert(id.clone()) {
                    return true;
                }
                tracing::warn!(definition = %id, "duplicate definition ignored");
                false
            })
            .map(|declaration| {
                (
                    declaration.id(),
                    Fingerprint::of_value(declaration),
                    declaration,
                )
            })
            .collect();

        let (analyses, stage) = run_stage(&mut self.analyses, &items, "definition", analyze);
        stats.definitions = stage;
        analyses
    }

    fn generate(
        &mut self,
        analyses: &[Arc<Analysis>],
        collected: &CollectedAssets,
        stats: &mut RunStats,
    ) -> Vec<Arc<GenerationResult>> {
        let emit = &self.options.emit;

        let items: Vec<_> = analyses
            .iter()
            .map(|analysis| {
                let fingerprint = result_fingerprint(analysis, collected, emit);
                (analysis.id.clone(), fingerprint, analysis.as_ref())
            })
            .collect();

        let index = &collected.index;
        let (results, stage) = run_stage(&mut self.results, &items, "result", |analysis: &Analysis| {
            match &analysis.metadata {
                Some(metadata) => emit_definition(metadata, index, emit),
                None => GenerationResult {
                    id: analysis.id.clone(),
                    hint_name: hint_name(&analysis.id),
                    source: None,
                    diagnostics: analysis.diagnostics.clone(),
                },
            }
        });
        stats.results = stage;
        results
    }

    /// Give every definition unit a file name no other unit uses.
    ///
    /// Fixed units keep their names, and so does the first definition (in
    /// identity order) claiming a name. Later claimants get a numeric suffix
    /// that avoids every name in use.
    fn assign_unique_hint_names(&self, results: &mut [Arc<GenerationResult>]) {
        let mut reserved: HashSet<String> =
            [DIRECTIVE_HINT.to_string(), INDEX_HINT.to_string()].into();
        if let Some(catalog) = &self.options.catalog {
            reserved.insert(catalog_hint_name(catalog));
        }

        let mut taken: HashSet<String> = reserved.clone();
        taken.extend(
            results
                .iter()
                .filter(|result| result.source.is_some())
                .map(|result| result.hint_name.clone()),
        );

        let mut claimed = HashSet::new();
        for result in results.iter_mut().filter(|result| result.source.is_some()) {
            if !reserved.contains(&result.hint_name) && claimed.insert(result.hint_name.clone()) {
                continue;
            }

            let stem = result
                .hint_name
                .strip_suffix(".g.rs")
                .unwrap_or(result.hint_name.as_str())
                .to_string();
            let mut suffix = 2;
            let unique = loop {
                let candidate = format!("{stem}_{suffix}.g.rs");
                if !taken.contains(&candidate) {
                    break candidate;
                }
                suffix += 1;
            };

            tracing::warn!(
                definition = %result.id,
                hint = %result.hint_name,
                renamed = %unique,
                "generated file name already in use"
            );
            taken.insert(unique.clone());
            Arc::make_mut(result).hint_name = unique;
        }
    }

    fn assemble_units(
        &mut self,
        results: &[Arc<GenerationResult>],
        collected: &CollectedAssets,
    ) -> Vec<GeneratedUnit> {
        let mut ignored = MemoStats::default();
        let mut units = Vec::new();

        // no inputs, so the fingerprint never changes
        let directive = self.units.get_or_compute(
            &DIRECTIVE_KEY,
            Fingerprint::of_bytes(DIRECTIVE_KEY.as_bytes()),
            &mut ignored,
            emit_directive,
        );
        units.push(directive.as_ref().clone());

        if let Some(catalog) = &self.options.catalog {
            let mut fingerprint = FingerprintBuilder::new();
            fingerprint.value(catalog);
            for (identifier, asset) in &collected.fingerprints {
                fingerprint.str(identifier).fingerprint(asset);
            }
            let unit = self.units.get_or_compute(
                &CATALOG_KEY,
                fingerprint.finish(),
                &mut ignored,
                || emit_catalog(&collected.index, catalog),
            );
            units.push(unit.as_ref().clone());
        }

        let mut definitions: Vec<GeneratedUnit> =
            results.iter().filter_map(|result| result.unit()).collect();
        definitions.sort_by(|a, b| a.hint_name.cmp(&b.hint_name));
        units.extend(definitions);

        let index = emit_index(units.iter().map(|unit| unit.hint_name.as_str()));
        units.push(index);
        units
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineOptions::default())
    }
}

#[derive(Debug, Default)]
struct CollectedAssets {
    index: AssetIndex,
    /// Input fingerprint of the asset behind each identifier.
    fingerprints: BTreeMap<String, Fingerprint>,
}

/// A result depends on its analysis, the emit options and, for every member,
/// the fingerprint of the matching asset or its absence.
fn result_fingerprint(
    analysis: &Analysis,
    collected: &CollectedAssets,
    emit: &EmitOptions,
) -> Fingerprint {
    let mut builder = FingerprintBuilder::new();
    builder.value(analysis).value(emit);
    if let Some(metadata) = &analysis.metadata {
        for member in &metadata.enum_members {
            builder.str(member);
            match collected.fingerprints.get(member) {
                Some(asset) => builder.fingerprint(asset),
                None => builder.bytes(&[]),
            };
        }
    }
    builder.finish()
}

/// Reuse fresh outputs, compute stale ones in parallel, then store them.
///
/// Outputs are returned in item order. Entries for keys no longer present
/// are dropped from the memo.
fn run_stage<K, I, V, F>(
    memo: &mut Memo<K, V>,
    items: &[(K, Fingerprint, &I)],
    stage: &str,
    compute: F,
) -> (Vec<Arc<V>>, MemoStats)
where
    K: Eq + Hash + Clone + Sync + std::fmt::Debug,
    I: Sync + ?Sized,
    V: Send + Sync,
    F: Fn(&I) -> V + Sync,
{
    let mut outputs: Vec<Option<Arc<V>>> = items
        .iter()
        .map(|(key, fingerprint, _)| memo.get_fresh(key, fingerprint))
        .collect();

    let stale: Vec<usize> = outputs
        .iter()
        .enumerate()
        .filter_map(|(index, output)| output.is_none().then_some(index))
        .collect();

    let computed: Vec<(usize, V)> = stale
        .par_iter()
        .map(|&index| (index, compute(items[index].2)))
        .collect();

    let stats = MemoStats {
        reused: items.len() - computed.len(),
        computed: computed.len(),
    };

    for (index, value) in computed {
        let (key, fingerprint, _) = &items[index];
        tracing::debug!(stage, key = ?key, %fingerprint, "recomputed");
        let value = Arc::new(value);
        memo.insert(key.clone(), *fingerprint, Arc::clone(&value));
        outputs[index] = Some(value);
    }

    memo.retain_keys(items.iter().map(|(key, _, _)| key));

    (outputs.into_iter().flatten().collect(), stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{Directive, EnumRef, Property, TypeRef};
    use crate::diagnostic::DiagnosticCode;

    fn declaration(type_name: &str, members: &[&str]) -> Declaration {
        Declaration {
            namespace: "shared".to_string(),
            type_name: type_name.to_string(),
            directive: Directive {
                kind_property: "kind".to_string(),
                extras_property: "attributes".to_string(),
                location: SourceLocation::new("src/shared.rs", 1, 1),
            },
            properties: vec![
                Property::new(
                    "kind",
                    TypeRef::enumeration(EnumRef {
                        namespace: "shared".to_string(),
                        name: format!("{type_name}Kind"),
                        members: members.iter().map(|m| m.to_string()).collect(),
                    }),
                ),
                Property::new("attributes", TypeRef::other("HashMap<String, String>")),
            ],
            location: SourceLocation::new("src/shared.rs", 2, 12),
        }
    }

    fn inputs() -> Inputs {
        Inputs {
            assets: vec![
                AssetFile::new("icons/home.svg", r#"<svg viewBox="0 0 24 24"><path d="M3 9"/></svg>"#),
                AssetFile::new("icons/plus.svg", "<svg><line/></svg>"),
            ],
            declarations: vec![declaration("Icon", &["Home", "Plus"])],
        }
    }

    #[test]
    fn test_run_generates_units() {
        let report = Pipeline::default().run(&inputs()).unwrap();

        let hints: Vec<_> = report.units.iter().map(|u| u.hint_name.as_str()).collect();
        assert_eq!(
            hints,
            ["generate_svg_attribute.g.rs", "shared__icon.g.rs", "svg_inline.g.rs"]
        );
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.stats.assets.computed, 2);
        assert_eq!(report.stats.results.computed, 1);
    }

    #[test]
    fn test_second_run_reuses_everything() {
        let mut pipeline = Pipeline::default();
        let first = pipeline.run(&inputs()).unwrap();
        let second = pipeline.run(&inputs()).unwrap();

        assert!(second.stats.fully_reused());
        assert_eq!(first.units, second.units);
        assert!(Arc::ptr_eq(&first.results[0], &second.results[0]));
    }

    #[test]
    fn test_extension_filter() {
        let mut inputs = inputs();
        inputs.assets.push(AssetFile::new("icons/readme.txt", "not xml"));

        let report = Pipeline::default().run(&inputs).unwrap();
        assert_eq!(report.stats.assets.computed, 2);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_malformed_asset_is_skipped() {
        let mut inputs = inputs();
        inputs.assets.push(AssetFile::new("icons/broken.svg", "<svg><g></svg>"));

        let report = Pipeline::default().run(&inputs).unwrap();
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].code, DiagnosticCode::AssetSkipped);
        assert_eq!(report.diagnostics[0].args[0], "icons/broken.svg");
        assert!(report.result(&DefinitionId::new("shared", "Icon")).unwrap().source.is_some());
    }

    #[test]
    fn test_strict_assets_fail_the_run() {
        let mut inputs = inputs();
        inputs.assets.push(AssetFile::new("icons/broken.svg", "<svg><g></svg>"));

        let mut pipeline = Pipeline::new(PipelineOptions {
            strict_assets: true,
            ..PipelineOptions::default()
        });
        assert!(matches!(
            pipeline.run(&inputs),
            Err(PipelineError::Asset(AssetError::Malformed { .. }))
        ));
    }

    #[test]
    fn test_duplicate_identifier_first_path_wins() {
        let mut inputs = inputs();
        inputs.assets.push(AssetFile::new("alt/home.svg", "<svg><circle/></svg>"));

        let report = Pipeline::default().run(&inputs).unwrap();
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].args[0], "icons/home.svg");

        let source = report.result(&DefinitionId::new("shared", "Icon")).unwrap().source.clone().unwrap();
        assert!(source.contains("<circle/>"));
        assert!(!source.contains("M3 9"));
    }

    #[test]
    fn test_failed_analysis_has_no_source() {
        let mut bad = declaration("Badge", &[]);
        bad.properties.remove(0);
        let mut inputs = inputs();
        inputs.declarations.push(bad);

        let report = Pipeline::default().run(&inputs).unwrap();
        let result = report.result(&DefinitionId::new("shared", "Badge")).unwrap();
        assert!(result.source.is_none());
        assert_eq!(result.diagnostics[0].code, DiagnosticCode::TypePropertyNotFound);
        assert!(!report.units.iter().any(|u| u.hint_name == "shared__badge.g.rs"));
    }

    #[test]
    fn test_catalog_unit() {
        let mut pipeline = Pipeline::new(PipelineOptions {
            catalog: Some(CatalogOptions::default()),
            ..PipelineOptions::default()
        });
        let report = pipeline.run(&inputs()).unwrap();

        let catalog = report.units.iter().find(|u| u.hint_name == "icon_type.g.rs").unwrap();
        assert!(catalog.source.contains("Home = 1,"));
        assert!(report.units.last().unwrap().source.contains("include!(\"icon_type.g.rs\");"));
    }

    fn declaration_in(namespace: &str, type_name: &str) -> Declaration {
        let mut declaration = declaration(type_name, &["Home"]);
        declaration.namespace = namespace.to_string();
        declaration
    }

    #[test]
    fn test_colliding_file_names_are_disambiguated() {
        let mut pipeline = Pipeline::new(PipelineOptions {
            catalog: Some(CatalogOptions::default()),
            ..PipelineOptions::default()
        });
        let mut inputs = inputs();
        inputs.declarations = vec![
            declaration_in("", "IconType"),
            declaration_in("", "SvgInline"),
            declaration_in("nav", "Icon"),
            declaration_in("nav", "ICON"),
        ];

        let report = pipeline.run(&inputs).unwrap();

        let hints: Vec<_> = report.units.iter().map(|u| u.hint_name.as_str()).collect();
        assert_eq!(
            hints,
            [
                "generate_svg_attribute.g.rs",
                "icon_type.g.rs",
                "icon_type_2.g.rs",
                "nav__icon.g.rs",
                "nav__icon_2.g.rs",
                "svg_inline_2.g.rs",
                "svg_inline.g.rs",
            ]
        );
        let unique: HashSet<_> = hints.iter().collect();
        assert_eq!(unique.len(), hints.len());

        let renamed = report.result(&DefinitionId::new("nav", "Icon")).unwrap();
        assert_eq!(renamed.hint_name, "nav__icon_2.g.rs");
        assert!(renamed.source.as_ref().unwrap().contains("impl crate::component::Component for crate::nav::Icon"));
        for hint in &hints[..hints.len() - 1] {
            assert!(report.units.last().unwrap().source.contains(&format!("include!(\"{hint}\");")));
        }
    }
}
