//! Rust source emission.
//!
//! Produces the generated units: one render dispatch per definition, the
//! fixed directive type, the optional asset catalog and the index file that
//! includes everything else.

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

use crate::analyzer::DefinitionMetadata;
use crate::asset::{AssetEntry, AssetIndex};
use crate::declaration::{qualified_path, DefinitionId};
use crate::diagnostic::Diagnostic;
use crate::literal::string_literal;
use crate::naming::identifier_to_asset_stem;
use crate::writer::CodeWriter;

/// First line of every generated unit.
pub const HEADER: &str = "// <auto-generated/>";

/// Extras key rendered as a nested `<title>` element instead of an attribute.
pub const RESERVED_TITLE_KEY: &str = "title";

/// File name suggested when an enum member has no derivable stem.
pub const UNRESOLVED_FILE_NAME: &str = "<unresolved>";

/// Hint name of the directive type unit.
pub const DIRECTIVE_HINT: &str = "generate_svg_attribute.g.rs";

/// Hint name of the index unit.
pub const INDEX_HINT: &str = "svg_inline.g.rs";

/// Paths into the consumer's rendering API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmitOptions {
    /// Trait whose render method the dispatch implements.
    pub component_trait: String,

    /// Builder type passed to the render method.
    pub builder_type: String,

    /// Name of the render method.
    pub render_method: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            component_trait: "crate::component::Component".to_string(),
            builder_type: "crate::component::RenderTreeBuilder".to_string(),
            render_method: "build_render_tree".to_string(),
        }
    }
}

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GeneratedUnit {
    /// File name for the unit.
    pub hint_name: String,
    pub source: String,
}

/// Output for one definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GenerationResult {
    pub id: DefinitionId,
    pub hint_name: String,

    /// `None` when the definition failed analysis.
    pub source: Option<String>,

    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationResult {
    /// The generated unit, when there is one.
    pub fn unit(&self) -> Option<GeneratedUnit> {
        self.source.as_ref().map(|source| GeneratedUnit {
            hint_name: self.hint_name.clone(),
            source: source.clone(),
        })
    }
}

/// File name for a definition's unit (`shared::Icon` -> `shared__icon.g.rs`).
///
/// Path segments are joined with `__` so `nav_bar::Icon` and `nav::bar::Icon`
/// stay apart. Names that still collide are resolved by the pipeline.
pub fn hint_name(id: &DefinitionId) -> String {
    let stem = id
        .as_str()
        .split("::")
        .map(|part| part.to_case(Case::Snake))
        .collect::<Vec<_>>()
        .join("__");
    format!("{stem}.g.rs")
}

/// File name of the catalog unit (`IconType` -> `icon_type.g.rs`).
pub fn catalog_hint_name(options: &CatalogOptions) -> String {
    format!("{}.g.rs", options.enum_name.to_case(Case::Snake))
}

/// File name suggested for an enum member without an asset.
pub fn suggested_file_name(member: &str) -> String {
    identifier_to_asset_stem(member)
        .map(|stem| format!("{stem}.svg"))
        .unwrap_or_else(|| UNRESOLVED_FILE_NAME.to_string())
}

/// Emit the render dispatch for one definition.
///
/// Members without a matching asset are reported and left out of the match.
pub fn emit_definition(
    metadata: &DefinitionMetadata,
    assets: &AssetIndex,
    options: &EmitOptions,
) -> GenerationResult {
    let id = metadata.id();
    let type_path = qualified_path(&metadata.namespace_name, &metadata.type_name);
    let enum_path = metadata.enum_type.qualified_path();
    let mut diagnostics = Vec::new();

    let mut writer = CodeWriter::new();
    writer.append_line(HEADER);
    writer.append_line(&format!("// Inline SVG render dispatch for `{type_path}`."));
    writer.empty_line();
    {
        let mut imp = writer.begin_scope(&format!(
            "impl {} for {}",
            options.component_trait, type_path
        ));
        let mut method = imp.begin_scope(&format!(
            "fn {}(&self, builder: &mut {})",
            options.render_method, options.builder_type
        ));
        let mut dispatch =
            method.begin_scope(&format!("match self.{}", metadata.kind_property_name));

        for member in &metadata.enum_members {
            let Some(asset) = assets.get(member) else {
                diagnostics.push(Diagnostic::additional_files_not_found(
                    member,
                    &suggested_file_name(member),
                    metadata.directive_location.clone(),
                ));
                continue;
            };
            let mut arm = dispatch.begin_scope(&format!("{enum_path}::{member} =>"));
            write_arm(&mut arm, asset, metadata);
        }
    }

    tracing::debug!(
        definition = %id,
        missing = diagnostics.len(),
        "definition emitted"
    );

    GenerationResult {
        hint_name: hint_name(&id),
        id,
        source: Some(writer.into_string()),
        diagnostics,
    }
}

fn write_arm(writer: &mut CodeWriter, asset: &AssetEntry, metadata: &DefinitionMetadata) {
    writer.append_line("builder.open_element(\"svg\");");
    for (name, value) in &asset.attributes {
        writer.append_line(&format!(
            "builder.add_attribute({}, {});",
            string_literal(name),
            string_literal(value)
        ));
    }

    let extras = format!("self.{}", metadata.extras_property_name);
    if metadata.extras_optional {
        let mut scope = writer.begin_scope(&format!("if let Some(extras) = &{extras}"));
        write_extras(&mut scope);
    } else {
        writer.append_line(&format!("let extras = &{extras};"));
        write_extras(writer);
    }

    writer.append_line(&format!(
        "builder.add_markup_content({});",
        string_literal(&asset.body)
    ));
    writer.append_line("builder.close_element();");
}

fn write_extras(writer: &mut CodeWriter) {
    let title = string_literal(RESERVED_TITLE_KEY);
    {
        let mut each = writer.begin_scope("for (name, value) in extras.iter()");
        let mut keep = each.begin_scope(&format!("if *name != {title}"));
        keep.append_line("builder.add_attribute(name, value);");
    }
    let mut nested = writer.begin_scope(&format!("if let Some(title) = extras.get({title})"));
    nested.append_line(&format!("builder.open_element({title});"));
    nested.append_line("builder.add_content(title);");
    nested.append_line("builder.close_element();");
}

/// The directive type declaration. Has no inputs and never changes.
pub fn emit_directive() -> GeneratedUnit {
    let mut writer = CodeWriter::new();
    writer.append_line(HEADER);
    writer.empty_line();
    writer.append_line("/// Requests generated inline SVG rendering for a component.");
    writer.append_line("///");
    writer.append_line("/// `kind_property` names the enum field that selects the asset;");
    writer.append_line("/// `extras_property` names the field holding extra attributes.");
    writer.append_line("#[derive(Debug, Clone, Copy, PartialEq, Eq)]");
    {
        let mut decl = writer.begin_scope("pub struct GenerateSvgAttribute");
        decl.append_line("kind_property: &'static str,");
        decl.append_line("extras_property: &'static str,");
    }
    writer.empty_line();
    {
        let mut imp = writer.begin_scope("impl GenerateSvgAttribute");
        {
            let mut ctor = imp.begin_scope(
                "pub const fn new(kind_property: &'static str, extras_property: &'static str) -> Self",
            );
            let mut fields = ctor.begin_scope("Self");
            fields.append_line("kind_property,");
            fields.append_line("extras_property,");
        }
        imp.empty_line();
        {
            let mut getter = imp.begin_scope("pub const fn kind_property(&self) -> &'static str");
            getter.append_line("self.kind_property");
        }
        imp.empty_line();
        {
            let mut getter =
                imp.begin_scope("pub const fn extras_property(&self) -> &'static str");
            getter.append_line("self.extras_property");
        }
    }

    GeneratedUnit {
        hint_name: DIRECTIVE_HINT.to_string(),
        source: writer.into_string(),
    }
}

/// Options for the asset catalog unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogOptions {
    /// Name of the generated enum.
    pub enum_name: String,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            enum_name: "IconType".to_string(),
        }
    }
}

/// An enum with one member per loaded asset and its inline markup.
pub fn emit_catalog(assets: &AssetIndex, options: &CatalogOptions) -> GeneratedUnit {
    let name = &options.enum_name;
    let mut writer = CodeWriter::new();
    writer.append_line(HEADER);
    writer.empty_line();
    writer.append_line("/// Every SVG asset known to the generator.");
    writer.append_line("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]");
    {
        let mut decl = writer.begin_scope(&format!("pub enum {name}"));
        for (index, identifier) in assets.keys().enumerate() {
            if index == 0 {
                decl.append_line(&format!("{identifier} = 1,"));
            } else {
                decl.append_line(&format!("{identifier},"));
            }
        }
    }
    writer.empty_line();
    {
        let mut imp = writer.begin_scope(&format!("impl {name}"));
        imp.append_line(&format!("pub const ALL: &'static [{name}] = &["));
        {
            let mut items = imp.indent();
            for identifier in assets.keys() {
                items.append_line(&format!("{name}::{identifier},"));
            }
        }
        imp.append_line("];");
        imp.empty_line();
        {
            let mut method = imp.begin_scope("pub const fn name(self) -> &'static str");
            let mut dispatch = method.begin_scope("match self");
            for identifier in assets.keys() {
                dispatch.append_line(&format!(
                    "{name}::{identifier} => {},",
                    string_literal(identifier)
                ));
            }
        }
        imp.empty_line();
        {
            let mut method = imp.begin_scope("pub const fn markup(self) -> &'static str");
            let mut dispatch = method.begin_scope("match self");
            for (identifier, asset) in assets {
                dispatch.append_line(&format!(
                    "{name}::{identifier} => {},",
                    string_literal(&asset.markup())
                ));
            }
        }
    }

    GeneratedUnit {
        hint_name: catalog_hint_name(options),
        source: writer.into_string(),
    }
}

/// A unit that `include!`s the given units, in order.
pub fn emit_index<'a>(hint_names: impl IntoIterator<Item = &'a str>) -> GeneratedUnit {
    let mut writer = CodeWriter::new();
    writer.append_line(HEADER);
    writer.empty_line();
    for hint in hint_names {
        writer.append_line(&format!("include!({});", string_literal(hint)));
    }

    GeneratedUnit {
        hint_name: INDEX_HINT.to_string(),
        source: writer.into_string(),
    }
}
