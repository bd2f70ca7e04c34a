//! Rust source front-end.
//!
//! Parses Rust source files with `syn` and maps them to the generator's
//! declaration model:
//!
//! - structs carrying the generation directive (`#[generate_svg(kind, attributes)]`)
//!   become [`Declaration`]s
//! - fieldless enums anywhere in the scanned sources form the symbol table
//!   used to resolve property types
//!
//! Namespaces come from the file's module path relative to the source root
//! (`shared/icon.rs` -> `shared::icon`) plus any inline `mod` blocks.

use crate::error::{CliError, CliResult, ParseError};
use crate::scanner::SourceFile;
use proc_macro2::Span;
use quote::ToTokens;
use std::collections::{BTreeMap, HashMap};
use std::path::{Component, Path};
use svg_inline_codegen::declaration::{
    Declaration, Directive, EnumRef, Property, SourceLocation, TypeRef,
};
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Attribute, Fields, GenericArgument, Item, PathArguments, Token, Type};

/// Default directive attribute name.
pub const DEFAULT_DIRECTIVE: &str = "generate_svg";

/// A struct carrying the directive, before type resolution.
#[derive(Debug, Clone)]
pub struct ParsedComponent {
    /// Module path of the struct.
    pub namespace: String,

    /// Name of the struct.
    pub name: String,

    pub directive: Directive,

    /// Fields in declaration order.
    pub fields: Vec<ParsedField>,

    /// Location of the struct name.
    pub location: SourceLocation,
}

/// One struct field.
#[derive(Debug, Clone)]
pub struct ParsedField {
    /// Field name; tuple fields use their index.
    pub name: String,
    pub ty: Type,
    pub location: SourceLocation,
}

/// Everything extracted from one file.
#[derive(Debug, Clone, Default)]
pub struct ParsedSource {
    pub components: Vec<ParsedComponent>,
    pub enums: Vec<EnumRef>,

    /// Rejected directives. Each costs only its own struct.
    pub errors: Vec<ParseError>,
}

/// Parser for Rust source files.
#[derive(Debug)]
pub struct RustParser {
    /// Name of the directive attribute.
    directive: String,
}

impl Default for RustParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RustParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            directive: DEFAULT_DIRECTIVE.to_string(),
        }
    }

    /// Look for a different directive attribute name.
    pub fn with_directive(mut self, name: impl Into<String>) -> Self {
        self.directive = name.into();
        self
    }

    /// Parse a scanned file; its module path derives from the relative path.
    pub fn parse_file(&self, source: &SourceFile) -> CliResult<ParsedSource> {
        let namespace = module_path(&source.relative_path);
        self.parse_source(&source.content, &source.path, &namespace)
    }

    /// Parse source code belonging to module `namespace`.
    pub fn parse_source(
        &self,
        content: &str,
        file_path: &Path,
        namespace: &str,
    ) -> CliResult<ParsedSource> {
        let syntax = syn::parse_file(content).map_err(|e| {
            let start = e.span().start();
            ParseError::syntax(file_path.to_path_buf(), start.line, start.column + 1, e.to_string())
        })?;

        let mut parsed = ParsedSource::default();
        self.collect_items(&syntax.items, file_path, namespace, &mut parsed);
        Ok(parsed)
    }

    /// Parse multiple source files into declarations, collecting errors.
    ///
    /// Enum references are resolved against the enums of every file that
    /// parsed successfully.
    pub fn parse_files(&self, sources: &[SourceFile]) -> (Vec<Declaration>, Vec<ParseError>) {
        let mut parsed = Vec::new();
        let mut errors = Vec::new();

        for source in sources {
            match self.parse_file(source) {
                Ok(mut result) => {
                    errors.append(&mut result.errors);
                    parsed.push(result);
                }
                Err(CliError::Parse(e)) => errors.push(e),
                Err(_) => {}
            }
        }

        let table = EnumTable::new(parsed.iter().flat_map(|p| p.enums.iter().cloned()));
        let declarations = parsed
            .iter()
            .flat_map(|p| p.components.iter())
            .map(|component| table.declaration(component))
            .collect();

        (declarations, errors)
    }

    fn collect_items(
        &self,
        items: &[Item],
        file_path: &Path,
        namespace: &str,
        parsed: &mut ParsedSource,
    ) {
        for item in items {
            match item {
                Item::Struct(item_struct) => {
                    let Some(attr) = self.find_directive(&item_struct.attrs) else {
                        continue;
                    };
                    let attr_location = location(file_path, attr.pound_token.spans[0]);

                    if !item_struct.generics.params.is_empty() {
                        parsed.errors.push(attribute_error(
                            &attr_location,
                            format!("generic component '{}' is not supported", item_struct.ident),
                        ));
                        continue;
                    }

                    let args: DirectiveArgs = match attr.parse_args() {
                        Ok(args) => args,
                        Err(e) => {
                            parsed.errors.push(attribute_error(&attr_location, e.to_string()));
                            continue;
                        }
                    };

                    parsed.components.push(ParsedComponent {
                        namespace: namespace.to_string(),
                        name: item_struct.ident.to_string(),
                        directive: Directive {
                            kind_property: args.kind,
                            extras_property: args.extras,
                            location: attr_location,
                        },
                        fields: fields(&item_struct.fields, file_path),
                        location: location(file_path, item_struct.ident.span()),
                    });
                }
                Item::Enum(item_enum) => {
                    // only fieldless enums can select an asset
                    if item_enum
                        .variants
                        .iter()
                        .any(|variant| !matches!(variant.fields, Fields::Unit))
                    {
                        continue;
                    }
                    parsed.enums.push(EnumRef {
                        namespace: namespace.to_string(),
                        name: item_enum.ident.to_string(),
                        members: item_enum
                            .variants
                            .iter()
                            .map(|variant| variant.ident.to_string())
                            .collect(),
                    });
                }
                Item::Mod(item_mod) => {
                    if let Some((_, items)) = &item_mod.content {
                        let nested = join_path(namespace, &item_mod.ident.to_string());
                        self.collect_items(items, file_path, &nested, parsed);
                    }
                }
                _ => {}
            }
        }
    }

    /// The directive attribute, matched on the last path segment so both
    /// `#[generate_svg(..)]` and `#[svg_inline::generate_svg(..)]` work.
    fn find_directive<'a>(&self, attrs: &'a [Attribute]) -> Option<&'a Attribute> {
        attrs.iter().find(|attr| {
            attr.path()
                .segments
                .last()
                .is_some_and(|segment| segment.ident == self.directive)
        })
    }
}

/// `#[generate_svg(kind, extras)]` arguments; identifiers or string literals.
struct DirectiveArgs {
    kind: String,
    extras: String,
}

enum DirectiveArg {
    Ident(syn::Ident),
    Str(syn::LitStr),
}

impl DirectiveArg {
    fn value(&self) -> String {
        match self {
            Self::Ident(ident) => ident.to_string(),
            Self::Str(lit) => lit.value(),
        }
    }
}

impl Parse for DirectiveArg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(syn::LitStr) {
            input.parse().map(Self::Str)
        } else {
            input.parse().map(Self::Ident)
        }
    }
}

impl Parse for DirectiveArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let args = Punctuated::<DirectiveArg, Token![,]>::parse_terminated(input)?;
        let mut values = args.iter().map(DirectiveArg::value);
        match (values.next(), values.next(), values.next()) {
            (Some(kind), Some(extras), None) => Ok(Self { kind, extras }),
            _ => Err(input.error(
                "expected two arguments: the kind property and the extra attributes property",
            )),
        }
    }
}

fn fields(fields: &Fields, file_path: &Path) -> Vec<ParsedField> {
    fields
        .iter()
        .enumerate()
        .map(|(index, field)| match &field.ident {
            Some(ident) => ParsedField {
                name: ident.to_string(),
                ty: field.ty.clone(),
                location: location(file_path, ident.span()),
            },
            None => ParsedField {
                name: index.to_string(),
                ty: field.ty.clone(),
                location: location(file_path, span_of(&field.ty)),
            },
        })
        .collect()
}

fn span_of(tokens: &impl ToTokens) -> Span {
    tokens
        .to_token_stream()
        .into_iter()
        .next()
        .map_or_else(Span::call_site, |token| token.span())
}

fn location(file_path: &Path, span: Span) -> SourceLocation {
    let start = span.start();
    SourceLocation::new(file_path, start.line, start.column + 1)
}

fn attribute_error(at: &SourceLocation, message: impl Into<String>) -> ParseError {
    ParseError::attribute(at.file.clone(), at.line, at.column, message)
}

fn join_path(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}::{name}")
    }
}

/// Module path of a file relative to the crate source root.
///
/// `lib.rs` and `main.rs` are the crate root; `mod.rs` names its directory.
pub fn module_path(relative: &Path) -> String {
    let mut parts: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if let Some(last) = parts.pop() {
        let stem = Path::new(&last)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let is_root = parts.is_empty() && (stem == "lib" || stem == "main");
        if !is_root && stem != "mod" {
            parts.push(stem);
        }
    }

    parts.join("::")
}

/// Render a type the way it is usually written (`HashMap<String, String>`).
pub fn type_display(ty: &Type) -> String {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => {
            let segments = type_path
                .path
                .segments
                .iter()
                .map(|segment| {
                    let mut out = segment.ident.to_string();
                    if let PathArguments::AngleBracketed(args) = &segment.arguments {
                        let args: Vec<String> = args
                            .args
                            .iter()
                            .map(|arg| match arg {
                                GenericArgument::Type(ty) => type_display(ty),
                                other => other.to_token_stream().to_string(),
                            })
                            .collect();
                        out.push('<');
                        out.push_str(&args.join(", "));
                        out.push('>');
                    }
                    out
                })
                .collect::<Vec<_>>()
                .join("::");
            if type_path.path.leading_colon.is_some() {
                format!("::{segments}")
            } else {
                segments
            }
        }
        Type::Reference(reference) => {
            let mutability = if reference.mutability.is_some() { "mut " } else { "" };
            format!("&{mutability}{}", type_display(&reference.elem))
        }
        Type::Paren(paren) => type_display(&paren.elem),
        Type::Group(group) => type_display(&group.elem),
        Type::Tuple(tuple) => {
            let elems: Vec<String> = tuple.elems.iter().map(type_display).collect();
            format!("({})", elems.join(", "))
        }
        Type::Slice(slice) => format!("[{}]", type_display(&slice.elem)),
        other => other.to_token_stream().to_string(),
    }
}

/// Fieldless enums by qualified path and by name.
#[derive(Debug, Default)]
pub struct EnumTable {
    by_path: BTreeMap<String, EnumRef>,
    by_name: HashMap<String, Vec<String>>,
}

impl EnumTable {
    pub fn new(enums: impl IntoIterator<Item = EnumRef>) -> Self {
        let mut table = Self::default();
        for enum_ref in enums {
            let path = join_path(&enum_ref.namespace, &enum_ref.name);
            table
                .by_name
                .entry(enum_ref.name.clone())
                .or_default()
                .push(path.clone());
            table.by_path.insert(path, enum_ref);
        }
        table
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Resolve the fields of a component into a declaration.
    pub fn declaration(&self, component: &ParsedComponent) -> Declaration {
        Declaration {
            namespace: component.namespace.clone(),
            type_name: component.name.clone(),
            directive: component.directive.clone(),
            properties: component
                .fields
                .iter()
                .map(|field| {
                    Property::new(&field.name, self.resolve(&field.ty, &component.namespace))
                        .with_location(field.location.clone())
                })
                .collect(),
            location: component.location.clone(),
        }
    }

    /// Resolve a type as seen from module `namespace`.
    pub fn resolve(&self, ty: &Type, namespace: &str) -> TypeRef {
        match ty {
            Type::Paren(paren) => return self.resolve(&paren.elem, namespace),
            Type::Group(group) => return self.resolve(&group.elem, namespace),
            _ => {}
        }

        let Type::Path(type_path) = ty else {
            return TypeRef::other(type_display(ty));
        };
        if type_path.qself.is_some() {
            return TypeRef::other(type_display(ty));
        }

        if let Some(inner) = option_inner(&type_path.path) {
            return TypeRef::optional(self.resolve(inner, namespace));
        }

        let plain = type_path
            .path
            .segments
            .iter()
            .all(|segment| segment.arguments.is_empty());
        if !plain {
            return TypeRef::other(type_display(ty));
        }

        let segments: Vec<String> = type_path
            .path
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();

        match self.lookup(&segments, namespace) {
            Some(enum_ref) => {
                let mut resolved = TypeRef::enumeration(enum_ref.clone());
                resolved.display = type_display(ty);
                resolved
            }
            None => TypeRef::other(type_display(ty)),
        }
    }

    fn lookup(&self, segments: &[String], namespace: &str) -> Option<&EnumRef> {
        let (first, rest) = segments.split_first()?;

        match first.as_str() {
            "crate" => return self.by_path.get(&rest.join("::")),
            "self" | "super" => {
                let mut base: Vec<&str> = namespace.split("::").filter(|s| !s.is_empty()).collect();
                let mut rest = segments;
                while let Some((head, tail)) = rest.split_first() {
                    match head.as_str() {
                        "self" => {}
                        "super" => {
                            base.pop()?;
                        }
                        _ => break,
                    }
                    rest = tail;
                }
                let path = base
                    .into_iter()
                    .map(str::to_string)
                    .chain(rest.iter().cloned())
                    .collect::<Vec<_>>()
                    .join("::");
                return self.by_path.get(&path);
            }
            _ => {}
        }

        let written = segments.join("::");
        if let Some(found) = self.by_path.get(&join_path(namespace, &written)) {
            return Some(found);
        }
        if let Some(found) = self.by_path.get(&written) {
            return Some(found);
        }

        // imported through `use`: accept a unique enum whose path ends the same way
        let name = segments.last()?;
        let suffix = format!("::{written}");
        let candidates: Vec<&String> = self
            .by_name
            .get(name)?
            .iter()
            .filter(|path| *path == &written || path.ends_with(&suffix))
            .collect();
        match candidates.as_slice() {
            [only] => self.by_path.get(*only),
            [] => None,
            _ => {
                tracing::warn!(
                    name = %written,
                    namespace,
                    candidates = candidates.len(),
                    "ambiguous enum reference left unresolved"
                );
                None
            }
        }
    }
}

/// `T` for `Option<T>` (also `std::option::Option<T>`).
fn option_inner(path: &syn::Path) -> Option<&Type> {
    let last = path.segments.last()?;
    if last.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}
