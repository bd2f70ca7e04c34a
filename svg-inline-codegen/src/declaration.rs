//! Language-neutral description of component definitions.
//!
//! A front-end (such as the `syn`-based parser in `svg-inline-cli`) turns
//! source files into [`Declaration`] values. The analyzer and the pipeline
//! only ever see this model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Where a declaration or one of its parts was written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// File path.
    pub file: PathBuf,

    /// Line number (1-indexed).
    pub line: usize,

    /// Column number (1-indexed).
    pub column: usize,
}

impl SourceLocation {
    /// Create a location.
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// The generation directive attached to a definition.
///
/// Names the property holding the icon kind and the property holding the
/// caller-supplied extra attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Directive {
    pub kind_property: String,
    pub extras_property: String,
    #[serde(default)]
    pub location: SourceLocation,
}

/// A reference to an enumeration type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumRef {
    /// Module path of the enum relative to the crate root (`shared::icons`).
    pub namespace: String,

    /// Enum name.
    pub name: String,

    /// Member names in declaration order.
    pub members: Vec<String>,
}

impl EnumRef {
    /// Path usable from anywhere in the crate (`crate::shared::icons::IconKind`).
    pub fn qualified_path(&self) -> String {
        qualified_path(&self.namespace, &self.name)
    }
}

/// How a property type resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeKind {
    /// A known enumeration.
    Enum(EnumRef),
    /// `Option<T>`.
    Optional { inner: Box<TypeRef> },
    /// Anything else.
    Other,
}

/// A property's declared type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    /// The type as written, used in diagnostics.
    pub display: String,

    /// Resolution result.
    pub kind: TypeKind,
}

impl TypeRef {
    /// A type that is not an enumeration.
    pub fn other(display: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            kind: TypeKind::Other,
        }
    }

    /// An enumeration type.
    pub fn enumeration(enum_ref: EnumRef) -> Self {
        Self {
            display: enum_ref.name.clone(),
            kind: TypeKind::Enum(enum_ref),
        }
    }

    /// `Option<inner>`.
    pub fn optional(inner: TypeRef) -> Self {
        Self {
            display: format!("Option<{}>", inner.display),
            kind: TypeKind::Optional {
                inner: Box::new(inner),
            },
        }
    }

    /// The enumeration this type resolves to, if it is one.
    pub fn as_enum(&self) -> Option<&EnumRef> {
        match &self.kind {
            TypeKind::Enum(enum_ref) => Some(enum_ref),
            _ => None,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self.kind, TypeKind::Optional { .. })
    }
}

/// A named property of a definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub ty: TypeRef,
    #[serde(default)]
    pub location: SourceLocation,
}

impl Property {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            location: SourceLocation::default(),
        }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }
}

/// A component type that requests generated dispatch code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Declaration {
    /// Module path relative to the crate root, empty for the root module.
    pub namespace: String,

    /// Type name.
    pub type_name: String,

    pub directive: Directive,

    /// Properties in declaration order.
    pub properties: Vec<Property>,

    /// Location of the type name.
    #[serde(default)]
    pub location: SourceLocation,
}

impl Declaration {
    /// Stable identity used to key per-definition results.
    pub fn id(&self) -> DefinitionId {
        DefinitionId::new(&self.namespace, &self.type_name)
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Identity of a definition: its namespace-qualified type name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DefinitionId(String);

impl DefinitionId {
    pub fn new(namespace: &str, type_name: &str) -> Self {
        if namespace.is_empty() {
            Self(type_name.to_string())
        } else {
            Self(format!("{namespace}::{type_name}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DefinitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `crate::<namespace>::<name>`, or `crate::<name>` for the root module.
pub fn qualified_path(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        format!("crate::{name}")
    } else {
        format!("crate::{namespace}::{name}")
    }
}
