//! Definition analysis.
//!
//! Validates a [`Declaration`] against its directive and extracts the data
//! needed for emission. Every failure becomes a diagnostic; only a fully
//! valid declaration yields [`DefinitionMetadata`].

use serde::Serialize;

use crate::declaration::{Declaration, DefinitionId, EnumRef, SourceLocation};
use crate::diagnostic::Diagnostic;

/// Everything the emitter needs to know about a valid definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DefinitionMetadata {
    pub namespace_name: String,
    pub type_name: String,
    pub kind_property_name: String,
    pub extras_property_name: String,

    /// The extras bag is declared as `Option<_>`.
    pub extras_optional: bool,

    pub enum_type: EnumRef,

    /// Enum members in declaration order; this is the dispatch order.
    pub enum_members: Vec<String>,

    /// Where the directive was written, for member diagnostics.
    pub directive_location: SourceLocation,
}

impl DefinitionMetadata {
    pub fn id(&self) -> DefinitionId {
        DefinitionId::new(&self.namespace_name, &self.type_name)
    }
}

/// Outcome of analyzing one declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Analysis {
    pub id: DefinitionId,

    /// `None` when validation failed; generation is skipped.
    pub metadata: Option<DefinitionMetadata>,

    pub diagnostics: Vec<Diagnostic>,
}

/// Analyze one declaration.
///
/// Checks run in order and the first failure ends the analysis:
/// the kind property exists, the extras property exists, and the kind
/// property's type is an enumeration.
pub fn analyze(declaration: &Declaration) -> Analysis {
    let id = declaration.id();
    let directive = &declaration.directive;

    let failed = |diagnostic: Diagnostic| Analysis {
        id: id.clone(),
        metadata: None,
        diagnostics: vec![diagnostic],
    };

    let Some(kind) = declaration.property(&directive.kind_property) else {
        return failed(Diagnostic::type_property_not_found(
            &directive.kind_property,
            directive.location.clone(),
        ));
    };

    let Some(extras) = declaration.property(&directive.extras_property) else {
        return failed(Diagnostic::additional_attributes_property_not_found(
            &directive.extras_property,
            directive.location.clone(),
        ));
    };

    let Some(enum_type) = kind.ty.as_enum() else {
        return failed(Diagnostic::type_property_is_not_an_enum(
            &kind.name,
            &kind.ty.display,
            kind.location.clone(),
        ));
    };

    tracing::debug!(
        definition = %id,
        members = enum_type.members.len(),
        "definition analyzed"
    );

    Analysis {
        id: id.clone(),
        metadata: Some(DefinitionMetadata {
            namespace_name: declaration.namespace.clone(),
            type_name: declaration.type_name.clone(),
            kind_property_name: kind.name.clone(),
            extras_property_name: extras.name.clone(),
            extras_optional: extras.ty.is_optional(),
            enum_type: enum_type.clone(),
            enum_members: enum_type.members.clone(),
            directive_location: directive.location.clone(),
        }),
        diagnostics: Vec::new(),
    }
}
