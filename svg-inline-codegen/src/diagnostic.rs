//! Structured diagnostics.
//!
//! Configuration mistakes never abort generation. They are collected as
//! [`Diagnostic`] values and handed back to the host together with the
//! generated code.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::declaration::SourceLocation;

/// Diagnostic severity. Generation never stops on a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
        }
    }
}

/// The kinds of diagnostics the generator reports.
///
/// Serialized as the stable identifier (`"SVG001"`), not the variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// The directive names a kind property the type does not have.
    #[serde(rename = "SVG001")]
    TypePropertyNotFound,
    /// The directive names an extras property the type does not have.
    #[serde(rename = "SVG002")]
    AdditionalAttributesPropertyNotFound,
    /// The kind property is not of an enumeration type.
    #[serde(rename = "SVG003")]
    TypePropertyIsNotAnEnum,
    /// No asset matches an enum member.
    #[serde(rename = "SVG004")]
    AdditionalFilesNotFound,
    /// An asset could not be loaded and was skipped.
    #[serde(rename = "SVG005")]
    AssetSkipped,
}

impl DiagnosticCode {
    /// Stable identifier (`SVG001`...).
    pub fn id(&self) -> &'static str {
        match self {
            Self::TypePropertyNotFound => "SVG001",
            Self::AdditionalAttributesPropertyNotFound => "SVG002",
            Self::TypePropertyIsNotAnEnum => "SVG003",
            Self::AdditionalFilesNotFound => "SVG004",
            Self::AssetSkipped => "SVG005",
        }
    }

    /// Message template with positional `{0}`, `{1}` placeholders.
    pub fn template(&self) -> &'static str {
        match self {
            Self::TypePropertyNotFound => "Kind property '{0}' was not found on the type",
            Self::AdditionalAttributesPropertyNotFound => {
                "Additional attributes property '{0}' was not found on the type"
            }
            Self::TypePropertyIsNotAnEnum => {
                "Kind property '{0}' has type '{1}', which is not an enum"
            }
            Self::AdditionalFilesNotFound => {
                "No asset found for enum member '{0}', expected a file named '{1}'"
            }
            Self::AssetSkipped => "Asset '{0}' was skipped: {1}",
        }
    }

    /// Every code is a warning; generation continues with degraded output.
    pub fn severity(&self) -> Severity {
        Severity::Warning
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A reported problem with its arguments and location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub args: Vec<String>,
    pub location: SourceLocation,
}

impl Diagnostic {
    /// Create a diagnostic with the code's default severity.
    pub fn new(code: DiagnosticCode, args: Vec<String>, location: SourceLocation) -> Self {
        Self {
            code,
            severity: code.severity(),
            args,
            location,
        }
    }

    pub fn type_property_not_found(property: &str, location: SourceLocation) -> Self {
        Self::new(
            DiagnosticCode::TypePropertyNotFound,
            vec![property.to_string()],
            location,
        )
    }

    pub fn additional_attributes_property_not_found(
        property: &str,
        location: SourceLocation,
    ) -> Self {
        Self::new(
            DiagnosticCode::AdditionalAttributesPropertyNotFound,
            vec![property.to_string()],
            location,
        )
    }

    pub fn type_property_is_not_an_enum(
        property: &str,
        type_name: &str,
        location: SourceLocation,
    ) -> Self {
        Self::new(
            DiagnosticCode::TypePropertyIsNotAnEnum,
            vec![property.to_string(), type_name.to_string()],
            location,
        )
    }

    pub fn additional_files_not_found(
        member: &str,
        suggested_file: &str,
        location: SourceLocation,
    ) -> Self {
        Self::new(
            DiagnosticCode::AdditionalFilesNotFound,
            vec![member.to_string(), suggested_file.to_string()],
            location,
        )
    }

    pub fn asset_skipped(asset: &str, reason: &str, location: SourceLocation) -> Self {
        Self::new(
            DiagnosticCode::AssetSkipped,
            vec![asset.to_string(), reason.to_string()],
            location,
        )
    }

    /// The message template with the arguments substituted.
    pub fn message(&self) -> String {
        let mut message = self.code.template().to_string();
        for (index, arg) in self.args.iter().enumerate() {
            message = message.replace(&format!("{{{index}}}"), arg);
        }
        message
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} [{}]: {}",
            self.location,
            self.severity,
            self.code,
            self.message()
        )
    }
}
