//! # svg-inline-codegen
//!
//! Build-time generator that inlines SVG assets into Rust render code.
//!
//! Component definitions name an enum of icon kinds. For every enum member the
//! generator looks up the asset whose file stem maps to the member name
//! (`layout-list.svg` -> `LayoutList`) and emits a `match` arm that writes the
//! asset's root attributes, the caller's extra attributes and the asset's
//! child markup through a render tree builder.
//!
//! ## Overview
//!
//! ```rust
//! use svg_inline_codegen::declaration::{Declaration, Directive, EnumRef, Property, SourceLocation, TypeRef};
//! use svg_inline_codegen::pipeline::{AssetFile, Inputs, Pipeline};
//!
//! let icon = Declaration {
//!     namespace: "ui".to_string(),
//!     type_name: "Icon".to_string(),
//!     directive: Directive {
//!         kind_property: "kind".to_string(),
//!         extras_property: "attributes".to_string(),
//!         location: SourceLocation::default(),
//!     },
//!     properties: vec![
//!         Property::new("kind", TypeRef::enumeration(EnumRef {
//!             namespace: "ui".to_string(),
//!             name: "IconKind".to_string(),
//!             members: vec!["Home".to_string()],
//!         })),
//!         Property::new("attributes", TypeRef::other("HashMap<String, String>")),
//!     ],
//!     location: SourceLocation::default(),
//! };
//!
//! let inputs = Inputs {
//!     assets: vec![AssetFile::new("assets/home.svg", r#"<svg viewBox="0 0 24 24"><path d="M3 9"/></svg>"#)],
//!     declarations: vec![icon],
//! };
//!
//! let mut pipeline = Pipeline::default();
//! let report = pipeline.run(&inputs).unwrap();
//! assert!(report.diagnostics.is_empty());
//! assert!(report.units.iter().any(|unit| unit.hint_name == "ui__icon.g.rs"));
//!
//! // unchanged inputs are served from the memo tables
//! let again = pipeline.run(&inputs).unwrap();
//! assert!(again.stats.fully_reused());
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`writer`] | Indentation and scope aware text builder |
//! | [`literal`] | Rust string literal escaping |
//! | [`naming`] | File stem and identifier conversion |
//! | [`asset`] | SVG loading and normalization |
//! | [`declaration`] | Front-end neutral definition model |
//! | [`analyzer`] | Definition validation |
//! | [`diagnostic`] | Structured warnings |
//! | [`emit`] | Generated unit emission |
//! | [`cache`] | Fingerprints and memo tables |
//! | [`pipeline`] | Incremental orchestration |

pub mod analyzer;
pub mod asset;
pub mod cache;
pub mod declaration;
pub mod diagnostic;
pub mod emit;
pub mod error;
pub mod literal;
pub mod naming;
pub mod pipeline;
pub mod writer;

pub use analyzer::{analyze, Analysis, DefinitionMetadata};
pub use asset::{load_asset, AssetEntry, AssetIndex};
pub use declaration::{Declaration, DefinitionId, Directive, EnumRef, Property, SourceLocation, TypeRef};
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use emit::{CatalogOptions, EmitOptions, GeneratedUnit, GenerationResult};
pub use error::{AssetError, NamingError, PipelineError};
pub use pipeline::{AssetFile, Inputs, Pipeline, PipelineOptions, RunReport, RunStats};
