//! Property-based tests for svg-inline-codegen.
//!
//! Properties tested:
//! - Naming round trip for canonical file stems
//! - Root attributes and child elements survive loading in order
//! - String literals read back as the original text
//! - Pipeline output does not depend on input order

use proptest::prelude::*;
use std::path::Path;

use svg_inline_codegen::{
    asset::load_asset,
    literal::string_literal,
    naming::{asset_stem_to_identifier, identifier_to_asset_stem},
    pipeline::{AssetFile, Inputs, Pipeline},
};

// =============================================================================
// Generators for property tests
// =============================================================================

#[derive(Debug, Clone)]
enum Segment {
    Word(String),
    Digits(String),
}

/// A stem whose identifier tokenizes back into the same segments: words have
/// at least two letters and digit runs never touch another digit run.
fn arb_canonical_stem() -> impl Strategy<Value = String> {
    let segment = prop_oneof![
        3 => "[a-z]{2,8}".prop_map(Segment::Word),
        1 => "[0-9]{1,3}".prop_map(Segment::Digits),
    ];
    prop::collection::vec(segment, 1..5).prop_map(|segments| {
        let mut parts: Vec<String> = Vec::new();
        let mut previous_digits = false;
        for segment in segments {
            match segment {
                Segment::Digits(_) if previous_digits => continue,
                Segment::Digits(digits) => {
                    previous_digits = true;
                    parts.push(digits);
                }
                Segment::Word(word) => {
                    previous_digits = false;
                    parts.push(word);
                }
            }
        }
        parts.join("-")
    })
}

fn arb_attribute_value() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,#&<>\"'-]{0,12}"
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// =============================================================================
// Naming Round Trip
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_canonical_stem_round_trip(stem in arb_canonical_stem()) {
        let identifier = asset_stem_to_identifier(&stem).unwrap();
        prop_assert_eq!(identifier_to_asset_stem(&identifier), Some(stem));
    }

    #[test]
    fn prop_identifier_is_case_insensitive_in_stem(stem in arb_canonical_stem()) {
        let upper = stem.to_ascii_uppercase();
        prop_assert_eq!(
            asset_stem_to_identifier(&upper).unwrap(),
            asset_stem_to_identifier(&stem).unwrap()
        );
    }
}

// =============================================================================
// Asset Structure Preservation
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_attributes_and_children_preserved(
        values in prop::collection::vec(arb_attribute_value(), 0..6),
        children in prop::collection::vec("[a-z]{1,6}", 0..6),
    ) {
        let attributes: String = values
            .iter()
            .enumerate()
            .map(|(i, value)| format!(" a{}=\"{}\"", i, escape_attribute(value)))
            .collect();
        let body: String = children
            .iter()
            .enumerate()
            .map(|(i, name)| format!("<{} n=\"{}\"/>", name, i))
            .collect();
        let content = format!("<svg{attributes}>\n  {body}\n</svg>");

        let entry = load_asset(Path::new("icons/shape.svg"), &content).unwrap();

        prop_assert_eq!(entry.attributes.len(), values.len());
        for (i, ((name, value), expected)) in entry.attributes.iter().zip(&values).enumerate() {
            prop_assert_eq!(name, &format!("a{i}"));
            prop_assert_eq!(value, expected);
        }
        prop_assert_eq!(entry.body, body);
    }
}

// =============================================================================
// String Literal Round Trip
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_string_literal_round_trip(text in any::<String>()) {
        let literal = string_literal(&text);
        let parsed: syn::LitStr = syn::parse_str(&literal).unwrap();
        prop_assert_eq!(parsed.value(), text);
    }
}

// =============================================================================
// Determinism
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_output_independent_of_asset_order(
        stems in prop::collection::btree_set(arb_canonical_stem(), 1..6),
        seed in any::<u64>(),
    ) {
        let assets: Vec<AssetFile> = stems
            .iter()
            .map(|stem| AssetFile::new(format!("assets/{stem}.svg"), "<svg><g/></svg>"))
            .collect();

        let mut rotated = assets.clone();
        let shift = (seed % assets.len() as u64) as usize;
        rotated.rotate_left(shift);

        let first = Pipeline::default()
            .run(&Inputs { assets, declarations: Vec::new() })
            .unwrap();
        let second = Pipeline::default()
            .run(&Inputs { assets: rotated, declarations: Vec::new() })
            .unwrap();

        prop_assert_eq!(first.units, second.units);
    }
}
