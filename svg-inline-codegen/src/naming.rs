//! Conversion between asset file stems and enum member identifiers.
//!
//! Asset files are named in kebab case (`layout-list.svg`) while enum members
//! use Pascal case (`LayoutList`). Matching is done on the identifier form.

use crate::error::NamingError;

/// Derive the identifier for an asset file stem.
///
/// The stem is split on `-`; each segment is lower-cased and its first
/// character upper-cased. Empty stems, empty segments and characters other
/// than ASCII letters and digits are rejected.
///
/// ```rust
/// use svg_inline_codegen::naming::asset_stem_to_identifier;
///
/// assert_eq!(asset_stem_to_identifier("layout-list").unwrap(), "LayoutList");
/// assert!(asset_stem_to_identifier("layout--list").is_err());
/// ```
pub fn asset_stem_to_identifier(stem: &str) -> Result<String, NamingError> {
    if stem.is_empty() {
        return Err(NamingError::Empty);
    }

    let mut identifier = String::with_capacity(stem.len());
    for (index, segment) in stem.split('-').enumerate() {
        if segment.is_empty() {
            return Err(NamingError::EmptySegment {
                stem: stem.to_string(),
                index,
            });
        }
        if let Some(c) = segment.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(NamingError::InvalidCharacter {
                stem: stem.to_string(),
                character: c,
            });
        }

        let lower = segment.to_ascii_lowercase();
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            identifier.push(first.to_ascii_uppercase());
            identifier.push_str(chars.as_str());
        }
    }

    Ok(identifier)
}

/// Suggest the asset file stem for an identifier.
///
/// The identifier is split into maximal runs of lowercase letters, digits,
/// uppercase letters not followed by a lowercase letter, or one uppercase
/// letter followed by lowercase letters. Returns `None` when the identifier
/// is empty or does not tokenize completely.
///
/// ```rust
/// use svg_inline_codegen::naming::identifier_to_asset_stem;
///
/// assert_eq!(identifier_to_asset_stem("NonExistent").as_deref(), Some("non-existent"));
/// assert_eq!(identifier_to_asset_stem("Bad_Name"), None);
/// ```
pub fn identifier_to_asset_stem(identifier: &str) -> Option<String> {
    let chars: Vec<char> = identifier.chars().collect();
    if chars.is_empty() {
        return None;
    }

    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let start = i;
        let c = chars[i];
        if c.is_ascii_lowercase() {
            i = run_end(&chars, i, |c| c.is_ascii_lowercase());
        } else if c.is_ascii_digit() {
            i = run_end(&chars, i, |c| c.is_ascii_digit());
        } else if c.is_ascii_uppercase() {
            let upper_end = run_end(&chars, i, |c| c.is_ascii_uppercase());
            let followed_by_lower = chars.get(upper_end).is_some_and(|c| c.is_ascii_lowercase());
            i = match (followed_by_lower, upper_end - start) {
                // `Home`: one capital starting a word
                (true, 1) => run_end(&chars, upper_end, |c| c.is_ascii_lowercase()),
                // `XMLHttp`: the last capital starts the next word
                (true, _) => upper_end - 1,
                (false, _) => upper_end,
            };
        } else {
            return None;
        }
        let token: String = chars[start..i].iter().collect();
        tokens.push(token.to_ascii_lowercase());
    }

    Some(tokens.join("-"))
}

fn run_end(chars: &[char], from: usize, pred: impl Fn(char) -> bool) -> usize {
    chars[from..]
        .iter()
        .position(|&c| !pred(c))
        .map_or(chars.len(), |offset| from + offset)
}
