//! # svg-inline-macros
//!
//! The `#[generate_svg]` attribute that marks component structs for
//! `svg-inline`.
//!
//! The attribute generates nothing. It checks its arguments and hands the
//! struct back unchanged, so the marked struct compiles in the consumer
//! crate. The render dispatch itself is written by `svg-inline generate` and
//! pulled in with `include!`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use svg_inline_macros::generate_svg;
//!
//! #[generate_svg(kind, attributes)]
//! pub struct Icon {
//!     pub kind: IconKind,
//!     pub attributes: HashMap<String, String>,
//! }
//! ```
//!
//! Both arguments may also be string literals: `#[generate_svg("kind", "attributes")]`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use syn::parse::{Parse, ParseStream, Parser};
use syn::punctuated::Punctuated;
use syn::{ItemStruct, Token};

/// Marks a struct for inline SVG render generation.
///
/// The first argument names the enum field that selects the asset, the
/// second names the field holding extra attributes.
#[proc_macro_attribute]
pub fn generate_svg(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand(attr.into(), item.into()).into()
}

/// The item comes back untouched. A rejected directive adds a compile error
/// next to it instead of replacing it.
fn expand(attr: TokenStream2, item: TokenStream2) -> TokenStream2 {
    match check(attr, item.clone()) {
        Ok(()) => item,
        Err(err) => {
            let mut tokens = item;
            tokens.extend(err.into_compile_error());
            tokens
        }
    }
}

fn check(attr: TokenStream2, item: TokenStream2) -> syn::Result<()> {
    parse_directive.parse2(attr)?;

    let item_struct: ItemStruct = syn::parse2(item).map_err(|e| {
        syn::Error::new(e.span(), "#[generate_svg] can only be applied to a struct")
    })?;
    if !item_struct.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item_struct.generics,
            format!(
                "generic component '{}' is not supported",
                item_struct.ident
            ),
        ));
    }
    Ok(())
}

/// `kind, extras`: two identifiers or string literals naming fields.
fn parse_directive(input: ParseStream) -> syn::Result<()> {
    let args = Punctuated::<FieldName, Token![,]>::parse_terminated(input)?;
    if args.len() != 2 {
        return Err(input.error(
            "expected two arguments: the kind property and the extra attributes property",
        ));
    }
    Ok(())
}

struct FieldName;

impl Parse for FieldName {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(syn::LitStr) {
            let lit: syn::LitStr = input.parse()?;
            syn::parse_str::<syn::Ident>(&lit.value())
                .map_err(|_| syn::Error::new(lit.span(), "expected a field name"))?;
        } else {
            input.parse::<syn::Ident>()?;
        }
        Ok(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    fn errors(tokens: &TokenStream2) -> Vec<String> {
        let file: syn::File = syn::parse2(tokens.clone()).unwrap();
        file.items
            .iter()
            .filter_map(|item| match item {
                syn::Item::Macro(mac)
                    if mac
                        .mac
                        .path
                        .segments
                        .last()
                        .is_some_and(|segment| segment.ident == "compile_error") =>
                {
                    Some(mac.mac.tokens.to_string())
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_valid_directive_returns_item_unchanged() {
        let item = quote! {
            pub struct Icon {
                pub kind: IconKind,
                pub attributes: Attributes,
            }
        };

        let expanded = expand(quote!(kind, attributes), item.clone());

        assert_eq!(expanded.to_string(), item.to_string());
    }

    #[test]
    fn test_string_literal_arguments() {
        let item = quote!(struct Icon { kind: IconKind, attributes: Attributes });
        let expanded = expand(quote!("kind", "attributes"), item.clone());
        assert_eq!(expanded.to_string(), item.to_string());
    }

    #[test]
    fn test_wrong_argument_count_keeps_item() {
        let item = quote!(struct Icon { kind: IconKind });

        for attr in [quote!(), quote!(kind), quote!(kind, attributes, extra)] {
            let expanded = expand(attr, item.clone());
            let errors = errors(&expanded);
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("expected two arguments"));
            assert!(expanded.to_string().starts_with(&item.to_string()));
        }
    }

    #[test]
    fn test_string_argument_must_be_a_field_name() {
        let expanded = expand(
            quote!("kind", "extra attributes"),
            quote!(struct Icon { kind: IconKind }),
        );
        assert!(errors(&expanded)[0].contains("expected a field name"));
    }

    #[test]
    fn test_rejects_non_struct() {
        let expanded = expand(quote!(kind, attributes), quote!(enum Icon { Home }));
        assert!(errors(&expanded)[0].contains("can only be applied to a struct"));
    }

    #[test]
    fn test_rejects_generic_struct() {
        let expanded = expand(
            quote!(kind, attributes),
            quote!(struct Icon<T> { kind: IconKind, attributes: T }),
        );
        assert!(errors(&expanded)[0].contains("generic component 'Icon'"));
    }
}
