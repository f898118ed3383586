//! Derive macros for the vecflow animation engine.
//!
//! This crate provides one derive macro:
//!
//! - [`FieldKind`] - Turns a unit-only enum into a closed set of named motion
//!   fields with stable string keys and integer ids
//!
//! # Usage
//!
//! The macro is re-exported from the main `vecflow` crate. You don't need
//! to add this crate directly:
//!
//! ```ignore
//! use vecflow::FieldKind;
//!
//! #[derive(FieldKind, Clone, Copy, PartialEq, Debug)]
//! enum Motion {
//!     None,
//!     SmoothWaves,
//!     Vortex,
//! }
//!
//! assert_eq!(Motion::SmoothWaves.name(), "smoothWaves");
//! assert_eq!(Motion::from_name("vortex"), Some(Motion::Vortex));
//! ```
//!
//! # Keys
//!
//! The string key of a variant is its identifier in lowerCamelCase, which is
//! the form settings files and hosting UIs use (`SeaWaves` -> `"seaWaves"`).

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

/// Converts a variant identifier to its lowerCamelCase key.
fn lower_camel(ident: &str) -> String {
    let mut chars = ident.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Derive macro for motion-field kind enums.
///
/// Variants are assigned sequential ids starting from 0 and a lowerCamelCase
/// string key.
///
/// # Generated Items
///
/// For an enum `Motion`:
///
/// - `Motion::ALL` - every variant in declaration order
/// - `Motion::count() -> usize` - number of variants
/// - `Motion::name(&self) -> &'static str` - the string key
/// - `Motion::from_name(&str) -> Option<Motion>` - parse a key
/// - `impl From<Motion> for u32` and `impl From<u32> for Motion`
///   (out-of-range ids fall back to the first variant)
/// - `impl Display for Motion` - writes the string key
///
/// # Requirements
///
/// - Must be an enum (not a struct)
/// - All variants must be unit variants (no fields)
/// - Enum must also derive `Clone` and `Copy`
///
/// # Panics
///
/// The macro panics at compile time if:
/// - Applied to a struct instead of an enum
/// - Any variant has fields (tuple or struct variants)
/// - Enum has zero variants
#[proc_macro_derive(FieldKind)]
pub fn derive_field_kind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let variants = match &input.data {
        Data::Enum(data) => &data.variants,
        _ => panic!("FieldKind derive only supports enums"),
    };

    for variant in variants.iter() {
        if !matches!(variant.fields, Fields::Unit) {
            panic!(
                "FieldKind enum variants must be unit variants (no fields). \
                 Found fields on variant '{}'",
                variant.ident
            );
        }
    }

    let first_variant = &variants
        .first()
        .expect("Enum must have at least one variant")
        .ident;
    let variant_count = variants.len();

    let idents: Vec<_> = variants.iter().map(|v| &v.ident).collect();
    let keys: Vec<LitStr> = idents
        .iter()
        .map(|ident| LitStr::new(&lower_camel(&ident.to_string()), ident.span()))
        .collect();
    let ids: Vec<u32> = (0..variant_count as u32).collect();

    let expanded = quote! {
        impl #name {
            /// Every variant, in declaration order.
            pub const ALL: [#name; #variant_count] = [#(#name::#idents),*];

            /// Returns the number of variants.
            pub const fn count() -> usize {
                #variant_count
            }

            /// Returns the lowerCamelCase key of this variant.
            pub fn name(&self) -> &'static str {
                match self {
                    #(#name::#idents => #keys),*
                }
            }

            /// Parses a lowerCamelCase key. Unknown keys return `None`.
            pub fn from_name(key: &str) -> Option<#name> {
                match key {
                    #(#keys => Some(#name::#idents),)*
                    _ => None,
                }
            }
        }

        impl From<#name> for u32 {
            fn from(value: #name) -> u32 {
                match value {
                    #(#name::#idents => #ids),*
                }
            }
        }

        impl From<u32> for #name {
            fn from(value: u32) -> #name {
                match value {
                    #(#ids => #name::#idents,)*
                    _ => #name::#first_variant,
                }
            }
        }

        impl ::std::fmt::Display for #name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };

    TokenStream::from(expanded)
}
