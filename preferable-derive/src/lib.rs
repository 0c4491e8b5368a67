//! Derive macros for the preferable library
//!
//! This crate provides `#[derive(PreferenceSchema)]` for generating a host's
//! preference declarations from a plain struct.
//!
//! # Usage
//!
//! ```text
//! use preferable::PreferenceSchema;
//!
//! #[derive(PreferenceSchema, Default, Serialize, Deserialize)]
//! struct UserPreferences {
//!     color: String,
//!
//!     #[preference(kind = "password")]
//!     pin: String,
//!
//!     #[preference(name = "max-items")]
//!     max_items: u32,
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::{format_ident, quote, quote_spanned};
use syn::ext::IdentExt;
use syn::{
    parse_macro_input, spanned::Spanned, Attribute, Data, DeriveInput, Expr, Fields, Lit, Meta,
    Type,
};

/// Names accepted by `#[preference(kind = "...")]`, with their variant
const KINDS: [(&str, &str); 9] = [
    ("string", "String"),
    ("text", "Text"),
    ("password", "Password"),
    ("decimal", "Decimal"),
    ("integer", "Integer"),
    ("boolean", "Boolean"),
    ("array", "Array"),
    ("hash", "Hash"),
    ("raw", "Raw"),
];

/// Derive macro for generating `PreferenceSchema` implementations.
///
/// Every named field becomes one preference, in field order. Defaults are
/// taken from the struct's `Default` implementation, so each field type must
/// implement `serde::Serialize`; a field that does not is a compile error
/// pointing at that field.
///
/// A default whose `Serialize` impl fails at runtime (a map with non-string
/// keys, for instance) is logged at warn level and declared as `null`, which
/// then reads as the declared type's empty value (`""`, `0`, `[]`, `{}`).
///
/// # Type inference
///
/// - `String`, `&str`, `char` - string
/// - `bool` - boolean
/// - integer primitives - integer
/// - `f32`, `f64` - decimal
/// - `Vec`, `VecDeque`, `HashSet`, `BTreeSet` - array
/// - `HashMap`, `BTreeMap`, `Map` - hash
/// - `Option<T>` - raw, so a `None` default stays `null` (use `kind` to override)
/// - anything else - raw
///
/// # Field attributes (`#[preference(...)]`)
/// - `kind = "password"` - Declared type override
/// - `name = "..."` - Preference name override (defaults to the field name)
/// - `skip` - Leave this field out of the schema
#[proc_macro_derive(PreferenceSchema, attributes(preference))]
pub fn derive_preference_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "PreferenceSchema can only be derived for structs with named fields.\n\nExample:\n  #[derive(PreferenceSchema)]\n  struct MyPreferences {\n      field: Type,\n  }",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "PreferenceSchema can only be derived for structs.\n\nTry: #[derive(PreferenceSchema)] on a struct, not an enum or union.",
            ));
        }
    };

    let mut declarations = Vec::new();

    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let attrs = parse_field_attrs(&field.attrs)?;

        if attrs.skip {
            continue;
        }

        let key = attrs
            .name
            .unwrap_or_else(|| field_name.unraw().to_string());
        let variant = match attrs.kind {
            Some(kind) => kind,
            None => format_ident!("{}", infer_kind(&field.ty)),
        };

        // a missing `Serialize` impl is reported on the field type
        declarations.push(quote_spanned! {field.ty.span()=>
            ::preferable::PreferenceSpec::from_serializable(
                #key,
                ::preferable::PreferenceType::#variant,
                &defaults.#field_name,
            )
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::preferable::PreferenceSchema for #name #ty_generics #where_clause {
            fn declarations() -> ::std::vec::Vec<::preferable::PreferenceSpec> {
                let defaults = <Self as ::std::default::Default>::default();
                ::std::vec![#(#declarations),*]
            }
        }
    })
}

/// Field-level attributes from #[preference(...)]
#[derive(Default)]
struct FieldAttrs {
    kind: Option<syn::Ident>,
    name: Option<String>,
    skip: bool,
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("preference") {
            continue;
        }

        let nested = attr.parse_args_with(
            syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated,
        )?;

        for meta in nested {
            match meta {
                Meta::Path(path) if path.is_ident("skip") => {
                    result.skip = true;
                }
                Meta::NameValue(nv) if nv.path.is_ident("kind") => {
                    let kind = string_literal(&nv.value).ok_or_else(|| {
                        syn::Error::new_spanned(
                            &nv.value,
                            "#[preference(kind)] must be a string literal.\n\nExample: #[preference(kind = \"password\")]",
                        )
                    })?;
                    let variant = KINDS
                        .iter()
                        .find(|(name, _)| name.eq_ignore_ascii_case(kind.trim()))
                        .map(|(_, variant)| syn::Ident::new(variant, Span::call_site()))
                        .ok_or_else(|| {
                            let known: Vec<_> = KINDS.iter().map(|(name, _)| *name).collect();
                            syn::Error::new_spanned(
                                &nv.value,
                                format!(
                                    "unknown preference kind \"{kind}\".\n\nExpected one of: {}",
                                    known.join(", ")
                                ),
                            )
                        })?;
                    result.kind = Some(variant);
                }
                Meta::NameValue(nv) if nv.path.is_ident("name") => {
                    let name = string_literal(&nv.value).ok_or_else(|| {
                        syn::Error::new_spanned(
                            &nv.value,
                            "#[preference(name)] must be a string literal.\n\nExample: #[preference(name = \"max-items\")]",
                        )
                    })?;
                    result.name = Some(name);
                }
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "unknown preference attribute.\n\nSupported: kind = \"...\", name = \"...\", skip",
                    ));
                }
            }
        }
    }

    Ok(result)
}

fn string_literal(expr: &Expr) -> Option<String> {
    if let Expr::Lit(lit) = expr {
        if let Lit::Str(s) = &lit.lit {
            return Some(s.value());
        }
    }
    None
}

/// Map a Rust field type to a `PreferenceType` variant name
fn infer_kind(ty: &Type) -> &'static str {
    match ty {
        Type::Reference(reference) => infer_kind(&reference.elem),
        Type::Slice(_) | Type::Array(_) => "Array",
        Type::Path(path) => {
            let Some(segment) = path.path.segments.last() else {
                return "Raw";
            };
            match segment.ident.to_string().as_str() {
                "String" | "str" | "char" => "String",
                "bool" => "Boolean",
                "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
                | "u128" | "usize" => "Integer",
                "f32" | "f64" => "Decimal",
                "Vec" | "VecDeque" | "HashSet" | "BTreeSet" => "Array",
                "HashMap" | "BTreeMap" | "Map" => "Hash",
                // `None` has to survive as `null`, which only raw keeps
                "Option" => "Raw",
                _ => "Raw",
            }
        }
        _ => "Raw",
    }
}
