//! `#[derive(Record)]` for sheetbind.
//!
//! Generates the static field table of `sheetbind::Record` and the value-form
//! `sheetbind::Element` impl. Fields name their header column with tags:
//!
//! ```ignore
//! #[derive(Default, Record)]
//! struct Person {
//!     #[excel("Name")]
//!     name: String,
//!     #[tag(excel = "Age", csv = "age")]
//!     age: i32,
//!     // no tag: never bound, keeps its default
//!     note: String,
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Expr, ExprLit, Fields, Lit, LitStr, Meta,
    Type,
};

/* ────────────────────────── the derive macro ───────────────────────── */
#[proc_macro_derive(Record, attributes(excel, tag))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    /* -------- 1 · only structs with named fields -------- */
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Record can only be derived for structs",
            ))
        }
    };

    /* -------- 2 · one descriptor per field -------- */
    let mut entries = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(ident) = &field.ident else {
            continue;
        };
        let name = ident.to_string();
        let tags = field_tags(&field.attrs)?;
        let tag_tokens = tags.iter().map(|(key, value)| quote! { (#key, #value) });
        let setter = setter_tokens(ident, &field.ty);

        entries.push(quote! {
            ::sheetbind::Field {
                name: #name,
                tags: &[ #(#tag_tokens),* ],
                setter: #setter,
            }
        });
    }

    /* -------- 3 · assemble impls -------- */
    let ty = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::sheetbind::Record for #ty #ty_generics #where_clause {
            const FIELDS: &'static [::sheetbind::Field<Self>] = &[ #(#entries),* ];
        }

        impl #impl_generics ::sheetbind::Element for #ty #ty_generics #where_clause {
            type Record = Self;
            const FORM: ::sheetbind::ElementForm = ::sheetbind::ElementForm::Value;

            fn from_record(record: Self) -> Self {
                record
            }
        }
    })
}

/// Collect `(key, value)` tags from `#[excel("..")]`, `#[excel = ".."]` and
/// `#[tag(key = "..", ..)]`, in attribute order.
fn field_tags(attrs: &[Attribute]) -> syn::Result<Vec<(String, String)>> {
    let mut tags = Vec::new();

    for attr in attrs {
        if attr.path().is_ident("excel") {
            let value = match &attr.meta {
                Meta::List(_) => attr.parse_args::<LitStr>()?,
                Meta::NameValue(nv) => match &nv.value {
                    Expr::Lit(ExprLit {
                        lit: Lit::Str(s), ..
                    }) => s.clone(),
                    other => {
                        return Err(syn::Error::new_spanned(
                            other,
                            "expected a string literal: #[excel = \"Header\"]",
                        ))
                    }
                },
                Meta::Path(path) => {
                    return Err(syn::Error::new_spanned(
                        path,
                        "missing header name: #[excel(\"Header\")]",
                    ))
                }
            };
            tags.push(("excel".to_string(), value.value()));
        } else if attr.path().is_ident("tag") {
            attr.parse_nested_meta(|meta| {
                let key = meta
                    .path
                    .get_ident()
                    .map(|ident| ident.to_string())
                    .ok_or_else(|| meta.error("tag key must be an identifier"))?;
                let value: LitStr = meta.value()?.parse()?;
                tags.push((key, value.value()));
                Ok(())
            })?;
        }
    }

    Ok(tags)
}

/// `Setter` variant for a field type; anything that is not `i32`, `i64`,
/// `f64` or `String` becomes `Setter::Unsupported`.
fn setter_tokens(ident: &syn::Ident, ty: &Type) -> TokenStream2 {
    let variant = match scalar_name(ty).as_deref() {
        Some("i32") => quote! { Int },
        Some("i64") => quote! { Int64 },
        Some("f64") => quote! { Float },
        Some("String") => quote! { String },
        _ => {
            let type_name = ty.to_token_stream().to_string().replace(' ', "");
            return quote! { ::sheetbind::Setter::Unsupported(#type_name) };
        }
    };
    quote! {
        ::sheetbind::Setter::#variant(|record: &mut Self, value| record.#ident = value)
    }
}

/// Last path segment of a plain (non-generic) type path
fn scalar_name(ty: &Type) -> Option<String> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let segment = path.path.segments.last()?;
    if !segment.arguments.is_empty() {
        return None;
    }
    Some(segment.ident.to_string())
}
