//! `#[derive(Record)]` implementation.
//!
//! Generates `formwork_forms::Record` for a named struct: a static
//! `AttributeSpec` table covering every field that carries `#[form]`, and an
//! `assign` method writing submitted strings back into the non-excluded ones.

use std::collections::HashSet;

use darling::util::Flag;
use darling::{FromDeriveInput, FromField};
use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::rule_list::RuleList;
use crate::types::{is_other_category, scalar_category, type_to_string};

const EXCLUDED_NAME: &str = "-";

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(form), supports(struct_named))]
pub struct RecordOpts {
    pub ident: syn::Ident,
    pub generics: syn::Generics,
    pub data: darling::ast::Data<(), RecordFieldOpts>,
}

/// Per-field options from `#[form(...)]`.
#[derive(Debug, FromField)]
#[darling(attributes(form))]
pub struct RecordFieldOpts {
    pub ident: Option<syn::Ident>,
    pub ty: syn::Type,

    /// External name; `"-"` excludes the field.
    #[darling(default)]
    pub name: Option<String>,

    /// Same as `name = "-"`.
    #[darling(default)]
    pub skip: Flag,

    #[darling(default)]
    pub rules: RuleList,

    #[darling(default)]
    pub message: Option<String>,

    /// Input kind override, e.g. `"password"`.
    #[darling(default)]
    pub kind: Option<String>,
}

impl RecordFieldOpts {
    fn is_excluded(&self) -> bool {
        self.skip.is_present() || self.name.as_deref() == Some(EXCLUDED_NAME)
    }
}

/// Idents of the fields that carry at least one `#[form]` attribute.
fn annotated_fields(input: &DeriveInput) -> HashSet<String> {
    let syn::Data::Struct(data) = &input.data else {
        return HashSet::new();
    };
    data.fields
        .iter()
        .filter(|f| f.attrs.iter().any(|a| a.path().is_ident("form")))
        .filter_map(|f| f.ident.as_ref().map(ToString::to_string))
        .collect()
}

pub fn derive_record_impl(input: &DeriveInput) -> TokenStream {
    let opts = match RecordOpts::from_derive_input(input) {
        Ok(o) => o,
        Err(e) => return e.write_errors(),
    };

    let Some(fields) = opts.data.as_ref().take_struct() else {
        return syn::Error::new_spanned(&input.ident, "#[derive(Record)] only supports named structs")
            .to_compile_error();
    };

    let annotated = annotated_fields(input);
    let fields: Vec<&RecordFieldOpts> = fields
        .fields
        .into_iter()
        .filter(|f| {
            f.ident
                .as_ref()
                .is_some_and(|i| annotated.contains(&i.to_string()))
        })
        .collect();

    let spec_tokens: Vec<TokenStream> = fields.iter().map(|f| generate_spec(f)).collect();
    let assign_arms: Vec<TokenStream> = fields
        .iter()
        .filter(|f| !f.is_excluded())
        .filter_map(|f| generate_assign_arm(f))
        .collect();

    let struct_name = &opts.ident;
    let (impl_generics, ty_generics, where_clause) = opts.generics.split_for_impl();

    quote! {
        impl #impl_generics ::formwork_forms::Record for #struct_name #ty_generics #where_clause {
            fn attributes() -> &'static [::formwork_forms::AttributeSpec] {
                const ATTRIBUTES: &[::formwork_forms::AttributeSpec] = &[
                    #(#spec_tokens),*
                ];
                ATTRIBUTES
            }

            #[allow(unused_variables)]
            fn assign(
                &mut self,
                ident: &str,
                value: &str,
            ) -> ::formwork_forms::FormResult<()> {
                match ident {
                    #(#assign_arms)*
                    other => ::core::result::Result::Err(
                        ::formwork_forms::FormError::UnknownField(other.to_string())
                    ),
                }
            }
        }
    }
}

/// Generates one `AttributeSpec` construction expression.
fn generate_spec(f: &RecordFieldOpts) -> TokenStream {
    let ident_str = f.ident.as_ref().map(ToString::to_string).unwrap_or_default();
    let category = scalar_category(&f.ty);

    let mut chain = Vec::new();
    if f.is_excluded() {
        chain.push(quote! { .excluded() });
    } else if let Some(ref name) = f.name {
        chain.push(quote! { .named(#name) });
    }
    if !f.rules.0.is_empty() {
        let rules = f.rules.joined();
        chain.push(quote! { .rules(#rules) });
    }
    if let Some(ref message) = f.message {
        chain.push(quote! { .message(#message) });
    }
    if let Some(ref kind) = f.kind {
        chain.push(quote! { .kind(#kind) });
    }

    quote! {
        ::formwork_forms::AttributeSpec::new(#ident_str, #category)
            #(#chain)*
    }
}

/// Generates the `assign` match arm for one field.
///
/// Types outside the scalar categories have no `FromFormValue`; their arm
/// reports a coercion error at runtime instead.
fn generate_assign_arm(f: &RecordFieldOpts) -> Option<TokenStream> {
    let ident = f.ident.as_ref()?;
    let ident_str = ident.to_string();
    let ty = &f.ty;

    if is_other_category(ty) {
        let type_str = type_to_string(ty);
        return Some(quote! {
            #ident_str => ::core::result::Result::Err(::formwork_forms::FormError::Coercion {
                attribute: #ident_str.to_string(),
                value: value.to_string(),
                expected: #type_str,
            }),
        });
    }

    Some(quote! {
        #ident_str => {
            self.#ident = <#ty as ::formwork_forms::FromFormValue>::from_form_value(#ident_str, value)?;
            ::core::result::Result::Ok(())
        }
    })
}
