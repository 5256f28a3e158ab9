//! # formwork-macros
//!
//! The `#[derive(Record)]` macro. It turns `#[form(...)]` field annotations
//! into the static attribute table and typed write-back that
//! `formwork_forms::Record` requires.
//!
//! This crate is independent of the other formwork crates because proc-macro
//! crates cannot depend on crates that use them; generated code refers to
//! `::formwork_forms` by absolute path.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod record;
mod rule_list;
mod types;

/// Derives `formwork_forms::Record`.
///
/// Field attributes:
///
/// - `#[form(name = "username")]` - the external field name
/// - `#[form(name = "-")]` or `#[form(skip)]` - keep the attribute out of forms
/// - `#[form(rules = "required,min=3")]` or `rules = ["required", "min=3"]`
/// - `#[form(message = "At least {} characters")]`
/// - `#[form(kind = "password")]` - override the inferred input kind
///
/// A field carrying `#[form]` without a name becomes a hidden field named
/// after the attribute. Fields without `#[form]` are not part of the form.
///
/// # Examples
///
/// ```ignore
/// use formwork_macros::Record;
///
/// #[derive(Default, Record)]
/// struct Signup {
///     #[form(name = "username", rules = "required,min=3")]
///     username: String,
///     #[form(name = "password", rules = "required,min=8", kind = "password")]
///     password: String,
///     #[form(name = "-")]
///     id: u64,
/// }
/// ```
#[proc_macro_derive(Record, attributes(form))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::derive_record_impl(&input).into()
}
