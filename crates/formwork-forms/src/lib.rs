//! # formwork-forms
//!
//! The declarative form engine: record schemas, the form model, request
//! binding, the validation engine and response projection.
//!
//! ## Modules
//!
//! - [`schema`] - Attribute tables, compiled field descriptors, the schema cache
//! - [`record`] - The [`Record`] trait and string coercion
//! - [`rules`] - Built-in rules and their messages
//! - [`field`] - Form fields and custom validators
//! - [`form`] - The [`Form`] model
//! - [`binder`] - Request binding and record write-back
//! - [`validation`] - The validation engine
//! - [`projection`] - Template contexts and payloads

pub mod binder;
pub mod field;
pub mod form;
pub mod projection;
pub mod record;
pub mod rules;
pub mod schema;
pub mod validation;

pub use field::{CustomValidator, Field};
pub use form::Form;
pub use projection::{FieldPayload, FieldView, FormOutput, FormView, RenderMode};
pub use record::{FromFormValue, Record};
pub use rules::Rule;
pub use schema::{
    schema_of, AttributeSpec, FieldDescriptor, FieldKind, RecordSchema, ScalarCategory,
};

// Error types used by generated `Record` impls.
pub use formwork_core::{FormError, FormResult};
