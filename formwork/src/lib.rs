//! # formwork
//!
//! Declarative form handling for Rust web services: derive a schema from a
//! record type, bind submitted data, validate it with declared rules and
//! custom validators, protect submissions with double-submit CSRF tokens,
//! and project the result as a template context or a JSON payload.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient
//! access. You can depend on `formwork` to get everything, or depend on
//! individual crates for finer-grained control.
//!
//! Code generated by `#[derive(Record)]` refers to `::formwork_forms`, so a
//! crate using the derive also lists `formwork-forms` as a dependency.

/// Error types, settings, settings loading and logging setup.
pub use formwork_core as core;

/// The `#[derive(Record)]` macro.
#[cfg(feature = "macros")]
pub use formwork_macros as macros;

/// Request and response seams, `QueryDict`, cookies.
#[cfg(feature = "http")]
pub use formwork_http as http;

/// Schemas, forms, binding, validation and projection.
#[cfg(feature = "forms")]
pub use formwork_forms as forms;

/// CSRF token generation, issuance and verification.
#[cfg(feature = "csrf")]
pub use formwork_csrf as csrf;

/// Per-request orchestration.
#[cfg(feature = "views")]
pub use formwork_views as views;

// Third-party crates that appear in formwork's public API.
pub use serde;
pub use serde_json;
pub use tracing;
pub use tracing_subscriber;

/// The types most handlers need.
pub mod prelude {
    pub use formwork_core::{FormError, FormResult, Settings};

    #[cfg(feature = "macros")]
    pub use formwork_macros::Record;

    #[cfg(feature = "forms")]
    pub use formwork_forms::{Form, FormOutput, FormView, Record, RenderMode};

    #[cfg(feature = "http")]
    pub use formwork_http::{FormRequest, FormResponse, RequestSource, ResponseSink};

    #[cfg(feature = "csrf")]
    pub use formwork_csrf::CsrfService;

    #[cfg(feature = "views")]
    pub use formwork_views::{FlowOutcome, FormFlow, FormRenderer};
}
