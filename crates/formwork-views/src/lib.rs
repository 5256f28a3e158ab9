//! # formwork-views
//!
//! Ties the form engine to a request: picks the effective method, gates
//! mutating requests on CSRF, binds and validates, and writes either a
//! rendered document or a payload into the response.
//!
//! ## Modules
//!
//! - [`method`] - Effective method resolution and method override
//! - [`renderer`] - The [`FormRenderer`] seam for document rendering
//! - [`flow`] - [`FormFlow`], the per-request orchestration

pub mod flow;
pub mod method;
pub mod renderer;

pub use flow::{success_message, FlowOutcome, FormFlow};
pub use method::effective_method;
pub use renderer::FormRenderer;
