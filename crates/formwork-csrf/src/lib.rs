//! # formwork-csrf
//!
//! Double-submit CSRF protection for formwork forms.
//!
//! ## Modules
//!
//! - [`token`] - Token generation and constant-time comparison
//! - [`service`] - Cookie issuance and request verification

pub mod service;
pub mod token;

pub use service::{is_safe_method, CsrfService};
pub use token::{compare_token, generate_token};
