//! # formwork-core
//!
//! Core types shared by every formwork crate: the error taxonomy, settings,
//! settings loading, and tracing setup. This crate has no framework
//! dependencies and is the foundation for all other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Form engine settings (separator, CSRF cookie, default messages)
//! - [`settings_loader`] - Loading settings from TOML, JSON and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{FormError, FormResult, ValidationErrors};
pub use settings::{MessageSettings, Settings};
