//! Core error types for formwork.
//!
//! [`FormError`] covers every failure the form engine can report, from
//! malformed record metadata to CSRF rejections. Each variant maps to an
//! HTTP status code via [`FormError::status_code`] so that transport
//! adapters can turn an error into a response without inspecting it further.

use std::fmt;

use thiserror::Error;

/// The aggregate outcome of a failed validation pass.
///
/// Holds one `(field name, message)` pair per field that carries an error,
/// in field order. This is the expected "form invalid" outcome and is
/// rendered back to the submitter rather than treated as a server fault.
///
/// # Examples
///
/// ```
/// use formwork_core::error::ValidationErrors;
///
/// let mut errors = ValidationErrors::new();
/// errors.push("username", "This field is required.");
/// assert_eq!(errors.len(), 1);
/// assert_eq!(errors.get("username"), Some("This field is required."));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    entries: Vec<(String, String)>,
}

impl ValidationErrors {
    /// Creates an empty aggregate.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Records an error for a field.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.entries.push((field.into(), message.into()));
    }

    /// Returns the message recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, message)| message.as_str())
    }

    /// Returns `true` if an error is recorded for `field`.
    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Returns the number of fields carrying an error.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no field carries an error.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, message)| (name.as_str(), message.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.entries {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// The primary error type for formwork.
///
/// Propagation policy:
///
/// - `Schema` and `TokenGeneration` abort the whole request.
/// - `Bind` and `Csrf` abort before validation runs.
/// - `Validation` flows into a normal response alongside the re-rendered form.
#[derive(Error, Debug)]
pub enum FormError {
    // ── Schema ───────────────────────────────────────────────────────

    /// The record type's form metadata is malformed (unknown rule,
    /// non-numeric bound, duplicate external name).
    #[error("Schema error: {0}")]
    Schema(String),

    /// A caller referred to a field the form does not have.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    // ── Request handling ─────────────────────────────────────────────

    /// The submitted data could not be parsed.
    #[error("Bind error: {0}")]
    Bind(String),

    /// One or more fields failed validation.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// A bound value could not be converted to the record attribute's type.
    #[error("Cannot convert {value:?} for attribute '{attribute}' to {expected}")]
    Coercion {
        /// The record attribute being assigned.
        attribute: String,
        /// The string value that failed to convert.
        value: String,
        /// The expected scalar category.
        expected: &'static str,
    },

    // ── Security ─────────────────────────────────────────────────────

    /// The CSRF cookie or form token was missing, or they did not match.
    ///
    /// Deliberately carries no detail about which half failed.
    #[error("CSRF verification failed")]
    Csrf,

    /// The secure random source was unavailable.
    #[error("Token generation failed: {0}")]
    TokenGeneration(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// - `Bind`, `Validation`, `Coercion` -> 400
    /// - `Csrf` -> 403
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Bind(_) | Self::Validation(_) | Self::Coercion { .. } => 400,
            Self::Csrf => 403,
            Self::Schema(_)
            | Self::UnknownField(_)
            | Self::TokenGeneration(_)
            | Self::Configuration(_)
            | Self::Io(_) => 500,
        }
    }

    /// Returns `true` for errors that must abort the whole request.
    pub const fn is_fatal(&self) -> bool {
        self.status_code() >= 500
    }
}

impl From<ValidationErrors> for FormError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// A convenience type alias for `Result<T, FormError>`.
pub type FormResult<T> = Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_display() {
        let mut errors = ValidationErrors::new();
        errors.push("username", "Too short");
        errors.push("email", "Invalid email");
        assert_eq!(errors.to_string(), "username: Too short; email: Invalid email");
    }

    #[test]
    fn test_validation_errors_preserve_order() {
        let mut errors = ValidationErrors::new();
        errors.push("b", "second");
        errors.push("a", "first");
        let names: Vec<&str> = errors.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_validation_errors_lookup() {
        let mut errors = ValidationErrors::new();
        errors.push("email", "Invalid email");
        assert!(errors.contains("email"));
        assert!(!errors.contains("username"));
        assert_eq!(errors.get("missing"), None);
    }

    #[test]
    fn test_form_error_status_codes() {
        assert_eq!(FormError::Schema("x".into()).status_code(), 500);
        assert_eq!(FormError::UnknownField("x".into()).status_code(), 500);
        assert_eq!(FormError::Bind("x".into()).status_code(), 400);
        assert_eq!(
            FormError::Validation(ValidationErrors::new()).status_code(),
            400
        );
        assert_eq!(
            FormError::Coercion {
                attribute: "age".into(),
                value: "abc".into(),
                expected: "integer",
            }
            .status_code(),
            400
        );
        assert_eq!(FormError::Csrf.status_code(), 403);
        assert_eq!(FormError::TokenGeneration("x".into()).status_code(), 500);
        assert_eq!(FormError::Configuration("x".into()).status_code(), 500);
    }

    #[test]
    fn test_csrf_error_is_opaque() {
        assert_eq!(FormError::Csrf.to_string(), "CSRF verification failed");
    }

    #[test]
    fn test_fatal_errors() {
        assert!(FormError::Schema("x".into()).is_fatal());
        assert!(FormError::TokenGeneration("x".into()).is_fatal());
        assert!(!FormError::Csrf.is_fatal());
        assert!(!FormError::Bind("x".into()).is_fatal());
    }

    #[test]
    fn test_coercion_display() {
        let err = FormError::Coercion {
            attribute: "age".into(),
            value: "abc".into(),
            expected: "integer",
        };
        assert_eq!(
            err.to_string(),
            "Cannot convert \"abc\" for attribute 'age' to integer"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: FormError = io_err.into();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("file missing"));
    }
}
