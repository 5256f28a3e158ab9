//! The validation engine.
//!
//! For each field in scope:
//!
//! 1. A custom validator, if attached, runs first. Its failure becomes the
//!    field's error and the built-in rules are skipped.
//! 2. Otherwise the built-in rules run in declaration order and the first
//!    one that fails sets the error.
//! 3. A field that passes ends up with an empty error.
//!
//! Errors are overwritten on every run and mirrored into the form-level
//! error map. Validation fails when any field of the form carries an error
//! afterwards, including errors set outside the rule engine.

use formwork_core::{FormError, FormResult, MessageSettings};

use crate::field::Field;
use crate::form::Form;

/// Validates the fields named in `only`, or every field when `None`.
///
/// Names in `only` that match no field are ignored.
pub fn validate(form: &mut Form, only: Option<&[&str]>) -> FormResult<()> {
    let messages = form.conventions().messages.clone();
    let mut outcomes = Vec::new();

    for field in form.fields_mut() {
        if only.is_some_and(|names| !names.contains(&field.name())) {
            continue;
        }
        field.error = check_field(field, &messages).unwrap_or_default();
        outcomes.push((field.name().to_string(), field.error.clone()));
    }

    for (name, error) in &outcomes {
        form.record_error(name, error);
    }

    let errors = form.errors();
    if errors.is_empty() {
        tracing::debug!(form_id = form.form_id(), "Form is valid");
        Ok(())
    } else {
        tracing::debug!(form_id = form.form_id(), errors = errors.len(), "Form is invalid");
        Err(FormError::Validation(errors))
    }
}

/// Returns the error message for a single field, or `None` if it passes.
pub fn check_field(field: &Field, messages: &MessageSettings) -> Option<String> {
    let value = field.value();

    if let Some(validator) = &field.validator {
        if let Err(message) = validator(value) {
            return Some(message);
        }
    }

    let descriptor = field.descriptor();
    descriptor
        .rules
        .iter()
        .find(|rule| !rule.check(value))
        .map(|rule| rule.message(descriptor.message.as_deref(), messages))
}
