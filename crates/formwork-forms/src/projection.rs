//! Turning a form into something a client can consume.
//!
//! In [`RenderMode::Render`] a form projects to a [`FormView`], the context
//! handed to a template. In [`RenderMode::Payload`] it projects to a map from
//! field name to `{kind, value, error}`, suitable for JSON clients.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::form::Form;
use crate::schema::FieldKind;

/// How a form is projected into a response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// A document rendered by a template.
    #[default]
    Render,
    /// A structured map for machine clients.
    Payload,
}

/// Template context for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    /// The field's external name.
    pub name: String,
    /// The submitted key, i.e. what an input's `name` attribute must be.
    pub key: String,
    pub kind: FieldKind,
    pub value: String,
    pub error: String,
    pub hidden: bool,
}

/// Template context for a whole form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub form_id: String,
    pub method: String,
    pub csrf_token: String,
    /// The submitted key carrying the CSRF token.
    pub csrf_key: String,
    pub fields: Vec<FieldView>,
    pub has_errors: bool,
}

/// The payload entry for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldPayload {
    pub kind: FieldKind,
    pub value: String,
    pub error: String,
}

/// A projected form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FormOutput {
    View(FormView),
    Payload(BTreeMap<String, FieldPayload>),
}

impl FormOutput {
    /// Serializes the projection to JSON.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Projects `form` according to its render mode.
pub fn to_output(form: &Form) -> FormOutput {
    match form.render_mode() {
        RenderMode::Render => FormOutput::View(to_view(form)),
        RenderMode::Payload => FormOutput::Payload(to_payload(form)),
    }
}

/// Builds the template context for `form`.
pub fn to_view(form: &Form) -> FormView {
    let fields = form
        .fields()
        .iter()
        .map(|f| FieldView {
            name: f.name().to_string(),
            key: form.field_key(f.name()),
            kind: f.kind(),
            value: f.value().to_string(),
            error: f.error().to_string(),
            hidden: f.is_hidden(),
        })
        .collect();

    FormView {
        form_id: form.form_id().to_string(),
        method: form.method().to_string(),
        csrf_token: form.csrf_token().to_string(),
        csrf_key: form.csrf_field_key(),
        fields,
        has_errors: form.has_errors(),
    }
}

/// Builds the field-name to `{kind, value, error}` map for `form`.
pub fn to_payload(form: &Form) -> BTreeMap<String, FieldPayload> {
    form.fields()
        .iter()
        .map(|f| {
            (
                f.name().to_string(),
                FieldPayload {
                    kind: f.kind(),
                    value: f.value().to_string(),
                    error: f.error().to_string(),
                },
            )
        })
        .collect()
}

/// The body of a failed asynchronous submission: `{"errors": {field: message}}`.
pub fn error_payload(form: &Form) -> serde_json::Value {
    let errors: serde_json::Map<String, serde_json::Value> = form
        .errors()
        .iter()
        .map(|(field, message)| (field.to_string(), serde_json::Value::from(message)))
        .collect();
    serde_json::json!({ "errors": errors })
}
