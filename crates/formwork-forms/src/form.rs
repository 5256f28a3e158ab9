//! The [`Form`] model.
//!
//! A `Form` is built from a record type's compiled schema: one [`Field`] per
//! non-excluded attribute, in declaration order, each starting with an empty
//! value and no error. Binding, validation, projection and write-back all
//! operate on this one structure.
//!
//! A form is owned by a single request flow and is not meant to be shared
//! across threads while it is being bound or validated.

use std::collections::HashMap;
use std::sync::Arc;

use formwork_core::{FormError, FormResult, MessageSettings, Settings, ValidationErrors};
use formwork_http::{QueryDict, RequestSource};
use http::Method;

use crate::field::{CustomValidator, Field};
use crate::projection::{self, FormOutput, RenderMode};
use crate::record::Record;
use crate::schema::{schema_of, FieldDescriptor, RecordSchema};
use crate::{binder, validation};

/// The naming and message conventions a form was built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Conventions {
    pub(crate) separator: String,
    pub(crate) csrf_field_name: String,
    pub(crate) messages: MessageSettings,
}

impl From<&Settings> for Conventions {
    fn from(settings: &Settings) -> Self {
        Self {
            separator: settings.field_separator.clone(),
            csrf_field_name: settings.csrf_field_name.clone(),
            messages: settings.messages.clone(),
        }
    }
}

/// A form instance derived from a record type.
///
/// # Examples
///
/// ```ignore
/// let mut form = Form::new(&Signup::default(), Method::POST, "signup")?;
/// form.bind(&request)?;
/// if form.validate().is_ok() {
///     form.update_record(&mut signup)?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Form {
    schema: Arc<RecordSchema>,
    fields: Vec<Field>,
    errors: HashMap<String, String>,
    method: Method,
    form_id: String,
    csrf_token: String,
    render_mode: RenderMode,
    bound: bool,
    conventions: Conventions,
}

impl Form {
    /// Builds a form from the schema of `R`.
    ///
    /// The record is only used for its type, so a borrowed value and an
    /// existing reference are handled alike. Returns [`FormError::Schema`]
    /// when the record's attribute table is malformed.
    pub fn new<R: Record>(
        _record: &R,
        method: Method,
        form_id: impl Into<String>,
    ) -> FormResult<Self> {
        Self::for_record::<R>(method, form_id)
    }

    /// Builds a form for `R` without needing a value of it.
    pub fn for_record<R: Record>(method: Method, form_id: impl Into<String>) -> FormResult<Self> {
        Ok(Self::from_schema(schema_of::<R>()?, method, form_id))
    }

    /// Builds a form from an already compiled schema.
    pub fn from_schema(
        schema: Arc<RecordSchema>,
        method: Method,
        form_id: impl Into<String>,
    ) -> Self {
        let fields = schema
            .form_fields()
            .map(|d| Field::from_shared(Arc::clone(d)))
            .collect();

        Self {
            schema,
            fields,
            errors: HashMap::new(),
            method,
            form_id: form_id.into(),
            csrf_token: String::new(),
            render_mode: RenderMode::default(),
            bound: false,
            conventions: Conventions::from(&Settings::default()),
        }
    }

    /// Adopts the field separator, CSRF field name and default messages
    /// from `settings`.
    #[must_use]
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.conventions = Conventions::from(settings);
        self
    }

    #[must_use]
    pub const fn with_render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = mode;
        self
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    /// The intended semantic method, which may differ from the transport
    /// method when a method override is in play.
    pub const fn method(&self) -> &Method {
        &self.method
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name() == name)
    }

    pub const fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    pub fn set_csrf_token(&mut self, token: impl Into<String>) {
        self.csrf_token = token.into();
    }

    pub const fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.render_mode = mode;
    }

    pub(crate) const fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    /// The submitted key for a field: form id, separator, field name.
    pub fn field_key(&self, name: &str) -> String {
        format!("{}{}{name}", self.form_id, self.conventions.separator)
    }

    /// The submitted key carrying the CSRF token.
    pub fn csrf_field_key(&self) -> String {
        self.field_key(&self.conventions.csrf_field_name)
    }

    // ── Construction-time extension ─────────────────────────────────

    /// Appends a field that is not backed by the record.
    ///
    /// Fields can only be added before binding; names must stay unique.
    pub fn add_field(&mut self, descriptor: FieldDescriptor) -> FormResult<()> {
        if self.bound {
            return Err(FormError::Schema(format!(
                "Cannot add field '{}' to bound form '{}'",
                descriptor.name, self.form_id
            )));
        }
        if self.field(&descriptor.name).is_some() {
            return Err(FormError::Schema(format!(
                "Duplicate field name '{}' on form '{}'",
                descriptor.name, self.form_id
            )));
        }
        self.fields.push(Field::new(descriptor));
        Ok(())
    }

    /// Attaches a custom validator to the named field, replacing any
    /// previous one. An unknown name is reported and nothing changes.
    pub fn add_custom_validation<F, E>(&mut self, name: &str, validator: F) -> FormResult<()>
    where
        F: Fn(&str) -> Result<(), E> + Send + Sync + 'static,
        E: ToString,
    {
        let validator: CustomValidator =
            Arc::new(move |value: &str| validator(value).map_err(|e| e.to_string()));
        self.set_custom_validator(name, validator)
    }

    /// Attaches an already shared custom validator.
    pub fn set_custom_validator(&mut self, name: &str, validator: CustomValidator) -> FormResult<()> {
        let form_id = self.form_id.clone();
        let Some(field) = self.field_mut(name) else {
            tracing::warn!(form_id = %form_id, field = name, "Custom validator for unknown field");
            return Err(FormError::UnknownField(name.to_string()));
        };
        field.validator = Some(validator);
        Ok(())
    }

    // ── Pipeline ────────────────────────────────────────────────────

    /// Populates field values from the request's submitted data.
    ///
    /// See [`binder::bind`].
    pub fn bind<S: RequestSource + ?Sized>(&mut self, request: &S) -> FormResult<()> {
        binder::bind(self, request)
    }

    /// Populates field values from already parsed data.
    pub fn bind_data(&mut self, data: &QueryDict) {
        binder::bind_data(self, data);
    }

    pub(crate) fn mark_bound(&mut self) {
        self.bound = true;
    }

    pub(crate) fn fields_mut(&mut self) -> &mut [Field] {
        &mut self.fields
    }

    /// Validates every field. See [`validation::validate`].
    pub fn validate(&mut self) -> FormResult<()> {
        validation::validate(self, None)
    }

    /// Validates only the named fields; the rest keep their errors.
    pub fn validate_fields(&mut self, names: &[&str]) -> FormResult<()> {
        validation::validate(self, Some(names))
    }

    /// Writes every record-backed field's value into `record`.
    ///
    /// Values are coerced to each attribute's type; the first failure is
    /// returned as [`FormError::Coercion`] and later attributes are left
    /// untouched.
    pub fn update_record<R: Record>(&self, record: &mut R) -> FormResult<()> {
        binder::update_record(self, record)
    }

    /// Projects the form according to its render mode.
    pub fn to_output(&self) -> FormOutput {
        projection::to_output(self)
    }

    // ── Errors ──────────────────────────────────────────────────────

    /// Sets an error on the named field outside the rule engine.
    pub fn add_error(&mut self, name: &str, message: impl Into<String>) -> FormResult<()> {
        let message = message.into();
        let field = self
            .field_mut(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        field.error.clone_from(&message);
        self.record_error(name, &message);
        Ok(())
    }

    /// Mirrors one field's error into the form-level map.
    pub(crate) fn record_error(&mut self, name: &str, message: &str) {
        if message.is_empty() {
            self.errors.remove(name);
        } else {
            self.errors.insert(name.to_string(), message.to_string());
        }
    }

    /// The form-level map from field name to error message.
    pub const fn error_map(&self) -> &HashMap<String, String> {
        &self.errors
    }

    /// Current field errors, in field order.
    pub fn errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for field in self.fields.iter().filter(|f| f.has_error()) {
            errors.push(field.name(), field.error());
        }
        errors
    }

    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(Field::has_error)
    }
}
