//! Form fields.

use std::fmt;
use std::sync::Arc;

use crate::schema::{FieldDescriptor, FieldKind};

/// A caller-supplied check run before a field's built-in rules.
///
/// Returns `Err(message)` to fail the field with that message.
pub type CustomValidator = Arc<dyn Fn(&str) -> Result<(), String> + Send + Sync>;

/// One input of a [`Form`](crate::Form).
///
/// Values are always strings: binding copies submitted text verbatim and
/// coercion only happens on write-back to the record.
#[derive(Clone)]
pub struct Field {
    descriptor: Arc<FieldDescriptor>,
    pub(crate) value: String,
    pub(crate) error: String,
    pub(crate) validator: Option<CustomValidator>,
}

impl Field {
    /// Creates an unbound field with an empty value and no error.
    pub fn new(descriptor: FieldDescriptor) -> Self {
        Self::from_shared(Arc::new(descriptor))
    }

    pub(crate) fn from_shared(descriptor: Arc<FieldDescriptor>) -> Self {
        Self {
            descriptor,
            value: String::new(),
            error: String::new(),
            validator: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn kind(&self) -> FieldKind {
        self.descriptor.kind
    }

    /// `true` when the field renders as a hidden input.
    pub fn is_hidden(&self) -> bool {
        self.descriptor.hidden_by_default
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Overrides the current value, e.g. to pre-fill an unbound form.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// The current error; empty when the field is valid.
    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }

    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    /// The descriptor handle, shared with the schema the field came from.
    pub const fn shared_descriptor(&self) -> &Arc<FieldDescriptor> {
        &self.descriptor
    }

    pub fn has_custom_validator(&self) -> bool {
        self.validator.is_some()
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.descriptor.name)
            .field("kind", &self.descriptor.kind)
            .field("value", &self.value)
            .field("error", &self.error)
            .field("custom_validator", &self.validator.is_some())
            .finish()
    }
}
