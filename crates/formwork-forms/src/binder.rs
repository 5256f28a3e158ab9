//! Request binding and record write-back.

use formwork_core::FormResult;
use formwork_http::{QueryDict, RequestSource};

use crate::form::Form;
use crate::record::Record;
use crate::schema::ScalarCategory;

/// Populates every field's value from the request's submitted data.
///
/// Each field reads the key `form_id + separator + name`; an absent key
/// binds the empty string. Values are copied verbatim, with no trimming or
/// coercion.
///
/// If the submitted data cannot be parsed the error is returned and the
/// form is left exactly as it was. Binding twice with the same data yields
/// the same values.
pub fn bind<S: RequestSource + ?Sized>(form: &mut Form, request: &S) -> FormResult<()> {
    let data = request.form_data().map_err(|e| {
        tracing::warn!(form_id = form.form_id(), error = %e, "Could not parse submitted form data");
        e
    })?;
    bind_data(form, data);
    Ok(())
}

/// Populates every field's value from already parsed data.
pub fn bind_data(form: &mut Form, data: &QueryDict) {
    let keys: Vec<String> = form.fields().iter().map(|f| form.field_key(f.name())).collect();

    for (field, key) in form.fields_mut().iter_mut().zip(keys) {
        field.value = data.get(&key).unwrap_or_default().to_string();
    }
    form.mark_bound();

    tracing::debug!(form_id = form.form_id(), fields = form.fields().len(), "Bound form");
}

/// Copies record-backed field values into `record`, coercing each to the
/// attribute's type.
///
/// Attributes of a non-scalar type are shown as text but never written back.
pub fn update_record<R: Record>(form: &Form, record: &mut R) -> FormResult<()> {
    for field in form.fields() {
        let descriptor = field.descriptor();
        let Some(attribute) = descriptor.attribute.as_deref() else {
            continue;
        };
        if descriptor.category == ScalarCategory::Other {
            tracing::debug!(attribute, "Leaving non-scalar attribute unchanged");
            continue;
        }
        record.assign(attribute, field.value())?;
    }
    Ok(())
}
