//! The document rendering seam.
//!
//! The engine never holds a global template set. A renderer value is built
//! once by the application (e.g. around a `tera::Tera`) and handed to
//! [`FormFlow`](crate::FormFlow).

use formwork_core::FormResult;
use formwork_forms::FormView;

/// Renders a form's template context into a document.
pub trait FormRenderer: Send + Sync {
    /// Renders `view`. Failures are reported as server errors.
    fn render(&self, view: &FormView) -> FormResult<String>;
}

impl<T: FormRenderer + ?Sized> FormRenderer for &T {
    fn render(&self, view: &FormView) -> FormResult<String> {
        (**self).render(view)
    }
}

impl<T: FormRenderer + ?Sized> FormRenderer for std::sync::Arc<T> {
    fn render(&self, view: &FormView) -> FormResult<String> {
        (**self).render(view)
    }
}
