//! Tera-backed form rendering.

use formwork_core::{FormError, FormResult};
use formwork_forms::FormView;
use formwork_views::FormRenderer;
use tera::{Context, Tera};

const FORM_TEMPLATE: &str = "form.html";

/// Renders forms with a template set built once at startup.
#[derive(Debug)]
pub struct TeraRenderer {
    tera: Tera,
}

impl TeraRenderer {
    /// Loads the bundled form template.
    pub fn new() -> FormResult<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(FORM_TEMPLATE, include_str!("../templates/form.html"))
            .map_err(|e| FormError::Configuration(format!("Invalid form template: {e}")))?;
        Ok(Self { tera })
    }
}

impl FormRenderer for TeraRenderer {
    fn render(&self, view: &FormView) -> FormResult<String> {
        let context = Context::from_serialize(view)
            .map_err(|e| FormError::Configuration(format!("Form context: {e}")))?;
        self.tera
            .render(FORM_TEMPLATE, &context)
            .map_err(|e| FormError::Configuration(format!("Rendering {FORM_TEMPLATE}: {e}")))
    }
}
