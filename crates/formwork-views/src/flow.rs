//! Per-request form handling.
//!
//! [`FormFlow::handle`] runs one request against one form:
//!
//! 1. Safe method: issue a token, project the form, respond `200`. Payload
//!    responses also carry the token in the CSRF header, since scripts
//!    cannot read the `HttpOnly` cookie.
//! 2. Mutating method (after method override): verify CSRF, bind, validate.
//! 3. Invalid submission: scripts get `400` with `{"errors": {...}}`;
//!    browsers get the form re-rendered with entered values and a fresh
//!    token.
//! 4. Valid submission: nothing is written; the caller acts on the outcome
//!    and typically answers with [`FormFlow::respond_success`].
//!
//! Hard failures (`Csrf`, `Bind`, `TokenGeneration`, rendering) are returned
//! as errors before anything is written for the failing step; use
//! [`FormFlow::respond_error`] to turn them into a response.

use formwork_core::logging::request_span;
use formwork_core::{FormError, FormResult, Settings};
use formwork_csrf::{is_safe_method, CsrfService};
use formwork_forms::projection::{error_payload, FormOutput};
use formwork_forms::{Form, RenderMode};
use formwork_http::{RequestSource, ResponseSink};
use http::{Method, StatusCode};

use crate::method::effective_method;
use crate::renderer::FormRenderer;

/// What [`FormFlow::handle`] did with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// A safe request; the form was rendered with a fresh token.
    Displayed,
    /// A submission failed validation and the form was sent back.
    Invalid,
    /// A submission passed validation. Carries the effective method.
    Valid(Method),
}

/// Orchestrates CSRF, binding, validation and projection for one form type.
#[derive(Debug, Clone)]
pub struct FormFlow<R> {
    settings: Settings,
    csrf: CsrfService,
    renderer: R,
}

impl<R: FormRenderer> FormFlow<R> {
    /// Builds a flow from settings and a renderer.
    pub fn new(settings: Settings, renderer: R) -> FormResult<Self> {
        let csrf = CsrfService::from_settings(&settings)?;
        Ok(Self {
            settings,
            csrf,
            renderer,
        })
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    pub const fn csrf(&self) -> &CsrfService {
        &self.csrf
    }

    /// Handles one request for `form`.
    ///
    /// `form` should be freshly built for this request (see
    /// [`Form::with_settings`]); its render mode is switched to payload when
    /// the request comes from a script.
    pub fn handle<Q, S>(&self, form: &mut Form, request: &Q, sink: &mut S) -> FormResult<FlowOutcome>
    where
        Q: RequestSource + ?Sized,
        S: ResponseSink + ?Sized,
    {
        let method = effective_method(request, &self.settings);
        let span = request_span(form.form_id(), method.as_str());
        let _guard = span.enter();

        if request.is_ajax() {
            form.set_render_mode(RenderMode::Payload);
        }

        if is_safe_method(&method) {
            self.csrf.issue(form, sink)?;
            self.emit(form, StatusCode::OK, sink)?;
            return Ok(FlowOutcome::Displayed);
        }

        self.csrf.verify(request, form)?;
        form.bind(request)?;

        match form.validate() {
            Ok(()) => {
                tracing::info!("Form submission accepted");
                Ok(FlowOutcome::Valid(method))
            }
            Err(FormError::Validation(errors)) => {
                tracing::debug!(errors = %errors, "Form submission rejected");
                if request.is_ajax() {
                    sink.payload(StatusCode::BAD_REQUEST, error_payload(form));
                } else {
                    self.csrf.issue(form, sink)?;
                    self.emit(form, StatusCode::OK, sink)?;
                }
                Ok(FlowOutcome::Invalid)
            }
            Err(other) => Err(other),
        }
    }

    /// Projects `form` and writes it with `status`.
    ///
    /// Payload projections carry no token field, so the current token is
    /// exposed through the CSRF header instead.
    pub fn emit<S: ResponseSink + ?Sized>(
        &self,
        form: &Form,
        status: StatusCode,
        sink: &mut S,
    ) -> FormResult<()> {
        match form.to_output() {
            FormOutput::View(view) => {
                let document = self.renderer.render(&view)?;
                sink.document(status, document);
            }
            output @ FormOutput::Payload(_) => {
                self.csrf.expose(form, sink);
                sink.payload(status, output.to_json());
            }
        }
        Ok(())
    }

    /// Writes the success response for an accepted submission.
    pub fn respond_success<Q, S>(&self, request: &Q, message: &str, sink: &mut S)
    where
        Q: RequestSource + ?Sized,
        S: ResponseSink + ?Sized,
    {
        if request.is_ajax() {
            sink.payload(StatusCode::OK, serde_json::json!({ "message": message }));
        } else {
            sink.document(StatusCode::OK, message.to_string());
        }
    }

    /// Writes the response for a hard failure returned by [`handle`](Self::handle).
    ///
    /// Server-side failures are logged at `error` and answered without
    /// detail.
    pub fn respond_error<Q, S>(&self, request: &Q, error: &FormError, sink: &mut S)
    where
        Q: RequestSource + ?Sized,
        S: ResponseSink + ?Sized,
    {
        let status =
            StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = if error.is_fatal() {
            tracing::error!(error = %error, "Form request failed");
            "Internal server error".to_string()
        } else {
            error.to_string()
        };

        if request.is_ajax() {
            sink.payload(status, serde_json::json!({ "error": message }));
        } else {
            sink.document(status, message);
        }
    }
}

/// The default confirmation text for an accepted submission.
pub fn success_message(method: &Method) -> Option<&'static str> {
    match *method {
        Method::POST => Some("Submission received."),
        Method::PUT | Method::PATCH => Some("Record updated."),
        Method::DELETE => Some("Record deleted."),
        _ => None,
    }
}
