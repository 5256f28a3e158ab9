//! The axum application: one `/register` route driven by `FormFlow`.

use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use formwork_core::{FormResult, Settings};
use formwork_forms::Form;
use formwork_http::{FormRequest, FormResponse, RequestSource, ResponseSink};
use formwork_views::{success_message, FlowOutcome, FormFlow};
use http::{Method, StatusCode};

use crate::record::{password_strength, Registration};
use crate::renderer::TeraRenderer;

/// The form id namespacing every submitted key of the registration form.
pub const FORM_ID: &str = "register_form";

/// Largest accepted request body.
const BODY_LIMIT: usize = 64 * 1024;

/// Shared, read-mostly application state.
pub struct AppState {
    flow: FormFlow<TeraRenderer>,
    registrations: Mutex<Vec<Registration>>,
}

impl AppState {
    pub fn new(settings: Settings) -> FormResult<Self> {
        Ok(Self {
            flow: FormFlow::new(settings, TeraRenderer::new()?)?,
            registrations: Mutex::new(Vec::new()),
        })
    }

    /// Number of accepted registrations.
    pub fn registration_count(&self) -> usize {
        self.registrations.lock().map_or(0, |r| r.len())
    }

    fn registration_form(&self) -> FormResult<Form> {
        let mut form = Form::for_record::<Registration>(Method::POST, FORM_ID)?
            .with_settings(self.flow.settings());
        form.add_custom_validation("password", password_strength)?;
        Ok(form)
    }

    fn handle(&self, request: &FormRequest, response: &mut FormResponse) -> FormResult<()> {
        let mut form = self.registration_form()?;

        let FlowOutcome::Valid(method) = self.flow.handle(&mut form, request, response)? else {
            return Ok(());
        };

        match (method.clone(), success_message(&method)) {
            (Method::POST, Some(message)) => {
                let mut registration = Registration::default();
                form.update_record(&mut registration)?;
                self.store(registration);
                self.flow.respond_success(request, message, response);
            }
            (_, Some(message)) => self.flow.respond_success(request, message, response),
            (_, None) => {
                response.document(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string());
            }
        }
        Ok(())
    }

    fn store(&self, mut registration: Registration) {
        let Ok(mut registrations) = self.registrations.lock() else {
            tracing::error!("Registration store is poisoned");
            return;
        };
        registration.id = registrations.len() as u64 + 1;
        tracing::info!(id = registration.id, username = %registration.username, "Registered user");
        registrations.push(registration);
    }
}

/// Builds the router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", get(register).post(register))
        .with_state(state)
}

async fn register(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let Ok(body) = to_bytes(body, BODY_LIMIT).await else {
        return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
    };

    let request = FormRequest::from_parts(&parts, &body);
    let mut response = FormResponse::new();

    if let Err(error) = state.handle(&request, &mut response) {
        tracing::debug!(error = %error, ajax = request.is_ajax(), "Registration request failed");
        response = FormResponse::new();
        state.flow.respond_error(&request, &error, &mut response);
    }

    response.into_http().into_response()
}
