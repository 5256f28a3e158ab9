//! Logging integration for formwork.
//!
//! The engine only emits [`tracing`] events. Applications that do not install
//! their own subscriber can call [`setup_logging`] once at startup; every
//! request handled by the engine runs inside a [`request_span`].

use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

/// Target under which engine events are emitted.
pub const LOG_TARGET: &str = "formwork";

/// Installs a global tracing subscriber configured from `settings`.
///
/// `RUST_LOG` wins over `settings.log_level`; an unparseable directive falls
/// back to `info`. Debug mode selects human-readable output, otherwise one
/// JSON object per event is written. Returns `false` when a subscriber was
/// already installed.
pub fn setup_logging(settings: &Settings) -> bool {
    let filter = build_filter(settings);

    let installed = if settings.debug {
        fmt()
            .with_env_filter(filter)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
    } else {
        fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(true)
            .try_init()
    };
    installed.is_ok()
}

fn build_filter(settings: &Settings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Creates the span for handling one request against one form.
///
/// # Examples
///
/// ```
/// use formwork_core::logging::request_span;
///
/// let span = request_span("register_form", "POST");
/// let _guard = span.enter();
/// tracing::info!("handling submission");
/// ```
pub fn request_span(form_id: &str, method: &str) -> tracing::Span {
    tracing::info_span!(target: LOG_TARGET, "form_request", form_id = form_id, method = method)
}
