//! Settings for the form engine.
//!
//! [`Settings`] holds the wire conventions (field key separator, CSRF cookie
//! and field names), cookie attributes, logging configuration, and the
//! generic messages used when a record attribute declares no message of its
//! own. Settings are constructed once at startup and passed explicitly to
//! whatever needs them; there is no process-wide instance.

use serde::{Deserialize, Serialize};

/// Generic error message templates for the built-in rules.
///
/// A `{}` placeholder is replaced with the violated rule's numeric bound
/// (the `N` of `min=N` / `max=N`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageSettings {
    /// Message for a failed `required` rule.
    pub required: String,
    /// Message for a failed `min=N` rule.
    pub min_length: String,
    /// Message for a failed `max=N` rule.
    pub max_length: String,
    /// Message for a failed `email` rule.
    pub email: String,
}

impl Default for MessageSettings {
    fn default() -> Self {
        Self {
            required: "This field is required.".to_string(),
            min_length: "Ensure this value has at least {} characters.".to_string(),
            max_length: "Ensure this value has at most {} characters.".to_string(),
            email: "Enter a valid email address.".to_string(),
        }
    }
}

/// The complete set of form engine settings.
///
/// # Examples
///
/// ```
/// use formwork_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.field_separator, "_");
/// assert_eq!(settings.csrf_cookie_name, "csrf_token");
/// assert_eq!(settings.field_key("signup", "email"), "signup_email");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,

    // ── Wire conventions ─────────────────────────────────────────────

    /// Separator placed between the form ID and a field name in submitted keys.
    pub field_separator: String,
    /// Name of the submitted field that overrides the transport method.
    pub method_override_field: String,

    // ── CSRF ─────────────────────────────────────────────────────────

    /// The name of the CSRF cookie.
    pub csrf_cookie_name: String,
    /// The field name (before form-ID namespacing) carrying the CSRF token.
    pub csrf_field_name: String,
    /// The CSRF cookie path.
    pub csrf_cookie_path: String,
    /// Whether the CSRF cookie is hidden from scripts.
    pub csrf_cookie_httponly: bool,
    /// Whether the CSRF cookie is only sent over HTTPS.
    pub csrf_cookie_secure: bool,
    /// The `SameSite` attribute of the CSRF cookie (`Strict`, `Lax` or `None`).
    pub csrf_cookie_samesite: String,
    /// Header carrying the token to and from script clients.
    pub csrf_header_name: String,

    // ── Messages ─────────────────────────────────────────────────────

    /// Fallback messages for attributes that declare none.
    pub messages: MessageSettings,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level filter (e.g. "info", "formwork_forms=debug").
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,

            field_separator: "_".to_string(),
            method_override_field: "_method".to_string(),

            csrf_cookie_name: "csrf_token".to_string(),
            csrf_field_name: "csrf_token".to_string(),
            csrf_cookie_path: "/".to_string(),
            csrf_cookie_httponly: true,
            csrf_cookie_secure: false,
            csrf_cookie_samesite: "Lax".to_string(),
            csrf_header_name: "X-CSRF-Token".to_string(),

            messages: MessageSettings::default(),

            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Builds the submitted key for `name` within the form `form_id`.
    pub fn field_key(&self, form_id: &str, name: &str) -> String {
        format!("{form_id}{}{name}", self.field_separator)
    }

    /// Builds the submitted key carrying the CSRF token for `form_id`.
    pub fn csrf_field_key(&self, form_id: &str) -> String {
        self.field_key(form_id, &self.csrf_field_name)
    }
}
