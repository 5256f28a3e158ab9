//! Issuing and verifying double-submit tokens.
//!
//! ## How it works
//!
//! 1. When a form is rendered, a fresh token is placed both in a cookie and
//!    in the form, where it is rendered into a hidden input keyed
//!    `form_id + separator + csrf_field_name`.
//!    Script clients cannot read an `HttpOnly` cookie, so payload responses
//!    also carry the token in a header (`X-CSRF-Token` by default).
//! 2. When a mutating request arrives, the cookie value and the submitted
//!    value must both be present and equal, otherwise the request is rejected
//!    before any binding or validation happens. The submitted value is read
//!    from the form field, or from the token header when the field is absent.
//!
//! No server-side state is kept; tokens rotate on every issuance.

use formwork_core::{FormError, FormResult, Settings};
use formwork_forms::Form;
use formwork_http::{Cookie, RequestSource, ResponseSink, SameSite};

use crate::token::{compare_token, generate_token};

/// Returns `true` if the method does not modify state.
pub const fn is_safe_method(method: &http::Method) -> bool {
    matches!(
        *method,
        http::Method::GET | http::Method::HEAD | http::Method::OPTIONS | http::Method::TRACE
    )
}

/// Issues and verifies CSRF tokens according to the cookie settings.
#[derive(Debug, Clone)]
pub struct CsrfService {
    /// Name of the CSRF cookie.
    pub cookie_name: String,
    /// Path attribute of the CSRF cookie.
    pub cookie_path: String,
    /// Whether the CSRF cookie uses the `Secure` flag.
    pub cookie_secure: bool,
    /// Whether the CSRF cookie uses the `HttpOnly` flag.
    pub cookie_httponly: bool,
    /// `SameSite` attribute of the CSRF cookie.
    pub cookie_samesite: Option<SameSite>,
    /// Header exposing and accepting the token for script clients.
    pub header_name: String,
}

impl Default for CsrfService {
    fn default() -> Self {
        Self {
            cookie_name: "csrf_token".to_string(),
            cookie_path: "/".to_string(),
            cookie_secure: false,
            cookie_httponly: true,
            cookie_samesite: Some(SameSite::Lax),
            header_name: "X-CSRF-Token".to_string(),
        }
    }
}

impl CsrfService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a service from settings.
    ///
    /// An empty `csrf_cookie_samesite` omits the attribute; an unrecognised
    /// value is a configuration error.
    pub fn from_settings(settings: &Settings) -> FormResult<Self> {
        let cookie_samesite = if settings.csrf_cookie_samesite.is_empty() {
            None
        } else {
            Some(settings.csrf_cookie_samesite.parse()?)
        };

        Ok(Self {
            cookie_name: settings.csrf_cookie_name.clone(),
            cookie_path: settings.csrf_cookie_path.clone(),
            cookie_secure: settings.csrf_cookie_secure,
            cookie_httponly: settings.csrf_cookie_httponly,
            cookie_samesite,
            header_name: settings.csrf_header_name.clone(),
        })
    }

    /// Builds the cookie carrying `token`.
    pub fn build_cookie(&self, token: &str) -> Cookie {
        let cookie = Cookie::new(&self.cookie_name, token)
            .path(&self.cookie_path)
            .secure(self.cookie_secure)
            .httponly(self.cookie_httponly);
        match self.cookie_samesite {
            Some(samesite) => cookie.samesite(samesite),
            None => cookie,
        }
    }

    /// Generates a fresh token, sets it as a cookie on `sink` and stores it
    /// in `form`.
    ///
    /// On [`FormError::TokenGeneration`] neither the sink nor the form is
    /// touched and the request must be aborted.
    pub fn issue<S: ResponseSink + ?Sized>(&self, form: &mut Form, sink: &mut S) -> FormResult<()> {
        let token = generate_token()?;
        sink.set_cookie(self.build_cookie(&token));
        form.set_csrf_token(token);
        tracing::debug!(form_id = form.form_id(), "Issued CSRF token");
        Ok(())
    }

    /// Copies `form`'s current token into the token header.
    pub fn expose<S: ResponseSink + ?Sized>(&self, form: &Form, sink: &mut S) {
        if !form.csrf_token().is_empty() {
            sink.set_header(&self.header_name, form.csrf_token());
        }
    }

    /// Checks that the request's cookie token equals the token submitted
    /// under `form`'s CSRF key.
    ///
    /// Missing halves and mismatches are all reported as the same
    /// [`FormError::Csrf`].
    pub fn verify<R: RequestSource + ?Sized>(&self, request: &R, form: &Form) -> FormResult<()> {
        let cookie = request.cookie(&self.cookie_name);
        let key = form.csrf_field_key();
        let submitted = request
            .form_data()
            .ok()
            .and_then(|data| data.get(&key))
            .or_else(|| request.header(&self.header_name));

        if compare_token(cookie, submitted) {
            Ok(())
        } else {
            tracing::warn!(form_id = form.form_id(), "CSRF verification failed");
            Err(FormError::Csrf)
        }
    }
}
