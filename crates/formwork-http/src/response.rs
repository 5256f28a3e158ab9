//! The response side of the form engine's transport seam.
//!
//! [`ResponseSink`] is what the request flow writes into: cookies, extra
//! headers, and either a rendered document or a structured payload with a
//! status code.
//! [`FormResponse`] records those writes and converts them into an
//! `http::Response`.

use http::StatusCode;

use crate::cookies::Cookie;

/// What a handler emits besides cookies.
pub trait ResponseSink {
    /// Adds a cookie to the response.
    fn set_cookie(&mut self, cookie: Cookie);

    /// Sets a response header, replacing any earlier value.
    fn set_header(&mut self, name: &str, value: &str);

    /// Emits a rendered document (typically HTML).
    fn document(&mut self, status: StatusCode, document: String);

    /// Emits a structured, machine-readable payload.
    fn payload(&mut self, status: StatusCode, payload: serde_json::Value);
}

/// The body recorded by a [`FormResponse`].
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Nothing has been emitted yet.
    Empty,
    /// A rendered document.
    Document(String),
    /// A structured payload.
    Payload(serde_json::Value),
}

/// An in-memory response recording everything written through [`ResponseSink`].
///
/// # Examples
///
/// ```
/// use formwork_http::{Body, Cookie, FormResponse, ResponseSink};
/// use http::StatusCode;
///
/// let mut response = FormResponse::new();
/// response.set_cookie(Cookie::new("csrf_token", "abc").httponly(true));
/// response.document(StatusCode::OK, "<form></form>".to_string());
///
/// assert_eq!(response.status(), StatusCode::OK);
/// assert_eq!(response.cookie("csrf_token").unwrap().value, "abc");
/// assert_eq!(response.body(), &Body::Document("<form></form>".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct FormResponse {
    status: StatusCode,
    cookies: Vec<Cookie>,
    headers: Vec<(String, String)>,
    body: Body,
}

impl Default for FormResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl FormResponse {
    /// Creates an empty `200 OK` response.
    pub const fn new() -> Self {
        Self {
            status: StatusCode::OK,
            cookies: Vec::new(),
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    /// Returns the status code.
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns every cookie set on this response, in order.
    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    /// Returns the last cookie set with the given name.
    pub fn cookie(&self, name: &str) -> Option<&Cookie> {
        self.cookies.iter().rev().find(|c| c.name == name)
    }

    /// Returns a header set through [`ResponseSink::set_header`].
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the recorded body.
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Converts the recorded writes into an `http::Response`.
    pub fn into_http(self) -> http::Response<String> {
        let (content_type, text) = match self.body {
            Body::Empty => (None, String::new()),
            Body::Document(doc) => (Some("text/html; charset=utf-8"), doc),
            Body::Payload(value) => (Some("application/json"), value.to_string()),
        };

        let mut response = http::Response::new(text);
        *response.status_mut() = self.status;

        let headers = response.headers_mut();
        if let Some(ct) = content_type {
            headers.insert(
                http::header::CONTENT_TYPE,
                http::HeaderValue::from_static(ct),
            );
        }
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                http::header::HeaderName::from_bytes(name.as_bytes()),
                http::HeaderValue::from_str(value),
            ) {
                headers.insert(name, value);
            }
        }
        for cookie in &self.cookies {
            if let Ok(value) = http::HeaderValue::from_str(&cookie.to_set_cookie_header()) {
                headers.append(http::header::SET_COOKIE, value);
            }
        }

        response
    }
}

impl ResponseSink for FormResponse {
    fn set_cookie(&mut self, cookie: Cookie) {
        self.cookies.push(cookie);
    }

    fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
    }

    fn document(&mut self, status: StatusCode, document: String) {
        self.status = status;
        self.body = Body::Document(document);
    }

    fn payload(&mut self, status: StatusCode, payload: serde_json::Value) {
        self.status = status;
        self.body = Body::Payload(payload);
    }
}
