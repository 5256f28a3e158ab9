//! The request side of the form engine's transport seam.
//!
//! [`RequestSource`] is everything the binder and the CSRF service need to
//! know about an inbound request. [`FormRequest`] is an in-memory
//! implementation that parses URL-encoded bodies up front and remembers a
//! parse failure instead of discarding it, so binding can report it.

use std::collections::HashMap;

use formwork_core::{FormError, FormResult};
use http::{HeaderMap, Method};

use crate::cookies;
use crate::querydict::QueryDict;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// The narrow view of an inbound request the form engine depends on.
pub trait RequestSource {
    /// The transport-level HTTP method.
    fn method(&self) -> &Method;

    /// The parsed submitted key/value data, or a [`FormError::Bind`] if the
    /// transport could not parse it.
    fn form_data(&self) -> FormResult<&QueryDict>;

    /// Reads a named cookie.
    fn cookie(&self, name: &str) -> Option<&str>;

    /// Reads a request header. Sources without headers return `None`.
    fn header(&self, _name: &str) -> Option<&str> {
        None
    }

    /// Returns `true` if the request was made by a script expecting a payload.
    fn is_ajax(&self) -> bool {
        self.header("x-requested-with") == Some("XMLHttpRequest")
    }
}

/// An in-memory inbound request.
///
/// # Examples
///
/// ```
/// use formwork_http::{FormRequest, RequestSource};
///
/// let request = FormRequest::builder()
///     .method(http::Method::POST)
///     .form(&[("signup_username", "alice")])
///     .cookie("csrf_token", "t0k3n")
///     .build();
///
/// assert_eq!(request.form_data().unwrap().get("signup_username"), Some("alice"));
/// assert_eq!(request.cookie("csrf_token"), Some("t0k3n"));
/// ```
#[derive(Debug)]
pub struct FormRequest {
    method: Method,
    headers: HeaderMap,
    cookies: HashMap<String, String>,
    data: Result<QueryDict, String>,
}

impl FormRequest {
    /// Creates a new [`FormRequestBuilder`].
    pub fn builder() -> FormRequestBuilder {
        FormRequestBuilder::default()
    }

    /// Creates a `FormRequest` from `http` request parts and the collected body.
    ///
    /// This is the entry point for axum/hyper handlers.
    pub fn from_parts(parts: &http::request::Parts, body: &[u8]) -> Self {
        let query = parts.uri.query().unwrap_or("");
        let content_type = parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());
        let cookies = parts
            .headers
            .get(http::header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .map_or_else(HashMap::new, cookies::parse_cookie_header);

        Self {
            data: parse_submission(&parts.method, query, content_type, body),
            method: parts.method.clone(),
            headers: parts.headers.clone(),
            cookies,
        }
    }
}

impl RequestSource for FormRequest {
    fn method(&self) -> &Method {
        &self.method
    }

    fn form_data(&self) -> FormResult<&QueryDict> {
        self.data
            .as_ref()
            .map_err(|reason| FormError::Bind(reason.clone()))
    }

    fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Parses the submitted data for a request.
///
/// Safe methods submit through the query string. Other methods submit a
/// URL-encoded body; a body in any other format, or one that is not UTF-8,
/// is a parse failure.
fn parse_submission(
    method: &Method,
    query: &str,
    content_type: Option<&str>,
    body: &[u8],
) -> Result<QueryDict, String> {
    if matches!(*method, Method::GET | Method::HEAD) {
        return Ok(QueryDict::parse(query));
    }

    if body.is_empty() {
        return Ok(QueryDict::new());
    }

    match content_type {
        Some(ct) if ct.starts_with(FORM_URLENCODED) => std::str::from_utf8(body)
            .map(QueryDict::parse)
            .map_err(|e| format!("Request body is not valid UTF-8: {e}")),
        Some(ct) => Err(format!("Unsupported content type '{ct}'")),
        None => Err("Request body has no content type".to_string()),
    }
}

/// Builder for [`FormRequest`] instances.
#[derive(Debug)]
pub struct FormRequestBuilder {
    method: Method,
    query_string: String,
    content_type: Option<String>,
    headers: HeaderMap,
    cookies: HashMap<String, String>,
    body: Vec<u8>,
}

impl Default for FormRequestBuilder {
    fn default() -> Self {
        Self {
            method: Method::GET,
            query_string: String::new(),
            content_type: None,
            headers: HeaderMap::new(),
            cookies: HashMap::new(),
            body: Vec::new(),
        }
    }
}

impl FormRequestBuilder {
    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the query string (without leading `?`).
    #[must_use]
    pub fn query_string(mut self, qs: &str) -> Self {
        self.query_string = qs.to_string();
        self
    }

    /// Sets the content type.
    #[must_use]
    pub fn content_type(mut self, ct: &str) -> Self {
        self.content_type = Some(ct.to_string());
        self
    }

    /// Adds a header. Invalid names or values are ignored.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            http::header::HeaderName::from_bytes(name.as_bytes()),
            http::header::HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Adds a cookie.
    #[must_use]
    pub fn cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.insert(name.to_string(), value.to_string());
        self
    }

    /// Sets the raw request body.
    #[must_use]
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Sets a URL-encoded body built from `pairs`.
    #[must_use]
    pub fn form(mut self, pairs: &[(&str, &str)]) -> Self {
        let qd: QueryDict = pairs.iter().copied().collect();
        self.body = qd.urlencode().into_bytes();
        self.content_type = Some(FORM_URLENCODED.to_string());
        self
    }

    /// Builds the [`FormRequest`].
    pub fn build(self) -> FormRequest {
        let data = parse_submission(
            &self.method,
            &self.query_string,
            self.content_type.as_deref(),
            &self.body,
        );
        FormRequest {
            method: self.method,
            headers: self.headers,
            cookies: self.cookies,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request_is_get() {
        let request = FormRequest::builder().build();
        assert_eq!(request.method(), &Method::GET);
        assert!(request.form_data().unwrap().is_empty());
    }

    #[test]
    fn test_get_reads_query_string() {
        let request = FormRequest::builder().query_string("f_q=rust").build();
        assert_eq!(request.form_data().unwrap().get("f_q"), Some("rust"));
    }

    #[test]
    fn test_post_form_body() {
        let request = FormRequest::builder()
            .method(Method::POST)
            .form(&[("f_username", "alice smith"), ("f_email", "a@b.com")])
            .build();
        let data = request.form_data().unwrap();
        assert_eq!(data.get("f_username"), Some("alice smith"));
        assert_eq!(data.get("f_email"), Some("a@b.com"));
    }

    #[test]
    fn test_post_ignores_query_string() {
        let request = FormRequest::builder()
            .method(Method::POST)
            .query_string("f_username=from_query")
            .form(&[("f_email", "a@b.com")])
            .build();
        assert_eq!(request.form_data().unwrap().get("f_username"), None);
    }

    #[test]
    fn test_invalid_utf8_body_is_parse_failure() {
        let request = FormRequest::builder()
            .method(Method::POST)
            .content_type(FORM_URLENCODED)
            .body(vec![0xff, 0xfe, 0x3d])
            .build();
        assert!(matches!(request.form_data(), Err(FormError::Bind(_))));
    }

    #[test]
    fn test_unsupported_content_type_is_parse_failure() {
        let request = FormRequest::builder()
            .method(Method::POST)
            .content_type("application/json")
            .body(b"{}".to_vec())
            .build();
        let err = request.form_data().unwrap_err();
        assert!(err.to_string().contains("application/json"));
    }

    #[test]
    fn test_empty_post_body_is_empty_data() {
        let request = FormRequest::builder().method(Method::POST).build();
        assert!(request.form_data().unwrap().is_empty());
    }

    #[test]
    fn test_cookie_lookup() {
        let request = FormRequest::builder().cookie("csrf_token", "abc").build();
        assert_eq!(request.cookie("csrf_token"), Some("abc"));
        assert_eq!(request.cookie("missing"), None);
    }

    #[test]
    fn test_is_ajax() {
        let plain = FormRequest::builder().build();
        assert!(!plain.is_ajax());

        let ajax = FormRequest::builder()
            .header("X-Requested-With", "XMLHttpRequest")
            .build();
        assert!(ajax.is_ajax());
    }

    #[test]
    fn test_from_parts() {
        let request = http::Request::builder()
            .method(Method::POST)
            .uri("/register")
            .header(http::header::CONTENT_TYPE, FORM_URLENCODED)
            .header(http::header::COOKIE, "csrf_token=abc; other=1")
            .body(())
            .unwrap();
        let (parts, ()) = request.into_parts();

        let form_request = FormRequest::from_parts(&parts, b"f_username=bob");
        assert_eq!(form_request.method(), &Method::POST);
        assert_eq!(form_request.cookie("csrf_token"), Some("abc"));
        assert_eq!(
            form_request.form_data().unwrap().get("f_username"),
            Some("bob")
        );
    }
}
