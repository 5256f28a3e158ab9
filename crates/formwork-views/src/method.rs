//! Effective method resolution.
//!
//! HTML forms can only submit `GET` and `POST`. A `POST` may carry an
//! override field (`_method` by default) naming `PUT`, `PATCH` or `DELETE`;
//! the named verb then drives CSRF gating and the success response.

use formwork_core::Settings;
use formwork_http::RequestSource;
use http::Method;

/// Returns the method a request intends.
///
/// Only a transport `POST` can be overridden, and only to `PUT`, `PATCH` or
/// `DELETE` (case-insensitive). Anything else is ignored.
pub fn effective_method<R: RequestSource + ?Sized>(request: &R, settings: &Settings) -> Method {
    let transport = request.method().clone();
    if transport != Method::POST {
        return transport;
    }

    let Ok(data) = request.form_data() else {
        return transport;
    };

    match data
        .get(&settings.method_override_field)
        .map(str::to_ascii_uppercase)
        .as_deref()
    {
        Some("PUT") => Method::PUT,
        Some("PATCH") => Method::PATCH,
        Some("DELETE") => Method::DELETE,
        Some(other) => {
            tracing::debug!(method_override = other, "Ignoring method override");
            transport
        }
        None => transport,
    }
}

#[cfg(test)]
mod tests {
    use formwork_http::FormRequest;

    use super::*;

    fn post(pairs: &[(&str, &str)]) -> FormRequest {
        FormRequest::builder()
            .method(Method::POST)
            .form(pairs)
            .build()
    }

    #[test]
    fn test_plain_post() {
        let settings = Settings::default();
        assert_eq!(effective_method(&post(&[]), &settings), Method::POST);
    }

    #[test]
    fn test_override() {
        let settings = Settings::default();
        assert_eq!(
            effective_method(&post(&[("_method", "put")]), &settings),
            Method::PUT
        );
        assert_eq!(
            effective_method(&post(&[("_method", "DELETE")]), &settings),
            Method::DELETE
        );
        assert_eq!(
            effective_method(&post(&[("_method", "PATCH")]), &settings),
            Method::PATCH
        );
    }

    #[test]
    fn test_override_cannot_downgrade() {
        let settings = Settings::default();
        assert_eq!(
            effective_method(&post(&[("_method", "GET")]), &settings),
            Method::POST
        );
    }

    #[test]
    fn test_get_is_not_overridden() {
        let settings = Settings::default();
        let request = FormRequest::builder().query_string("_method=DELETE").build();
        assert_eq!(effective_method(&request, &settings), Method::GET);
    }

    #[test]
    fn test_custom_override_field() {
        let settings = Settings {
            method_override_field: "x_verb".to_string(),
            ..Settings::default()
        };
        assert_eq!(
            effective_method(&post(&[("x_verb", "put")]), &settings),
            Method::PUT
        );
    }
}
