//! Integration tests for the double-submit round trip.

use formwork_core::FormError;
use formwork_csrf::CsrfService;
use formwork_forms::Form;
use formwork_http::{FormRequest, FormResponse};
use formwork_macros::Record;
use http::Method;

#[derive(Debug, Default, Record)]
struct Feedback {
    #[form(name = "comment", rules = "required")]
    comment: String,
}

#[test]
fn test_issued_token_verifies_on_submission() {
    let service = CsrfService::new();

    // Render.
    let mut rendered = Form::new(&Feedback::default(), Method::POST, "fb").unwrap();
    let mut response = FormResponse::new();
    service.issue(&mut rendered, &mut response).unwrap();
    let cookie = response.cookie("csrf_token").unwrap().clone();
    let key = rendered.csrf_field_key();

    // Submit what the browser would send back.
    let request = FormRequest::builder()
        .method(Method::POST)
        .cookie(&cookie.name, &cookie.value)
        .form(&[(key.as_str(), rendered.csrf_token()), ("fb_comment", "nice")])
        .build();

    let submitted = Form::new(&Feedback::default(), Method::POST, "fb").unwrap();
    service.verify(&request, &submitted).unwrap();
}

#[test]
fn test_post_without_prior_get_is_rejected_before_binding() {
    let service = CsrfService::new();
    let request = FormRequest::builder()
        .method(Method::POST)
        .form(&[("fb_comment", "sneaky")])
        .build();

    let form = Form::new(&Feedback::default(), Method::POST, "fb").unwrap();
    let result = service.verify(&request, &form);
    assert!(matches!(result, Err(FormError::Csrf)));
    assert_eq!(form.field("comment").unwrap().value(), "");
    assert!(!form.is_bound());
}

#[test]
fn test_token_from_another_form_is_rejected() {
    let service = CsrfService::new();
    let request = FormRequest::builder()
        .method(Method::POST)
        .cookie("csrf_token", "tok")
        .form(&[("other_csrf_token", "tok")])
        .build();
    let form = Form::new(&Feedback::default(), Method::POST, "fb").unwrap();
    assert!(service.verify(&request, &form).is_err());
}
