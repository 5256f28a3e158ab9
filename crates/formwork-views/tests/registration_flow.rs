//! Full request cycles through `FormFlow` for a registration form.

use formwork_core::{FormError, FormResult, Settings};
use formwork_forms::{Form, FormView};
use formwork_http::{Body, FormRequest, FormResponse};
use formwork_macros::Record;
use formwork_views::{FlowOutcome, FormFlow, FormRenderer};
use http::{Method, StatusCode};

#[derive(Debug, Default, Record)]
struct Registration {
    #[form(
        name = "username",
        rules = "required,min=3",
        message = "Username must be at least {} characters"
    )]
    username: String,

    #[form(
        name = "email",
        rules = "required,email",
        message = "Please provide a valid email address"
    )]
    email: String,

    #[form(name = "password", rules = "required", kind = "password")]
    password: String,

    #[form(name = "-")]
    form_id: String,
}

const SPECIAL_CHARS: &str = "!@#$%^&*";

fn password_strength(password: &str) -> Result<(), String> {
    if password.chars().count() < 6 {
        return Err("Password must be at least 6 characters long".to_string());
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err(format!(
            "Password must contain at least one special character ({SPECIAL_CHARS})"
        ));
    }
    Ok(())
}

/// Renders `key=value!error` per field so tests can inspect the document.
struct InlineRenderer;

impl FormRenderer for InlineRenderer {
    fn render(&self, view: &FormView) -> FormResult<String> {
        let mut out = format!("{}={};", view.csrf_key, view.csrf_token);
        for field in &view.fields {
            out.push_str(&format!("{}={}!{};", field.key, field.value, field.error));
        }
        Ok(out)
    }
}

fn registration_form() -> Form {
    let mut form = Form::new(&Registration::default(), Method::POST, "register_form")
        .unwrap()
        .with_settings(&Settings::default());
    form.add_custom_validation("password", password_strength)
        .unwrap();
    form
}

fn flow() -> FormFlow<InlineRenderer> {
    FormFlow::new(Settings::default(), InlineRenderer).unwrap()
}

/// Performs the initial GET and returns the issued token.
fn fetch_token(flow: &FormFlow<InlineRenderer>) -> String {
    let mut form = registration_form();
    let mut response = FormResponse::new();
    let request = FormRequest::builder().build();
    flow.handle(&mut form, &request, &mut response).unwrap();
    response.cookie("csrf_token").unwrap().value.clone()
}

fn submission(token: &str, pairs: &[(&str, &str)]) -> FormRequest {
    let mut all = vec![("register_form_csrf_token", token)];
    all.extend_from_slice(pairs);
    FormRequest::builder()
        .method(Method::POST)
        .cookie("csrf_token", token)
        .form(&all)
        .build()
}

#[test]
fn test_get_then_valid_post() {
    let flow = flow();
    let token = fetch_token(&flow);

    let request = submission(
        &token,
        &[
            ("register_form_username", "alice"),
            ("register_form_email", "alice@example.com"),
            ("register_form_password", "s3cret!"),
        ],
    );
    let mut form = registration_form();
    let mut response = FormResponse::new();
    let outcome = flow.handle(&mut form, &request, &mut response).unwrap();

    assert_eq!(outcome, FlowOutcome::Valid(Method::POST));
    assert_eq!(response.body(), &Body::Empty);

    let mut registration = Registration {
        form_id: "register_form".to_string(),
        ..Registration::default()
    };
    form.update_record(&mut registration).unwrap();
    assert_eq!(registration.username, "alice");
    assert_eq!(registration.form_id, "register_form");
}

#[test]
fn test_post_without_cookie_rejected_before_binding() {
    let request = FormRequest::builder()
        .method(Method::POST)
        .form(&[("register_form_username", "mallory")])
        .build();
    let mut form = registration_form();
    let mut response = FormResponse::new();

    let err = flow().handle(&mut form, &request, &mut response).unwrap_err();
    assert!(matches!(err, FormError::Csrf));
    assert!(!form.is_bound());
    assert!(form.fields().iter().all(|f| f.value().is_empty()));
    assert!(response.cookies().is_empty());
}

#[test]
fn test_invalid_post_rerenders_with_new_token() {
    let flow = flow();
    let token = fetch_token(&flow);

    let request = submission(
        &token,
        &[
            ("register_form_username", "al"),
            ("register_form_email", "al.example.com"),
            ("register_form_password", "weak"),
        ],
    );
    let mut form = registration_form();
    let mut response = FormResponse::new();
    let outcome = flow.handle(&mut form, &request, &mut response).unwrap();
    assert_eq!(outcome, FlowOutcome::Invalid);

    let new_token = response.cookie("csrf_token").unwrap().value.clone();
    assert_ne!(new_token, token);
    assert_eq!(form.csrf_token(), new_token);

    let Body::Document(document) = response.body() else {
        panic!("Expected a rendered document");
    };
    assert!(document.contains("register_form_username=al!Username must be at least 3 characters;"));
    assert!(document.contains("Please provide a valid email address"));
    assert!(document.contains("Password must be at least 6 characters long"));
    assert!(document.starts_with(&format!("register_form_csrf_token={new_token};")));
}

#[test]
fn test_custom_validator_replaces_builtin_rules() {
    let flow = flow();
    let token = fetch_token(&flow);

    let request = submission(
        &token,
        &[
            ("register_form_username", "alice"),
            ("register_form_email", "alice@example.com"),
            ("register_form_password", "longenough"),
        ],
    );
    let mut form = registration_form();
    let mut response = FormResponse::new();
    flow.handle(&mut form, &request, &mut response).unwrap();

    assert_eq!(
        form.field("password").unwrap().error(),
        "Password must contain at least one special character (!@#$%^&*)"
    );
}

#[test]
fn test_ajax_invalid_post_gets_error_payload() {
    let flow = flow();
    let token = fetch_token(&flow);

    let request = FormRequest::builder()
        .method(Method::POST)
        .header("X-Requested-With", "XMLHttpRequest")
        .cookie("csrf_token", &token)
        .form(&[
            ("register_form_csrf_token", token.as_str()),
            ("register_form_username", "bob"),
            ("register_form_email", "bob.example.com"),
            ("register_form_password", "pa$$word"),
        ])
        .build();
    let mut form = registration_form();
    let mut response = FormResponse::new();
    let outcome = flow.handle(&mut form, &request, &mut response).unwrap();

    assert_eq!(outcome, FlowOutcome::Invalid);
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.cookies().is_empty());
    assert_eq!(
        response.body(),
        &Body::Payload(serde_json::json!({
            "errors": {"email": "Please provide a valid email address"}
        }))
    );
}

#[test]
fn test_ajax_get_gets_field_payload() {
    let request = FormRequest::builder()
        .header("X-Requested-With", "XMLHttpRequest")
        .build();
    let mut form = registration_form();
    let mut response = FormResponse::new();
    flow().handle(&mut form, &request, &mut response).unwrap();

    let Body::Payload(payload) = response.body() else {
        panic!("Expected a payload");
    };
    assert_eq!(payload["password"]["kind"], "password");
    assert_eq!(payload["username"]["error"], "");
    assert!(payload.get("form_id").is_none());
}

#[test]
fn test_method_override_to_delete() {
    let flow = flow();
    let token = fetch_token(&flow);

    let request = submission(
        &token,
        &[
            ("_method", "DELETE"),
            ("register_form_username", "alice"),
            ("register_form_email", "alice@example.com"),
            ("register_form_password", "s3cret!"),
        ],
    );
    let mut form = registration_form();
    let mut response = FormResponse::new();
    let outcome = flow.handle(&mut form, &request, &mut response).unwrap();
    assert_eq!(outcome, FlowOutcome::Valid(Method::DELETE));

    flow.respond_success(
        &request,
        formwork_views::success_message(&Method::DELETE).unwrap(),
        &mut response,
    );
    assert_eq!(response.body(), &Body::Document("Record deleted.".to_string()));
}

#[test]
fn test_unparseable_body_is_rejected() {
    let request = FormRequest::builder()
        .method(Method::POST)
        .cookie("csrf_token", "tok")
        .content_type("text/plain")
        .body(b"register_form_csrf_token=tok".to_vec())
        .build();
    let mut form = registration_form();
    let mut response = FormResponse::new();

    // Without parseable data the submitted token cannot be read either.
    let err = flow().handle(&mut form, &request, &mut response).unwrap_err();
    assert!(matches!(err, FormError::Csrf));
    assert!(!form.is_bound());
}

#[test]
fn test_ajax_get_then_ajax_post_with_exposed_token() {
    let flow = flow();

    let get = FormRequest::builder()
        .header("X-Requested-With", "XMLHttpRequest")
        .build();
    let mut form = registration_form();
    let mut response = FormResponse::new();
    flow.handle(&mut form, &get, &mut response).unwrap();

    // The cookie is HttpOnly; the script only sees the header.
    let cookie = response.cookie("csrf_token").unwrap();
    assert!(cookie.httponly);
    let exposed = response.header("X-CSRF-Token").unwrap().to_string();
    assert_eq!(exposed, cookie.value);

    let post = FormRequest::builder()
        .method(Method::POST)
        .header("X-Requested-With", "XMLHttpRequest")
        .header("X-CSRF-Token", &exposed)
        .cookie("csrf_token", &cookie.value)
        .form(&[
            ("register_form_username", "carol"),
            ("register_form_email", "carol@example.com"),
            ("register_form_password", "s3cret!"),
        ])
        .build();
    let mut form = registration_form();
    let mut response = FormResponse::new();
    let outcome = flow.handle(&mut form, &post, &mut response).unwrap();
    assert_eq!(outcome, FlowOutcome::Valid(Method::POST));
}

#[test]
fn test_browser_get_sets_no_token_header() {
    let mut form = registration_form();
    let mut response = FormResponse::new();
    flow()
        .handle(&mut form, &FormRequest::builder().build(), &mut response)
        .unwrap();
    assert!(response.header("X-CSRF-Token").is_none());
}
