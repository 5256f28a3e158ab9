//! # formwork-http
//!
//! The narrow request/response surface the form engine depends on.
//!
//! The binder and the CSRF service only need parsed submitted data and a
//! way to read a named cookie ([`RequestSource`]); the request flow only
//! needs a way to set a cookie and emit a document or payload with a status
//! ([`ResponseSink`]). [`FormRequest`] and [`FormResponse`] are in-memory
//! implementations built on the `http` crate, usable directly from any
//! framework that exposes `http::request::Parts`.

pub mod cookies;
pub mod querydict;
pub mod request;
pub mod response;

pub use cookies::{Cookie, SameSite};
pub use querydict::QueryDict;
pub use request::{FormRequest, FormRequestBuilder, RequestSource};
pub use response::{Body, FormResponse, ResponseSink};
