//! # register-demo
//!
//! A registration page wired through formwork:
//!
//! - **Record**: `Registration` with declared rules and a custom password policy
//! - **Rendering**: a tera template injected through `TeraRenderer`
//! - **Transport**: axum, adapted through `FormRequest`/`FormResponse`
//!
//! ## Running
//!
//! ```bash
//! cargo run --package register-demo
//! ```
//!
//! Settings are read from `formwork.toml` when present, then overridden by
//! `FORMWORK_*` environment variables.

pub mod app;
pub mod record;
pub mod renderer;

pub use app::{router, AppState, FORM_ID};
