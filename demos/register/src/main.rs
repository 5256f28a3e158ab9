use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use formwork_core::logging::setup_logging;
use formwork_core::settings_loader;
use formwork_core::Settings;
use register_demo::{router, AppState};

const SETTINGS_FILE: &str = "formwork.toml";

fn load_settings() -> anyhow::Result<Settings> {
    if Path::new(SETTINGS_FILE).exists() {
        settings_loader::from_toml_file_with_env(SETTINGS_FILE)
            .with_context(|| format!("Loading {SETTINGS_FILE}"))
    } else {
        Ok(settings_loader::from_env())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = load_settings()?;
    setup_logging(&settings);

    let state = Arc::new(AppState::new(settings).context("Building application state")?);
    let app = router(state);

    let addr = std::env::var("REGISTER_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Binding {addr}"))?;
    tracing::info!(%addr, "Serving /register");

    axum::serve(listener, app).await?;
    Ok(())
}
