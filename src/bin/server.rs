//! terracrew HTTP server binary.
//!
//! # Environment Variables
//!
//! - `PORT` — HTTP port (default: 8000)
//! - `OPENAI_API_KEY` — provider credential; runs report a structured error
//!   when absent
//! - `OPENAI_MODEL` — model name (default: "gpt-4")
//! - `TERRAFORM_WORKSPACE` — workspace root for generated modules
//! - `RUST_LOG` — tracing filter (default: "info")

use terracrew::server::{app_router, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,terracrew=debug".into()),
        )
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "8000".to_string());
    let bind_addr = format!("0.0.0.0:{}", port);

    let state = AppState::new();
    if state.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY not set; /run-agent will report a configuration error");
    }
    tracing::info!(workspace = %state.workspace_root.display(), "workspace root");

    let app = app_router(state);

    tracing::info!("terracrew server starting on {}", bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /          — liveness message");
    tracing::info!("  GET  /health    — health probe");
    tracing::info!("  POST /run-agent — run a Terraform module generation");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app).await.expect("Server failed");
}
