//! HTTP server exposing the agent run endpoint.
//!
//! # Endpoints
//!
//! - `GET  /`          — Liveness message
//! - `GET  /health`    — Health probe
//! - `POST /run-agent` — Trigger a Terraform module generation run

pub mod routes;

pub use routes::{app_router, AppState};
