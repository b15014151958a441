//! Axum route handlers for the terracrew HTTP server.
//!
//! # Routes
//!
//! - `GET  /`          — Returns a liveness message
//! - `GET  /health`    — Returns `{"status": "healthy"}`
//! - `POST /run-agent` — Builds the agent and task descriptors for the
//!   request and runs them through the orchestration facade
//!
//! # Failure policy
//!
//! An empty `task` is the only client error (400). A missing provider
//! credential and any failure inside the orchestration run both come back as
//! HTTP 200 with `{"status": "error", ...}` — failures are logged in full and
//! surfaced as structured payloads, never propagated as server errors.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::agents::{terraform_architect, terraform_engineer};
use crate::crew::{Crew, Orchestrator};
use crate::llm::Llm;
use crate::tasks::terraform::TerraformModuleTask;
use crate::tools::directory_reader::DirectoryReadTool;
use crate::tools::terraform_writer::TerraformModuleWriter;
use crate::utilities::paths::workspace_root;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// The orchestration facade the endpoint delegates runs to.
    pub orchestrator: Arc<dyn Orchestrator>,
    /// Root directory for generated modules.
    pub workspace_root: PathBuf,
    /// Provider credential, captured once at startup.
    pub api_key: Option<String>,
    /// Model name used for runs.
    pub model: String,
}

impl AppState {
    /// Production state: crew orchestrator with the module writer tool,
    /// workspace and credential from the environment.
    pub fn new() -> Self {
        let root = workspace_root();
        let writer = Arc::new(TerraformModuleWriter::new(root.clone()));
        let reader = Arc::new(DirectoryReadTool::new(root.clone()));
        Self {
            orchestrator: Arc::new(Crew::new(vec![writer, reader])),
            workspace_root: root,
            api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4".to_string()),
        }
    }

    /// State with a custom orchestrator and workspace, for tests and embedding.
    pub fn with_orchestrator(
        orchestrator: Arc<dyn Orchestrator>,
        workspace_root: impl Into<PathBuf>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            orchestrator,
            workspace_root: workspace_root.into(),
            api_key,
            model: "gpt-4".to_string(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/run-agent", post(run_agent_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Request body for `POST /run-agent`.
#[derive(Debug, Clone, Deserialize)]
pub struct RunAgentRequest {
    /// Free-text description of the module to generate.
    #[serde(default)]
    pub task: String,
    /// Agent selection: "engineer" for the senior-engineer persona,
    /// anything else (or absent) for the architect.
    #[serde(rename = "type", default)]
    pub agent_type: Option<String>,
    /// Target cloud provider. Defaults to "azure".
    #[serde(default)]
    pub cloud_provider: Option<String>,
    /// Module type label used in the output directory name. Defaults to
    /// "generic".
    #[serde(default)]
    pub module_type: Option<String>,
}

/// Response body for `POST /run-agent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunAgentResponse {
    /// "success" or "error".
    pub status: String,
    /// Final text from the run, or a human-readable error message.
    pub result: String,
    /// Directory the generated files were written to (success only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<String>,
    /// Additional human-readable context (success only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure detail (error only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl RunAgentResponse {
    fn error(result: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            result: result.into(),
            output_directory: None,
            message: None,
            details: None,
        }
    }
}

/// GET / — liveness message.
async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "terracrew API is running",
        "version": crate::VERSION,
    }))
}

/// GET /health — health probe.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// POST /run-agent — construct descriptors and run the orchestration facade.
///
/// Blocks the request for the full duration of the run; no cancellation or
/// timeout beyond the LLM client's own.
async fn run_agent_handler(
    State(state): State<AppState>,
    Json(request): Json<RunAgentRequest>,
) -> (StatusCode, Json<RunAgentResponse>) {
    if request.task.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(RunAgentResponse::error("Task description must not be empty")),
        );
    }

    let Some(api_key) = state.api_key.clone() else {
        return (
            StatusCode::OK,
            Json(RunAgentResponse::error(
                "LLM provider not configured. Set the OPENAI_API_KEY environment variable.",
            )),
        );
    };

    let llm = Llm::new(state.model.clone()).with_api_key(api_key);
    let agent = match request.agent_type.as_deref() {
        Some("engineer") => terraform_engineer(llm),
        _ => terraform_architect(llm),
    };

    let module_type = request.module_type.as_deref().unwrap_or("generic");
    let cloud_provider = request.cloud_provider.as_deref().unwrap_or("azure");
    let task = TerraformModuleTask::new(
        &state.workspace_root,
        &request.task,
        module_type,
        cloud_provider,
    );
    let output_dir = task
        .output_dir
        .as_ref()
        .map(|d| d.display().to_string());

    tracing::info!(
        role = %agent.role,
        module_type,
        cloud_provider,
        output_dir = output_dir.as_deref().unwrap_or(""),
        "starting agent run"
    );

    match state.orchestrator.kickoff(&agent, &task).await {
        Ok(result) => (
            StatusCode::OK,
            Json(RunAgentResponse {
                status: "success".to_string(),
                result,
                output_directory: output_dir,
                message: Some("Terraform module generation completed".to_string()),
                details: None,
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "agent run failed");
            let mut response = RunAgentResponse::error("Terraform module generation failed");
            response.details = Some(e.to_string());
            (StatusCode::OK, Json(response))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::agent::Agent;
    use crate::task::Task;
    use crate::utilities::errors::OrchestrationError;

    /// Scripted orchestrator recording whether it was invoked.
    struct MockOrchestrator {
        reply: Result<String, String>,
        invocations: AtomicUsize,
    }

    impl MockOrchestrator {
        fn returning(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                invocations: AtomicUsize::new(0),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                invocations: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl Orchestrator for MockOrchestrator {
        async fn kickoff(&self, _agent: &Agent, _task: &Task) -> Result<String, OrchestrationError> {
            self.invocations.fetch_add(1, Ordering::SeqCst);
            self.reply
                .clone()
                .map_err(OrchestrationError::Incomplete)
        }
    }

    fn post_run_agent(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/run-agent")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_root_endpoint() {
        let mock = Arc::new(MockOrchestrator::returning("X"));
        let state = AppState::with_orchestrator(mock, "/tmp", None);
        let app = app_router(state);

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert!(json["message"].as_str().unwrap().contains("running"));
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let mock = Arc::new(MockOrchestrator::returning("X"));
        let state = AppState::with_orchestrator(mock, "/tmp", None);
        let app = app_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_empty_task_is_a_client_error_and_skips_orchestration() {
        let mock = Arc::new(MockOrchestrator::returning("X"));
        let state = AppState::with_orchestrator(
            mock.clone(),
            "/tmp",
            Some("sk-test".to_string()),
        );
        let app = app_router(state);

        let response = app
            .oneshot(post_run_agent(serde_json::json!({ "task": "" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = response_json(response).await;
        assert_eq!(json["status"], "error");
        assert_eq!(mock.invocations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_credential_is_a_structured_error() {
        let mock = Arc::new(MockOrchestrator::returning("X"));
        let state = AppState::with_orchestrator(mock.clone(), "/tmp", None);
        let app = app_router(state);

        let response = app
            .oneshot(post_run_agent(serde_json::json!({ "task": "an s3 bucket" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["status"], "error");
        assert!(json["result"].as_str().unwrap().contains("not configured"));
        assert_eq!(mock.invocations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_successful_run_reports_result_and_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockOrchestrator::returning("X"));
        let state = AppState::with_orchestrator(
            mock.clone(),
            dir.path(),
            Some("sk-test".to_string()),
        );
        let app = app_router(state);

        let response = app
            .oneshot(post_run_agent(serde_json::json!({
                "task": "an s3 bucket",
                "module_type": "storage",
                "cloud_provider": "aws",
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["result"], "X");
        assert_eq!(mock.invocations.load(Ordering::SeqCst), 1);

        let output_dir = json["output_directory"].as_str().unwrap();
        let pattern = regex::Regex::new(r"storage_\d{8}_\d{6}$").unwrap();
        assert!(pattern.is_match(output_dir), "unexpected dir: {}", output_dir);
    }

    #[tokio::test]
    async fn test_facade_failure_is_caught_not_propagated() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockOrchestrator::failing("model exploded"));
        let state = AppState::with_orchestrator(
            mock,
            dir.path(),
            Some("sk-test".to_string()),
        );
        let app = app_router(state);

        let response = app
            .oneshot(post_run_agent(serde_json::json!({ "task": "a vpc" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["status"], "error");
        assert!(json["details"].as_str().unwrap().contains("model exploded"));
    }

    #[tokio::test]
    async fn test_engineer_type_selects_engineer_agent() {
        // The agent choice is observable through the mock's captured role.
        struct RoleCapture(std::sync::Mutex<Option<String>>);

        #[async_trait::async_trait]
        impl Orchestrator for RoleCapture {
            async fn kickoff(
                &self,
                agent: &Agent,
                _task: &Task,
            ) -> Result<String, OrchestrationError> {
                *self.0.lock().unwrap() = Some(agent.role.clone());
                Ok("ok".to_string())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let capture = Arc::new(RoleCapture(std::sync::Mutex::new(None)));
        let state = AppState::with_orchestrator(
            capture.clone(),
            dir.path(),
            Some("sk-test".to_string()),
        );
        let app = app_router(state);

        let response = app
            .oneshot(post_run_agent(serde_json::json!({
                "task": "a vpc",
                "type": "engineer",
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let role = capture.0.lock().unwrap().clone().unwrap();
        assert!(role.contains("Senior DevOps Engineer"));
    }
}
