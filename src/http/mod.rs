//! HTTP transport for the report pipeline.
//!
//! One endpoint: GET serves the submission form, POST runs the pipeline
//! and maps each pipeline failure to a distinct status code.

use std::sync::Arc;

use anyhow::Context;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::core::{Orchestrator, PipelineError};
use crate::domain::RequestPayload;

/// Shared state for the HTTP layer
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until shutdown
pub async fn serve(state: AppState, bind: &str) -> anyhow::Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!(%bind, "ledgerpost listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Serve the static submission form
async fn index() -> Html<&'static str> {
    Html(include_str!("../../templates/index.html"))
}

/// Accept a report request and run the pipeline
async fn submit(State(state): State<AppState>, Form(payload): Form<RequestPayload>) -> Response {
    match state.orchestrator.run(&payload).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({
                "message": "Report generated",
                "report": outcome.artifact.file_name,
                "rows": outcome.artifact.row_count,
                "delivery": outcome.delivery,
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: PipelineError) -> Response {
    let status = match &error {
        PipelineError::Validation(_) => StatusCode::BAD_REQUEST,
        PipelineError::NotFound(_) => StatusCode::NOT_FOUND,
        PipelineError::Acquisition(_) => StatusCode::BAD_GATEWAY,
        PipelineError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, Json(json!({ "error": error.to_string() }))).into_response()
}
