//! HTTP routes serving the documentation.

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use hn_core::{ErrorResponse, IntoErrorCode};
use hn_openapi::OpenApiError;
use serde_json::json;

use crate::service::DocsService;

/// Message sent to clients instead of internal error detail in production.
pub const GENERIC_SCHEMA_ERROR: &str = "Failed to generate OpenAPI schema";

/// Shared state of the documentation routes.
#[derive(Debug, Clone)]
pub struct AppState {
    pub docs: DocsService,
    /// Include internal error detail in error responses.
    pub expose_errors: bool,
}

impl AppState {
    pub fn new(docs: DocsService, expose_errors: bool) -> Self {
        Self {
            docs,
            expose_errors,
        }
    }

    /// Every failure to produce the documentation is a 500; the error code is only logged.
    fn error_response(&self, err: &OpenApiError) -> Response {
        let code = err.error_code();
        tracing::error!(error = %err, code = %code, "Failed to generate OpenAPI documentation");
        let body = ErrorResponse::from_error(err, self.expose_errors, GENERIC_SCHEMA_ERROR);
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Build the router:
///
/// - `GET /health`
/// - `GET /docs` - interactive documentation viewer
/// - `GET /api/open-api` - merged OpenAPI document
/// - `GET /api/docs.md` - rendered markdown
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/docs", get(docs_page))
        .route("/api/open-api", get(open_api))
        .route("/api/docs.md", get(markdown))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn docs_page() -> impl IntoResponse {
    Html(include_str!("web/docs.html"))
}

async fn open_api(State(state): State<AppState>) -> Response {
    match state.docs.complete_schema().await {
        Ok(schema) => Json(schema).into_response(),
        Err(err) => state.error_response(&err),
    }
}

async fn markdown(State(state): State<AppState>) -> Response {
    match state.docs.markdown().await {
        Ok(markdown) => (
            [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
            markdown,
        )
            .into_response(),
        Err(err) => state.error_response(&err),
    }
}
