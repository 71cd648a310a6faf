//! Error types for OpenAPI merging and rendering.

use hn_core::{ErrorCode, IntoErrorCode};
use thiserror::Error;

/// Boxed error produced by an auth schema provider. Never inspected, only propagated.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while producing the API documentation.
#[derive(Debug, Error)]
pub enum OpenApiError {
    /// The auth schema provider failed to produce a schema.
    #[error("Auth schema provider failed: {source}")]
    UpstreamSchema {
        #[source]
        source: BoxError,
    },

    /// The auth schema provider answered with something that is not an OpenAPI document.
    #[error("Invalid upstream OpenAPI document: {message}")]
    InvalidUpstream { message: String },

    /// A hand-authored document has an invalid structure.
    #[error("Invalid OpenAPI spec: {message}")]
    InvalidSpec { message: String },

    /// Both documents define the same path and the merge policy forbids it.
    #[error("Path conflict for '{path}': defined by both the auth and the custom document")]
    PathConflict { path: String },

    /// The merged document has a shape the renderer cannot work with.
    #[error("Cannot render document: {message}")]
    Render { message: String },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OpenApiError {
    pub(crate) fn invalid_upstream(message: impl Into<String>) -> Self {
        OpenApiError::InvalidUpstream {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_spec(message: impl Into<String>) -> Self {
        OpenApiError::InvalidSpec {
            message: message.into(),
        }
    }

    pub(crate) fn render(message: impl Into<String>) -> Self {
        OpenApiError::Render {
            message: message.into(),
        }
    }

    /// Whether this error originates from the auth schema provider.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            OpenApiError::UpstreamSchema { .. } | OpenApiError::InvalidUpstream { .. }
        )
    }
}

impl IntoErrorCode for OpenApiError {
    fn error_code(&self) -> ErrorCode {
        match self {
            OpenApiError::UpstreamSchema { .. } | OpenApiError::InvalidUpstream { .. } => {
                ErrorCode::Upstream
            }
            OpenApiError::PathConflict { .. } => ErrorCode::Conflict,
            OpenApiError::InvalidSpec { .. }
            | OpenApiError::Render { .. }
            | OpenApiError::Json(_) => ErrorCode::Internal,
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }
}
