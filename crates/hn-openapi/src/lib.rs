//! OpenAPI aggregation for the hn-clone API.
//!
//! The auth service documents its own endpoints; the application describes the
//! rest by hand. This crate merges the two into one document and renders it as
//! markdown.
//!
//! # Example
//!
//! ```
//! use hn_openapi::{MarkdownOptions, SchemaMerger, custom_document, render_markdown};
//! use serde_json::json;
//!
//! let auth = json!({
//!     "openapi": "3.0.0",
//!     "info": {"title": "Better Auth", "version": "1.2.0"},
//!     "paths": {"/api/auth/sign-in/email": {"post": {"tags": ["Auth"], "summary": "Sign in"}}}
//! });
//!
//! let merged = SchemaMerger::new().merge(&auth, &custom_document()?)?;
//! let markdown = render_markdown(&merged, &MarkdownOptions::default())?;
//!
//! assert!(markdown.contains("### Auth"));
//! assert!(markdown.contains("### Posts"));
//! # Ok::<(), hn_openapi::OpenApiError>(())
//! ```

mod builder;
mod custom;
mod error;
mod markdown;
mod merge;
mod provider;
mod types;

pub use builder::DocumentBuilder;
pub use custom::{
    API_DESCRIPTION, API_TITLE, API_VERSION, COOKIE_AUTH, CREATE_POST_PATH, SESSION_COOKIE,
    custom_document,
};
pub use error::{BoxError, OpenApiError};
pub use markdown::{MarkdownOptions, NO_SUMMARY, UNTAGGED, render_markdown};
pub use merge::{PathCollision, SchemaMerger};
pub use provider::{AuthSchemaProvider, StaticSchemaProvider, fetch_auth_schema};
pub use types::*;

/// Result type for OpenAPI operations.
pub type Result<T> = std::result::Result<T, OpenApiError>;
