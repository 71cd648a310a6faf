//! The documentation pipeline: fetch, merge, render.

use std::path::Path;
use std::sync::Arc;

use hn_openapi::{
    AuthSchemaProvider, MarkdownOptions, OpenApiError, SchemaMerger, fetch_auth_schema,
    render_markdown,
};
use serde_json::Value;

use crate::export::{ExportError, write_artifact};

/// Produces the merged OpenAPI document and its markdown rendering.
///
/// Every call re-fetches the auth schema; nothing is cached between calls.
#[derive(Clone)]
pub struct DocsService {
    provider: Arc<dyn AuthSchemaProvider>,
    custom: Arc<Value>,
    merger: SchemaMerger,
    markdown: Arc<MarkdownOptions>,
}

impl DocsService {
    pub fn new(provider: Arc<dyn AuthSchemaProvider>, custom: Value) -> Self {
        Self {
            provider,
            custom: Arc::new(custom),
            merger: SchemaMerger::new(),
            markdown: Arc::new(MarkdownOptions::default()),
        }
    }

    pub fn with_merger(mut self, merger: SchemaMerger) -> Self {
        self.merger = merger;
        self
    }

    pub fn with_markdown_options(mut self, options: MarkdownOptions) -> Self {
        self.markdown = Arc::new(options);
        self
    }

    pub fn markdown_options(&self) -> &MarkdownOptions {
        &self.markdown
    }

    /// The auth service's document, as returned by the provider.
    pub async fn auth_schema(&self) -> Result<Value, OpenApiError> {
        fetch_auth_schema(self.provider.as_ref()).await
    }

    /// Merge an already fetched auth document with the custom descriptor.
    pub fn merge(&self, auth: &Value) -> Result<Value, OpenApiError> {
        self.merger.merge(auth, &self.custom)
    }

    /// Fetch the auth document and merge it.
    pub async fn complete_schema(&self) -> Result<Value, OpenApiError> {
        let auth = self.auth_schema().await?;
        self.merge(&auth)
    }

    pub fn render(&self, merged: &Value) -> Result<String, OpenApiError> {
        render_markdown(merged, &self.markdown)
    }

    /// Fetch, merge and render in one go.
    pub async fn markdown(&self) -> Result<String, OpenApiError> {
        let merged = self.complete_schema().await?;
        self.render(&merged)
    }

    /// Generate the merged document and write it to `path` as pretty JSON.
    pub async fn save_schema(&self, path: &Path) -> Result<Value, ExportError> {
        let merged = self.complete_schema().await?;
        write_artifact(path, serde_json::to_string_pretty(&merged)?).await?;
        tracing::info!(path = %path.display(), "OpenAPI schema saved");
        Ok(merged)
    }
}

impl std::fmt::Debug for DocsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocsService")
            .field("merger", &self.merger)
            .field("markdown", &self.markdown)
            .finish_non_exhaustive()
    }
}
