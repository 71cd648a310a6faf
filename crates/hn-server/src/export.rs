//! Export of the documentation artifacts to disk.

use std::fmt::Display;
use std::io::Write;
use std::path::{Path, PathBuf};

use hn_core::{ErrorCode, IntoErrorCode};
use hn_openapi::{DocumentSummary, OpenApiError};
use thiserror::Error;

use crate::service::DocsService;

/// Auth-only document.
pub const AUTH_SCHEMA_FILE: &str = "openapi-auth.json";
/// Merged document.
pub const SCHEMA_FILE: &str = "openapi.json";
/// Rendered markdown.
pub const MARKDOWN_FILE: &str = "API.md";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Schema(#[from] OpenApiError),

    #[error("failed to write {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize document: {0}")]
    Json(#[from] serde_json::Error),
}

impl IntoErrorCode for ExportError {
    fn error_code(&self) -> ErrorCode {
        match self {
            ExportError::Schema(err) => err.error_code(),
            ExportError::Persistence { .. } => ErrorCode::Persistence,
            ExportError::Json(_) => ErrorCode::Internal,
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }
}

/// What an export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub auth: DocumentSummary,
    pub merged: DocumentSummary,
    /// Written artifacts, in write order.
    pub files: Vec<PathBuf>,
}

/// Write one artifact, replacing any previous version.
pub async fn write_artifact(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), ExportError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| ExportError::Persistence {
            path: path.to_path_buf(),
            source,
        })
}

/// Run the whole pipeline and write the three artifacts into `out_dir`.
///
/// Steps run strictly in order and the first failure aborts the rest; artifacts
/// written before the failure are left in place. Progress lines go to `out`.
pub async fn run_export(
    service: &DocsService,
    out_dir: &Path,
    out: &mut dyn Write,
) -> Result<ExportReport, ExportError> {
    progress(out, "Starting OpenAPI documentation generation...");

    progress(out, "\n1. Generating auth OpenAPI schema...");
    let auth = service.auth_schema().await?;
    let auth_summary = DocumentSummary::of(&auth);
    progress(out, "   auth schema generated");
    progress(out, format_args!("   found {} auth endpoints", auth_summary.paths));

    progress(out, "\n2. Generating complete merged schema...");
    let merged = service.merge(&auth)?;
    let merged_summary = DocumentSummary::of(&merged);
    progress(out, "   complete schema generated");
    progress(out, format_args!("   total endpoints: {}", merged_summary.paths));

    progress(out, "\n3. Generating markdown documentation...");
    let markdown = service.render(&merged)?;
    progress(out, "   markdown rendered");

    progress(out, "\n4. Saving artifacts...");
    tokio::fs::create_dir_all(out_dir)
        .await
        .map_err(|source| ExportError::Persistence {
            path: out_dir.to_path_buf(),
            source,
        })?;

    let artifacts = [
        (AUTH_SCHEMA_FILE, serde_json::to_string_pretty(&auth)?, "auth-only schema"),
        (SCHEMA_FILE, serde_json::to_string_pretty(&merged)?, "complete schema"),
        (MARKDOWN_FILE, markdown, "markdown documentation"),
    ];
    let mut files = Vec::with_capacity(artifacts.len());
    for (name, contents, what) in artifacts {
        let path = out_dir.join(name);
        write_artifact(&path, contents).await?;
        tracing::info!(path = %path.display(), "Artifact written");
        progress(out, format_args!("   {what} saved to {}", path.display()));
        files.push(path);
    }

    print_summary(out, service, &merged_summary);

    Ok(ExportReport {
        auth: auth_summary,
        merged: merged_summary,
        files,
    })
}

fn print_summary(out: &mut dyn Write, service: &DocsService, summary: &DocumentSummary) {
    let base = service.markdown_options().base_url.trim_end_matches('/');

    progress(out, "\nOpenAPI documentation generation complete!");
    progress(out, "\nGenerated files:");
    progress(out, format_args!("   {SCHEMA_FILE} - Complete API schema"));
    progress(out, format_args!("   {AUTH_SCHEMA_FILE} - Auth-only schema"));
    progress(out, format_args!("   {MARKDOWN_FILE} - Human-readable documentation"));

    progress(out, "\nAccess your documentation:");
    progress(out, format_args!("   Unified docs: {base}/docs"));
    progress(out, format_args!("   Auth reference: {base}/api/auth/reference"));
    progress(out, format_args!("   Complete schema JSON: {base}/api/open-api"));

    progress(out, "\nSchema validation:");
    progress(out, format_args!("   OpenAPI version: {}", summary.openapi));
    progress(out, format_args!("   API title: {}", summary.title));
    progress(out, format_args!("   API version: {}", summary.version));
    progress(out, format_args!("   Total paths: {}", summary.paths));
    progress(out, format_args!("   Total operations: {}", summary.operations));
    progress(
        out,
        format_args!("   Total components: {}", summary.component_schemas),
    );
}

/// Progress output is best effort; a closed stdout must not fail the export.
fn progress(out: &mut dyn Write, line: impl Display) {
    let _ = writeln!(out, "{line}");
}
