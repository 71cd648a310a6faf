//! HTTP server and export CLI for the hn-clone API documentation.
//!
//! Wires a configured [`AuthSchemaProvider`](hn_openapi::AuthSchemaProvider) and
//! the custom endpoint descriptor into a [`DocsService`], which backs both the
//! axum routes and the `generate-openapi` export.

pub mod config;
pub mod export;
pub mod provider;
pub mod routes;
pub mod service;

pub use config::{AuthSchemaConfig, ConfigError, Environment, ServerConfig};
pub use export::{ExportError, ExportReport, run_export};
pub use routes::{AppState, router};
pub use service::DocsService;

use hn_openapi::{SchemaMerger, custom_document};

/// Build the documentation service described by `config`.
pub fn docs_service(config: &ServerConfig) -> Result<DocsService, ConfigError> {
    let provider = provider::from_config(&config.auth_schema)?;
    let merger = SchemaMerger::new().path_collision(config.merge.path_collision);

    Ok(DocsService::new(provider, custom_document()?)
        .with_merger(merger)
        .with_markdown_options(config.docs.markdown_options()))
}

/// Initialize logging to stderr, honoring `RUST_LOG`.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}
