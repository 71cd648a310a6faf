//! Concrete sources for the auth service's OpenAPI document.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use hn_openapi::{AuthSchemaProvider, BoxError};
use serde_json::Value;

use crate::config::{AuthSchemaConfig, ConfigError};

/// Fetches the schema from the auth service's schema-generation endpoint.
#[derive(Debug, Clone)]
pub struct HttpSchemaProvider {
    client: reqwest::Client,
    url: String,
}

impl HttpSchemaProvider {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl AuthSchemaProvider for HttpSchemaProvider {
    fn generate_openapi_schema(&self) -> BoxFuture<'_, Result<Value, BoxError>> {
        Box::pin(async move {
            tracing::debug!(url = %self.url, "Fetching auth OpenAPI schema");
            let schema = self
                .client
                .get(&self.url)
                .send()
                .await?
                .error_for_status()?
                .json::<Value>()
                .await?;
            Ok::<_, BoxError>(schema)
        })
    }
}

/// Reads the schema from a JSON file, e.g. one previously exported by the auth service.
#[derive(Debug, Clone)]
pub struct FileSchemaProvider {
    path: PathBuf,
}

impl FileSchemaProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AuthSchemaProvider for FileSchemaProvider {
    fn generate_openapi_schema(&self) -> BoxFuture<'_, Result<Value, BoxError>> {
        Box::pin(async move {
            tracing::debug!(path = %self.path.display(), "Reading auth OpenAPI schema");
            let bytes = tokio::fs::read(&self.path)
                .await
                .map_err(|e| format!("failed to read {}: {e}", self.path.display()))?;
            let schema = serde_json::from_slice::<Value>(&bytes)?;
            Ok::<_, BoxError>(schema)
        })
    }
}

/// Build the provider selected by the configuration.
pub fn from_config(config: &AuthSchemaConfig) -> Result<Arc<dyn AuthSchemaProvider>, ConfigError> {
    Ok(match config {
        AuthSchemaConfig::Http { url, timeout_secs } => Arc::new(HttpSchemaProvider::new(
            url.clone(),
            timeout_secs.map(Duration::from_secs),
        )?),
        AuthSchemaConfig::File { path } => Arc::new(FileSchemaProvider::new(path.clone())),
    })
}
