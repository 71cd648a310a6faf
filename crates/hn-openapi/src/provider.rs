//! The seam to the external auth service that documents its own endpoints.

use futures::future::BoxFuture;
use serde_json::Value;

use crate::Result;
use crate::error::{BoxError, OpenApiError};

/// Source of the auth service's OpenAPI document.
///
/// Implementations may fail with any error; it is propagated to the caller as
/// [`OpenApiError::UpstreamSchema`] without being interpreted.
pub trait AuthSchemaProvider: Send + Sync {
    /// Produce the auth service's OpenAPI document.
    fn generate_openapi_schema(&self) -> BoxFuture<'_, std::result::Result<Value, BoxError>>;
}

/// A provider that always answers with the same document.
#[derive(Debug, Clone)]
pub struct StaticSchemaProvider {
    schema: Value,
}

impl StaticSchemaProvider {
    pub fn new(schema: Value) -> Self {
        Self { schema }
    }
}

impl AuthSchemaProvider for StaticSchemaProvider {
    fn generate_openapi_schema(&self) -> BoxFuture<'_, std::result::Result<Value, BoxError>> {
        Box::pin(async move { Ok::<_, BoxError>(self.schema.clone()) })
    }
}

/// Call the provider and check that it answered with a JSON object.
pub async fn fetch_auth_schema(provider: &dyn AuthSchemaProvider) -> Result<Value> {
    let schema = match provider.generate_openapi_schema().await {
        Ok(schema) => schema,
        Err(source) => {
            tracing::error!(error = %source, "Error generating auth OpenAPI schema");
            return Err(OpenApiError::UpstreamSchema { source });
        }
    };

    if !schema.is_object() {
        tracing::error!(kind = json_kind(&schema), "Auth OpenAPI schema is not an object");
        return Err(OpenApiError::invalid_upstream(format!(
            "expected a JSON object, got {}",
            json_kind(&schema)
        )));
    }

    Ok(schema)
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
