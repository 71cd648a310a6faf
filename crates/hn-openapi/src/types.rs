//! Typed OpenAPI structures.
//!
//! These types represent the subset of OpenAPI 3.0 the application authors by hand.
//! Documents received from the auth service are kept as raw JSON so that members we
//! do not model survive a merge untouched.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `info` object of a document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Info {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub version: String,
}

/// An entry of the `servers` sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Server {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Server {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

/// An entry of the `tags` sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

/// A named authentication mechanism under `components.securitySchemes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecurityScheme {
    /// Scheme type, e.g. `apiKey`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Location of the credential: `query`, `header` or `cookie`.
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Name of the header, query parameter or cookie.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SecurityScheme {
    /// An API key carried in a cookie.
    pub fn cookie(name: impl Into<String>) -> Self {
        Self {
            kind: "apiKey".to_string(),
            location: Some("cookie".to_string()),
            name: Some(name.into()),
            description: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

/// An OpenAPI path with one of its operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpenApiPath {
    /// The path pattern (e.g., "/api/posts/create-post").
    pub path: String,
    /// HTTP method (lowercase: "get", "post", etc.).
    pub method: String,
    /// The operation definition.
    pub operation: OpenApiOperation,
}

impl OpenApiPath {
    /// Create a new path.
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            path: path.into(),
            method: method.as_str().to_string(),
            operation: OpenApiOperation::default(),
        }
    }

    /// Set the operation for this path.
    pub fn with_operation(mut self, operation: OpenApiOperation) -> Self {
        self.operation = operation;
        self
    }
}

/// An OpenAPI operation (endpoint).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OpenApiOperation {
    /// Tags grouping this operation in documentation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Short summary of the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Longer description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Security requirements, each mapping a scheme name to its scopes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<Map<String, Value>>,
    /// Request body definition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
    /// Response definitions keyed by status code.
    #[serde(default)]
    pub responses: Map<String, Value>,
    /// Additional fields not explicitly modeled.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OpenApiOperation {
    /// Create a new operation with a summary.
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: Some(summary.into()),
            ..Default::default()
        }
    }

    /// Add a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Require the named security scheme (no scopes).
    pub fn with_security(mut self, scheme: impl Into<String>) -> Self {
        let mut requirement = Map::new();
        requirement.insert(scheme.into(), Value::Array(Vec::new()));
        self.security.push(requirement);
        self
    }

    /// Set a JSON request body with the given schema.
    pub fn with_json_body(mut self, required: bool, schema: Value) -> Self {
        self.request_body = Some(serde_json::json!({
            "required": required,
            "content": { "application/json": { "schema": schema } }
        }));
        self
    }

    /// Add a JSON response with the given schema.
    pub fn with_json_response(
        mut self,
        status: impl Into<String>,
        description: impl Into<String>,
        schema: Value,
    ) -> Self {
        self.responses.insert(
            status.into(),
            serde_json::json!({
                "description": description.into(),
                "content": { "application/json": { "schema": schema } }
            }),
        );
        self
    }
}

/// The standard HTTP verbs an OpenAPI path item may hold operations for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    /// Parse a path item key. Keys that are not verbs (`parameters`, `summary`, ...) yield `None`.
    pub fn parse(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "get" => Some(HttpMethod::Get),
            "put" => Some(HttpMethod::Put),
            "post" => Some(HttpMethod::Post),
            "delete" => Some(HttpMethod::Delete),
            "options" => Some(HttpMethod::Options),
            "head" => Some(HttpMethod::Head),
            "patch" => Some(HttpMethod::Patch),
            "trace" => Some(HttpMethod::Trace),
            _ => None,
        }
    }

    /// Lowercase form used as a path item key.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

/// Headline numbers of a document, reported after an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub openapi: String,
    pub title: String,
    pub version: String,
    pub paths: usize,
    pub operations: usize,
    pub component_schemas: usize,
}

impl DocumentSummary {
    /// Summarize a document. Missing or mistyped members count as empty.
    pub fn of(doc: &Value) -> Self {
        let text = |value: Option<&Value>| {
            value
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let paths = doc.get("paths").and_then(Value::as_object);

        Self {
            openapi: text(doc.get("openapi")),
            title: text(doc.pointer("/info/title")),
            version: text(doc.pointer("/info/version")),
            paths: paths.map_or(0, Map::len),
            operations: paths.map_or(0, |paths| {
                paths
                    .values()
                    .filter_map(Value::as_object)
                    .flat_map(|item| item.keys())
                    .filter(|key| HttpMethod::parse(key).is_some())
                    .count()
            }),
            component_schemas: doc
                .pointer("/components/schemas")
                .and_then(Value::as_object)
                .map_or(0, Map::len),
        }
    }
}
