//! Builder for hand-authored OpenAPI documents.

use serde_json::{Map, Value};

use crate::Result;
use crate::types::{Info, OpenApiPath, SecurityScheme, Server, Tag};

/// Builder for an OpenAPI document assembled from typed parts.
///
/// # Example
///
/// ```
/// use hn_openapi::{DocumentBuilder, HttpMethod, OpenApiOperation, OpenApiPath};
///
/// let doc = DocumentBuilder::new()
///     .title("My API")
///     .version("1.0.0")
///     .path(
///         OpenApiPath::new("/api/items", HttpMethod::Get)
///             .with_operation(OpenApiOperation::new("List items")),
///     )
///     .build()
///     .unwrap();
///
/// assert_eq!(doc["paths"]["/api/items"]["get"]["summary"], "List items");
/// ```
///
/// Paths and security schemes keep their insertion order. Adding the same
/// path and method twice keeps the last operation.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    openapi: String,
    title: Option<String>,
    version: Option<String>,
    description: Option<String>,
    servers: Vec<Server>,
    paths: Vec<OpenApiPath>,
    security_schemes: Vec<(String, SecurityScheme)>,
    tags: Vec<Tag>,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            openapi: "3.0.3".to_string(),
            title: None,
            version: None,
            description: None,
            servers: Vec::new(),
            paths: Vec::new(),
            security_schemes: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Set the OpenAPI specification version.
    pub fn openapi(mut self, version: impl Into<String>) -> Self {
        self.openapi = version.into();
        self
    }

    /// Set the API title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the API version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the API description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn server(mut self, server: Server) -> Self {
        self.servers.push(server);
        self
    }

    pub fn path(mut self, path: OpenApiPath) -> Self {
        self.paths.push(path);
        self
    }

    pub fn security_scheme(mut self, name: impl Into<String>, scheme: SecurityScheme) -> Self {
        self.security_schemes.push((name.into(), scheme));
        self
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Build the final OpenAPI document.
    pub fn build(self) -> Result<Value> {
        let mut spec = Map::new();

        spec.insert("openapi".to_string(), Value::String(self.openapi));

        let info = Info {
            title: self.title.unwrap_or_else(|| "API".to_string()),
            description: self.description,
            version: self.version.unwrap_or_else(|| "0.1.0".to_string()),
        };
        spec.insert("info".to_string(), serde_json::to_value(info)?);

        if !self.servers.is_empty() {
            spec.insert("servers".to_string(), serde_json::to_value(self.servers)?);
        }

        let mut paths = Map::new();
        for path_def in self.paths {
            let path_entry = paths
                .entry(path_def.path)
                .or_insert_with(|| Value::Object(Map::new()));

            if let Some(path_obj) = path_entry.as_object_mut() {
                path_obj.insert(path_def.method, serde_json::to_value(path_def.operation)?);
            }
        }
        spec.insert("paths".to_string(), Value::Object(paths));

        if !self.security_schemes.is_empty() {
            let mut schemes = Map::new();
            for (name, scheme) in self.security_schemes {
                schemes.insert(name, serde_json::to_value(scheme)?);
            }
            let mut components = Map::new();
            components.insert("securitySchemes".to_string(), Value::Object(schemes));
            spec.insert("components".to_string(), Value::Object(components));
        }

        if !self.tags.is_empty() {
            spec.insert("tags".to_string(), serde_json::to_value(self.tags)?);
        }

        Ok(Value::Object(spec))
    }
}
