//! Markdown documentation generation.
//!
//! Renders a merged OpenAPI document as a single markdown page with the
//! endpoints grouped by tag.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::Result;
use crate::error::OpenApiError;
use crate::types::HttpMethod;

/// Tag used for operations that declare none.
pub const UNTAGGED: &str = "Untagged";
/// Summary used for operations that declare none.
pub const NO_SUMMARY: &str = "No summary";

/// Settings for the fixed sections of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// Public base URL of the running server, used for the interactive links.
    pub base_url: String,
    /// Command that starts the development server.
    pub dev_command: String,
    /// Command that regenerates the documentation.
    pub regenerate_command: String,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            dev_command: "cargo run --bin hn-server".to_string(),
            regenerate_command: "cargo run --bin generate-openapi".to_string(),
        }
    }
}

impl MarkdownOptions {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// One operation as listed under a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Endpoint<'a> {
    method: HttpMethod,
    path: &'a str,
    summary: &'a str,
    description: &'a str,
}

/// Render `doc` as markdown.
///
/// Paths and methods are visited in document order; tag sections appear in the
/// order their tag is first seen. An operation with several tags is listed under
/// each of them. Fails instead of emitting a partial page when the document has
/// the wrong shape.
pub fn render_markdown(doc: &Value, options: &MarkdownOptions) -> Result<String> {
    let doc = doc
        .as_object()
        .ok_or_else(|| OpenApiError::render("document is not a JSON object"))?;
    let info = doc
        .get("info")
        .and_then(Value::as_object)
        .ok_or_else(|| OpenApiError::render("`info` is missing or not an object"))?;

    let mut markdown = format!("# {}\n\n", text(info, "title")?);
    let description = text(info, "description")?;
    if !description.is_empty() {
        markdown.push_str(&format!("{description}\n\n"));
    }
    markdown.push_str(&format!("**Version:** {}\n\n", text(info, "version")?));

    if let Some(url) = first_server_url(doc)? {
        markdown.push_str("## Base URL\n\n");
        markdown.push_str(&format!("`{url}`\n\n"));
    }

    markdown.push_str("## Authentication\n\n");
    markdown.push_str(
        "This API uses cookie-based authentication powered by Better-Auth. \
         The session cookie is automatically managed by Better-Auth.\n\n",
    );

    let base = options.base_url.trim_end_matches('/');
    markdown.push_str("## Interactive Documentation\n\n");
    markdown.push_str(&format!(
        "- **Unified Documentation**: [/docs]({base}/docs) - Complete API documentation with Scalar\n"
    ));
    markdown.push_str(&format!(
        "- **Better-Auth Reference**: [/api/auth/reference]({base}/api/auth/reference) - Better-Auth specific endpoints\n\n"
    ));

    markdown.push_str("## API Endpoints\n\n");
    for (tag, endpoints) in group_by_tag(doc)? {
        markdown.push_str(&format!("### {tag}\n\n"));
        for endpoint in endpoints {
            markdown.push_str(&format!("#### `{} {}`\n\n", endpoint.method, endpoint.path));
            markdown.push_str(&format!("{}\n\n", endpoint.summary));
            if !endpoint.description.is_empty() {
                markdown.push_str(&format!("{}\n\n", endpoint.description));
            }
        }
    }

    markdown.push_str("## Development\n\n");
    markdown.push_str("To start the development server:\n\n");
    markdown.push_str(&format!("```bash\n{}\n```\n\n", options.dev_command));
    markdown.push_str("To regenerate this documentation:\n\n");
    markdown.push_str(&format!("```bash\n{}\n```\n", options.regenerate_command));

    Ok(markdown)
}

/// Collect endpoints per tag, preserving first-seen tag order.
fn group_by_tag(doc: &Map<String, Value>) -> Result<IndexMap<&str, Vec<Endpoint<'_>>>> {
    let mut groups: IndexMap<&str, Vec<Endpoint<'_>>> = IndexMap::new();

    let paths = match doc.get("paths") {
        None | Some(Value::Null) => return Ok(groups),
        Some(Value::Object(paths)) => paths,
        Some(_) => return Err(OpenApiError::render("`paths` is not an object")),
    };

    for (path, item) in paths {
        let item = item
            .as_object()
            .ok_or_else(|| OpenApiError::render(format!("path `{path}` is not an object")))?;

        for (key, operation) in item {
            // Path-level members such as `parameters` are not operations.
            let Some(method) = HttpMethod::parse(key) else {
                continue;
            };
            let operation = operation.as_object().ok_or_else(|| {
                OpenApiError::render(format!("operation `{method} {path}` is not an object"))
            })?;

            let summary = match text(operation, "summary")? {
                "" => NO_SUMMARY,
                summary => summary,
            };
            let endpoint = Endpoint {
                method,
                path,
                summary,
                description: text(operation, "description")?,
            };

            for tag in operation_tags(operation, method, path)? {
                groups.entry(tag).or_default().push(endpoint);
            }
        }
    }

    Ok(groups)
}

/// The operation's tags, or [`UNTAGGED`] when it declares none.
fn operation_tags<'a>(
    operation: &'a Map<String, Value>,
    method: HttpMethod,
    path: &str,
) -> Result<Vec<&'a str>> {
    let tags = match operation.get("tags") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(tags)) => tags
            .iter()
            .map(|tag| {
                tag.as_str().ok_or_else(|| {
                    OpenApiError::render(format!(
                        "operation `{method} {path}` has a non-string tag"
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?,
        Some(_) => {
            return Err(OpenApiError::render(format!(
                "`tags` of operation `{method} {path}` is not an array"
            )));
        }
    };

    if tags.is_empty() {
        Ok(vec![UNTAGGED])
    } else {
        Ok(tags)
    }
}

fn first_server_url(doc: &Map<String, Value>) -> Result<Option<&str>> {
    match doc.get("servers") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(servers)) => match servers.first() {
            None => Ok(None),
            Some(server) => server
                .get("url")
                .and_then(Value::as_str)
                .map(Some)
                .ok_or_else(|| OpenApiError::render("first server has no `url`")),
        },
        Some(_) => Err(OpenApiError::render("`servers` is not an array")),
    }
}

/// An optional string member; missing means empty.
fn text<'a>(object: &'a Map<String, Value>, key: &str) -> Result<&'a str> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(""),
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(OpenApiError::render(format!("`{key}` is not a string"))),
    }
}
