//! Merging the auth service's document with the custom endpoint descriptor.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Result;
use crate::error::OpenApiError;
use crate::provider::json_kind;

/// What to do when both documents define the same path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathCollision {
    /// Fail with [`OpenApiError::PathConflict`].
    #[default]
    Reject,
    /// Replace the auth document's method map for that path with the custom one.
    CustomWins,
}

/// Combines the auth service's document with the custom endpoint descriptor.
///
/// # Precedence
///
/// - **Base**: every member of the auth document is carried over, including ones
///   not touched below (`openapi`, `servers`, `components.schemas`, extensions, ...).
///   The custom document's `openapi` and `servers` are never used.
/// - **Info**: `title` and `description` come from the custom document, `version`
///   from the auth document (the custom one only fills in when it is missing).
/// - **Paths**: union of both; collisions follow [`PathCollision`].
/// - **Security schemes**: merged by name, custom wins.
/// - **Tags**: auth tags followed by custom tags, duplicates kept.
///
/// Both inputs are borrowed; the merged document is a new value.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaMerger {
    path_collision: PathCollision,
}

impl SchemaMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the policy for paths defined by both documents.
    pub fn path_collision(mut self, policy: PathCollision) -> Self {
        self.path_collision = policy;
        self
    }

    /// Merge `auth` and `custom` into a new document.
    pub fn merge(&self, auth: &Value, custom: &Value) -> Result<Value> {
        let auth = auth.as_object().ok_or_else(|| {
            OpenApiError::invalid_upstream(format!(
                "expected a JSON object, got {}",
                json_kind(auth)
            ))
        })?;
        let custom = custom.as_object().ok_or_else(|| {
            OpenApiError::invalid_spec(format!(
                "custom document must be a JSON object, got {}",
                json_kind(custom)
            ))
        })?;

        let mut merged = auth.clone();

        merged.insert(
            "info".to_string(),
            Value::Object(merge_info(auth, custom)?),
        );

        merged.insert(
            "paths".to_string(),
            Value::Object(self.merge_paths(auth, custom)?),
        );
        merged.insert(
            "components".to_string(),
            Value::Object(merge_components(auth, custom)?),
        );

        let mut tags = array_member(auth, "tags", Source::Auth)?
            .cloned()
            .unwrap_or_default();
        if let Some(custom_tags) = array_member(custom, "tags", Source::Custom)? {
            tags.extend(custom_tags.iter().cloned());
        }
        merged.insert("tags".to_string(), Value::Array(tags));

        let path_count = merged.get("paths").and_then(Value::as_object).map_or(0, Map::len);
        let tag_count = merged.get("tags").and_then(Value::as_array).map_or(0, Vec::len);
        tracing::debug!(paths = path_count, tags = tag_count, "Merged OpenAPI documents");

        Ok(Value::Object(merged))
    }

    fn merge_paths(
        &self,
        auth: &Map<String, Value>,
        custom: &Map<String, Value>,
    ) -> Result<Map<String, Value>> {
        let mut paths = object_member(auth, "paths", Source::Auth)?
            .cloned()
            .unwrap_or_default();

        if let Some(custom_paths) = object_member(custom, "paths", Source::Custom)? {
            for (path, methods) in custom_paths {
                if paths.contains_key(path) {
                    match self.path_collision {
                        PathCollision::Reject => {
                            return Err(OpenApiError::PathConflict { path: path.clone() });
                        }
                        PathCollision::CustomWins => {
                            tracing::warn!(%path, "Custom document replaces auth path");
                        }
                    }
                }
                paths.insert(path.clone(), methods.clone());
            }
        }

        Ok(paths)
    }
}

fn merge_info(
    auth: &Map<String, Value>,
    custom: &Map<String, Value>,
) -> Result<Map<String, Value>> {
    let mut info = object_member(auth, "info", Source::Auth)?
        .cloned()
        .unwrap_or_default();

    if let Some(custom_info) = object_member(custom, "info", Source::Custom)? {
        for key in ["title", "description"] {
            if let Some(value) = custom_info.get(key) {
                info.insert(key.to_string(), value.clone());
            }
        }
        if info.get("version").is_none_or(Value::is_null)
            && let Some(version) = custom_info.get("version")
        {
            info.insert("version".to_string(), version.clone());
        }
    }

    Ok(info)
}

fn merge_components(
    auth: &Map<String, Value>,
    custom: &Map<String, Value>,
) -> Result<Map<String, Value>> {
    let mut components = object_member(auth, "components", Source::Auth)?
        .cloned()
        .unwrap_or_default();
    let mut schemes = object_member(&components, "securitySchemes", Source::Auth)?
        .cloned()
        .unwrap_or_default();

    if let Some(custom_components) = object_member(custom, "components", Source::Custom)?
        && let Some(custom_schemes) =
            object_member(custom_components, "securitySchemes", Source::Custom)?
    {
        for (name, scheme) in custom_schemes {
            schemes.insert(name.clone(), scheme.clone());
        }
    }

    components.insert("securitySchemes".to_string(), Value::Object(schemes));
    Ok(components)
}

/// Which input a malformed member came from.
#[derive(Debug, Clone, Copy)]
enum Source {
    Auth,
    Custom,
}

impl Source {
    fn error(self, key: &str, expected: &str, found: &Value) -> OpenApiError {
        let message = format!("`{key}` must be {expected}, got {}", json_kind(found));
        match self {
            Source::Auth => OpenApiError::invalid_upstream(message),
            Source::Custom => OpenApiError::invalid_spec(message),
        }
    }
}

/// Look up an optional object member. `null` counts as missing.
fn object_member<'a>(
    doc: &'a Map<String, Value>,
    key: &str,
    source: Source,
) -> Result<Option<&'a Map<String, Value>>> {
    match doc.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(source.error(key, "an object", other)),
    }
}

/// Look up an optional array member. `null` counts as missing.
fn array_member<'a>(
    doc: &'a Map<String, Value>,
    key: &str,
    source: Source,
) -> Result<Option<&'a Vec<Value>>> {
    match doc.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(other) => Err(source.error(key, "an array", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn custom() -> Value {
        json!({
            "openapi": "3.0.3",
            "info": {"title": "Custom", "description": "Custom desc", "version": "1.0.0"},
            "servers": [{"url": "http://localhost:3000"}],
            "paths": {"/api/posts": {"post": {"summary": "Create"}}},
            "components": {"securitySchemes": {"cookieAuth": {"type": "apiKey"}}},
            "tags": [{"name": "Posts"}]
        })
    }

    #[test]
    fn test_merge_paths() {
        let auth = json!({"paths": {"/api/auth/login": {"post": {"summary": "Login"}}}});

        let merged = SchemaMerger::new().merge(&auth, &custom()).unwrap();

        assert!(merged["paths"]["/api/auth/login"]["post"].is_object());
        assert!(merged["paths"]["/api/posts"]["post"].is_object());
        assert_eq!(merged["paths"].as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_info_precedence() {
        let auth = json!({
            "info": {"title": "Auth", "description": "Auth desc", "version": "9.9.9", "x-extra": 1}
        });

        let merged = SchemaMerger::new().merge(&auth, &custom()).unwrap();

        assert_eq!(merged["info"]["title"], "Custom");
        assert_eq!(merged["info"]["description"], "Custom desc");
        assert_eq!(merged["info"]["version"], "9.9.9");
        assert_eq!(merged["info"]["x-extra"], 1);
    }

    #[test]
    fn test_partial_auth_document() {
        let merged = SchemaMerger::new().merge(&json!({}), &custom()).unwrap();

        assert_eq!(merged["info"]["version"], "1.0.0");
        assert_eq!(merged["paths"].as_object().unwrap().len(), 1);
        assert_eq!(merged["tags"], json!([{"name": "Posts"}]));
        assert!(merged["components"]["securitySchemes"]["cookieAuth"].is_object());
    }

    #[test]
    fn test_openapi_and_servers_come_only_from_auth() {
        let merged = SchemaMerger::new().merge(&json!({}), &custom()).unwrap();
        assert!(merged.get("openapi").is_none());
        assert!(merged.get("servers").is_none());

        let auth = json!({"openapi": "3.1.0", "servers": []});
        let merged = SchemaMerger::new().merge(&auth, &custom()).unwrap();
        assert_eq!(merged["openapi"], "3.1.0");
        assert_eq!(merged["servers"], json!([]));
    }

    #[test]
    fn test_merged_path_and_tag_counts() {
        let auth = json!({"paths": {"/a": {"get": {}}}, "tags": [{"name": "A"}]});
        let merged = SchemaMerger::new().merge(&auth, &custom()).unwrap();
        assert_eq!(merged["paths"].as_object().map_or(0, Map::len), 2);
        assert_eq!(merged["tags"].as_array().map_or(0, Vec::len), 2);
    }

    #[test]
    fn test_auth_servers_are_kept() {
        let auth = json!({"servers": [{"url": "https://auth.example.com"}]});
        let merged = SchemaMerger::new().merge(&auth, &custom()).unwrap();
        assert_eq!(merged["servers"], json!([{"url": "https://auth.example.com"}]));
    }

    #[test]
    fn test_path_conflict_rejected_by_default() {
        let auth = json!({"paths": {"/api/posts": {"get": {"summary": "List"}}}});

        let err = SchemaMerger::new().merge(&auth, &custom()).unwrap_err();

        assert!(matches!(err, OpenApiError::PathConflict { path } if path == "/api/posts"));
    }

    #[test]
    fn test_path_conflict_custom_wins_replaces_method_map() {
        let auth = json!({"paths": {"/api/posts": {"get": {"summary": "List"}}}});

        let merged = SchemaMerger::new()
            .path_collision(PathCollision::CustomWins)
            .merge(&auth, &custom())
            .unwrap();

        assert_eq!(merged["paths"]["/api/posts"], json!({"post": {"summary": "Create"}}));
    }

    #[test]
    fn test_security_schemes_custom_wins() {
        let auth = json!({
            "components": {
                "schemas": {"User": {"type": "object"}},
                "securitySchemes": {
                    "bearerAuth": {"type": "http"},
                    "cookieAuth": {"type": "stale"}
                }
            }
        });

        let merged = SchemaMerger::new().merge(&auth, &custom()).unwrap();
        let schemes = &merged["components"]["securitySchemes"];

        assert_eq!(schemes["bearerAuth"]["type"], "http");
        assert_eq!(schemes["cookieAuth"]["type"], "apiKey");
        assert_eq!(merged["components"]["schemas"]["User"]["type"], "object");
    }

    #[test]
    fn test_tags_concatenate_without_dedup() {
        let auth = json!({"tags": [{"name": "Auth"}, {"name": "Posts"}]});

        let merged = SchemaMerger::new().merge(&auth, &custom()).unwrap();

        assert_eq!(
            merged["tags"],
            json!([{"name": "Auth"}, {"name": "Posts"}, {"name": "Posts"}])
        );
    }

    #[test]
    fn test_inputs_are_not_modified() {
        let auth = json!({"paths": {"/api/auth/login": {"post": {}}}});
        let custom = custom();
        let (auth_before, custom_before) = (auth.clone(), custom.clone());

        SchemaMerger::new().merge(&auth, &custom).unwrap();

        assert_eq!(auth, auth_before);
        assert_eq!(custom, custom_before);
    }

    #[test]
    fn test_malformed_auth_members() {
        for auth in [
            json!({"paths": []}),
            json!({"components": "nope"}),
            json!({"components": {"securitySchemes": 3}}),
            json!({"tags": {"name": "Auth"}}),
            json!({"info": "x"}),
        ] {
            let err = SchemaMerger::new().merge(&auth, &custom()).unwrap_err();
            assert!(err.is_upstream(), "expected upstream error for {auth}");
        }
    }

    #[test]
    fn test_non_object_auth_document() {
        let err = SchemaMerger::new().merge(&json!("schema"), &custom()).unwrap_err();
        assert!(matches!(err, OpenApiError::InvalidUpstream { .. }));
    }

    #[test]
    fn test_null_members_count_as_missing() {
        let auth = json!({"paths": null, "tags": null, "components": null});
        let merged = SchemaMerger::new().merge(&auth, &custom()).unwrap();
        assert_eq!(merged["paths"].as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_path_collision_deserializes_kebab_case() {
        let policy: PathCollision = serde_json::from_value(json!("custom-wins")).unwrap();
        assert_eq!(policy, PathCollision::CustomWins);
    }
}
