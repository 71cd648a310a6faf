//! Server configuration.
//!
//! Read from an optional TOML file; every field has a default, so a missing file
//! (or an empty one) yields a working development setup.

use std::path::{Path, PathBuf};

use hn_core::{ErrorCode, IntoErrorCode};
use hn_openapi::{MarkdownOptions, OpenApiError, PathCollision};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("invalid custom endpoint descriptor: {0}")]
    Descriptor(#[from] OpenApiError),
}

impl IntoErrorCode for ConfigError {
    fn error_code(&self) -> ErrorCode {
        match self {
            ConfigError::Read { .. } | ConfigError::Parse { .. } => ErrorCode::InvalidInput,
            ConfigError::HttpClient(_) | ConfigError::Descriptor(_) => ErrorCode::Internal,
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }
}

/// Deployment environment. Production hides internal error detail from HTTP clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Where the auth service's OpenAPI document comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum AuthSchemaConfig {
    /// Fetch it from the running auth service (port 3001 unless configured).
    Http {
        #[serde(default = "default_auth_schema_url")]
        url: String,
        /// Request timeout; no timeout when unset.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timeout_secs: Option<u64>,
    },
    /// Read it from a JSON file.
    File { path: PathBuf },
}

impl Default for AuthSchemaConfig {
    fn default() -> Self {
        AuthSchemaConfig::Http {
            url: default_auth_schema_url(),
            timeout_secs: None,
        }
    }
}

/// Documentation output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocsConfig {
    /// Directory the export writes its artifacts to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Public URL of this server, used for links in the generated markdown.
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            public_url: default_public_url(),
        }
    }
}

impl DocsConfig {
    pub fn markdown_options(&self) -> MarkdownOptions {
        MarkdownOptions::default().with_base_url(self.public_url.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConfig {
    #[serde(default)]
    pub path_collision: PathCollision,
}

/// Top-level server configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address.
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default)]
    pub environment: Environment,

    #[serde(default)]
    pub auth_schema: AuthSchemaConfig,

    #[serde(default)]
    pub docs: DocsConfig,

    #[serde(default)]
    pub merge: MergeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            environment: Environment::default(),
            auth_schema: AuthSchemaConfig::default(),
            docs: DocsConfig::default(),
            merge: MergeConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load config from disk, or return the default if no path is given or the file
    /// doesn't exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a TOML document.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

fn default_listen() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_auth_schema_url() -> String {
    "http://localhost:3001/api/auth/open-api/generate-schema".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_public_url() -> String {
    "http://localhost:3000".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::parse("").unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.listen, "0.0.0.0:3000");
        assert!(!config.environment.is_production());
        assert_eq!(config.merge.path_collision, PathCollision::Reject);
        assert!(matches!(config.auth_schema, AuthSchemaConfig::Http { timeout_secs: None, .. }));
    }

    #[test]
    fn test_full_config() {
        let config = ServerConfig::parse(
            r#"
listen = "127.0.0.1:8080"
environment = "production"

[auth_schema]
source = "file"
path = "fixtures/auth.json"

[docs]
output_dir = "docs"
public_url = "https://news.example.com"

[merge]
path_collision = "custom-wins"
"#,
        )
        .unwrap();

        assert_eq!(config.listen, "127.0.0.1:8080");
        assert!(config.environment.is_production());
        assert_eq!(
            config.auth_schema,
            AuthSchemaConfig::File {
                path: PathBuf::from("fixtures/auth.json")
            }
        );
        assert_eq!(config.docs.output_dir, PathBuf::from("docs"));
        assert_eq!(
            config.docs.markdown_options().base_url,
            "https://news.example.com"
        );
        assert_eq!(config.merge.path_collision, PathCollision::CustomWins);
    }

    #[test]
    fn test_http_source_defaults_url() {
        let config = ServerConfig::parse(
            r#"
[auth_schema]
source = "http"
timeout_secs = 5
"#,
        )
        .unwrap();

        assert_eq!(
            config.auth_schema,
            AuthSchemaConfig::Http {
                url: default_auth_schema_url(),
                timeout_secs: Some(5),
            }
        );
    }

    #[test]
    fn test_default_auth_url_is_not_served_by_this_server() {
        let config = ServerConfig::default();
        let AuthSchemaConfig::Http { url, .. } = &config.auth_schema else {
            panic!("expected the http source by default");
        };
        let listen_port = config.listen.rsplit(':').next().unwrap();
        assert!(url.starts_with("http://localhost:3001/"));
        assert!(!url.contains(&format!(":{listen_port}/")));
    }

    #[test]
    fn test_unknown_environment_is_rejected() {
        assert!(ServerConfig::parse(r#"environment = "staging""#).is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hn.toml");
        std::fs::write(&path, "listen = [").unwrap();

        let err = ServerConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.error_code(), ErrorCode::InvalidInput);
    }
}
