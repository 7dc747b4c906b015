//! Configuration management for the graph client.
//!
//! Configuration is loaded from (in priority order):
//! 1. `NEO4J_PASSWORD` (password only)
//! 2. Environment variables (`FINGRAPH__NEO4J__` prefix)
//! 3. Config file (`fingraph.toml`, `[neo4j]` section)
//! 4. Defaults
//!
//! There is no default password: a client cannot be built until one is set.

use serde::Deserialize;

use crate::error::{FinGraphError, Result};

/// Environment variable that overrides the configured password.
pub const PASSWORD_ENV: &str = "NEO4J_PASSWORD";

/// Default config file prefix.
pub const DEFAULT_CONFIG_PREFIX: &str = "fingraph";

/// Connection parameters for a Neo4j instance.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Neo4jConfig {
    /// Host address shared by the Bolt and HTTP endpoints.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bolt (binary protocol) port.
    #[serde(default = "default_bolt_port")]
    pub bolt_port: u16,

    /// HTTP port used by the liveness check.
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default)]
    pub password: Option<String>,

    /// Driver connection pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Rows pulled per round trip while streaming results.
    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,

    /// Upper bound on the HTTP liveness check, in milliseconds.
    #[serde(default = "default_liveness_timeout_ms")]
    pub liveness_timeout_ms: u64,

    /// Maximum hops for variable-length traversals in the analytics queries.
    #[serde(default = "default_traversal_depth")]
    pub traversal_depth: u32,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_bolt_port() -> u16 {
    7687
}

fn default_http_port() -> u16 {
    7474
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_max_connections() -> u32 {
    16
}

fn default_fetch_size() -> usize {
    256
}

fn default_liveness_timeout_ms() -> u64 {
    2000
}

fn default_traversal_depth() -> u32 {
    4
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            bolt_port: default_bolt_port(),
            http_port: default_http_port(),
            user: default_user(),
            password: None,
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
            liveness_timeout_ms: default_liveness_timeout_ms(),
            traversal_depth: default_traversal_depth(),
        }
    }
}

impl Neo4jConfig {
    /// Bolt connection URI, e.g. `bolt://127.0.0.1:7687`.
    pub fn bolt_uri(&self) -> String {
        format!("bolt://{}:{}", self.host, self.bolt_port)
    }

    /// Username and password, failing if no password has been configured.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        match self.password.as_deref() {
            Some(pw) if !pw.is_empty() => Ok((&self.user, pw)),
            _ => Err(FinGraphError::MissingCredential {
                env_var: PASSWORD_ENV,
            }),
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Load from `{file_prefix}.toml` and the environment, then apply
    /// `NEO4J_PASSWORD` if it is set.
    pub fn load(file_prefix: &str) -> Result<Self> {
        Self::load_with_password(file_prefix, std::env::var(PASSWORD_ENV).ok())
    }

    /// Same as [`Neo4jConfig::load`] with an explicit password override.
    pub fn load_with_password(file_prefix: &str, password: Option<String>) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("FINGRAPH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut loaded = match cfg.get::<Neo4jConfig>("neo4j") {
            Ok(c) => c,
            Err(config::ConfigError::NotFound(_)) => Neo4jConfig::default(),
            Err(e) => return Err(e.into()),
        };

        if let Some(pw) = password.filter(|pw| !pw.is_empty()) {
            tracing::debug!(env_var = PASSWORD_ENV, "Password taken from environment");
            loaded.password = Some(pw);
        }

        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &tempfile::TempDir, body: &str) -> String {
        let path = dir.path().join("fingraph.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        dir.path().join("fingraph").to_string_lossy().into_owned()
    }

    #[test]
    fn test_default_config() {
        let config = Neo4jConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.bolt_port, 7687);
        assert_eq!(config.http_port, 7474);
        assert_eq!(config.user, "neo4j");
        assert_eq!(config.password, None);
        assert_eq!(config.bolt_uri(), "bolt://127.0.0.1:7687");
    }

    #[test]
    fn test_missing_password_fails_fast() {
        let err = Neo4jConfig::default().credentials().unwrap_err();
        assert!(matches!(err, FinGraphError::MissingCredential { env_var: "NEO4J_PASSWORD" }));

        let empty = Neo4jConfig::default().with_password("");
        assert!(empty.credentials().is_err());
    }

    #[test]
    fn test_credentials_with_password() {
        let config = Neo4jConfig::default().with_password("s3cret");
        assert_eq!(config.credentials().unwrap(), ("neo4j", "s3cret"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = write_config(
            &dir,
            r#"
[neo4j]
host = "graph.internal"
bolt_port = 17687
password = "from-file"
traversal_depth = 6
"#,
        );

        let config = Neo4jConfig::load_with_password(&prefix, None).unwrap();
        assert_eq!(config.host, "graph.internal");
        assert_eq!(config.bolt_port, 17687);
        assert_eq!(config.http_port, 7474);
        assert_eq!(config.password.as_deref(), Some("from-file"));
        assert_eq!(config.traversal_depth, 6);
    }

    #[test]
    fn test_password_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = write_config(&dir, "[neo4j]\npassword = \"from-file\"\n");

        let config = Neo4jConfig::load_with_password(&prefix, Some("from-env".into())).unwrap();
        assert_eq!(config.password.as_deref(), Some("from-env"));

        let config = Neo4jConfig::load_with_password(&prefix, Some(String::new())).unwrap();
        assert_eq!(config.password.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("absent").to_string_lossy().into_owned();

        let config = Neo4jConfig::load_with_password(&prefix, None).unwrap();
        assert_eq!(config.bolt_port, 7687);
        assert!(config.credentials().is_err());
    }
}
