//! Configuration module for vimi.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, VimiError};

/// Environment variable that overrides `web.jwt_secret`.
pub const JWT_SECRET_ENV: &str = "VIMI_JWT_SECRET";

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/vimi.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Console only when unset.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Private messaging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagingConfig {
    /// Name of the environment variable holding the hex encoded message key.
    #[serde(default = "default_key_env")]
    pub key_env: String,
}

fn default_key_env() -> String {
    "MESSAGE_ENCRYPTION_KEY".to_string()
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            key_env: default_key_env(),
        }
    }
}

/// Web API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Host address to bind.
    #[serde(default = "default_web_host")]
    pub host: String,
    /// Port number for the Web API.
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Secret shared with the identity provider for verifying bearer tokens.
    #[serde(default)]
    pub jwt_secret: String,
}

fn default_web_host() -> String {
    "0.0.0.0".to_string()
}

fn default_web_port() -> u16 {
    8080
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
            cors_origins: vec![],
            jwt_secret: String::new(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Web API configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Private messaging configuration.
    #[serde(default)]
    pub messaging: MessagingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(VimiError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| VimiError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `VIMI_JWT_SECRET`: Override the JWT secret key
    pub fn apply_env_overrides(&mut self) {
        if let Ok(jwt_secret) = std::env::var(JWT_SECRET_ENV) {
            if !jwt_secret.is_empty() {
                self.web.jwt_secret = jwt_secret;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// The message key itself is checked by the key provider at startup,
    /// here only the name of its variable is checked.
    pub fn validate(&self) -> Result<()> {
        if self.web.jwt_secret.is_empty() {
            return Err(VimiError::Config(format!(
                "jwt_secret is not set. Set it in config.toml or via {JWT_SECRET_ENV}."
            )));
        }
        if self.messaging.key_env.trim().is_empty() {
            return Err(VimiError::Config(
                "messaging.key_env must name an environment variable".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.web.host, "0.0.0.0");
        assert_eq!(config.web.port, 8080);
        assert!(config.web.cors_origins.is_empty());
        assert!(config.web.jwt_secret.is_empty());

        assert_eq!(config.database.path, "data/vimi.db");
        assert_eq!(config.database.max_connections, 5);

        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_none());

        assert_eq!(config.messaging.key_env, "MESSAGE_ENCRYPTION_KEY");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[web]
host = "127.0.0.1"
port = 3000
cors_origins = ["http://localhost:5173"]
jwt_secret = "test-secret-key"

[database]
path = "custom/db.sqlite"
max_connections = 10

[logging]
level = "debug"
file = "logs/vimi.log"

[messaging]
key_env = "FORUM_PM_KEY"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.web.host, "127.0.0.1");
        assert_eq!(config.web.port, 3000);
        assert_eq!(config.web.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.web.jwt_secret, "test-secret-key");

        assert_eq!(config.database.path, "custom/db.sqlite");
        assert_eq!(config.database.max_connections, 10);

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file.as_deref(), Some("logs/vimi.log"));

        assert_eq!(config.messaging.key_env, "FORUM_PM_KEY");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[web]
port = 9000
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.web.port, 9000);
        assert_eq!(config.web.host, "0.0.0.0");
        assert_eq!(config.database.path, "data/vimi.db");
        assert_eq!(config.messaging.key_env, "MESSAGE_ENCRYPTION_KEY");
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        match result {
            Err(VimiError::Config(msg)) => assert!(msg.contains("config parse error")),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");
        assert!(matches!(result, Err(VimiError::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[web]\nport = 4000\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.web.port, 4000);
    }

    #[test]
    fn test_apply_env_overrides_jwt_secret() {
        let original = std::env::var(JWT_SECRET_ENV).ok();

        std::env::set_var(JWT_SECRET_ENV, "env-secret-key");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.web.jwt_secret, "env-secret-key");

        // Empty values never override
        std::env::set_var(JWT_SECRET_ENV, "");
        config.web.jwt_secret = "original-secret".to_string();
        config.apply_env_overrides();
        assert_eq!(config.web.jwt_secret, "original-secret");

        match original {
            Some(val) => std::env::set_var(JWT_SECRET_ENV, val),
            None => std::env::remove_var(JWT_SECRET_ENV),
        }
    }

    #[test]
    fn test_validate_requires_jwt_secret() {
        let config = Config::default();

        match config.validate() {
            Err(VimiError::Config(msg)) => assert!(msg.contains("jwt_secret")),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_requires_key_env_name() {
        let mut config = Config::default();
        config.web.jwt_secret = "secret".to_string();
        config.messaging.key_env = "  ".to_string();

        assert!(matches!(config.validate(), Err(VimiError::Config(_))));
    }

    #[test]
    fn test_validate_ok() {
        let mut config = Config::default();
        config.web.jwt_secret = "secret".to_string();

        assert!(config.validate().is_ok());
    }
}
