//! Application configuration.
//!
//! Precedence, lowest first: built-in defaults, the YAML file, `SWIFT_*`
//! environment variables, command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use swift_adapter_db::ConnectionConfig;
use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "swift_codes.db";

pub const ENV_DATABASE_URL: &str = "SWIFT_DATABASE_URL";
pub const ENV_DATABASE_AUTH_TOKEN: &str = "SWIFT_DATABASE_AUTH_TOKEN";
pub const ENV_COUNTRIES_PATH: &str = "SWIFT_COUNTRIES_PATH";
pub const ENV_IMPORT_PATH: &str = "SWIFT_IMPORT_PATH";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseSettings {
    pub url: String,
    pub auth_token: Option<String>,
    pub max_connections: usize,
    pub timeout_ms: u64,
    /// Unset keeps the default for the URL kind
    pub retry_attempts: Option<usize>,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        let local = ConnectionConfig::local(DEFAULT_DATABASE_URL);
        Self {
            url: local.database_url,
            auth_token: None,
            max_connections: local.max_connections,
            timeout_ms: local.timeout_ms,
            retry_attempts: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    /// Country reference CSV; the embedded table is used when unset
    pub countries_path: Option<PathBuf>,
    /// Batch file used by `import` when none is given on the command line
    pub import_path: Option<PathBuf>,
}

impl AppConfig {
    /// Defaults, overlaid with `path` when given, then with the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }

    /// Override fields from variables returned by `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(value) = lookup(ENV_DATABASE_URL) {
            self.database.url = value;
        }
        if let Some(value) = lookup(ENV_DATABASE_AUTH_TOKEN) {
            self.database.auth_token = Some(value);
        }
        if let Some(value) = lookup(ENV_COUNTRIES_PATH) {
            self.countries_path = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup(ENV_IMPORT_PATH) {
            self.import_path = Some(PathBuf::from(value));
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Invalid("database.url must not be empty".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than zero".to_string(),
            ));
        }
        if self.database.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "database.timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Store settings for this configuration.
    pub fn connection(&self) -> ConnectionConfig {
        let base = ConnectionConfig::from_url(
            self.database.url.clone(),
            self.database.auth_token.clone(),
        );
        ConnectionConfig {
            max_connections: self.database.max_connections,
            timeout_ms: self.database.timeout_ms,
            retry_attempts: self.database.retry_attempts.unwrap_or(base.retry_attempts),
            ..base
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.database.url, "swift_codes.db");
        assert!(config.countries_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_overrides_defaults() {
        let config = AppConfig::from_yaml(
            "database:\n  url: \":memory:\"\n  max_connections: 2\nimport_path: data/codes.csv\n",
        )
        .unwrap();
        assert_eq!(config.database.url, ":memory:");
        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.database.timeout_ms, 5_000);
        assert_eq!(config.import_path, Some(PathBuf::from("data/codes.csv")));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(AppConfig::from_yaml("databse:\n  url: x\n").is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let vars: HashMap<&str, &str> = [
            (ENV_DATABASE_URL, "libsql://registry.example"),
            (ENV_DATABASE_AUTH_TOKEN, "secret"),
            (ENV_COUNTRIES_PATH, "/etc/countries.csv"),
            (ENV_IMPORT_PATH, ""),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::from_yaml("import_path: batch.csv\n").unwrap();
        config.apply_env(|name| vars.get(name).map(|value| (*value).to_string()));

        assert_eq!(config.database.url, "libsql://registry.example");
        assert_eq!(config.countries_path, Some(PathBuf::from("/etc/countries.csv")));
        assert_eq!(config.import_path, Some(PathBuf::from("batch.csv")));

        let connection = config.connection();
        assert_eq!(connection.auth_token.as_deref(), Some("secret"));
        assert_eq!(connection.max_connections, 8);
        assert_eq!(connection.retry_attempts, 2);
    }

    #[test]
    fn test_retry_attempts_only_override_when_set() {
        let mut config = AppConfig::default();
        assert_eq!(config.connection().retry_attempts, 0);

        config.database.url = "libsql://registry.example".to_string();
        assert_eq!(config.connection().retry_attempts, 2);

        let config = AppConfig::from_yaml(
            "database:\n  url: libsql://registry.example\n  retry_attempts: 5\n",
        )
        .unwrap();
        assert_eq!(config.database.retry_attempts, Some(5));
        assert_eq!(config.connection().retry_attempts, 5);
    }

    #[test]
    fn test_in_memory_url_needs_no_token() {
        let mut config = AppConfig::default();
        config.database.url = ":memory:".to_string();
        let connection = config.connection();
        assert_eq!(connection.database_url, ":memory:");
        assert_eq!(connection.auth_token, None);
    }

    #[test]
    fn test_from_file_errors() {
        let err = AppConfig::from_file(Path::new("/no/such/config.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"database: [not, a, map]\n").unwrap();
        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_validate_rejects_zero_pool() {
        let mut config = AppConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }
}
