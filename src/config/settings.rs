//! TOML-based configuration for dbdoc.
//!
//! Supports a config file (dbdoc.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [connections.production]
//! driver = "postgres"
//! url = "postgres://db.internal:5432/erp"
//! username = "readonly"
//! password = "${ERP_DB_PASSWORD}"
//! schema = "public"
//!
//! [connections.local]
//! url = "sqlite://./data/dev.db"
//!
//! [pool]
//! min_idle = 2
//! max_size = 5
//!
//! [filter]
//! include_prefixes = ["t_"]
//! exclude_suffixes = ["_bak"]
//!
//! [output]
//! dir = "./docs"
//! title = "erp-schema"
//! file_type = "excel"
//!
//! [engine]
//! command = "schema-doc-engine"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::connection::{ConnectionParams, Driver};
use crate::filter::FilterSpec;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Connection not found: {0}")]
    ConnectionNotFound(String),

    #[error("Unsupported driver: {0}")]
    UnsupportedDriver(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Named database connections.
    pub connections: BTreeMap<String, ConnectionSettings>,

    /// Connection pool configuration.
    pub pool: PoolSettings,

    /// Table filter applied to every run.
    pub filter: FilterSpec,

    /// Output defaults.
    pub output: OutputSettings,

    /// External engine for non-workbook formats.
    pub engine: EngineSettings,
}

/// Connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionSettings {
    /// Database driver (postgres, mysql, sqlite, or a JDBC class name).
    /// Inferred from the URL when absent.
    #[serde(default)]
    pub driver: Option<String>,

    /// Connection URL (supports ${ENV_VAR} expansion).
    pub url: String,

    /// Username (supports ${ENV_VAR} expansion).
    #[serde(default)]
    pub username: Option<String>,

    /// Password (supports ${ENV_VAR} expansion).
    #[serde(default)]
    pub password: Option<String>,

    /// Schema to document.
    #[serde(default)]
    pub schema: Option<String>,
}

impl ConnectionSettings {
    /// Get the driver type.
    pub fn driver_type(&self) -> Result<Driver, SettingsError> {
        match &self.driver {
            Some(name) => {
                Driver::from_str(name).map_err(|_| SettingsError::UnsupportedDriver(name.clone()))
            }
            None => Driver::infer_from_url(&self.url)
                .ok_or_else(|| SettingsError::UnsupportedDriver(self.url.clone())),
        }
    }

    /// Resolve into connection parameters with environment variables expanded.
    pub fn to_params(&self) -> Result<ConnectionParams, SettingsError> {
        Ok(ConnectionParams {
            driver: self.driver.clone(),
            url: expand_env_vars(&self.url)?,
            username: self.username.as_deref().map(expand_env_vars).transpose()?,
            password: self.password.as_deref().map(expand_env_vars).transpose()?,
            schema: self.schema.clone().filter(|s| !s.is_empty()),
        })
    }
}

/// Connection pool settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PoolSettings {
    /// Minimum number of idle connections kept open.
    pub min_idle: u32,

    /// Maximum number of concurrent connections.
    pub max_size: u32,

    /// Seconds to wait for a connection before giving up.
    pub acquire_timeout_secs: u64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            min_idle: 2,
            max_size: 5,
            acquire_timeout_secs: 30,
        }
    }
}

impl PoolSettings {
    /// Acquire timeout as a duration.
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

/// Output defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory the document is written to.
    pub dir: PathBuf,

    /// Document title; becomes the file name.
    pub title: String,

    /// Output type: excel, html, word, markdown.
    pub file_type: String,

    /// Document version, passed to the external engine.
    pub version: String,

    /// Document description, passed to the external engine.
    pub description: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            title: "database-document".to_string(),
            file_type: "excel".to_string(),
            version: "1.0.0".to_string(),
            description: "Generated by dbdoc".to_string(),
        }
    }
}

/// External document engine settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Engine executable. Non-workbook formats fail without one.
    pub command: Option<String>,

    /// Extra arguments placed before the generated ones.
    pub args: Vec<String>,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `DBDOC_CONFIG`
    /// 2. `./dbdoc.toml`
    /// 3. `~/.config/dbdoc/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("DBDOC_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("dbdoc.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("dbdoc").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Get a connection by name.
    pub fn get_connection(&self, name: &str) -> Result<&ConnectionSettings, SettingsError> {
        self.connections
            .get(name)
            .ok_or_else(|| SettingsError::ConnectionNotFound(name.to_string()))
    }

    /// Get the default connection ("default" if it exists, otherwise the
    /// first one by name).
    pub fn default_connection(&self) -> Option<(&str, &ConnectionSettings)> {
        if let Some(conn) = self.connections.get("default") {
            return Some(("default", conn));
        }
        self.connections.iter().next().map(|(k, v)| (k.as_str(), v))
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. A lone `$` is kept as is.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            while let Some(&ch) = chars.peek() {
                if ch.is_alphanumeric() || ch == '_' {
                    var_name.push(ch);
                    chars.next();
                } else {
                    break;
                }
            }
            if var_name.is_empty() {
                result.push('$');
                continue;
            }
        }

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
