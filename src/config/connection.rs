//! Database connection parameters.
//!
//! Front ends may fill these from flags, a settings file, or the environment:
//! - `DBDOC_DB_DRIVER`: Database driver (postgres, mysql, sqlite)
//! - `DBDOC_DB_URL`: Connection URL
//! - `DBDOC_DB_USER` / `DBDOC_DB_PASSWORD`: Credentials
//! - `DBDOC_DB_SCHEMA`: Schema to document (optional)

use std::env;

use serde::{Deserialize, Serialize};

/// Error type for connection configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("Missing required connection parameter: {0}")]
    MissingParameter(String),

    #[error("Unsupported driver: {0}. Supported: postgres, mysql, sqlite")]
    UnsupportedDriver(String),
}

/// Supported database drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    /// PostgreSQL
    Postgres,
    /// MySQL / MariaDB
    MySql,
    /// SQLite (file)
    Sqlite,
}

impl Driver {
    /// Parse driver from a short name or a JDBC driver class name.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, ConnectionError> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" | "org.postgresql.driver" => Ok(Driver::Postgres),
            "mysql" | "mariadb" | "com.mysql.cj.jdbc.driver" | "com.mysql.jdbc.driver"
            | "org.mariadb.jdbc.driver" => Ok(Driver::MySql),
            "sqlite" | "sqlite3" | "org.sqlite.jdbc" => Ok(Driver::Sqlite),
            other => Err(ConnectionError::UnsupportedDriver(other.to_string())),
        }
    }

    /// Infer the driver from a URL scheme. `jdbc:` prefixes are tolerated.
    pub fn infer_from_url(url: &str) -> Option<Self> {
        let url = url.trim();
        let url = url.strip_prefix("jdbc:").unwrap_or(url);
        let scheme = url.split(':').next()?;
        Self::from_str(scheme).ok()
    }

    /// Get the canonical driver name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Driver::Postgres => "postgres",
            Driver::MySql => "mysql",
            Driver::Sqlite => "sqlite",
        }
    }

    /// Whether the driver talks to a server that needs credentials.
    pub fn requires_credentials(&self) -> bool {
        !matches!(self, Driver::Sqlite)
    }
}

impl std::fmt::Display for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database connection parameters.
#[derive(Debug, Clone, Default)]
pub struct ConnectionParams {
    /// Driver identifier (short name or JDBC class name). Inferred from the
    /// URL when empty.
    pub driver: Option<String>,
    /// Connection URL.
    pub url: String,
    /// Username (required for server databases).
    pub username: Option<String>,
    /// Password.
    pub password: Option<String>,
    /// Schema to document. Falls back to the vendor's current schema.
    pub schema: Option<String>,
}

impl ConnectionParams {
    /// Create connection parameters for a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the driver identifier.
    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = Some(driver.into());
        self
    }

    /// Set username and password.
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the schema to document.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Load parameters from environment variables.
    ///
    /// Required: `DBDOC_DB_URL`. Optional: `DBDOC_DB_DRIVER`, `DBDOC_DB_USER`,
    /// `DBDOC_DB_PASSWORD`, `DBDOC_DB_SCHEMA`.
    pub fn from_env() -> Result<Self, ConnectionError> {
        let url = env::var("DBDOC_DB_URL")
            .map_err(|_| ConnectionError::MissingParameter("DBDOC_DB_URL".to_string()))?;

        Ok(Self {
            driver: env::var("DBDOC_DB_DRIVER").ok(),
            url,
            username: env::var("DBDOC_DB_USER").ok(),
            password: env::var("DBDOC_DB_PASSWORD").ok(),
            schema: env::var("DBDOC_DB_SCHEMA").ok().filter(|s| !s.is_empty()),
        })
    }

    /// Resolve the driver, either from the explicit identifier or the URL.
    pub fn resolve_driver(&self) -> Result<Driver, ConnectionError> {
        match self.driver.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(name) => Driver::from_str(name),
            None => Driver::infer_from_url(&self.url)
                .ok_or_else(|| ConnectionError::MissingParameter("driver".to_string())),
        }
    }

    /// Check that every required parameter is present.
    pub fn validate(&self) -> Result<Driver, ConnectionError> {
        if self.url.trim().is_empty() {
            return Err(ConnectionError::MissingParameter("url".to_string()));
        }

        let driver = self.resolve_driver()?;

        if driver.requires_credentials()
            && self.username.as_deref().map_or(true, |u| u.trim().is_empty())
        {
            return Err(ConnectionError::MissingParameter("username".to_string()));
        }

        Ok(driver)
    }

    /// The URL in the form sqlx expects: no `jdbc:` prefix, and `mariadb:`
    /// spelled as `mysql:`.
    pub fn sqlx_url(&self) -> String {
        let url = self.url.trim();
        let url = url.strip_prefix("jdbc:").unwrap_or(url);
        match url.strip_prefix("mariadb:") {
            Some(rest) => format!("mysql:{}", rest),
            None => url.to_string(),
        }
    }

    /// The URL with any embedded password masked, for logging.
    pub fn redacted_url(&self) -> String {
        let url = self.sqlx_url();
        let Some((scheme, rest)) = url.split_once("://") else {
            return url.clone();
        };
        match rest.split_once('@') {
            Some((userinfo, host)) => match userinfo.split_once(':') {
                Some((user, _)) => format!("{}://{}:***@{}", scheme, user, host),
                None => url.clone(),
            },
            None => url.clone(),
        }
    }
}
