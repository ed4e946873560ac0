//! Metadata source module.
//!
//! This module provides a vendor-independent view of a database's catalog:
//! base tables, their comments, primary keys and columns.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       MetadataSource                            │
//! │  - database_kind()          - list_tables()                     │
//! │  - current_catalog()        - list_primary_key_columns()        │
//! │  - default_schema()         - list_columns()                    │
//! └─────────────────────────────────────────────────────────────────┘
//!          │                     │                     │
//!          ▼                     ▼                     ▼
//!   PostgresSource          MySqlSource           SqliteSource
//!   (pg_catalog +           (information_schema)  (sqlite_master +
//!    information_schema)                           pragma_table_info)
//!          │                     │                     │
//!          └───────────── sqlx pool (min 2 idle, max 5) ┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use dbdoc::config::{ConnectionParams, PoolSettings};
//! use dbdoc::metadata;
//!
//! let params = ConnectionParams::new("postgres://db/erp").with_credentials("ro", "pw");
//! let driver = params.validate()?;
//! let source = metadata::connect(driver, &params, &PoolSettings::default()).await?;
//!
//! let catalog = source.current_catalog().await?;
//! let tables = source.list_tables(&catalog, None).await?;
//! source.close().await;
//! ```

mod mysql;
mod postgres;
mod source;
mod sqlite;
mod types;

pub use mysql::MySqlSource;
pub use postgres::PostgresSource;
pub use source::{MetadataError, MetadataResult, MetadataSource};
pub use sqlite::SqliteSource;
pub use types::{ColumnRecord, Nullability, TableEntry};

use tracing::info;

use crate::config::{ConnectionParams, Driver, PoolSettings};

/// Open a pooled metadata source for the given driver.
pub async fn connect(
    driver: Driver,
    params: &ConnectionParams,
    pool: &PoolSettings,
) -> MetadataResult<Box<dyn MetadataSource>> {
    info!(
        driver = %driver,
        url = %params.redacted_url(),
        min_idle = pool.min_idle,
        max_size = pool.max_size,
        "opening metadata connection pool"
    );

    let source: Box<dyn MetadataSource> = match driver {
        Driver::Postgres => Box::new(PostgresSource::connect(params, pool).await?),
        Driver::MySql => Box::new(MySqlSource::connect(params, pool).await?),
        Driver::Sqlite => Box::new(SqliteSource::connect(params, pool).await?),
    };

    Ok(source)
}
