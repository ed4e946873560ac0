//! MySQL metadata source.
//!
//! MySQL has no schemas distinct from databases, so the schema argument falls
//! back to the catalog (the current database). Every text column is cast to
//! `CHAR` because `information_schema` reports some of them as binary strings.

use std::collections::HashSet;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::Row;
use tracing::debug;

use super::source::{MetadataError, MetadataResult, MetadataSource};
use super::types::{non_negative, ColumnRecord, Nullability, TableEntry};
use crate::config::{ConnectionParams, PoolSettings};

const LIST_TABLES: &str = r#"
SELECT CAST(TABLE_NAME AS CHAR) AS table_name,
       CAST(TABLE_COMMENT AS CHAR) AS remarks
FROM information_schema.TABLES
WHERE TABLE_SCHEMA = ?
  AND TABLE_TYPE = 'BASE TABLE'
ORDER BY TABLE_NAME
"#;

const LIST_PRIMARY_KEY: &str = r#"
SELECT CAST(COLUMN_NAME AS CHAR) AS column_name
FROM information_schema.KEY_COLUMN_USAGE
WHERE TABLE_SCHEMA = ?
  AND TABLE_NAME = ?
  AND CONSTRAINT_NAME = 'PRIMARY'
ORDER BY ORDINAL_POSITION
"#;

const LIST_COLUMNS: &str = r#"
SELECT CAST(COLUMN_NAME AS CHAR) AS column_name,
       CAST(UPPER(DATA_TYPE) AS CHAR) AS type_name,
       CAST(COALESCE(CHARACTER_MAXIMUM_LENGTH, NUMERIC_PRECISION, DATETIME_PRECISION, 0) AS SIGNED) AS column_size,
       CAST(COALESCE(NUMERIC_SCALE, 0) AS SIGNED) AS decimal_digits,
       CAST(IS_NULLABLE AS CHAR) AS is_nullable,
       CAST(COLUMN_DEFAULT AS CHAR) AS column_default,
       CAST(COLUMN_COMMENT AS CHAR) AS remarks,
       CAST(ORDINAL_POSITION AS SIGNED) AS ordinal_position
FROM information_schema.COLUMNS
WHERE TABLE_SCHEMA = ?
  AND TABLE_NAME = ?
ORDER BY ORDINAL_POSITION
"#;

/// Metadata source backed by a MySQL pool.
pub struct MySqlSource {
    pool: MySqlPool,
}

impl MySqlSource {
    /// Open a pool for the given parameters.
    pub async fn connect(params: &ConnectionParams, settings: &PoolSettings) -> MetadataResult<Self> {
        let url = params.redacted_url();
        let mut options =
            MySqlConnectOptions::from_str(&params.sqlx_url()).map_err(|source| {
                MetadataError::InvalidUrl {
                    url: url.clone(),
                    source,
                }
            })?;

        if let Some(username) = &params.username {
            options = options.username(username);
        }
        if let Some(password) = &params.password {
            options = options.password(password);
        }

        let pool = MySqlPoolOptions::new()
            .min_connections(settings.min_idle)
            .max_connections(settings.max_size)
            .acquire_timeout(settings.acquire_timeout())
            .connect_with(options)
            .await
            .map_err(|source| MetadataError::Connect { url, source })?;

        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MetadataSource for MySqlSource {
    async fn database_kind(&self) -> MetadataResult<String> {
        Ok("MySQL".to_string())
    }

    async fn current_catalog(&self) -> MetadataResult<String> {
        let name = sqlx::query_scalar::<_, Option<String>>("SELECT CAST(DATABASE() AS CHAR)")
            .fetch_one(&self.pool)
            .await
            .map_err(MetadataError::query("current_catalog"))?;

        name.ok_or_else(|| MetadataError::source("current_catalog", "no database selected"))
    }

    async fn list_tables(
        &self,
        catalog: &str,
        schema: Option<&str>,
    ) -> MetadataResult<Vec<TableEntry>> {
        let rows = sqlx::query(LIST_TABLES)
            .bind(schema.unwrap_or(catalog))
            .fetch_all(&self.pool)
            .await
            .map_err(MetadataError::query("list_tables"))?;

        rows.iter()
            .map(|row| -> Result<TableEntry, sqlx::Error> {
                Ok(TableEntry {
                    name: row.try_get("table_name")?,
                    comment: row.try_get("remarks")?,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(MetadataError::query("list_tables"))
    }

    async fn list_primary_key_columns(
        &self,
        catalog: &str,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<HashSet<String>> {
        let names = sqlx::query_scalar::<_, String>(LIST_PRIMARY_KEY)
            .bind(schema.unwrap_or(catalog))
            .bind(table)
            .fetch_all(&self.pool)
            .await
            .map_err(MetadataError::query("list_primary_key_columns"))?;

        Ok(names.into_iter().collect())
    }

    async fn list_columns(
        &self,
        catalog: &str,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<Vec<ColumnRecord>> {
        let rows = sqlx::query(LIST_COLUMNS)
            .bind(schema.unwrap_or(catalog))
            .bind(table)
            .fetch_all(&self.pool)
            .await
            .map_err(MetadataError::query("list_columns"))?;

        debug!(table, columns = rows.len(), "fetched mysql columns");

        rows.iter()
            .map(|row| -> Result<ColumnRecord, sqlx::Error> {
                let is_nullable: Option<String> = row.try_get("is_nullable")?;
                Ok(ColumnRecord {
                    name: row.try_get("column_name")?,
                    type_name: row.try_get("type_name")?,
                    length: non_negative(row.try_get("column_size")?),
                    scale: non_negative(row.try_get("decimal_digits")?),
                    nullable: is_nullable
                        .as_deref()
                        .map_or(Nullability::Unknown, Nullability::from_is_nullable),
                    default_value: row.try_get("column_default")?,
                    comment: row.try_get("remarks")?,
                    ordinal: non_negative(row.try_get("ordinal_position")?),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(MetadataError::query("list_columns"))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
