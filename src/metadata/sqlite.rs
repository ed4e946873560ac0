//! SQLite metadata source.
//!
//! SQLite keeps no comments, so table and column comments are always absent.
//! Column sizes are recovered from the declared type, e.g. `DECIMAL(10,2)`.

use std::collections::HashSet;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tracing::debug;

use super::source::{MetadataError, MetadataResult, MetadataSource};
use super::types::{non_negative, ColumnRecord, Nullability, TableEntry};
use crate::config::{ConnectionParams, PoolSettings};

const MAIN_SCHEMA: &str = "main";

const TABLE_INFO: &str = r#"
SELECT name, type, "notnull" AS not_null, dflt_value, pk, cid
FROM pragma_table_info(?1, ?2)
ORDER BY cid
"#;

/// Metadata source backed by a SQLite pool.
pub struct SqliteSource {
    pool: SqlitePool,
}

impl SqliteSource {
    /// Open a read-only pool on an existing database file.
    pub async fn connect(params: &ConnectionParams, settings: &PoolSettings) -> MetadataResult<Self> {
        let url = params.redacted_url();
        let options = SqliteConnectOptions::from_str(&params.sqlx_url())
            .map_err(|source| MetadataError::InvalidUrl {
                url: url.clone(),
                source,
            })?
            .read_only(true);

        let pool = SqlitePoolOptions::new()
            .min_connections(settings.min_idle)
            .max_connections(settings.max_size)
            .acquire_timeout(settings.acquire_timeout())
            .connect_with(options)
            .await
            .map_err(|source| MetadataError::Connect { url, source })?;

        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn table_info(
        &self,
        schema: Option<&str>,
        table: &str,
        operation: &'static str,
    ) -> MetadataResult<Vec<sqlx::sqlite::SqliteRow>> {
        sqlx::query(TABLE_INFO)
            .bind(table)
            .bind(schema.unwrap_or(MAIN_SCHEMA))
            .fetch_all(&self.pool)
            .await
            .map_err(MetadataError::query(operation))
    }
}

#[async_trait]
impl MetadataSource for SqliteSource {
    async fn database_kind(&self) -> MetadataResult<String> {
        Ok("SQLite".to_string())
    }

    async fn current_catalog(&self) -> MetadataResult<String> {
        Ok(MAIN_SCHEMA.to_string())
    }

    async fn list_tables(
        &self,
        _catalog: &str,
        schema: Option<&str>,
    ) -> MetadataResult<Vec<TableEntry>> {
        let schema = schema.unwrap_or(MAIN_SCHEMA).replace('"', "\"\"");
        let sql = format!(
            "SELECT name FROM \"{}\".sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' \
             ORDER BY name",
            schema
        );

        let names = sqlx::query_scalar::<_, String>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(MetadataError::query("list_tables"))?;

        Ok(names.into_iter().map(TableEntry::new).collect())
    }

    async fn list_primary_key_columns(
        &self,
        _catalog: &str,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<HashSet<String>> {
        let rows = self
            .table_info(schema, table, "list_primary_key_columns")
            .await?;

        let mut keys = HashSet::new();
        for row in &rows {
            let pk: i64 = row
                .try_get("pk")
                .map_err(MetadataError::query("list_primary_key_columns"))?;
            if pk > 0 {
                let name: String = row
                    .try_get("name")
                    .map_err(MetadataError::query("list_primary_key_columns"))?;
                keys.insert(name);
            }
        }
        Ok(keys)
    }

    async fn list_columns(
        &self,
        _catalog: &str,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<Vec<ColumnRecord>> {
        let rows = self.table_info(schema, table, "list_columns").await?;

        debug!(table, columns = rows.len(), "fetched sqlite columns");

        rows.iter()
            .map(|row| -> Result<ColumnRecord, sqlx::Error> {
                let declared: Option<String> = row.try_get("type")?;
                let (type_name, length, scale) = split_declared_type(declared.as_deref().unwrap_or(""));
                let not_null: i64 = row.try_get("not_null")?;
                let cid: i64 = row.try_get("cid")?;

                Ok(ColumnRecord {
                    name: row.try_get("name")?,
                    type_name,
                    length,
                    scale,
                    nullable: if not_null != 0 {
                        Nullability::NoNulls
                    } else {
                        Nullability::Nullable
                    },
                    default_value: row.try_get("dflt_value")?,
                    comment: None,
                    ordinal: non_negative(Some(cid + 1)),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(MetadataError::query("list_columns"))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Split a declared type such as `VARCHAR(64)` or `DECIMAL(10, 2)` into
/// name, length and scale.
pub(crate) fn split_declared_type(declared: &str) -> (String, u32, u32) {
    let declared = declared.trim();
    let Some(open) = declared.find('(') else {
        return (declared.to_string(), 0, 0);
    };

    let name = declared[..open].trim().to_string();
    let args = declared[open + 1..].trim_end_matches(')');
    let mut parts = args.split(',').map(|p| p.trim().parse::<u32>().unwrap_or(0));
    let length = parts.next().unwrap_or(0);
    let scale = parts.next().unwrap_or(0);

    (name, length, scale)
}
