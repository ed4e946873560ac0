//! PostgreSQL metadata source.
//!
//! Tables and comments come from `pg_catalog`; columns and keys from
//! `information_schema`. Sessions are opened with
//! `default_transaction_read_only` so nothing can be written by accident.

use std::collections::HashSet;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::Row;
use tracing::debug;

use super::source::{MetadataError, MetadataResult, MetadataSource};
use super::types::{non_negative, ColumnRecord, Nullability, TableEntry};
use crate::config::{ConnectionParams, PoolSettings};

const LIST_TABLES: &str = r#"
SELECT c.relname::text AS table_name,
       obj_description(c.oid, 'pg_class') AS remarks
FROM pg_catalog.pg_class c
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
WHERE c.relkind IN ('r', 'p')
  AND n.nspname = COALESCE($1::text, current_schema())
ORDER BY c.relname
"#;

const LIST_PRIMARY_KEY: &str = r#"
SELECT kcu.column_name::text AS column_name
FROM information_schema.table_constraints tc
JOIN information_schema.key_column_usage kcu
  ON kcu.constraint_schema = tc.constraint_schema
 AND kcu.constraint_name = tc.constraint_name
 AND kcu.table_name = tc.table_name
WHERE tc.constraint_type = 'PRIMARY KEY'
  AND tc.table_schema = COALESCE($1::text, current_schema())
  AND tc.table_name = $2::text
ORDER BY kcu.ordinal_position
"#;

const LIST_COLUMNS: &str = r#"
SELECT c.column_name::text AS column_name,
       c.udt_name::text AS type_name,
       COALESCE(c.character_maximum_length, c.numeric_precision, c.datetime_precision, 0)::int8 AS column_size,
       COALESCE(c.numeric_scale, 0)::int8 AS decimal_digits,
       c.is_nullable::text AS is_nullable,
       c.column_default::text AS column_default,
       col_description(format('%I.%I', c.table_schema, c.table_name)::regclass,
                       c.ordinal_position::int) AS remarks,
       c.ordinal_position::int8 AS ordinal_position
FROM information_schema.columns c
WHERE c.table_schema = COALESCE($1::text, current_schema())
  AND c.table_name = $2::text
ORDER BY c.ordinal_position
"#;

/// Metadata source backed by a PostgreSQL pool.
pub struct PostgresSource {
    pool: PgPool,
}

impl PostgresSource {
    /// Open a pool for the given parameters.
    pub async fn connect(params: &ConnectionParams, settings: &PoolSettings) -> MetadataResult<Self> {
        let url = params.redacted_url();
        let mut options =
            PgConnectOptions::from_str(&params.sqlx_url()).map_err(|source| {
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
        let options = options.options([("default_transaction_read_only", "on")]);

        let pool = PgPoolOptions::new()
            .min_connections(settings.min_idle)
            .max_connections(settings.max_size)
            .acquire_timeout(settings.acquire_timeout())
            .connect_with(options)
            .await
            .map_err(|source| MetadataError::Connect { url, source })?;

        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MetadataSource for PostgresSource {
    async fn database_kind(&self) -> MetadataResult<String> {
        Ok("PostgreSQL".to_string())
    }

    async fn current_catalog(&self) -> MetadataResult<String> {
        sqlx::query_scalar::<_, String>("SELECT current_database()::text")
            .fetch_one(&self.pool)
            .await
            .map_err(MetadataError::query("current_catalog"))
    }

    async fn default_schema(&self) -> MetadataResult<Option<String>> {
        sqlx::query_scalar::<_, Option<String>>("SELECT current_schema()::text")
            .fetch_one(&self.pool)
            .await
            .map_err(MetadataError::query("default_schema"))
    }

    async fn list_tables(
        &self,
        _catalog: &str,
        schema: Option<&str>,
    ) -> MetadataResult<Vec<TableEntry>> {
        let rows = sqlx::query(LIST_TABLES)
            .bind(schema)
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
        _catalog: &str,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<HashSet<String>> {
        let names = sqlx::query_scalar::<_, String>(LIST_PRIMARY_KEY)
            .bind(schema)
            .bind(table)
            .fetch_all(&self.pool)
            .await
            .map_err(MetadataError::query("list_primary_key_columns"))?;

        Ok(names.into_iter().collect())
    }

    async fn list_columns(
        &self,
        _catalog: &str,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<Vec<ColumnRecord>> {
        let rows = sqlx::query(LIST_COLUMNS)
            .bind(schema)
            .bind(table)
            .fetch_all(&self.pool)
            .await
            .map_err(MetadataError::query("list_columns"))?;

        debug!(table, columns = rows.len(), "fetched postgres columns");

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
