//! MetadataSource trait definition.
//!
//! The MetadataSource trait abstracts over vendor catalogs. Every operation is
//! a read; none of them change the database.

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

use super::types::{ColumnRecord, TableEntry};

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Errors raised by a metadata source.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// The connection URL could not be parsed.
    #[error("invalid connection url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    /// The pool could not open its connections.
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    /// A catalog query failed.
    #[error("{operation} failed: {source}")]
    Query {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// A source that is not backed by sqlx reported a failure.
    #[error("{operation} failed: {message}")]
    Source {
        operation: &'static str,
        message: String,
    },
}

impl MetadataError {
    pub(crate) fn query(operation: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Query { operation, source }
    }

    /// Create a failure for sources without an underlying sqlx error.
    pub fn source(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Source {
            operation,
            message: message.into(),
        }
    }
}

/// Uniform, vendor-independent view of schema metadata.
///
/// `catalog` and `schema` follow JDBC conventions: `schema` is `None` when
/// the caller did not name one, in which case the source uses its own default.
///
/// # Example
///
/// ```ignore
/// use dbdoc::metadata::MetadataSource;
///
/// async fn example(source: &dyn MetadataSource) -> MetadataResult<()> {
///     let catalog = source.current_catalog().await?;
///     for table in source.list_tables(&catalog, None).await? {
///         let pk = source.list_primary_key_columns(&catalog, None, &table.name).await?;
///         let columns = source.list_columns(&catalog, None, &table.name).await?;
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Vendor product name, e.g. "PostgreSQL".
    async fn database_kind(&self) -> MetadataResult<String>;

    /// Name of the catalog the connection is bound to.
    async fn current_catalog(&self) -> MetadataResult<String>;

    /// The schema used when the caller names none.
    async fn default_schema(&self) -> MetadataResult<Option<String>> {
        Ok(None)
    }

    /// Base tables only (no views, system or temporary tables), in the
    /// vendor's discovery order.
    async fn list_tables(&self, catalog: &str, schema: Option<&str>)
        -> MetadataResult<Vec<TableEntry>>;

    /// Names of the columns forming the table's primary key.
    async fn list_primary_key_columns(
        &self,
        catalog: &str,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<HashSet<String>>;

    /// Columns of the table in ordinal order.
    async fn list_columns(
        &self,
        catalog: &str,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<Vec<ColumnRecord>>;

    /// Release pooled connections. Later calls fail.
    async fn close(&self) {}
}
