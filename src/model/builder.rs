//! Builds a [`SchemaSnapshot`] from a metadata source.
//!
//! ```text
//! kind + catalog ──► list_tables ──► filter ──► per admitted table:
//!                                                 primary keys (once)
//!                                                 columns (ordinal order)
//! ```
//!
//! Any metadata failure aborts the build; a partial snapshot is never
//! returned.

use std::collections::HashSet;

use chrono::{DateTime, Local};
use tracing::{debug, info};

use super::{Column, SchemaSnapshot, Table};
use crate::filter::{FilterSpec, TableFilter};
use crate::metadata::{ColumnRecord, MetadataResult, MetadataSource, Nullability, TableEntry};

pub struct SchemaModelBuilder<'a> {
    source: &'a dyn MetadataSource,
    filter: TableFilter,
    schema: Option<String>,
    generated_at: Option<DateTime<Local>>,
}

impl<'a> SchemaModelBuilder<'a> {
    pub fn new(source: &'a dyn MetadataSource) -> Self {
        Self {
            source,
            filter: TableFilter::default(),
            schema: None,
            generated_at: None,
        }
    }

    pub fn with_filter(mut self, spec: &FilterSpec) -> Self {
        self.filter = TableFilter::new(spec);
        self
    }

    /// Document this schema instead of the source's default one.
    pub fn with_schema(mut self, schema: Option<String>) -> Self {
        self.schema = schema.filter(|s| !s.is_empty());
        self
    }

    /// Pin the generation timestamp instead of reading the clock.
    pub fn generated_at(mut self, at: DateTime<Local>) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Names of the tables that pass the filter, in discovery order.
    pub async fn admitted_tables(&self) -> MetadataResult<Vec<TableEntry>> {
        let catalog = self.source.current_catalog().await?;
        let schema = self.effective_schema().await?;
        let tables = self.source.list_tables(&catalog, schema.as_deref()).await?;

        Ok(tables
            .into_iter()
            .filter(|t| self.filter.admits(&t.name))
            .collect())
    }

    pub async fn build(self) -> MetadataResult<SchemaSnapshot> {
        let generated_at = self.generated_at.unwrap_or_else(Local::now);

        let database_kind = self.source.database_kind().await?;
        let catalog = self.source.current_catalog().await?;
        let database_name = self.schema.clone().unwrap_or_else(|| catalog.clone());
        let schema = self.effective_schema().await?;

        let candidates = self.source.list_tables(&catalog, schema.as_deref()).await?;
        info!(
            database_kind = %database_kind,
            database_name = %database_name,
            candidates = candidates.len(),
            "building schema snapshot"
        );

        let mut tables = Vec::new();
        for entry in candidates {
            if !self.filter.admits(&entry.name) {
                debug!(table = %entry.name, "table rejected by filter");
                continue;
            }
            tables.push(self.build_table(&catalog, schema.as_deref(), entry).await?);
        }

        info!(tables = tables.len(), "schema snapshot ready");

        Ok(SchemaSnapshot {
            database_kind,
            database_name,
            tables,
            generated_at,
        })
    }

    async fn effective_schema(&self) -> MetadataResult<Option<String>> {
        match &self.schema {
            Some(schema) => Ok(Some(schema.clone())),
            None => self.source.default_schema().await,
        }
    }

    async fn build_table(
        &self,
        catalog: &str,
        schema: Option<&str>,
        entry: TableEntry,
    ) -> MetadataResult<Table> {
        let primary_key = self
            .source
            .list_primary_key_columns(catalog, schema, &entry.name)
            .await?;
        let records = self.source.list_columns(catalog, schema, &entry.name).await?;

        // One row per reported column; a repeated name stays visible.
        let columns: Vec<Column> = records
            .into_iter()
            .map(|record| to_column(record, &primary_key))
            .collect();

        debug!(table = %entry.name, columns = columns.len(), "table materialised");

        Ok(Table {
            name: entry.name,
            comment: entry.comment.unwrap_or_default(),
            columns,
        })
    }
}

/// Only an explicit "nullable" indicator maps to `true`; "unknown" is
/// treated like "no nulls".
fn to_column(record: ColumnRecord, primary_key: &HashSet<String>) -> Column {
    Column {
        is_primary_key: primary_key.contains(&record.name),
        is_nullable: record.nullable == Nullability::Nullable,
        name: record.name,
        type_name: record.type_name,
        length: record.length,
        scale: record.scale,
        default_value: record.default_value.unwrap_or_default(),
        comment: record.comment.unwrap_or_default(),
    }
}
