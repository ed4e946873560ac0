//! In-memory metadata source shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use dbdoc::metadata::{ColumnRecord, MetadataError, MetadataResult, MetadataSource, TableEntry};

pub struct FakeTable {
    pub entry: TableEntry,
    pub primary_key: Vec<String>,
    pub columns: Vec<ColumnRecord>,
}

impl FakeTable {
    pub fn new(name: &str) -> Self {
        Self {
            entry: TableEntry::new(name),
            primary_key: Vec::new(),
            columns: Vec::new(),
        }
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.entry = self.entry.with_comment(comment);
        self
    }

    pub fn primary_key(mut self, columns: &[&str]) -> Self {
        self.primary_key = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn column(mut self, column: ColumnRecord) -> Self {
        let ordinal = self.columns.len() as u32 + 1;
        self.columns.push(column.with_ordinal(ordinal));
        self
    }
}

pub struct FakeSource {
    kind: String,
    catalog: String,
    default_schema: Option<String>,
    tables: Vec<FakeTable>,
    fail_columns_of: Option<String>,
    /// `(catalog, schema)` of every list_tables call.
    pub listed_with: Mutex<Vec<(String, Option<String>)>>,
    /// Table names passed to list_primary_key_columns, in call order.
    pub key_lookups: Mutex<Vec<String>>,
    pub column_lookups: AtomicUsize,
    pub closed: AtomicBool,
}

impl FakeSource {
    pub fn new(kind: &str, catalog: &str) -> Self {
        Self {
            kind: kind.to_string(),
            catalog: catalog.to_string(),
            default_schema: None,
            tables: Vec::new(),
            fail_columns_of: None,
            listed_with: Mutex::new(Vec::new()),
            key_lookups: Mutex::new(Vec::new()),
            column_lookups: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Source with bare tables (no columns) named `names`.
    pub fn with_tables(names: &[&str]) -> Self {
        names
            .iter()
            .fold(Self::new("PostgreSQL", "erp"), |source, name| source.table(FakeTable::new(name)))
    }

    pub fn default_schema(mut self, schema: &str) -> Self {
        self.default_schema = Some(schema.to_string());
        self
    }

    pub fn table(mut self, table: FakeTable) -> Self {
        self.tables.push(table);
        self
    }

    /// Make list_columns fail for one table.
    pub fn failing_columns_of(mut self, table: &str) -> Self {
        self.fail_columns_of = Some(table.to_string());
        self
    }

    fn find(&self, table: &str) -> MetadataResult<&FakeTable> {
        self.tables
            .iter()
            .find(|t| t.entry.name == table)
            .ok_or_else(|| MetadataError::source("lookup", format!("no table {table}")))
    }
}

#[async_trait]
impl MetadataSource for FakeSource {
    async fn database_kind(&self) -> MetadataResult<String> {
        Ok(self.kind.clone())
    }

    async fn current_catalog(&self) -> MetadataResult<String> {
        Ok(self.catalog.clone())
    }

    async fn default_schema(&self) -> MetadataResult<Option<String>> {
        Ok(self.default_schema.clone())
    }

    async fn list_tables(&self, catalog: &str, schema: Option<&str>) -> MetadataResult<Vec<TableEntry>> {
        self.listed_with
            .lock()
            .unwrap()
            .push((catalog.to_string(), schema.map(str::to_string)));
        Ok(self.tables.iter().map(|t| t.entry.clone()).collect())
    }

    async fn list_primary_key_columns(
        &self,
        _catalog: &str,
        _schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<HashSet<String>> {
        self.key_lookups.lock().unwrap().push(table.to_string());
        Ok(self.find(table)?.primary_key.iter().cloned().collect())
    }

    async fn list_columns(
        &self,
        _catalog: &str,
        _schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<Vec<ColumnRecord>> {
        self.column_lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_columns_of.as_deref() == Some(table) {
            return Err(MetadataError::source("list_columns", "connection reset"));
        }
        Ok(self.find(table)?.columns.clone())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
