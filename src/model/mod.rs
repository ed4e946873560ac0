//! Schema snapshot model.
//!
//! The snapshot is the whole input of a document: vendor, database name, and
//! the admitted tables with their columns, fully materialised. It is built
//! once by [`SchemaModelBuilder`] and never mutated afterwards.

mod builder;
mod value;

pub use builder::SchemaModelBuilder;
pub use value::CellValue;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Marker written into the primary key and not-null columns.
pub const YES_MARK: &str = "是";

/// Immutable description of the documented subset of a schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    /// Vendor product name, e.g. "PostgreSQL".
    pub database_kind: String,
    /// Schema name if one was supplied, otherwise the catalog name.
    pub database_name: String,
    /// Admitted tables in discovery order.
    pub tables: Vec<Table>,
    /// Captured once when the build starts.
    pub generated_at: DateTime<Local>,
}

impl SchemaSnapshot {
    /// Generation date as `YYYY-MM-DD`.
    pub fn generated_date(&self) -> String {
        self.generated_at.format("%Y-%m-%d").to_string()
    }

    /// Generation date as `YYYY/MM/DD`.
    pub fn generated_date_slashed(&self) -> String {
        self.generated_at.format("%Y/%m/%d").to_string()
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    /// Empty when the database stores no comment.
    pub comment: String,
    /// Columns in ordinal order.
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: String::new(),
            columns: Vec::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn primary_key(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_primary_key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    /// Vendor type spelling.
    pub type_name: String,
    pub length: u32,
    pub scale: u32,
    pub is_primary_key: bool,
    pub is_nullable: bool,
    pub default_value: String,
    pub comment: String,
}

impl Column {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            length: 0,
            scale: 0,
            is_primary_key: false,
            is_nullable: true,
            default_value: String::new(),
            comment: String::new(),
        }
    }

    pub fn with_size(mut self, length: u32, scale: u32) -> Self {
        self.length = length;
        self.scale = scale;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.is_nullable = false;
        self
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = default_value.into();
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// The nine detail-sheet cells for this column at a 1-based ordinal.
    ///
    /// Length and scale are written as text. The not-null cell carries the
    /// mark when the column is *not* nullable.
    pub fn detail_cells(&self, ordinal: usize) -> [CellValue; 9] {
        let mark = |flag: bool| CellValue::from(if flag { YES_MARK } else { "" });

        [
            CellValue::from(ordinal),
            CellValue::from(self.name.as_str()),
            CellValue::from(self.type_name.as_str()),
            CellValue::display(self.length),
            CellValue::display(self.scale),
            mark(self.is_primary_key),
            mark(!self.is_nullable),
            CellValue::from(self.default_value.as_str()),
            CellValue::from(self.comment.as_str()),
        ]
    }
}
