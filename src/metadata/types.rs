//! Raw metadata records as reported by a source.

use serde::{Deserialize, Serialize};

/// A base table discovered in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    pub name: String,
    pub comment: Option<String>,
}

impl TableEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// The driver's tri-valued nullability indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nullability {
    /// The column does not allow NULL.
    NoNulls,
    /// The column allows NULL.
    Nullable,
    /// The driver could not tell.
    Unknown,
}

impl Nullability {
    /// Parse an `information_schema` style `IS_NULLABLE` value.
    pub fn from_is_nullable(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "YES" => Nullability::Nullable,
            "NO" => Nullability::NoNulls,
            _ => Nullability::Unknown,
        }
    }
}

/// A column as reported by a source, in ordinal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRecord {
    pub name: String,
    pub type_name: String,
    /// Column size; 0 when not applicable.
    pub length: u32,
    /// Decimal digits; 0 when not applicable.
    pub scale: u32,
    pub nullable: Nullability,
    pub default_value: Option<String>,
    pub comment: Option<String>,
    /// 1-based ordinal position.
    pub ordinal: u32,
}

impl ColumnRecord {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            length: 0,
            scale: 0,
            nullable: Nullability::Unknown,
            default_value: None,
            comment: None,
            ordinal: 0,
        }
    }

    pub fn with_size(mut self, length: u32, scale: u32) -> Self {
        self.length = length;
        self.scale = scale;
        self
    }

    pub fn with_nullable(mut self, nullable: Nullability) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_ordinal(mut self, ordinal: u32) -> Self {
        self.ordinal = ordinal;
        self
    }
}

/// Clamp a nullable signed catalog number into the non-negative range.
pub(crate) fn non_negative(value: Option<i64>) -> u32 {
    value
        .map(|v| u32::try_from(v.max(0)).unwrap_or(u32::MAX))
        .unwrap_or(0)
}
