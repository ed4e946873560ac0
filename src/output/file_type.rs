//! Document formats.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown document type '{0}' (expected excel, html, word or md)")]
pub struct UnknownFileType(pub String);

/// Format of the generated document. Only [`FileType::Workbook`] is rendered
/// in-process; the others go to a document engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Workbook,
    Html,
    Word,
    Markdown,
}

impl FileType {
    pub fn extension(self) -> &'static str {
        match self {
            FileType::Workbook => "xlsx",
            FileType::Html => "html",
            FileType::Word => "doc",
            FileType::Markdown => "md",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Workbook => "excel",
            FileType::Html => "html",
            FileType::Word => "word",
            FileType::Markdown => "md",
        }
    }

    pub fn is_workbook(self) -> bool {
        self == FileType::Workbook
    }
}

impl FromStr for FileType {
    type Err = UnknownFileType;

    /// Case-insensitive. An empty value selects HTML.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "excel" | "xlsx" | "workbook" => Ok(FileType::Workbook),
            "" | "html" => Ok(FileType::Html),
            "word" | "doc" => Ok(FileType::Word),
            "md" | "markdown" => Ok(FileType::Markdown),
            _ => Err(UnknownFileType(s.to_string())),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
