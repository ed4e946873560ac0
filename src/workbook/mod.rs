//! Workbook document builder.
//!
//! Renders a [`SchemaSnapshot`] into a spreadsheet in two steps: the sheet
//! builders produce a [`WorkbookLayout`], then [`emit`] serialises it to xlsx.
//!
//! # Sheet order
//!
//! ```text
//! ┌──────┐ ┌──────────┐ ┌────────┐ ┌─────────┐ ┌─────────┐
//! │ 封面  │ │ 修订记录  │ │ 表目录  │ │ table 1 │ │ table 2 │ ...
//! │cover │ │ revision │ │ index  │ │ detail  │ │ detail  │
//! └──────┘ └──────────┘ └───┬────┘ └────▲────┘ └────▲────┘
//!                           │ links     │           │
//!                           └───────────┴───────────┘
//! ```
//!
//! Detail sheet names go through [`safe_sheet_name`] and are made unique by a
//! [`SheetNameRegistry`] before the index sheet is built, so every index link
//! points at the exact name of its detail sheet.

mod cover;
mod detail;
mod emit;
mod index;
mod layout;
mod palette;
mod revision;
mod sheet_name;

pub use emit::emit;
pub use layout::{
    CellLayout, ColNum, InternalLink, MergedRange, PrintSetup, RowCursor, RowNum, SheetLayout,
    WorkbookLayout,
};
pub use palette::{HorizontalAlign, Palette, StyleKey, StyleSpec};
pub use sheet_name::{safe_sheet_name, SheetNameRegistry, MAX_SHEET_NAME_CHARS};

use rust_xlsxwriter::XlsxError;
use thiserror::Error;
use tracing::debug;

use crate::model::SchemaSnapshot;

pub const COVER_SHEET: &str = "封面";
pub const REVISION_SHEET: &str = "修订记录";
pub const INDEX_SHEET: &str = "表目录";

/// Sheets present in every workbook, in order.
pub const FIXED_SHEETS: [&str; 3] = [COVER_SHEET, REVISION_SHEET, INDEX_SHEET];

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("workbook assembly failed ({detail}): {source}")]
    Xlsx {
        detail: String,
        #[source]
        source: XlsxError,
    },

    #[error("no free sheet name left for table '{table}'")]
    SheetNameExhausted { table: String },
}

impl RenderError {
    pub(crate) fn xlsx(detail: impl Into<String>) -> impl FnOnce(XlsxError) -> Self {
        let detail = detail.into();
        move |source| RenderError::Xlsx { detail, source }
    }
}

/// Lay out every sheet of the document.
pub fn build_layout(snapshot: &SchemaSnapshot) -> RenderResult<WorkbookLayout> {
    let mut names = SheetNameRegistry::with_reserved(FIXED_SHEETS);
    let sheet_names = snapshot
        .tables
        .iter()
        .map(|table| names.assign(&table.name))
        .collect::<RenderResult<Vec<_>>>()?;

    let mut sheets = Vec::with_capacity(FIXED_SHEETS.len() + snapshot.tables.len());
    sheets.push(cover::cover_sheet(snapshot));
    sheets.push(revision::revision_sheet(snapshot));
    sheets.push(index::index_sheet(&snapshot.tables, &sheet_names));

    for (table, name) in snapshot.tables.iter().zip(&sheet_names) {
        debug!(table = %table.name, sheet = %name, columns = table.columns.len(), "laying out detail sheet");
        sheets.push(detail::detail_sheet(table, name));
    }

    Ok(WorkbookLayout { sheets })
}

/// Render the snapshot straight to xlsx bytes.
pub fn render(snapshot: &SchemaSnapshot) -> RenderResult<Vec<u8>> {
    emit(&build_layout(snapshot)?)
}
