//! In-memory workbook layout.
//!
//! Sheet builders describe what goes where; [`super::emit`] turns the
//! description into xlsx bytes. Rows and columns are 0-based.

use std::collections::BTreeMap;

use super::palette::StyleKey;
use crate::model::CellValue;

pub type RowNum = u32;
pub type ColNum = u16;

#[derive(Debug, Clone, Default)]
pub struct WorkbookLayout {
    pub sheets: Vec<SheetLayout>,
}

impl WorkbookLayout {
    pub fn sheet(&self, name: &str) -> Option<&SheetLayout> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Document-internal hyperlink to cell A1 of another sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalLink {
    pub sheet: String,
}

impl InternalLink {
    pub fn to_sheet(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
        }
    }

    /// Link address, `'<sheet>'!A1`, with embedded apostrophes doubled.
    pub fn address(&self) -> String {
        format!("'{}'!A1", self.sheet.replace('\'', "''"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellLayout {
    pub value: CellValue,
    pub style: StyleKey,
    pub link: Option<InternalLink>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedRange {
    pub first_row: RowNum,
    pub first_col: ColNum,
    pub last_row: RowNum,
    pub last_col: ColNum,
}

impl MergedRange {
    /// Merge across one row.
    pub fn row(row: RowNum, first_col: ColNum, last_col: ColNum) -> Self {
        Self {
            first_row: row,
            first_col,
            last_row: row,
            last_col,
        }
    }

    pub fn contains(&self, row: RowNum, col: ColNum) -> bool {
        (self.first_row..=self.last_row).contains(&row)
            && (self.first_col..=self.last_col).contains(&col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintSetup {
    pub landscape: bool,
    /// Pages across.
    pub fit_width: u16,
    /// Pages down; 0 leaves the height unconstrained.
    pub fit_height: u16,
    /// Left, right, top and bottom margin in inches.
    pub margin: Option<f64>,
}

impl PrintSetup {
    /// Whole sheet on a single page.
    pub fn single_page() -> Self {
        Self {
            landscape: false,
            fit_width: 1,
            fit_height: 1,
            margin: None,
        }
    }

    /// Landscape, one page wide, as many pages tall as needed.
    pub fn landscape_listing() -> Self {
        Self {
            landscape: true,
            fit_width: 1,
            fit_height: 0,
            margin: Some(0.5),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SheetLayout {
    pub name: String,
    pub column_widths: BTreeMap<ColNum, f64>,
    pub cells: BTreeMap<(RowNum, ColNum), CellLayout>,
    pub merges: Vec<MergedRange>,
    pub print: PrintSetup,
}

impl SheetLayout {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_widths: BTreeMap::new(),
            cells: BTreeMap::new(),
            merges: Vec::new(),
            print: PrintSetup::single_page(),
        }
    }

    pub fn set_width(&mut self, col: ColNum, width: f64) {
        self.column_widths.insert(col, width);
    }

    /// Write a value, replacing whatever the cell held.
    pub fn put(&mut self, row: RowNum, col: ColNum, value: impl Into<CellValue>, style: StyleKey) {
        self.cells.insert(
            (row, col),
            CellLayout {
                value: value.into(),
                style,
                link: None,
            },
        );
    }

    pub fn put_link(&mut self, row: RowNum, col: ColNum, text: impl Into<CellValue>, link: InternalLink) {
        self.cells.insert(
            (row, col),
            CellLayout {
                value: text.into(),
                style: StyleKey::Hyperlink,
                link: Some(link),
            },
        );
    }

    /// Write `values` across a row starting at column 0.
    pub fn put_row<I, V>(&mut self, row: RowNum, values: I, style: StyleKey)
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        for (col, value) in values.into_iter().enumerate() {
            self.put(row, col as ColNum, value, style);
        }
    }

    /// Merge a range and place `value` in its top-left cell. Any other cells
    /// inside the range are dropped.
    pub fn merge(&mut self, range: MergedRange, value: impl Into<CellValue>, style: StyleKey) {
        self.cells.retain(|(r, c), _| !range.contains(*r, *c));
        self.put(range.first_row, range.first_col, value, style);
        self.merges.push(range);
    }

    /// Paint a rectangle with `style`, leaving it empty.
    pub fn fill(&mut self, rows: std::ops::Range<RowNum>, cols: std::ops::Range<ColNum>, style: StyleKey) {
        for row in rows {
            for col in cols.clone() {
                self.put(row, col, CellValue::Empty, style);
            }
        }
    }

    pub fn cell(&self, row: RowNum, col: ColNum) -> Option<&CellLayout> {
        self.cells.get(&(row, col))
    }

    /// Text of a cell, if it holds text.
    pub fn text(&self, row: RowNum, col: ColNum) -> Option<&str> {
        self.cell(row, col).and_then(|c| c.value.as_text())
    }

    pub fn merge_at(&self, row: RowNum, col: ColNum) -> Option<&MergedRange> {
        self.merges
            .iter()
            .find(|m| m.first_row == row && m.first_col == col)
    }

    pub fn links(&self) -> impl Iterator<Item = (&(RowNum, ColNum), &InternalLink)> {
        self.cells
            .iter()
            .filter_map(|(pos, cell)| cell.link.as_ref().map(|link| (pos, link)))
    }
}

/// Hands out row numbers top to bottom.
#[derive(Debug, Default)]
pub struct RowCursor {
    next: RowNum,
}

impl RowCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current row; the cursor moves past it.
    pub fn take(&mut self) -> RowNum {
        let row = self.next;
        self.next += 1;
        row
    }

    /// Leave the current row empty.
    pub fn skip(&mut self) {
        self.next += 1;
    }

    pub fn peek(&self) -> RowNum {
        self.next
    }
}
