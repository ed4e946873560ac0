//! Cover sheet: a full-bleed cyan page with the document title and three
//! information lines.

use super::layout::{MergedRange, PrintSetup, SheetLayout};
use super::palette::StyleKey;
use super::COVER_SHEET;
use crate::model::SchemaSnapshot;

const PAGE_ROWS: u32 = 100;
const PAGE_COLS: u16 = 20;
const COLUMN_WIDTH: f64 = 15.0;

pub(super) fn cover_sheet(snapshot: &SchemaSnapshot) -> SheetLayout {
    let mut sheet = SheetLayout::new(COVER_SHEET);

    for col in 0..PAGE_COLS {
        sheet.set_width(col, COLUMN_WIDTH);
    }
    sheet.fill(0..PAGE_ROWS, 0..PAGE_COLS, StyleKey::Backdrop);

    sheet.merge(MergedRange::row(10, 4, 8), "数据库设计说明书", StyleKey::CoverTitle);

    let lines = [
        format!("数据库类型: {}", snapshot.database_kind),
        format!("数据库名称: {}", snapshot.database_name),
        format!("生成日期: {}", snapshot.generated_date()),
    ];
    for (row, line) in (12..).zip(lines) {
        sheet.put(row, 4, line, StyleKey::CoverInfo);
    }

    sheet.print = PrintSetup::single_page();
    sheet
}
