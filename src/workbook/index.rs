//! Table of contents: one linked row per documented table.

use super::layout::{InternalLink, MergedRange, PrintSetup, SheetLayout};
use super::palette::StyleKey;
use super::INDEX_SHEET;
use crate::model::{CellValue, Table};

const HEADERS: [&str; 3] = ["序号", "表名", "表备注"];
const FIRST_DATA_ROW: u32 = 3;

/// `sheet_names[i]` is the detail sheet of `tables[i]`.
pub(super) fn index_sheet(tables: &[Table], sheet_names: &[String]) -> SheetLayout {
    let mut sheet = SheetLayout::new(INDEX_SHEET);

    sheet.set_width(0, 10.0);
    sheet.set_width(1, 30.0);
    sheet.set_width(2, 50.0);

    sheet.merge(MergedRange::row(0, 0, 3), INDEX_SHEET, StyleKey::Title);
    sheet.put_row(2, HEADERS, StyleKey::Header);

    for (i, (table, target)) in tables.iter().zip(sheet_names).enumerate() {
        let ordinal = i + 1;
        let row = FIRST_DATA_ROW + i as u32;
        let style = StyleKey::for_ordinal(ordinal);

        sheet.put(row, 0, CellValue::from(ordinal), style);
        sheet.put_link(row, 1, table.name.as_str(), InternalLink::to_sheet(target.as_str()));
        sheet.put(row, 2, table.comment.as_str(), style);
    }

    sheet.print = PrintSetup::landscape_listing();
    sheet
}
