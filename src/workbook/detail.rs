//! Per-table detail sheet.
//!
//! ```text
//! row  title            表名: <table>              (merged A:I)
//!      blank
//!      comment          表注释: <comment>          (merged A:I, only if present)
//!      blank            (a single blank row when there is no comment)
//!      back link        返回表目录
//!      blank
//!      header           序号 列名 数据类型 ...
//!      columns          one row per column
//! ```

use super::layout::{InternalLink, MergedRange, PrintSetup, RowCursor, SheetLayout};
use super::palette::StyleKey;
use super::INDEX_SHEET;
use crate::model::Table;

const HEADERS: [&str; 9] = [
    "序号", "列名", "数据类型", "长度", "精度", "主键", "非空", "默认值", "注释",
];
const WIDTHS: [f64; 9] = [15.0, 25.0, 20.0, 10.0, 10.0, 10.0, 10.0, 20.0, 40.0];
const LAST_COL: u16 = 8;

pub(super) fn detail_sheet(table: &Table, sheet_name: &str) -> SheetLayout {
    let mut sheet = SheetLayout::new(sheet_name);
    for (col, width) in WIDTHS.into_iter().enumerate() {
        sheet.set_width(col as u16, width);
    }

    let mut rows = RowCursor::new();

    let row = rows.take();
    sheet.merge(
        MergedRange::row(row, 0, LAST_COL),
        format!("表名: {}", table.name),
        StyleKey::Title,
    );
    rows.skip();

    if table.comment.is_empty() {
        rows.skip();
    } else {
        let row = rows.take();
        sheet.merge(
            MergedRange::row(row, 0, LAST_COL),
            format!("表注释: {}", table.comment),
            StyleKey::SubHeader,
        );
        rows.skip();
    }

    sheet.put_link(rows.take(), 0, "返回表目录", InternalLink::to_sheet(INDEX_SHEET));
    rows.skip();

    sheet.put_row(rows.take(), HEADERS, StyleKey::Header);

    for (i, column) in table.columns.iter().enumerate() {
        let ordinal = i + 1;
        sheet.put_row(
            rows.take(),
            column.detail_cells(ordinal),
            StyleKey::for_ordinal(ordinal),
        );
    }

    sheet.print = PrintSetup::landscape_listing();
    sheet
}
