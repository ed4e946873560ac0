//! Revision log sheet with the initial entry.

use super::layout::{MergedRange, PrintSetup, SheetLayout};
use super::palette::StyleKey;
use super::REVISION_SHEET;
use crate::model::SchemaSnapshot;

const HEADERS: [&str; 6] = ["版本号", "修订日期", "修订内容", "修改人", "审核/负责人", "备注"];

pub(super) fn revision_sheet(snapshot: &SchemaSnapshot) -> SheetLayout {
    let mut sheet = SheetLayout::new(REVISION_SHEET);

    for col in 0..10 {
        sheet.set_width(col, 15.0);
    }

    sheet.merge(MergedRange::row(0, 0, 6), REVISION_SHEET, StyleKey::Title);
    sheet.put_row(2, HEADERS, StyleKey::Header);

    let date = snapshot.generated_date_slashed();
    sheet.put_row(
        3,
        ["V1.0", date.as_str(), "初始版本", "", "", ""],
        StyleKey::Cell,
    );

    // Padding below the log.
    sheet.fill(5..100, 0..10, StyleKey::Backdrop);

    sheet.print = PrintSetup::single_page();
    sheet
}
