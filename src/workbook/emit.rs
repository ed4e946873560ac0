//! Turns a [`WorkbookLayout`] into xlsx bytes.

use rust_xlsxwriter::{Url, Workbook, Worksheet};
use tracing::debug;

use super::layout::{CellLayout, SheetLayout, WorkbookLayout};
use super::palette::Palette;
use super::{RenderError, RenderResult};
use crate::model::CellValue;

/// Header and footer margins in inches when page margins are overridden.
const HEADER_FOOTER_MARGIN: f64 = 0.3;

pub fn emit(layout: &WorkbookLayout) -> RenderResult<Vec<u8>> {
    let palette = Palette::new();
    let mut workbook = Workbook::new();

    for sheet in &layout.sheets {
        let worksheet = emit_sheet(sheet, &palette).map_err(RenderError::xlsx(&sheet.name))?;
        workbook.push_worksheet(worksheet);
        debug!(sheet = %sheet.name, cells = sheet.cells.len(), "sheet emitted");
    }

    workbook
        .save_to_buffer()
        .map_err(RenderError::xlsx("saving workbook"))
}

fn emit_sheet(
    sheet: &SheetLayout,
    palette: &Palette,
) -> Result<Worksheet, rust_xlsxwriter::XlsxError> {
    let mut worksheet = Worksheet::new();
    worksheet.set_name(&sheet.name)?;

    for (&col, &width) in &sheet.column_widths {
        worksheet.set_column_width(col, width)?;
    }

    for (&(row, col), cell) in &sheet.cells {
        if let Some(range) = sheet.merge_at(row, col) {
            let text = merged_text(&cell.value);
            worksheet.merge_range(
                range.first_row,
                range.first_col,
                range.last_row,
                range.last_col,
                &text,
                palette.format(cell.style),
            )?;
            continue;
        }
        write_cell(&mut worksheet, row, col, cell, palette)?;
    }

    let print = &sheet.print;
    if print.landscape {
        worksheet.set_landscape();
    }
    worksheet.set_print_fit_to_pages(print.fit_width, print.fit_height);
    if let Some(margin) = print.margin {
        worksheet.set_margins(
            margin,
            margin,
            margin,
            margin,
            HEADER_FOOTER_MARGIN,
            HEADER_FOOTER_MARGIN,
        );
    }

    Ok(worksheet)
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellLayout,
    palette: &Palette,
) -> Result<(), rust_xlsxwriter::XlsxError> {
    let format = palette.format(cell.style);

    if let Some(link) = &cell.link {
        let url = Url::new(format!("internal:{}", link.address())).set_text(merged_text(&cell.value));
        worksheet.write_url_with_format(row, col, url, format)?;
        return Ok(());
    }

    match &cell.value {
        CellValue::Text(text) if text.is_empty() => worksheet.write_blank(row, col, format)?,
        CellValue::Text(text) => worksheet.write_string_with_format(row, col, text, format)?,
        CellValue::Number(n) => worksheet.write_number_with_format(row, col, *n, format)?,
        CellValue::Boolean(b) => worksheet.write_boolean_with_format(row, col, *b, format)?,
        CellValue::Empty => worksheet.write_blank(row, col, format)?,
    };
    Ok(())
}

fn merged_text(value: &CellValue) -> String {
    match value {
        CellValue::Text(text) => text.clone(),
        CellValue::Number(n) => n.to_string(),
        CellValue::Boolean(b) => b.to_string(),
        CellValue::Empty => String::new(),
    }
}
