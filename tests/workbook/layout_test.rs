#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};
    use dbdoc::model::{CellValue, Column, SchemaSnapshot, Table, YES_MARK};
    use dbdoc::workbook::{
        build_layout, render, MergedRange, SheetLayout, StyleKey, WorkbookLayout, INDEX_SHEET,
    };
    use insta::assert_snapshot;
    use std::io::{Cursor, Read};

    fn snapshot(tables: Vec<Table>) -> SchemaSnapshot {
        SchemaSnapshot {
            database_kind: "PostgreSQL".to_string(),
            database_name: "erp".to_string(),
            tables,
            generated_at: Local.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).unwrap(),
        }
    }

    fn users() -> Table {
        Table::new("t_user")
            .with_comment("用户表")
            .column(Column::new("id", "int8").with_size(19, 0).primary_key().not_null())
            .column(Column::new("name", "varchar").with_size(64, 0).not_null().with_comment("姓名"))
            .column(Column::new("note", "text").with_default("''::text"))
    }

    fn layout(tables: Vec<Table>) -> WorkbookLayout {
        build_layout(&snapshot(tables)).unwrap()
    }

    fn sheet<'a>(layout: &'a WorkbookLayout, name: &str) -> &'a SheetLayout {
        layout.sheet(name).unwrap()
    }

    fn row_texts(sheet: &SheetLayout, row: u32, cols: u16) -> Vec<String> {
        (0..cols)
            .map(|col| match sheet.cell(row, col).map(|c| &c.value) {
                Some(CellValue::Text(t)) => t.clone(),
                Some(CellValue::Number(n)) => n.to_string(),
                Some(CellValue::Boolean(b)) => b.to_string(),
                Some(CellValue::Empty) | None => String::new(),
            })
            .collect()
    }

    // ========================================================================
    // Inventory
    // ========================================================================

    #[test]
    fn test_empty_schema_has_three_fixed_sheets() {
        let layout = layout(Vec::new());
        assert_snapshot!(layout.sheet_names().join(" | "), @"封面 | 修订记录 | 表目录");

        let index = sheet(&layout, INDEX_SHEET);
        assert_eq!(row_texts(index, 2, 3), vec!["序号", "表名", "表备注"]);
        assert!(index.cells.keys().all(|(row, _)| *row < 3));
    }

    #[test]
    fn test_one_detail_sheet_per_table_in_order() {
        let layout = layout(vec![
            Table::new("T_USER"),
            Table::new("T_ORDER"),
            Table::new("A/B?C[D]"),
        ]);
        assert_snapshot!(
            layout.sheet_names().join(" | "),
            @"封面 | 修订记录 | 表目录 | T_USER | T_ORDER | A_B_C_D_"
        );
    }

    // ========================================================================
    // Cover and revision
    // ========================================================================

    #[test]
    fn test_cover_sheet() {
        let layout = layout(Vec::new());
        let cover = sheet(&layout, "封面");

        assert_eq!(cover.merge_at(10, 4), Some(&MergedRange::row(10, 4, 8)));
        assert_eq!(cover.text(10, 4), Some("数据库设计说明书"));
        assert_eq!(cover.cell(10, 4).unwrap().style, StyleKey::CoverTitle);

        assert_eq!(cover.text(12, 4), Some("数据库类型: PostgreSQL"));
        assert_eq!(cover.text(13, 4), Some("数据库名称: erp"));
        assert_eq!(cover.text(14, 4), Some("生成日期: 2024-03-05"));
        assert_eq!(cover.cell(12, 4).unwrap().style, StyleKey::CoverInfo);

        assert_eq!(cover.cell(0, 0).unwrap().style, StyleKey::Backdrop);
        assert_eq!(cover.cell(99, 19).unwrap().style, StyleKey::Backdrop);
        assert!(cover.cell(100, 0).is_none());
        assert!(cover.cell(0, 20).is_none());

        assert_eq!(cover.column_widths.get(&0), Some(&15.0));
        assert_eq!((cover.print.fit_width, cover.print.fit_height), (1, 1));
        assert!(!cover.print.landscape);
    }

    #[test]
    fn test_revision_sheet() {
        let layout = layout(Vec::new());
        let revision = sheet(&layout, "修订记录");

        assert_eq!(revision.merge_at(0, 0), Some(&MergedRange::row(0, 0, 6)));
        assert_eq!(revision.text(0, 0), Some("修订记录"));
        assert_eq!(
            row_texts(revision, 2, 6),
            vec!["版本号", "修订日期", "修订内容", "修改人", "审核/负责人", "备注"]
        );
        assert_eq!(
            row_texts(revision, 3, 6),
            vec!["V1.0", "2024/03/05", "初始版本", "", "", ""]
        );
        assert_eq!(revision.cell(3, 5).unwrap().style, StyleKey::Cell);

        assert!(revision.cell(4, 0).is_none());
        assert_eq!(revision.cell(5, 0).unwrap().style, StyleKey::Backdrop);
        assert_eq!(revision.cell(99, 9).unwrap().style, StyleKey::Backdrop);
        assert_eq!(revision.column_widths.len(), 10);
    }

    // ========================================================================
    // Index
    // ========================================================================

    #[test]
    fn test_index_rows_link_to_detail_sheets() {
        let layout = layout(vec![users(), Table::new("t_order"), Table::new("A/B?C[D]")]);
        let index = sheet(&layout, INDEX_SHEET);

        assert_eq!(index.merge_at(0, 0), Some(&MergedRange::row(0, 0, 3)));
        assert_eq!(row_texts(index, 3, 3), vec!["1", "t_user", "用户表"]);
        assert_eq!(row_texts(index, 4, 3), vec!["2", "t_order", ""]);
        assert_eq!(row_texts(index, 5, 3), vec!["3", "A/B?C[D]", ""]);

        assert_eq!(index.cell(3, 0).unwrap().style, StyleKey::Cell);
        assert_eq!(index.cell(4, 0).unwrap().style, StyleKey::AlternatingRow);
        assert_eq!(index.cell(4, 2).unwrap().style, StyleKey::AlternatingRow);
        assert_eq!(index.cell(4, 1).unwrap().style, StyleKey::Hyperlink);

        let targets: Vec<String> = index.links().map(|(_, link)| link.address()).collect();
        assert_snapshot!(targets.join(" | "), @"'t_user'!A1 | 't_order'!A1 | 'A_B_C_D_'!A1");

        for (_, link) in index.links() {
            assert!(layout.sheet(&link.sheet).is_some(), "dangling link to {}", link.sheet);
        }

        assert_eq!(index.column_widths.get(&2), Some(&50.0));
        assert!(index.print.landscape);
        assert_eq!((index.print.fit_width, index.print.fit_height), (1, 0));
        assert_eq!(index.print.margin, Some(0.5));
    }

    #[test]
    fn test_colliding_names_link_to_distinct_sheets() {
        let prefix = "customer_order_line_item_histor";
        assert_eq!(prefix.len(), 31);
        let layout = layout(vec![
            Table::new(format!("{prefix}y_2019_a")),
            Table::new(format!("{prefix}y_2020_b")),
        ]);

        let index = sheet(&layout, INDEX_SHEET);
        let sheets: Vec<&str> = index.links().map(|(_, link)| link.sheet.as_str()).collect();
        assert_eq!(sheets, vec![prefix, "customer_order_line_item_hist_2"]);
        assert_eq!(layout.sheets.len(), 5);
        assert_eq!(
            sheet(&layout, sheets[1]).text(0, 0),
            Some(format!("表名: {prefix}y_2020_b").as_str())
        );
    }

    // ========================================================================
    // Detail
    // ========================================================================

    #[test]
    fn test_detail_sheet_with_comment() {
        let layout = layout(vec![users()]);
        let detail = sheet(&layout, "t_user");

        assert_eq!(detail.text(0, 0), Some("表名: t_user"));
        assert_eq!(detail.merge_at(0, 0), Some(&MergedRange::row(0, 0, 8)));
        assert!(detail.cell(1, 0).is_none());
        assert_eq!(detail.text(2, 0), Some("表注释: 用户表"));
        assert_eq!(detail.cell(2, 0).unwrap().style, StyleKey::SubHeader);
        assert_eq!(detail.merge_at(2, 0), Some(&MergedRange::row(2, 0, 8)));
        assert!(detail.cell(3, 0).is_none());

        let back = detail.cell(4, 0).unwrap();
        assert_eq!(back.value, CellValue::from("返回表目录"));
        assert_eq!(back.link.as_ref().unwrap().address(), "'表目录'!A1");

        assert_eq!(
            row_texts(detail, 6, 9),
            vec!["序号", "列名", "数据类型", "长度", "精度", "主键", "非空", "默认值", "注释"]
        );
        assert_eq!(
            row_texts(detail, 7, 9),
            vec!["1", "id", "int8", "19", "0", YES_MARK, YES_MARK, "", ""]
        );
        assert_eq!(
            row_texts(detail, 8, 9),
            vec!["2", "name", "varchar", "64", "0", "", YES_MARK, "", "姓名"]
        );
        assert_eq!(
            row_texts(detail, 9, 9),
            vec!["3", "note", "text", "0", "0", "", "", "''::text", ""]
        );
        assert!(detail.cell(10, 0).is_none());

        assert_eq!(detail.cell(7, 3).unwrap().value, CellValue::Text("19".to_string()));
        assert_eq!(detail.cell(7, 0).unwrap().value, CellValue::Number(1.0));
        assert_eq!(detail.cell(7, 8).unwrap().style, StyleKey::Cell);
        assert_eq!(detail.cell(8, 8).unwrap().style, StyleKey::AlternatingRow);
    }

    #[test]
    fn test_detail_sheet_without_comment_shifts_up() {
        let table = Table::new("log").column(Column::new("id", "int4"));
        let layout = layout(vec![table]);
        let detail = sheet(&layout, "log");

        assert!(detail.cell(2, 0).is_none());
        assert!(detail.merge_at(2, 0).is_none());
        assert_eq!(detail.merges.len(), 1);
        assert_eq!(detail.text(3, 0), Some("返回表目录"));
        assert_eq!(detail.text(5, 1), Some("列名"));
        assert_eq!(detail.text(6, 1), Some("id"));
    }

    #[test]
    fn test_detail_sheet_widths_and_print() {
        let layout = layout(vec![users()]);
        let detail = sheet(&layout, "t_user");

        let widths: Vec<f64> = detail.column_widths.values().copied().collect();
        assert_eq!(widths, vec![15.0, 25.0, 20.0, 10.0, 10.0, 10.0, 10.0, 20.0, 40.0]);
        assert!(detail.print.landscape);
        assert_eq!(detail.print.fit_height, 0);
    }

    #[test]
    fn test_column_rows_match_column_count() {
        let mut wide = Table::new("wide");
        for i in 0..25 {
            wide = wide.column(Column::new(format!("c{i}"), "int4"));
        }
        let layout = layout(vec![wide]);
        let detail = sheet(&layout, "wide");

        // Header at row 5 without a comment.
        let column_rows = detail
            .cells
            .keys()
            .filter(|(row, col)| *row > 5 && *col == 0)
            .count();
        assert_eq!(column_rows, 25);
    }

    // ========================================================================
    // Emit
    // ========================================================================

    #[test]
    fn test_render_produces_xlsx_archive() {
        let bytes = render(&snapshot(vec![users(), Table::new("A/B?C[D]"), Table::new("o'neil")])).unwrap();
        assert!(bytes.len() > 1000);
        assert_eq!(&bytes[..2], b"PK");
    }

    /// Worksheet XML parts in sheet order.
    fn worksheet_xml(bytes: Vec<u8>, count: usize) -> Vec<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        (1..=count)
            .map(|n| {
                let mut xml = String::new();
                archive
                    .by_name(&format!("xl/worksheets/sheet{n}.xml"))
                    .unwrap()
                    .read_to_string(&mut xml)
                    .unwrap();
                xml
            })
            .collect()
    }

    #[test]
    fn test_rendered_sheets_carry_links_merges_and_print_setup() {
        let bytes = render(&snapshot(vec![users()])).unwrap();
        let sheets = worksheet_xml(bytes, 4);
        let (cover, index, detail) = (&sheets[0], &sheets[2], &sheets[3]);

        // backdrop cells are styled blanks
        assert!(cover.contains(r#"<c r="A1" s=""#), "{cover}");
        assert!(cover.contains(r#"<mergeCell ref="E11:I11"/>"#), "{cover}");
        assert!(cover.contains(r#"fitToPage="1""#), "{cover}");

        assert!(index.contains(r#"location="'t_user'!A1""#), "{index}");
        assert!(index.contains(r#"orientation="landscape""#), "{index}");
        assert!(index.contains(r#"fitToHeight="0""#), "{index}");
        for margin in ["left", "right", "top", "bottom"] {
            assert!(index.contains(&format!(r#"{margin}="0.5""#)), "{index}");
        }

        assert!(detail.contains(r#"<mergeCell ref="A1:I1"/>"#), "{detail}");
        assert!(detail.contains(&format!(r#"location="'{INDEX_SHEET}'!A1""#)), "{detail}");
        assert!(detail.contains(r#"orientation="landscape""#), "{detail}");
    }
}
