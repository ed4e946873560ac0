#[cfg(test)]
mod tests {
    use dbdoc::workbook::{safe_sheet_name, SheetNameRegistry, FIXED_SHEETS, MAX_SHEET_NAME_CHARS};
    use insta::assert_snapshot;

    #[test]
    fn test_unsafe_characters_replaced() {
        assert_eq!(safe_sheet_name("A/B?C[D]"), "A_B_C_D_");
    }

    #[test]
    fn test_short_clean_name_unchanged() {
        assert_eq!(safe_sheet_name("t_user"), "t_user");
        assert_eq!(safe_sheet_name("订单明细"), "订单明细");
    }

    #[test]
    fn test_long_name_truncated_to_31() {
        let raw = "a".repeat(40);
        assert_eq!(safe_sheet_name(&raw), "a".repeat(31));
    }

    #[test]
    fn test_idempotent() {
        let long = "q".repeat(31);
        for raw in ["A/B?C[D]", "plain", "'edge'", "x:y*z", long.as_str()] {
            let once = safe_sheet_name(raw);
            assert_eq!(safe_sheet_name(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_long_names_sharing_prefix_are_disambiguated() {
        let prefix = "x".repeat(31);
        let first = format!("{prefix}_first_tbl");
        let second = format!("{prefix}_other_tbl");

        let mut registry = SheetNameRegistry::with_reserved(FIXED_SHEETS);
        let a = registry.assign(&first).unwrap();
        let b = registry.assign(&second).unwrap();

        assert_eq!(a, prefix);
        assert_eq!(b, format!("{}_2", "x".repeat(29)));
        assert!(b.chars().count() <= MAX_SHEET_NAME_CHARS);
        assert_ne!(a, b);
    }

    #[test]
    fn test_fixed_sheet_names_are_reserved() {
        let mut registry = SheetNameRegistry::with_reserved(FIXED_SHEETS);
        let names: Vec<String> = ["表目录", "封面", "orders", "ORDERS", "a/b", "a?b"]
            .iter()
            .map(|raw| registry.assign(raw).unwrap())
            .collect();

        assert_snapshot!(names.join(" | "), @"表目录_2 | 封面_2 | orders | ORDERS_2 | a_b | a_b_2");
    }

    #[test]
    fn test_excel_history_name_is_reserved() {
        let mut registry = SheetNameRegistry::new();
        assert_eq!(registry.assign("history").unwrap(), "history_2");
        assert_eq!(registry.assign("History").unwrap(), "History_3");
    }
}
