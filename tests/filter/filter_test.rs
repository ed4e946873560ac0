#[cfg(test)]
mod tests {
    use dbdoc::filter::{FilterSpec, TableFilter};

    fn admitted<'a>(spec: &FilterSpec, names: &[&'a str]) -> Vec<&'a str> {
        let filter = TableFilter::new(spec);
        names.iter().copied().filter(|n| filter.admits(n)).collect()
    }

    #[test]
    fn test_empty_spec_admits_everything() {
        let spec = FilterSpec::new();
        let names = ["T_USER", "log", "", "sqlite_stat"];
        assert_eq!(admitted(&spec, &names), names.to_vec());
    }

    #[test]
    fn test_include_prefix_only() {
        let spec = FilterSpec::new().include_prefixes(["T_"]);
        assert_eq!(
            admitted(&spec, &["T_USER", "T_ORDER", "LOG"]),
            vec!["T_USER", "T_ORDER"]
        );
    }

    #[test]
    fn test_exclude_suffix_beats_include_prefix() {
        let spec = FilterSpec::new()
            .include_prefixes(["T_"])
            .exclude_suffixes(["_BAK"]);
        assert_eq!(
            admitted(&spec, &["T_USER", "T_USER_BAK", "OTHER"]),
            vec!["T_USER"]
        );
    }

    #[test]
    fn test_excluded_name_always_rejected() {
        let spec = FilterSpec::new()
            .include_names(["audit"])
            .include_prefixes(["au"])
            .exclude_names(["audit"]);
        let filter = TableFilter::new(&spec);
        assert!(!filter.admits("audit"));
        assert!(filter.admits("author"));
    }

    #[test]
    fn test_include_sets_are_alternatives() {
        let spec = FilterSpec::new()
            .include_names(["config"])
            .include_prefixes(["sys_"])
            .include_suffixes(["_log"]);
        assert_eq!(
            admitted(&spec, &["config", "sys_user", "login_log", "orders", "Config"]),
            vec!["config", "sys_user", "login_log"]
        );
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let spec = FilterSpec::new().exclude_prefixes(["tmp_"]);
        assert_eq!(admitted(&spec, &["tmp_a", "TMP_b"]), vec!["TMP_b"]);
    }

    #[test]
    fn test_empty_patterns_are_ignored() {
        let spec = FilterSpec::new().include_prefixes([""]).exclude_suffixes([""]);
        assert!(spec.is_empty());
        assert_eq!(admitted(&spec, &["a", "b"]), vec!["a", "b"]);
    }

    #[test]
    fn test_decision_is_repeatable() {
        let spec = FilterSpec::new().include_suffixes(["_dim"]).exclude_names(["old_dim"]);
        let filter = TableFilter::new(&spec);
        for name in ["date_dim", "old_dim", "fact"] {
            assert_eq!(filter.admits(name), filter.admits(name));
        }
    }

    #[test]
    fn test_overrides_keep_untouched_sets() {
        let file = FilterSpec::new().exclude_prefixes(["tmp_"]);
        let flags = FilterSpec::new().include_prefixes(["t"]);
        let combined = file.overridden_by(flags);
        assert_eq!(
            admitted(&combined, &["t_user", "tmp_x", "other"]),
            vec!["t_user"]
        );
    }

    #[test]
    fn test_override_replaces_file_set() {
        let file = FilterSpec::new().include_prefixes(["t_"]);
        let flags = FilterSpec::new().include_names(["audit"]);
        let combined = file.overridden_by(flags);
        assert_eq!(
            admitted(&combined, &["t_user", "audit", "t_order"]),
            vec!["audit"]
        );
    }

    #[test]
    fn test_spec_from_toml() {
        let spec: FilterSpec = toml::from_str(
            r#"
            include_prefixes = ["T_"]
            exclude_suffixes = ["_BAK", "_TMP"]
            "#,
        )
        .unwrap();
        assert_eq!(spec.include_prefixes, vec!["T_"]);
        assert_eq!(spec.exclude_suffixes.len(), 2);
        assert!(spec.include_names.is_empty());
    }
}
