#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use dbdoc::config::{ConnectionParams, Driver, PoolSettings};
    use dbdoc::metadata::{self, MetadataSource, Nullability, SqliteSource};
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

    const SCHEMA: &[&str] = &[
        "CREATE TABLE t_user (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email VARCHAR(255) NOT NULL,
            balance DECIMAL(10, 2) DEFAULT 0,
            status TEXT DEFAULT 'new'
        )",
        "CREATE TABLE order_line (
            order_id INTEGER NOT NULL,
            line INTEGER NOT NULL,
            sku CHAR(12),
            PRIMARY KEY (order_id, line)
        )",
        "CREATE TABLE audit_log (msg)",
        "CREATE VIEW v_user AS SELECT id, email FROM t_user",
        "INSERT INTO t_user (email) VALUES ('a@example.com')",
    ];

    async fn seed(dir: &Path) -> PathBuf {
        let path = dir.join("app.db");
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await.unwrap();
        }
        pool.close().await;
        path
    }

    async fn open(path: &Path) -> SqliteSource {
        let params = ConnectionParams::new(format!("sqlite://{}", path.display()));
        SqliteSource::connect(&params, &PoolSettings::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_lists_base_tables_only() {
        let tmp = tempfile::tempdir().unwrap();
        let source = open(&seed(tmp.path()).await).await;

        assert_eq!(source.database_kind().await.unwrap(), "SQLite");
        let catalog = source.current_catalog().await.unwrap();
        assert_eq!(catalog, "main");

        let tables = source.list_tables(&catalog, None).await.unwrap();
        let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        // Views and sqlite_sequence are left out.
        assert_eq!(names, vec!["audit_log", "order_line", "t_user"]);
        assert!(tables.iter().all(|t| t.comment.is_none()));

        source.close().await;
    }

    #[tokio::test]
    async fn test_primary_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let source = open(&seed(tmp.path()).await).await;

        let single = source.list_primary_key_columns("main", None, "t_user").await.unwrap();
        assert_eq!(single.len(), 1);
        assert!(single.contains("id"));

        let composite = source
            .list_primary_key_columns("main", None, "order_line")
            .await
            .unwrap();
        assert_eq!(composite.len(), 2);
        assert!(composite.contains("order_id") && composite.contains("line"));

        let none = source.list_primary_key_columns("main", None, "audit_log").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_columns_in_ordinal_order() {
        let tmp = tempfile::tempdir().unwrap();
        let source = open(&seed(tmp.path()).await).await;

        let columns = source.list_columns("main", Some("main"), "t_user").await.unwrap();
        let summary: Vec<(String, String, u32, u32, u32)> = columns
            .iter()
            .map(|c| (c.name.clone(), c.type_name.clone(), c.length, c.scale, c.ordinal))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("id".to_string(), "INTEGER".to_string(), 0, 0, 1),
                ("email".to_string(), "VARCHAR".to_string(), 255, 0, 2),
                ("balance".to_string(), "DECIMAL".to_string(), 10, 2, 3),
                ("status".to_string(), "TEXT".to_string(), 0, 0, 4),
            ]
        );

        assert_eq!(columns[1].nullable, Nullability::NoNulls);
        assert_eq!(columns[2].nullable, Nullability::Nullable);
        assert_eq!(columns[2].default_value.as_deref(), Some("0"));
        assert_eq!(columns[3].default_value.as_deref(), Some("'new'"));
        assert!(columns.iter().all(|c| c.comment.is_none()));
    }

    #[tokio::test]
    async fn test_untyped_column() {
        let tmp = tempfile::tempdir().unwrap();
        let source = open(&seed(tmp.path()).await).await;

        let columns = source.list_columns("main", None, "audit_log").await.unwrap();
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].type_name, "");
    }

    #[tokio::test]
    async fn test_connect_by_driver() {
        let tmp = tempfile::tempdir().unwrap();
        let path = seed(tmp.path()).await;
        let params = ConnectionParams::new(format!("jdbc:sqlite://{}", path.display()))
            .with_driver("org.sqlite.JDBC");

        let driver = params.validate().unwrap();
        assert_eq!(driver, Driver::Sqlite);

        let source = metadata::connect(driver, &params, &PoolSettings::default())
            .await
            .unwrap();
        let tables = source.list_tables("main", None).await.unwrap();
        assert_eq!(tables.len(), 3);
        source.close().await;
    }

    #[tokio::test]
    async fn test_missing_database_fails_to_connect() {
        let tmp = tempfile::tempdir().unwrap();
        let params = ConnectionParams::new(format!("sqlite://{}", tmp.path().join("nope.db").display()));

        let result = SqliteSource::connect(&params, &PoolSettings::default()).await;
        assert!(result.is_err());
    }
}
