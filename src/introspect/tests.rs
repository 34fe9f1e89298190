#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;

fn column(name: &str, data_type: &str, key: &str) -> ColumnInfo {
    ColumnInfo {
        name: name.into(),
        data_type: data_type.into(),
        column_type: data_type.into(),
        key: key.into(),
        ..Default::default()
    }
}

fn users_reader() -> MockCatalogReader {
    let mut reader = MockCatalogReader::new();
    reader.expect_tables().returning(|| {
        Ok(vec![
            TableInfo {
                name: "posts".into(),
                ..Default::default()
            },
            TableInfo {
                name: "users".into(),
                comment: "registered accounts".into(),
                ..Default::default()
            },
        ])
    });
    reader.expect_columns().returning(|table| {
        Ok(match table {
            "users" => vec![
                column("id", "bigint", "PRI"),
                column("email", "varchar", "UNI"),
                column("name", "varchar", ""),
            ],
            _ => vec![column("id", "int", "PRI")],
        })
    });
    reader.expect_indexes().returning(|table| {
        Ok(match table {
            "users" => vec![
                IndexInfo {
                    name: "PRIMARY".into(),
                    columns: vec!["id".into()],
                    unique: true,
                    primary: true,
                },
                IndexInfo {
                    name: "uk_email".into(),
                    columns: vec!["email".into()],
                    unique: true,
                    primary: false,
                },
            ],
            _ => vec![],
        })
    });
    reader
}

#[tokio::test]
async fn test_collect_tables_counts_fields_and_indexes() {
    let mut reader = users_reader();
    let tables = collect_tables(&mut reader).await.unwrap();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].name, "posts");
    assert_eq!(tables[0].fields_count, 1);
    assert_eq!(tables[0].indexes_count, 0);
    assert_eq!(tables[1].fields_count, 3);
    assert_eq!(tables[1].indexes_count, 2);
}

#[tokio::test]
async fn test_collect_table_schema() {
    let mut reader = users_reader();
    let info = collect_table_schema(&mut reader, "users", "registered accounts")
        .await
        .unwrap();
    assert_eq!(info.name, "users");
    assert_eq!(info.comment, "registered accounts");
    assert_eq!(info.columns.len(), 3);
    assert!(info.columns[0].is_primary());
    assert_eq!(info.indexes[1].name, "uk_email");
}

#[tokio::test]
async fn test_collect_table_schemas_lists_catalog_once() {
    let mut reader = MockCatalogReader::new();
    reader.expect_tables().times(1).returning(|| {
        Ok(vec![
            TableInfo {
                name: "posts".into(),
                comment: "articles".into(),
                ..Default::default()
            },
            TableInfo {
                name: "users".into(),
                comment: "registered accounts".into(),
                ..Default::default()
            },
        ])
    });
    reader
        .expect_columns()
        .times(2)
        .returning(|_| Ok(vec![column("id", "int", "PRI")]));
    reader.expect_indexes().times(2).returning(|_| Ok(vec![]));

    let tables = vec!["users".to_string(), "posts".to_string()];
    let infos = collect_table_schemas(&mut reader, &tables).await.unwrap();
    assert_eq!(infos.len(), 2);
    assert_eq!(infos[0].name, "users");
    assert_eq!(infos[0].comment, "registered accounts");
    assert_eq!(infos[1].comment, "articles");
}

#[tokio::test]
async fn test_missing_table_is_reported() {
    let mut reader = MockCatalogReader::new();
    reader.expect_tables().returning(|| Ok(vec![]));
    reader.expect_columns().returning(|_| Ok(vec![]));
    let err = collect_table_schemas(&mut reader, &["ghosts".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, GenError::Validation(ref m) if m.contains("ghosts")));
}

#[tokio::test]
async fn test_query_failure_aborts_listing() {
    let mut reader = MockCatalogReader::new();
    reader.expect_tables().returning(|| {
        Ok(vec![TableInfo {
            name: "users".into(),
            ..Default::default()
        }])
    });
    reader
        .expect_columns()
        .withf(|t| t == "users")
        .returning(|t| Err(GenError::query(format!("columns of {t}"), sqlx::Error::RowNotFound)));
    let err = collect_tables(&mut reader).await.unwrap_err();
    assert!(matches!(err, GenError::Query { .. }));
    assert!(err.to_string().contains("columns of users"));
}

#[tokio::test]
async fn test_unsupported_dsn_fails_before_connecting() {
    let err = list_tables("file:app.db").await.unwrap_err();
    assert!(matches!(err, GenError::UnsupportedDialect(_)));
}

#[test]
fn test_auto_increment_detection() {
    let mut col = column("id", "int", "PRI");
    col.extra = "auto_increment".into();
    assert!(col.is_auto_increment());

    let mut serial = column("id", "integer", "PRI");
    serial.default = Some("nextval('users_id_seq'::regclass)".into());
    assert!(serial.is_auto_increment());

    let mut identity = column("id", "bigint", "PRI");
    identity.extra = "identity".into();
    assert!(identity.is_auto_increment());

    assert!(!column("name", "varchar", "").is_auto_increment());
}
