#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{read, SHOP_SPEC};
use gostart::builder::{spec_from_tables, ProjectMeta};
use gostart::generator::{generate, generate_with_options, GenerateOptions};
use gostart::introspect::dsn::Dialect;
use gostart::introspect::{ColumnInfo, DetailedTableInfo, IndexInfo};
use gostart::spec::{parse_str, Specification};
use gostart::GenError;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

fn shop() -> Specification {
    parse_str(SHOP_SPEC, Path::new("shop.spec.yaml")).unwrap()
}

fn snapshot(root: &Path) -> BTreeMap<String, String> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<String, String>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let rel = path.strip_prefix(root).unwrap().display().to_string();
                out.insert(rel, fs::read_to_string(&path).unwrap());
            }
        }
    }
    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}

#[test]
fn test_generates_user_model_with_storage_tags() {
    let dir = tempfile::tempdir().unwrap();
    generate(&shop(), dir.path()).unwrap();

    let model = read(&dir.path().join("internal/model/user.go"));
    assert!(model.starts_with("// Code generated by gostart. DO NOT EDIT."));
    assert!(model.contains("package model"));
    assert!(model.contains("import \"time\""));
    assert!(model.contains("\tID uint `gorm:\"primarykey;autoIncrement\" json:\"id\"`"));
    assert!(model.contains("gorm:\"size:100;not null;uniqueIndex\" json:\"email\""));
    assert!(model.contains("\tCreatedAt *time.Time `gorm:\"autoCreateTime\" json:\"createdAt\"`"));
    assert!(model.contains("func (User) TableName() string {\n\treturn \"users\"\n}"));

    let product = read(&dir.path().join("internal/model/product.go"));
    assert!(!product.contains("import \"time\""));
    assert!(product.contains("\tSku string `gorm:\"primarykey;size:32\" json:\"sku\"`"));
}

#[test]
fn test_layout_of_a_full_run() {
    let dir = tempfile::tempdir().unwrap();
    let report = generate(&shop(), dir.path()).unwrap();

    for rel in [
        "internal/model/user.go",
        "internal/repository/user.go",
        "internal/service/user.go",
        "internal/controller/user.go",
        "internal/controller/product.go",
        "internal/controller/controllers.go",
        "internal/validator/createuserrequest.go",
        "internal/routes/auto_routes.go",
        "go.mod",
        "cmd/server/main.go",
        "Makefile",
    ] {
        assert!(dir.path().join(rel).is_file(), "missing {rel}");
    }
    assert_eq!(report.counts.models, 2);
    assert_eq!(report.counts.controllers, 3);
    assert_eq!(report.counts.validators, 1);
    assert_eq!(report.counts.routes, 1);
    assert!(report.skipped.is_empty());
    assert!(report.tidy.is_none());
}

const USER_ONLY_SPEC: &str = r#"
spec: "1.0"
kind: api
name: accounts
version: 0.1.0
project:
  module: github.com/acme/accounts
models:
  - name: User
    fields:
      - name: id
        type: uint
        primary: true
        autoIncrement: true
      - name: name
        type: string
        size: 50
        notNull: true
      - name: email
        type: string
        unique: true
"#;

#[test]
fn test_single_model_generates_exact_layer_set() {
    let spec = parse_str(USER_ONLY_SPEC, Path::new("accounts.spec.yaml")).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let report = generate(&spec, dir.path()).unwrap();

    let layers: Vec<String> = snapshot(dir.path())
        .into_keys()
        .filter(|rel| rel.starts_with("internal/"))
        .collect();
    assert_eq!(
        layers,
        vec![
            "internal/controller/controllers.go",
            "internal/controller/user.go",
            "internal/model/user.go",
            "internal/repository/user.go",
            "internal/routes/auto_routes.go",
            "internal/service/user.go",
        ]
    );
    assert!(!dir.path().join("internal/validator").exists());
    assert_eq!(report.counts.models, 1);
    assert_eq!(report.counts.validators, 0);

    let model = read(&dir.path().join("internal/model/user.go"));
    assert!(model.contains("\tID uint `gorm:\"primarykey;autoIncrement\" json:\"id\"`"));
    assert!(model.contains("\tName string `gorm:\"size:50;not null\" json:\"name\"`"));
    assert!(model.contains("\tEmail *string `gorm:\"uniqueIndex\" json:\"email\"`"));
    assert!(model.contains("func (User) TableName() string {\n\treturn \"users\"\n}"));
    assert!(!model.contains("import \"time\""));
}

#[test]
fn test_regeneration_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    generate(&shop(), dir.path()).unwrap();
    let first = snapshot(dir.path());

    let report = generate(&shop(), dir.path()).unwrap();
    assert_eq!(snapshot(dir.path()), first);
    assert!(!report.skipped.is_empty());
}

#[test]
fn test_cached_lookup_uses_declared_ttl() {
    let dir = tempfile::tempdir().unwrap();
    generate(&shop(), dir.path()).unwrap();

    let service = read(&dir.path().join("internal/service/user.go"));
    assert!(service.contains("_ = cache.Set(ctx, key, user, 120)"));
    assert!(service.contains("ErrUserNotFound"));

    let routes = read(&dir.path().join("internal/routes/auto_routes.go"));
    assert!(routes.contains("userRoutes := v1.Group(\"/users\")"));
    assert!(routes.contains(
        "productRoutes.DELETE(\"/:id\", middleware.RequireAuth(), middleware.RequirePermission(\"product:delete\"), controllers.Product.Delete)"
    ));
}

#[test]
fn test_model_without_primary_key_is_rejected() {
    let yaml = SHOP_SPEC.replace(
        "  - name: Product\n    table: products\n    fields:\n      - { name: sku, type: string, size: 32, primary: true }",
        "  - name: Order\n    table: orders\n    fields:\n      - { name: sku, type: string, size: 32 }",
    );
    let err = parse_str(&yaml, Path::new("orders.spec.yaml")).unwrap_err();
    match err {
        GenError::Validation(message) => assert!(message.contains("Order"), "{message}"),
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn test_database_sourced_spec_gets_default_wiring() {
    let table = DetailedTableInfo {
        name: "blog_posts".into(),
        comment: "articles".into(),
        columns: vec![
            ColumnInfo {
                name: "id".into(),
                data_type: "bigint".into(),
                column_type: "bigint(20) unsigned".into(),
                key: "PRI".into(),
                extra: "auto_increment".into(),
                ..Default::default()
            },
            ColumnInfo {
                name: "title".into(),
                data_type: "varchar".into(),
                column_type: "varchar(200)".into(),
                max_length: Some(200),
                ..Default::default()
            },
        ],
        indexes: vec![IndexInfo {
            name: "PRIMARY".into(),
            columns: vec!["id".into()],
            unique: true,
            primary: true,
        }],
    };
    let meta = ProjectMeta {
        name: "blog".into(),
        module: "github.com/acme/blog".into(),
        description: String::new(),
    };
    let spec = spec_from_tables(&meta, &[table]).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let opts = GenerateOptions {
        dialect: Dialect::Postgres,
        ..Default::default()
    };
    generate_with_options(&spec, dir.path(), &opts).unwrap();

    let routes = read(&dir.path().join("internal/routes/auto_routes.go"));
    assert!(routes.contains("blogPostRoutes := v1.Group(\"/blogposts\")"));
    assert!(routes.contains("blogPostRoutes.GET(\"/:id\", controllers.BlogPost.GetByID)"));
    assert!(!routes.contains("middleware"));

    let service = read(&dir.path().join("internal/service/blogpost.go"));
    assert!(!service.contains("cache.Set"));

    let go_mod = read(&dir.path().join("go.mod"));
    assert!(go_mod.contains("module github.com/acme/blog"));
    assert!(go_mod.contains("gorm.io/driver/postgres"));
}

#[test]
fn test_existing_scaffold_is_kept_unless_forced() {
    let dir = tempfile::tempdir().unwrap();
    let readme = dir.path().join("README.md");
    fs::write(&readme, "hand written").unwrap();

    let report = generate(&shop(), dir.path()).unwrap();
    assert_eq!(read(&readme), "hand written");
    assert!(report.skipped.contains(&readme));

    let opts = GenerateOptions {
        force: true,
        ..Default::default()
    };
    let report = generate_with_options(&shop(), dir.path(), &opts).unwrap();
    assert!(report.skipped.is_empty());
    assert!(read(&readme).contains("shop"));
}
