#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::error::GenError;
use std::fs;
use std::path::Path;

const BLOG: &str = r#"
spec: "1.0"
kind: api
name: blog
version: 1.0.0
project:
  module: github.com/acme/blog
  author: acme
models:
  - name: User
    table: users
    fields:
      - { name: id, type: uint, primary: true, autoIncrement: true }
      - { name: name, type: string, size: 50, notNull: true }
      - { name: email, type: string, unique: true, json: mail }
  - name: Category
    table: categories
    fields:
      - { name: id, type: uint, primary: true }
endpoints:
  - { method: GET, path: /users/:id, handler: GetUserByID, cache: { enabled: true, ttl: 120 } }
  - { method: GET, path: /users, handler: ListUsers, pagination: true }
  - { method: POST, path: /categories, handler: CreateCategory, auth: true, permission: "category:create" }
  - { method: DELETE, path: /things/:id, handler: RemoveThing, model: Category }
requests:
  - name: CreateUserRequest
    fields:
      - { name: name, rules: "required,min=3" }
"#;

fn parse(content: &str) -> crate::error::Result<Specification> {
    parse_str(content, Path::new("inline.spec.yaml"))
}

fn validation_message(content: &str) -> String {
    match parse(content) {
        Err(GenError::Validation(msg)) => msg,
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_parse_full_document() {
    let spec = parse(BLOG).unwrap();
    assert_eq!(spec.name, "blog");
    assert_eq!(spec.project.module, "github.com/acme/blog");
    assert_eq!(spec.models.len(), 2);
    assert_eq!(spec.models[0].name, "User");

    let id = &spec.models[0].fields[0];
    assert!(id.primary_key);
    assert!(id.auto_increment);
    assert_eq!(spec.models[0].fields[2].json, "mail");
    assert_eq!(spec.endpoints[0].cache_ttl(), Some(120));
    assert_eq!(spec.endpoints[1].cache_ttl(), None);
    assert!(spec.endpoints[1].pagination.is_some());
}

#[test]
fn test_parse_rejects_malformed_yaml() {
    let err = parse("spec: [unterminated").unwrap_err();
    assert!(matches!(err, GenError::Parse { .. }));
}

#[test]
fn test_top_level_fields_checked_in_order() {
    let msg = validation_message("kind: api\nname: x\nproject: { module: m }\n");
    assert!(msg.contains("`spec`"), "{msg}");
    let msg = validation_message("spec: '1'\nkind: api\nname: x\n");
    assert!(msg.contains("project.module"), "{msg}");
}

#[test]
fn test_model_without_primary_key_names_model() {
    let doc = r#"
spec: "1.0"
kind: api
name: shop
project: { module: github.com/acme/shop }
models:
  - name: Order
    table: orders
    fields:
      - { name: total, type: decimal }
"#;
    let msg = validation_message(doc);
    assert!(msg.contains("Order"), "{msg}");
    assert!(msg.contains("primary key"), "{msg}");
}

#[test]
fn test_model_without_table() {
    let doc = r#"
spec: "1.0"
kind: api
name: shop
project: { module: m }
models:
  - name: Order
    fields:
      - { name: id, type: uint, primary: true }
"#;
    assert!(validation_message(doc).contains("no table"));
}

#[test]
fn test_endpoint_method_checks() {
    let base = "spec: '1'\nkind: api\nname: x\nproject: { module: m }\nendpoints:\n";
    let msg = validation_message(&format!("{base}  - {{ method: TRACE, path: /x, handler: H }}\n"));
    assert!(msg.contains("unsupported method TRACE"), "{msg}");

    let msg = validation_message(&format!("{base}  - {{ path: /x, handler: H }}\n"));
    assert!(msg.contains("no method"), "{msg}");

    let msg = validation_message(&format!("{base}  - {{ method: GET, handler: H }}\n"));
    assert!(msg.contains("no path"), "{msg}");

    let msg = validation_message(&format!("{base}  - {{ method: GET, path: /x }}\n"));
    assert!(msg.contains("no handler"), "{msg}");
}

#[test]
fn test_lowercase_method_is_rejected() {
    let base = "spec: '1'\nkind: api\nname: x\nproject: { module: m }\nendpoints:\n";
    let msg = validation_message(&format!("{base}  - {{ method: get, path: /x, handler: H }}\n"));
    assert!(msg.contains("unsupported method get"), "{msg}");
}

#[test]
fn test_primary_key_accepts_both_spellings() {
    for key in ["primary", "primaryKey"] {
        let doc = format!(
            "spec: '1'\nkind: api\nname: x\nproject: {{ module: m }}\nmodels:\n  - name: Thing\n    table: things\n    fields:\n      - {{ name: id, type: uint, {key}: true }}\n"
        );
        let spec = parse(&doc).unwrap_or_else(|e| panic!("{key}: {e}"));
        assert!(spec.models[0].fields[0].primary_key, "{key}");
    }
}

#[test]
fn test_model_names_must_map_to_distinct_files() {
    let model = |name: &str| {
        format!("  - name: {name}\n    table: t_{name}\n    fields:\n      - {{ name: id, type: uint, primary: true }}\n")
    };
    let base = "spec: '1'\nkind: api\nname: x\nproject: { module: m }\nmodels:\n";

    let msg = validation_message(&format!("{base}{}", model("Controllers")));
    assert!(msg.contains("controllers.go"), "{msg}");

    let msg = validation_message(&format!("{base}{}{}", model("User"), model("user")));
    assert!(msg.contains("more than once"), "{msg}");

    let doc = format!(
        "{base}{}requests:\n  - name: CreateUser\n  - name: createuser\n",
        model("User")
    );
    assert!(validation_message(&doc).contains("request createuser"));
}

#[test]
fn test_unknown_references_are_warnings() {
    let doc = r#"
spec: "1.0"
kind: api
name: x
project: { module: m }
endpoints:
  - { method: POST, path: /x, handler: H, model: Ghost, validate: Missing }
"#;
    let spec = parse(doc).unwrap();
    let issues = check_spec(&spec);
    assert_eq!(issues.len(), 2);
    assert!(issues.iter().all(|i| i.severity == Severity::Warning));
}

#[test]
fn test_endpoints_for_model() {
    let spec = parse(BLOG).unwrap();
    let users: Vec<_> = spec
        .endpoints_for_model("User")
        .iter()
        .map(|e| e.handler.as_str())
        .collect();
    assert_eq!(users, vec!["GetUserByID", "ListUsers"]);

    let categories: Vec<_> = spec
        .endpoints_for_model("Category")
        .iter()
        .map(|e| e.handler.as_str())
        .collect();
    assert_eq!(categories, vec!["CreateCategory", "RemoveThing"]);
}

#[test]
fn test_explicit_model_is_authoritative() {
    let doc = r#"
spec: "1.0"
kind: api
name: x
project: { module: m }
models:
  - { name: User, table: users, fields: [ { name: id, type: uint, primary: true } ] }
  - { name: Post, table: posts, fields: [ { name: id, type: uint, primary: true } ] }
endpoints:
  - { method: GET, path: /users/:id/posts, handler: ListUserPosts, model: Post }
"#;
    let spec = parse(doc).unwrap();
    assert!(spec.endpoints_for_model("User").is_empty());
    assert_eq!(spec.endpoints_for_model("Post").len(), 1);
}

#[test]
fn test_is_spec_file() {
    assert!(is_spec_file("blog.spec.yaml"));
    assert!(is_spec_file("blog.spec.yml"));
    assert!(!is_spec_file("blog.yaml"));
    assert!(!is_spec_file("blog.spec.json"));
}

#[test]
fn test_parse_dir_filters_and_orders() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b.spec.yaml"), BLOG.replace("name: blog", "name: second")).unwrap();
    fs::write(dir.path().join("a.spec.yml"), BLOG).unwrap();
    fs::write(dir.path().join("notes.yaml"), "not: a spec").unwrap();
    fs::create_dir(dir.path().join("nested.spec.yaml")).unwrap();

    let specs = parse_dir(dir.path()).unwrap();
    let names: Vec<_> = specs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["blog", "second"]);
}

#[test]
fn test_parse_dir_error_names_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("good.spec.yaml"), BLOG).unwrap();
    fs::write(
        dir.path().join("broken.spec.yaml"),
        "spec: '1'\nkind: api\nname: x\nproject: { module: m }\nmodels:\n  - { name: Order, table: orders }\n",
    )
    .unwrap();

    let err = parse_dir(dir.path()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("broken.spec.yaml"), "{msg}");
    assert!(msg.contains("Order"), "{msg}");
}

#[test]
fn test_merge_specs_concatenates_and_revalidates() {
    let blog = parse(BLOG).unwrap();
    let shop = parse(
        &BLOG
            .replace("name: blog", "name: shop")
            .replace("name: User", "name: Customer")
            .replace("name: Category", "name: Product"),
    )
    .unwrap();
    let merged = merge_specs(vec![blog.clone(), shop]).unwrap();
    assert_eq!(merged.name, "blog");
    let models: Vec<_> = merged.models.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(models, vec!["User", "Category", "Customer", "Product"]);
    assert_eq!(merged.endpoints.len(), 8);

    let err = merge_specs(vec![blog.clone(), blog]).unwrap_err();
    assert!(matches!(err, GenError::Validation(ref m) if m.contains("more than once")));
    assert!(matches!(merge_specs(Vec::new()), Err(GenError::Validation(_))));
}
