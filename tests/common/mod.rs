#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Minimal two-model shop used across the integration tests.
pub const SHOP_SPEC: &str = r#"
spec: "1.0"
kind: api
name: shop
version: 0.1.0
project:
  module: github.com/acme/shop
models:
  - name: User
    table: users
    fields:
      - { name: id, type: uint, primary: true, autoIncrement: true }
      - { name: email, type: string, size: 100, notNull: true, unique: true }
      - { name: created_at, type: timestamp, autoCreateTime: true }
  - name: Product
    table: products
    fields:
      - { name: sku, type: string, size: 32, primary: true }
      - { name: price, type: decimal, notNull: true }
endpoints:
  - { method: GET, path: /users/:id, handler: GetUserByID, cache: { enabled: true, ttl: 120 } }
  - { method: POST, path: /users, handler: CreateUser, validate: CreateUserRequest }
  - { method: DELETE, path: /products/:sku, handler: DeleteProduct, auth: true, permission: "product:delete" }
requests:
  - name: CreateUserRequest
    fields:
      - { name: email, rules: "required,email" }
"#;

pub fn write_spec(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("shop.spec.yaml");
    fs::write(&path, content).unwrap();
    path
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

/// Write an executable shell script standing in for the `go` toolchain.
pub fn stub_go(dir: &Path, body: &str) -> PathBuf {
    let stub = dir.join("go-stub");
    fs::write(&stub, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = fs::metadata(&stub).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&stub, perms).unwrap();
    stub
}
