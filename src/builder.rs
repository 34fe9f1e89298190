//! Turns introspected tables, or a bare project name, into a [`Specification`].
//!
//! The result goes through the same structural validation as a parsed document,
//! so a table without a primary key fails here rather than in a generator.
//! No endpoints, requests or rules are synthesised: database-sourced projects get
//! the conventional five routes per model with no auth, cache or validation wiring.

use crate::error::{GenError, Result};
use crate::introspect::native::logical_type;
use crate::introspect::{ColumnInfo, DetailedTableInfo};
use crate::naming::{model_name_from_table, LogicalType};
use crate::spec::{
    validate_spec, FieldDefinition, IndexDefinition, ModelDefinition, ProjectConfig,
    Specification,
};

/// Largest declared length carried over as a `size:` clause.
const MAX_SIZE_HINT: i64 = 65_535;

/// Project metadata for a database-sourced specification.
#[derive(Debug, Clone)]
pub struct ProjectMeta {
    pub name: String,
    pub module: String,
    pub description: String,
}

/// Build and validate a specification from introspected tables, keeping table order.
pub fn spec_from_tables(meta: &ProjectMeta, tables: &[DetailedTableInfo]) -> Result<Specification> {
    let spec = Specification {
        spec: "1.0".into(),
        kind: "api".into(),
        name: meta.name.clone(),
        version: "1.0.0".into(),
        project: ProjectConfig {
            module: meta.module.clone(),
            author: String::new(),
            description: meta.description.clone(),
        },
        models: tables.iter().map(model_from_table).collect(),
        ..Default::default()
    };
    validate_spec(&spec)?;
    Ok(spec)
}

/// An empty, valid specification for `create <name>`: scaffold only, no models.
///
/// The name becomes a directory, so it must not be empty or contain a path separator.
pub fn starter_spec(name: &str, module: &str) -> Result<Specification> {
    let name = name.trim();
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(GenError::Validation(format!("invalid project name `{name}`")));
    }
    let spec = Specification {
        spec: "1.0".into(),
        kind: "api".into(),
        name: name.to_string(),
        version: "0.1.0".into(),
        project: ProjectConfig {
            module: module.to_string(),
            ..Default::default()
        },
        ..Default::default()
    };
    validate_spec(&spec)?;
    Ok(spec)
}

pub fn model_from_table(table: &DetailedTableInfo) -> ModelDefinition {
    ModelDefinition {
        name: model_name_from_table(&table.name),
        table: table.name.clone(),
        comment: table.comment.clone(),
        fields: table.columns.iter().map(field_from_column).collect(),
        indexes: table
            .indexes
            .iter()
            .filter(|idx| !idx.primary)
            .map(|idx| IndexDefinition {
                name: idx.name.clone(),
                fields: idx.columns.clone(),
                unique: idx.unique,
            })
            .collect(),
    }
}

fn field_from_column(col: &ColumnInfo) -> FieldDefinition {
    let logical = logical_type(&col.data_type, &col.column_type);
    let auto_increment = col.is_auto_increment();
    let size = match (logical, col.max_length) {
        (LogicalType::String, Some(len)) if len > 0 && len <= MAX_SIZE_HINT => len as u32,
        _ => 0,
    };
    let default = if auto_increment {
        String::new()
    } else {
        col.default.as_deref().map(clean_default).unwrap_or_default()
    };

    FieldDefinition {
        name: col.name.clone(),
        field_type: logical.as_str().to_string(),
        size,
        primary_key: col.is_primary(),
        auto_increment,
        not_null: !col.nullable,
        default,
        comment: col.comment.clone(),
        auto_create_time: col.name == "created_at",
        auto_update_time: col.name == "updated_at",
        ..Default::default()
    }
}

/// Strip Postgres casts and quoting: `'draft'::character varying` → `draft`.
fn clean_default(raw: &str) -> String {
    let value = raw.split("::").next().unwrap_or(raw).trim();
    if value.eq_ignore_ascii_case("null") {
        return String::new();
    }
    value.trim_matches('\'').to_string()
}
