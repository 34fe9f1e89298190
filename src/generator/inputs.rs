//! Typed render inputs for the layer templates.
//!
//! All naming and type decisions are made here, in Rust, so the templates stay
//! free of logic beyond `if` and `for`.

use super::operations::{CrudOp, ModelWiring, OperationWiring};
use crate::naming::{
    field_go_type, go_field_name, go_var_name, lower_first, pluralize, request_field_type,
    serialization_name, storage_tag,
};
use crate::spec::{ModelDefinition, RequestDefinition, Specification};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FieldRender {
    pub go_name: String,
    pub go_type: String,
    pub gorm_tag: String,
    pub json_name: String,
    /// ` // comment` or empty.
    pub comment_suffix: String,
}

/// The identifier column and how ids are parsed and formatted for it.
#[derive(Debug, Clone, Serialize)]
pub struct PrimaryKey {
    pub go_name: String,
    pub column: String,
    /// `uint`, `int` or `string`.
    pub kind: String,
    /// Go type of the `id` parameter.
    pub go_type: String,
    /// `fmt` verb used in cache keys.
    pub verb: String,
}

impl PrimaryKey {
    /// First primary-key field of `model`; models always have one after validation.
    pub fn of(model: &ModelDefinition) -> Self {
        let field = model.fields.iter().find(|f| f.primary_key);
        let (go_name, column, go_type) = match field {
            Some(f) => (go_field_name(&f.name), f.name.clone(), field_go_type(f)),
            None => ("ID".to_string(), "id".to_string(), "uint".to_string()),
        };
        let kind = match go_type.as_str() {
            "uint" | "int" => go_type,
            _ => "string".to_string(),
        };
        PrimaryKey {
            go_name,
            column,
            verb: if kind == "string" { "%s" } else { "%d" }.to_string(),
            go_type: kind.clone(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelRenderInput {
    pub name: String,
    pub table: String,
    pub doc: String,
    pub needs_time: bool,
    pub fields: Vec<FieldRender>,
}

impl ModelRenderInput {
    pub fn new(model: &ModelDefinition) -> Self {
        let fields: Vec<FieldRender> = model
            .fields
            .iter()
            .map(|f| FieldRender {
                go_name: go_field_name(&f.name),
                go_type: field_go_type(f),
                gorm_tag: storage_tag(f, &model.indexes),
                json_name: serialization_name(f),
                comment_suffix: comment_suffix(&f.comment),
            })
            .collect();
        ModelRenderInput {
            name: model.name.clone(),
            table: model.table.clone(),
            doc: doc_line(&model.name, &model.comment),
            needs_time: fields.iter().any(|f| f.go_type.contains("time.Time")),
            fields,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RepositoryRenderInput {
    pub module: String,
    pub name: String,
    pub var: String,
    pub pk: PrimaryKey,
}

impl RepositoryRenderInput {
    pub fn new(spec: &Specification, model: &ModelDefinition) -> Self {
        RepositoryRenderInput {
            module: spec.project.module.clone(),
            name: model.name.clone(),
            var: go_var_name(&model.name),
            pk: PrimaryKey::of(model),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceRenderInput {
    pub module: String,
    pub name: String,
    pub var: String,
    /// Cache key prefix: `<prefix>:<id>` and `<prefix>:list:<page>:<size>`.
    pub cache_prefix: String,
    pub pk: PrimaryKey,
    pub get_cache_ttl: Option<u32>,
    pub list_cache_ttl: Option<u32>,
}

impl ServiceRenderInput {
    pub fn new(spec: &Specification, model: &ModelDefinition, wiring: &ModelWiring) -> Self {
        ServiceRenderInput {
            module: spec.project.module.clone(),
            name: model.name.clone(),
            var: go_var_name(&model.name),
            cache_prefix: lower_first(&model.name),
            pk: PrimaryKey::of(model),
            get_cache_ttl: wiring.get.cache_ttl,
            list_cache_ttl: wiring.list.cache_ttl,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ControllerRenderInput {
    pub module: String,
    pub name: String,
    pub var: String,
    pub route_path: String,
    pub pk: PrimaryKey,
    pub create: OperationWiring,
    pub get: OperationWiring,
    pub list: OperationWiring,
    pub update: OperationWiring,
    pub delete: OperationWiring,
    pub uses_validators: bool,
}

impl ControllerRenderInput {
    pub fn new(spec: &Specification, model: &ModelDefinition, wiring: &ModelWiring) -> Self {
        ControllerRenderInput {
            module: spec.project.module.clone(),
            name: model.name.clone(),
            var: go_var_name(&model.name),
            route_path: route_path(model),
            pk: PrimaryKey::of(model),
            create: wiring.create.clone(),
            get: wiring.get.clone(),
            list: wiring.list.clone(),
            update: wiring.update.clone(),
            delete: wiring.delete.clone(),
            uses_validators: wiring.uses_validators(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ControllersRenderInput {
    pub module: String,
    pub models: Vec<String>,
}

impl ControllersRenderInput {
    pub fn new(spec: &Specification) -> Self {
        ControllersRenderInput {
            module: spec.project.module.clone(),
            models: spec.models.iter().map(|m| m.name.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteLine {
    pub comment: String,
    pub method: String,
    pub suffix: String,
    /// Middleware chain followed by the handler, comma-separated.
    pub handlers: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteGroup {
    pub var: String,
    pub path: String,
    pub routes: Vec<RouteLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoutesRenderInput {
    pub module: String,
    pub uses_middleware: bool,
    pub groups: Vec<RouteGroup>,
}

impl RoutesRenderInput {
    pub fn new(spec: &Specification, wirings: &[ModelWiring]) -> Self {
        let groups: Vec<RouteGroup> = spec
            .models
            .iter()
            .zip(wirings)
            .map(|(model, wiring)| RouteGroup {
                var: format!("{}Routes", lower_first(&model.name)),
                path: route_path(model),
                routes: CrudOp::ALL
                    .iter()
                    .map(|op| RouteLine {
                        comment: op.handler().to_string(),
                        method: op.http_method().to_string(),
                        suffix: op.route_suffix().to_string(),
                        handlers: handler_chain(&model.name, *op, wiring.get(*op)),
                    })
                    .collect(),
            })
            .collect();
        RoutesRenderInput {
            module: spec.project.module.clone(),
            uses_middleware: wirings.iter().any(|w| {
                CrudOp::ALL.iter().any(|op| w.get(*op).guarded())
            }),
            groups,
        }
    }
}

fn handler_chain(model: &str, op: CrudOp, wiring: &OperationWiring) -> String {
    let mut chain = Vec::new();
    if wiring.auth {
        chain.push("middleware.RequireAuth()".to_string());
    }
    if !wiring.permission.is_empty() {
        chain.push(format!(
            "middleware.RequirePermission({})",
            go_string_literal(&wiring.permission)
        ));
    }
    chain.push(format!("controllers.{model}.{}", op.handler()));
    chain.join(", ")
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidatorField {
    pub go_name: String,
    pub go_type: String,
    pub json_name: String,
    pub rules: String,
    pub comment_suffix: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidatorRenderInput {
    pub name: String,
    pub doc: String,
    pub fields: Vec<ValidatorField>,
}

impl ValidatorRenderInput {
    pub fn new(request: &RequestDefinition) -> Self {
        ValidatorRenderInput {
            name: request.name.clone(),
            doc: doc_line(&request.name, &request.comment),
            fields: request
                .fields
                .iter()
                .map(|f| ValidatorField {
                    go_name: go_field_name(&f.name),
                    go_type: request_field_type(&f.rules).to_string(),
                    json_name: f.name.clone(),
                    rules: f.rules.clone(),
                    comment_suffix: comment_suffix(&f.comment),
                })
                .collect(),
        }
    }
}

/// `/users`, `/userprofiles`: the plural of the lower-cased model name.
pub fn route_path(model: &ModelDefinition) -> String {
    format!("/{}", pluralize(&model.name.to_lowercase()))
}

fn doc_line(name: &str, comment: &str) -> String {
    let comment = comment.trim();
    if comment.is_empty() {
        name.to_string()
    } else {
        format!("{name} {}", single_line(comment))
    }
}

fn comment_suffix(comment: &str) -> String {
    let comment = comment.trim();
    if comment.is_empty() {
        String::new()
    } else {
        format!(" // {}", single_line(comment))
    }
}

fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Quote `s` as a Go interpreted string literal.
pub fn go_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
