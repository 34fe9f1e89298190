use super::types::{ApiEndpoint, ModelDefinition, Specification};
use crate::error::{GenError, Result};
use std::collections::HashSet;
use tracing::warn;

/// HTTP methods an endpoint may declare.
/// Upper-case only; `get` is rejected rather than normalised.
pub const SUPPORTED_METHODS: [&str; 5] = ["GET", "POST", "PUT", "DELETE", "PATCH"];

/// Lower-cased model names whose layer files would clash with an aggregate file.
const RESERVED_MODEL_STEMS: [&str; 1] = ["controllers"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Generation cannot proceed.
    Error,
    /// Suspicious but generation still produces valid output.
    Warning,
}

/// A single structural problem found in a specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Dotted path to the offending entity, e.g. `models.Order`.
    pub location: String,
    pub kind: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationIssue {
    pub fn error(
        location: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ValidationIssue {
            location: location.into(),
            kind: kind.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(
        location: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ValidationIssue {
            severity: Severity::Warning,
            ..Self::error(location, kind, message)
        }
    }
}

/// Collect every issue in document order: top-level keys, then models, then endpoints.
pub fn check_spec(spec: &Specification) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (key, value) in [
        ("spec", &spec.spec),
        ("kind", &spec.kind),
        ("name", &spec.name),
        ("project.module", &spec.project.module),
    ] {
        if value.trim().is_empty() {
            issues.push(ValidationIssue::error(
                key,
                "MissingField",
                format!("missing required top-level `{key}`"),
            ));
        }
    }

    // Generated file names are the lower-cased model / request names.
    let mut seen = HashSet::new();
    for (i, model) in spec.models.iter().enumerate() {
        check_model(i, model, &mut issues);
        if model.name.is_empty() {
            continue;
        }
        let stem = model.name.to_lowercase();
        if RESERVED_MODEL_STEMS.contains(&stem.as_str()) {
            issues.push(ValidationIssue::error(
                format!("models.{}", model.name),
                "ReservedModelName",
                format!(
                    "model {} would overwrite the generated internal/controller/{stem}.go",
                    model.name
                ),
            ));
        }
        if !seen.insert(stem) {
            issues.push(ValidationIssue::error(
                format!("models.{}", model.name),
                "DuplicateModel",
                format!(
                    "model {} is declared more than once (names are compared case-insensitively)",
                    model.name
                ),
            ));
        }
    }

    let mut seen_requests = HashSet::new();
    for request in spec.requests.iter().filter(|r| !r.name.is_empty()) {
        if !seen_requests.insert(request.name.to_lowercase()) {
            issues.push(ValidationIssue::error(
                format!("requests.{}", request.name),
                "DuplicateRequest",
                format!(
                    "request {} is declared more than once (names are compared case-insensitively)",
                    request.name
                ),
            ));
        }
    }

    let requests: HashSet<&str> = spec.requests.iter().map(|r| r.name.as_str()).collect();
    for (i, endpoint) in spec.endpoints.iter().enumerate() {
        check_endpoint(i, endpoint, spec, &requests, &mut issues);
    }

    issues
}

fn check_model(position: usize, model: &ModelDefinition, issues: &mut Vec<ValidationIssue>) {
    if model.name.trim().is_empty() {
        issues.push(ValidationIssue::error(
            format!("models[{position}]"),
            "MissingField",
            format!("model #{} has no name", position + 1),
        ));
        return;
    }
    let location = format!("models.{}", model.name);
    if model.table.trim().is_empty() {
        issues.push(ValidationIssue::error(
            &location,
            "MissingField",
            format!("model {} has no table", model.name),
        ));
    }
    if !model.fields.iter().any(|f| f.primary_key) {
        issues.push(ValidationIssue::error(
            &location,
            "MissingPrimaryKey",
            format!("model {} has no primary key field", model.name),
        ));
    }
    for index in &model.indexes {
        for column in &index.fields {
            if !model.fields.iter().any(|f| &f.name == column) {
                issues.push(ValidationIssue::warning(
                    format!("{location}.indexes.{}", index.name),
                    "UnknownIndexField",
                    format!(
                        "index {} on model {} references unknown field {column}",
                        index.name, model.name
                    ),
                ));
            }
        }
    }
}

fn check_endpoint(
    position: usize,
    endpoint: &ApiEndpoint,
    spec: &Specification,
    requests: &HashSet<&str>,
    issues: &mut Vec<ValidationIssue>,
) {
    let label = if endpoint.handler.is_empty() {
        format!("#{}", position + 1)
    } else {
        endpoint.handler.clone()
    };
    let location = format!("endpoints.{label}");

    let method = endpoint.method.trim();
    if method.is_empty() {
        issues.push(ValidationIssue::error(
            &location,
            "MissingField",
            format!("endpoint {label} has no method"),
        ));
    } else if !SUPPORTED_METHODS.contains(&method) {
        issues.push(ValidationIssue::error(
            &location,
            "UnsupportedMethod",
            format!(
                "endpoint {label} uses unsupported method {method} (expected one of {})",
                SUPPORTED_METHODS.join(", ")
            ),
        ));
    }
    if endpoint.path.trim().is_empty() {
        issues.push(ValidationIssue::error(
            &location,
            "MissingField",
            format!("endpoint {label} has no path"),
        ));
    }
    if endpoint.handler.trim().is_empty() {
        issues.push(ValidationIssue::error(
            &location,
            "MissingField",
            format!("endpoint {label} has no handler"),
        ));
    }

    if let Some(model) = &endpoint.model {
        if spec.model_by_name(model).is_none() {
            issues.push(ValidationIssue::warning(
                &location,
                "UnknownModel",
                format!("endpoint {label} names unknown model {model}"),
            ));
        }
    }
    if !endpoint.validate.is_empty() && !requests.contains(endpoint.validate.as_str()) {
        issues.push(ValidationIssue::warning(
            &location,
            "UnknownRequest",
            format!(
                "endpoint {label} validates against undeclared request {}",
                endpoint.validate
            ),
        ));
    }
}

/// Fail on the first error-severity issue; warnings are logged and let through.
pub fn validate_spec(spec: &Specification) -> Result<()> {
    let issues = check_spec(spec);
    for issue in issues.iter().filter(|i| i.severity == Severity::Warning) {
        warn!(location = %issue.location, kind = %issue.kind, "{}", issue.message);
    }
    match issues.into_iter().find(|i| i.severity == Severity::Error) {
        Some(issue) => Err(GenError::Validation(issue.message)),
        None => Ok(()),
    }
}
