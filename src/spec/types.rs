use serde::{Deserialize, Serialize};

/// A complete service description: project metadata, models and the HTTP surface.
///
/// Built once per run (from a YAML document or from database introspection) and
/// consumed read-only by the generators. Model order drives generation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Specification {
    pub spec: String,
    pub kind: String,
    pub name: String,
    pub version: String,
    pub project: ProjectConfig,
    pub models: Vec<ModelDefinition>,
    pub endpoints: Vec<ApiEndpoint>,
    pub requests: Vec<RequestDefinition>,
    /// Descriptive only; nothing is generated from rules.
    pub rules: Vec<BusinessRule>,
}

impl Specification {
    pub fn model_by_name(&self, name: &str) -> Option<&ModelDefinition> {
        self.models.iter().find(|m| m.name == name)
    }

    pub fn request_by_name(&self, name: &str) -> Option<&RequestDefinition> {
        self.requests.iter().find(|r| r.name == name)
    }

    /// Endpoints owned by `model_name`, in document order.
    ///
    /// An explicit `model:` decides ownership on its own. Endpoints without one
    /// fall back to matching the handler name against the model name or its plural,
    /// case-insensitively (`GetUserByID`, `ListUsers` → `User`).
    pub fn endpoints_for_model(&self, model_name: &str) -> Vec<&ApiEndpoint> {
        self.endpoints
            .iter()
            .filter(|ep| match &ep.model {
                Some(explicit) => explicit == model_name,
                None => {
                    let matched = handler_mentions_model(&ep.handler, model_name);
                    if matched {
                        tracing::debug!(
                            handler = %ep.handler,
                            model = model_name,
                            "endpoint associated by handler name"
                        );
                    }
                    matched
                }
            })
            .collect()
    }
}

fn handler_mentions_model(handler: &str, model_name: &str) -> bool {
    if model_name.is_empty() {
        return false;
    }
    let handler = handler.to_lowercase();
    let singular = model_name.to_lowercase();
    let plural = crate::naming::pluralize(&singular);
    handler.contains(&singular) || handler.contains(&plural)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Go module path, e.g. `github.com/acme/blog`.
    pub module: String,
    pub author: String,
    pub description: String,
}

/// One persistent entity, mapped to one table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelDefinition {
    pub name: String,
    pub table: String,
    pub comment: String,
    pub fields: Vec<FieldDefinition>,
    pub indexes: Vec<IndexDefinition>,
}

/// A column of a model.
///
/// `field_type` is the logical type vocabulary (`uint`, `int`, `string`, `text`,
/// `bool`, `float`, `double`, `decimal`, `timestamp`, `date`, `datetime`, `json`);
/// unknown values are carried through and map to a Go `string`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub size: u32,
    #[serde(rename = "primary", alias = "primaryKey", skip_serializing_if = "is_false")]
    pub primary_key: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub auto_increment: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub not_null: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub unique: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub index: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default: String,
    /// Serialization name override.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub json: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub foreign_key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub on_delete: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub on_update: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
    #[serde(skip_serializing_if = "is_false")]
    pub auto_create_time: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub auto_update_time: bool,
}

impl FieldDefinition {
    /// Primary keys are never nullable, whatever `notNull` says.
    pub fn is_nullable(&self) -> bool {
        !self.not_null && !self.primary_key
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexDefinition {
    pub name: String,
    pub fields: Vec<String>,
    pub unique: bool,
}

/// One HTTP route in the document's `endpoints` list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiEndpoint {
    pub method: String,
    pub path: String,
    pub handler: String,
    /// Explicit owning model. Takes precedence over handler-name matching.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub auth: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub permission: String,
    /// Name of a [`RequestDefinition`] used to validate the body.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub validate: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheConfig>,
    /// Either `true`/`false` or a `{page, pageSize, maxPageSize}` map. Informational.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<serde_yaml::Value>,
}

impl ApiEndpoint {
    /// TTL in seconds when caching is enabled, `None` otherwise.
    ///
    /// A zero or missing TTL yields `Some(0)`; callers substitute their default.
    pub fn cache_ttl(&self) -> Option<u32> {
        self.cache
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.ttl.unwrap_or(0))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

/// A named request-body shape with per-field validation rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestDefinition {
    pub name: String,
    pub comment: String,
    pub fields: Vec<RequestField>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestField {
    pub name: String,
    /// `validator.v10` rule string, e.g. `required,min=3,max=50`.
    pub rules: String,
    pub comment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessRule {
    pub name: String,
    pub comment: String,
    pub trigger: String,
    pub action: String,
}

fn is_false(v: &bool) -> bool {
    !*v
}

fn is_zero(v: &u32) -> bool {
    *v == 0
}
