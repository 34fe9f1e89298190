//! Endpoint → CRUD operation linkage.
//!
//! Every model gets the same five operations. What varies per operation is the
//! wiring taken from the matching endpoint: authentication, permission, caching
//! and request validation. Models without endpoints (the database path) get
//! default wiring everywhere.

use crate::spec::{ApiEndpoint, ModelDefinition, Specification};
use serde::Serialize;

/// Cache TTL for GetByID when an endpoint enables caching without a TTL.
pub const DEFAULT_GET_TTL: u32 = 600;
/// Cache TTL for List when an endpoint enables caching without a TTL.
pub const DEFAULT_LIST_TTL: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrudOp {
    Create,
    GetById,
    List,
    Update,
    Delete,
}

impl CrudOp {
    pub const ALL: [CrudOp; 5] = [
        CrudOp::Create,
        CrudOp::List,
        CrudOp::GetById,
        CrudOp::Update,
        CrudOp::Delete,
    ];

    /// Go handler method name.
    pub fn handler(self) -> &'static str {
        match self {
            CrudOp::Create => "Create",
            CrudOp::GetById => "GetByID",
            CrudOp::List => "List",
            CrudOp::Update => "Update",
            CrudOp::Delete => "Delete",
        }
    }

    /// gin router method.
    pub fn http_method(self) -> &'static str {
        match self {
            CrudOp::Create => "POST",
            CrudOp::GetById | CrudOp::List => "GET",
            CrudOp::Update => "PUT",
            CrudOp::Delete => "DELETE",
        }
    }

    /// Path relative to the model's route group.
    pub fn route_suffix(self) -> &'static str {
        match self {
            CrudOp::Create | CrudOp::List => "",
            CrudOp::GetById | CrudOp::Update | CrudOp::Delete => "/:id",
        }
    }

    fn default_ttl(self) -> u32 {
        match self {
            CrudOp::List => DEFAULT_LIST_TTL,
            _ => DEFAULT_GET_TTL,
        }
    }
}

/// Classify an endpoint by method and whether its path carries an id parameter.
pub fn classify(endpoint: &ApiEndpoint) -> Option<CrudOp> {
    let has_param = endpoint
        .path
        .split('/')
        .any(|seg| seg.starts_with(':') || (seg.starts_with('{') && seg.ends_with('}')));
    match endpoint.method.trim().to_ascii_uppercase().as_str() {
        "POST" => Some(CrudOp::Create),
        "GET" if has_param => Some(CrudOp::GetById),
        "GET" => Some(CrudOp::List),
        "PUT" | "PATCH" => Some(CrudOp::Update),
        "DELETE" => Some(CrudOp::Delete),
        _ => None,
    }
}

/// Cross-cutting behaviour of one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OperationWiring {
    pub auth: bool,
    pub permission: String,
    /// Resolved TTL in seconds; `None` means the operation is not cached.
    pub cache_ttl: Option<u32>,
    /// Validator struct name, empty when the body is not validated.
    pub validator: String,
}

impl OperationWiring {
    fn from_endpoint(op: CrudOp, endpoint: &ApiEndpoint) -> Self {
        OperationWiring {
            auth: endpoint.auth,
            permission: endpoint.permission.clone(),
            cache_ttl: match (op, endpoint.cache_ttl()) {
                (CrudOp::GetById | CrudOp::List, Some(0)) => Some(op.default_ttl()),
                (CrudOp::GetById | CrudOp::List, ttl) => ttl,
                _ => None,
            },
            validator: match op {
                CrudOp::Create | CrudOp::Update => endpoint.validate.clone(),
                _ => String::new(),
            },
        }
    }

    /// Either authentication or a permission is required.
    pub fn guarded(&self) -> bool {
        self.auth || !self.permission.is_empty()
    }
}

/// Wiring for all five operations of one model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModelWiring {
    pub create: OperationWiring,
    pub get: OperationWiring,
    pub list: OperationWiring,
    pub update: OperationWiring,
    pub delete: OperationWiring,
}

impl ModelWiring {
    /// Resolve wiring from the model's endpoints. The first endpoint per operation wins.
    pub fn resolve(spec: &Specification, model: &ModelDefinition) -> Self {
        let mut wiring = ModelWiring::default();
        let mut seen: Vec<CrudOp> = Vec::new();
        for endpoint in spec.endpoints_for_model(&model.name) {
            let Some(op) = classify(endpoint) else {
                continue;
            };
            if seen.contains(&op) {
                continue;
            }
            seen.push(op);
            let mut op_wiring = OperationWiring::from_endpoint(op, endpoint);
            // Unknown request names were already reported by validation.
            if spec.request_by_name(&op_wiring.validator).is_none() {
                op_wiring.validator.clear();
            }
            *wiring.get_mut(op) = op_wiring;
        }
        wiring
    }

    pub fn get(&self, op: CrudOp) -> &OperationWiring {
        match op {
            CrudOp::Create => &self.create,
            CrudOp::GetById => &self.get,
            CrudOp::List => &self.list,
            CrudOp::Update => &self.update,
            CrudOp::Delete => &self.delete,
        }
    }

    fn get_mut(&mut self, op: CrudOp) -> &mut OperationWiring {
        match op {
            CrudOp::Create => &mut self.create,
            CrudOp::GetById => &mut self.get,
            CrudOp::List => &mut self.list,
            CrudOp::Update => &mut self.update,
            CrudOp::Delete => &mut self.delete,
        }
    }

    pub fn uses_validators(&self) -> bool {
        !self.create.validator.is_empty() || !self.update.validator.is_empty()
    }
}
