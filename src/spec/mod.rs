//! # Spec Module
//!
//! Typed representation of a service specification document plus the parser that
//! turns YAML files into it.
//!
//! ## Document shape
//!
//! ```yaml
//! spec: "1.0"
//! kind: api
//! name: blog
//! version: 1.0.0
//! project:
//!   module: github.com/acme/blog
//! models:
//!   - name: User
//!     table: users
//!     fields:
//!       - { name: id, type: uint, primary: true, autoIncrement: true }
//!       - { name: email, type: string, size: 100, notNull: true, unique: true }
//! endpoints:
//!   - { method: GET, path: /users/:id, handler: GetUser, cache: { enabled: true, ttl: 120 } }
//! ```
//!
//! Parsing is two steps: serde decoding (any failure is a
//! [`GenError::Parse`](crate::error::GenError::Parse)) followed by structural
//! validation ([`check_spec`] / [`validate_spec`]). Neither step has side effects.
//!
//! Endpoints are tied to models either by an explicit `model:` key or, when that is
//! absent, by the handler name mentioning the model; see
//! [`Specification::endpoints_for_model`].

mod load;
mod types;
mod validate;

pub use load::{is_spec_file, merge_specs, parse_dir, parse_file, parse_str};
pub use types::*;
pub use validate::{check_spec, validate_spec, Severity, ValidationIssue, SUPPORTED_METHODS};

#[cfg(test)]
mod tests;
