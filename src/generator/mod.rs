//! # Generator Module
//!
//! Turns a validated [`Specification`](crate::spec::Specification) into a Go
//! (gin + gorm) service.
//!
//! ## Overview
//!
//! Two families of output are produced:
//!
//! - **Layer files** under `internal/`, rendered through the minijinja
//!   [`registry`] from typed inputs and rewritten on every run
//! - **Scaffold files** (`go.mod`, `Makefile`, `cmd/server/main.go`, support
//!   packages), rendered with askama and written only when absent
//!
//! ```text
//! Specification → ModelWiring → *RenderInput → templates → files on disk
//! ```
//!
//! ## Generated Structure
//!
//! ```text
//! my-service/
//! ├── go.mod
//! ├── Makefile, Dockerfile, docker-compose.yml, README.md
//! ├── .env.example, .gitignore, config.yaml.example
//! ├── cmd/server/main.go
//! ├── internal/
//! │   ├── model/<model>.go
//! │   ├── repository/<model>.go
//! │   ├── service/<model>.go
//! │   ├── controller/<model>.go, controllers.go
//! │   ├── validator/<request>.go
//! │   └── routes/auto_routes.go
//! └── pkg/
//!     ├── capability/capability.go
//!     └── httpx/{response,middleware}/
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gostart::generator::{generate_with_options, GenerateOptions};
//! use gostart::spec::parse_file;
//! use std::path::Path;
//!
//! let spec = parse_file(Path::new("blog.spec.yaml"))?;
//! let report = generate_with_options(&spec, Path::new("out"), &GenerateOptions::default())?;
//! println!("{} files written", report.written.len());
//! # Ok::<(), gostart::GenError>(())
//! ```
//!
//! ## Endpoint Wiring
//!
//! Every model gets the same five routes. Declared endpoints only contribute
//! cross-cutting behaviour (auth, permission, cache TTL, request validator)
//! to the matching operation; see [`operations`].

pub mod inputs;
pub mod layers;
pub mod operations;
mod project;
pub mod registry;
pub mod scaffold;
mod tidy;

pub use layers::{render_layers, RenderedFile};
pub use operations::{classify, CrudOp, ModelWiring, OperationWiring};
pub use project::{
    generate, generate_with_options, GenerateOptions, GenerationCounts, GenerationReport,
};
pub use registry::LayerTemplate;
pub use tidy::{TidyHandle, TidyOutcome, GO_BIN_ENV};
