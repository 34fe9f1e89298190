//! # gostart
//!
//! **gostart** generates layered Go web services (gin + gorm) from a declarative
//! YAML specification, or from the schema of an existing MySQL or PostgreSQL
//! database.
//!
//! ## Overview
//!
//! A generation run turns one [`spec::Specification`] into a Go project:
//!
//! - `internal/model`, `internal/repository`, `internal/service` and
//!   `internal/controller` files per model
//! - `internal/validator` request structs with `validator/v10` rules
//! - `internal/routes/auto_routes.go` wiring every model under `/api/v1`
//! - scaffold files (`go.mod`, `cmd/server/main.go`, `Makefile`, `Dockerfile`, ...)
//!
//! Layer files are regenerated on every run. Scaffold files are written once and
//! then left alone unless `force` is set.
//!
//! ## Architecture
//!
//! - **[`spec`]** - YAML parsing, merging and structural validation
//! - **[`introspect`]** - DSN detection and catalog reads for MySQL and Postgres
//! - **[`builder`]** - Converts introspected tables into a specification
//! - **[`naming`]** - Identifier and type conversion rules shared by every layer
//! - **[`generator`]** - Template rendering and the file writer
//! - **[`config`]** - `gostart.toml` and `GOSTART_*` environment overrides
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - The `gostart` command line
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant User
//!     participant CLI as CLI<br/>(gostart)
//!     participant Spec as spec::parse_file
//!     participant DB as introspect
//!     participant Builder as builder::spec_from_tables
//!     participant Gen as generator::generate_with_options
//!     participant FS as File System
//!
//!     alt spec generate
//!         User->>CLI: gostart spec generate --file blog.spec.yaml
//!         CLI->>Spec: parse_file(path)
//!         Spec->>Spec: Decode YAML, validate
//!         Spec-->>CLI: Specification
//!     else gen db
//!         User->>CLI: gostart gen db --dsn ... --tables user*
//!         CLI->>DB: list_tables / get_table_schemas
//!         DB-->>CLI: Vec<DetailedTableInfo>
//!         CLI->>Builder: spec_from_tables(meta, tables)
//!         Builder-->>CLI: Specification (default CRUD endpoints)
//!     end
//!
//!     CLI->>Gen: generate_with_options(&spec, out, &opts)
//!     Gen->>Gen: render_layers (minijinja)
//!     Gen->>FS: Write internal/**
//!     Gen->>Gen: render_scaffold (askama)
//!     Gen->>FS: Write missing scaffold files
//!     Gen-->>CLI: GenerationReport
//!     CLI-->>User: ✅ Generated N files
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use gostart::generator::generate;
//! use gostart::spec::parse_file;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), gostart::GenError> {
//! let spec = parse_file(Path::new("blog.spec.yaml"))?;
//! let report = generate(&spec, Path::new("./blog"))?;
//! println!("wrote {} files", report.written.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`Result`] with a [`GenError`]. The first failure
//! aborts the run; files already written stay on disk.

pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod introspect;
pub mod logging;
pub mod naming;
pub mod spec;

pub use error::{GenError, Result};
