//! # CLI Module
//!
//! Command-line interface for the `gostart` binary.
//!
//! ## Commands
//!
//! ### `create`
//!
//! ```bash
//! gostart create my-api --module github.com/acme/my-api --driver postgres
//! ```
//!
//! Scaffolds an empty project in `./my-api`.
//!
//! ### `spec generate`
//!
//! ```bash
//! gostart spec generate --file blog.spec.yaml --output ./blog
//! gostart spec generate --dir specs/ --output ./shop --tidy
//! ```
//!
//! Options:
//! - `--file <FILE>` / `--dir <DIR>` - One spec, or every `*.spec.yaml` in a directory
//! - `--output <DIR>` - Output directory (default: `.`)
//! - `--force` - Overwrite existing scaffold files
//! - `--tidy` - Run `go mod tidy` once the scaffold is written
//! - `--no-scaffold` - Only regenerate `internal/`
//! - `--driver <mysql|postgres>` - Database driver of the project (default: mysql)
//!
//! ### `spec validate` / `spec init`
//!
//! ```bash
//! gostart spec validate --file blog.spec.yaml --json
//! gostart spec init --output example.spec.yaml
//! ```
//!
//! ### `gen db` / `gen tables`
//!
//! ```bash
//! gostart gen tables --dsn 'root:secret@tcp(localhost:3306)/blog'
//! gostart gen db --dsn 'postgres://app:secret@db/shop' --tables 'user*,orders' \
//!     --module github.com/acme/shop --output ./shop
//! ```
//!
//! Global options: `-v/--verbose` for debug logging, `--config <FILE>` for a
//! `gostart.toml` other than the one in the working directory.

mod commands;
mod selection;

pub use commands::{
    generate_options, run, run_cli, write_example_spec, Cli, Commands, Driver, GenCommand,
    SpecCommand, SpecSummary, EXAMPLE_SPEC,
};
pub use selection::select_tables;
