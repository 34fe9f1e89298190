use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::layers::render_layers;
use super::registry::LayerTemplate;
use super::scaffold::{render_scaffold, ScaffoldContext};
use super::tidy::TidyHandle;
use crate::error::{GenError, Result};
use crate::introspect::dsn::Dialect;
use crate::spec::Specification;

/// Knobs for a generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Overwrite scaffold files that already exist.
    pub force: bool,
    /// Write the scaffold files at all.
    pub scaffold: bool,
    /// Start `go mod tidy` in the background once the scaffold is written.
    pub tidy: bool,
    pub go_bin: String,
    pub go_version: String,
    /// Selects the gorm driver in `go.mod` and `cmd/server/main.go`.
    pub dialect: Dialect,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            force: false,
            scaffold: true,
            tidy: false,
            go_bin: "go".to_string(),
            go_version: "1.21".to_string(),
            dialect: Dialect::MySql,
        }
    }
}

/// Per-artifact file counts of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationCounts {
    pub models: usize,
    pub repositories: usize,
    pub services: usize,
    pub controllers: usize,
    pub validators: usize,
    pub routes: usize,
    pub scaffold: usize,
}

impl GenerationCounts {
    fn record(&mut self, layer: LayerTemplate) {
        match layer {
            LayerTemplate::Model => self.models += 1,
            LayerTemplate::Repository => self.repositories += 1,
            LayerTemplate::Service => self.services += 1,
            LayerTemplate::Controller | LayerTemplate::Controllers => self.controllers += 1,
            LayerTemplate::Validator => self.validators += 1,
            LayerTemplate::Routes => self.routes += 1,
        }
    }
}

/// What a run wrote and skipped. Paths are absolute (joined onto the output dir).
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub counts: GenerationCounts,
    /// Present when tidying was requested and the scaffold was written.
    pub tidy: Option<TidyHandle>,
}

/// Generate the full project for `spec` into `out_dir` with default options.
pub fn generate(spec: &Specification, out_dir: &Path) -> Result<GenerationReport> {
    generate_with_options(spec, out_dir, &GenerateOptions::default())
}

/// Generate with explicit options.
///
/// Layer files under `internal/` are always rewritten. Scaffold files are only
/// written when absent unless `force` is set. The first failure aborts the run;
/// files already written stay on disk.
pub fn generate_with_options(
    spec: &Specification,
    out_dir: &Path,
    opts: &GenerateOptions,
) -> Result<GenerationReport> {
    fs::create_dir_all(out_dir).map_err(|e| GenError::io(out_dir, e))?;
    let mut report = GenerationReport::default();

    for file in render_layers(spec)? {
        let path = out_dir.join(&file.path);
        write_file(&path, &file.content)?;
        info!(layer = file.layer.name(), path = %path.display(), "generated");
        report.counts.record(file.layer);
        report.written.push(path);
    }

    if opts.scaffold {
        let ctx = ScaffoldContext::new(spec, &opts.go_version, opts.dialect);
        for (rel, content) in render_scaffold(spec, &ctx)? {
            let path = out_dir.join(rel);
            if path.exists() && !opts.force {
                warn!(path = %path.display(), "skipping existing file");
                report.skipped.push(path);
                continue;
            }
            write_file(&path, &content)?;
            debug!(path = %path.display(), "scaffold written");
            report.counts.scaffold += 1;
            report.written.push(path);
        }
        if opts.tidy {
            report.tidy = Some(TidyHandle::spawn(out_dir, &opts.go_bin));
        }
    }

    info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        "generation finished"
    );
    Ok(report)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| GenError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| GenError::io(path, e))
}
