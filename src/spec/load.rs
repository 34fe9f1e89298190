use super::types::Specification;
use super::validate::validate_spec;
use crate::error::{GenError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Only `*.spec.yaml` / `*.spec.yml` files take part in directory parsing.
pub fn is_spec_file(name: &str) -> bool {
    name.ends_with(".spec.yaml") || name.ends_with(".spec.yml")
}

/// Decode and validate a specification held in memory.
///
/// `origin` is only used to label parse errors.
pub fn parse_str(content: &str, origin: &Path) -> Result<Specification> {
    let spec: Specification = serde_yaml::from_str(content).map_err(|source| GenError::Parse {
        path: origin.to_path_buf(),
        source,
    })?;
    validate_spec(&spec)?;
    Ok(spec)
}

/// Read, decode and validate one specification file.
///
/// # Errors
///
/// - [`GenError::Io`] when the file cannot be read
/// - [`GenError::Parse`] when the YAML does not decode
/// - [`GenError::Validation`] naming the offending model or endpoint
pub fn parse_file(path: &Path) -> Result<Specification> {
    let content = fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
    let spec = parse_str(&content, path)?;
    debug!(
        path = %path.display(),
        models = spec.models.len(),
        endpoints = spec.endpoints.len(),
        "parsed specification"
    );
    Ok(spec)
}

/// Parse every spec file directly inside `dir`, in file-name order.
///
/// Subdirectories and non-spec files are ignored. The first failure aborts the
/// whole directory and names the file it came from.
pub fn parse_dir(dir: &Path) -> Result<Vec<Specification>> {
    let entries = fs::read_dir(dir).map_err(|e| GenError::io(dir, e))?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| GenError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| GenError::io(entry.path(), e))?;
        if file_type.is_dir() {
            continue;
        }
        if is_spec_file(&entry.file_name().to_string_lossy()) {
            files.push(entry.path());
        }
    }
    files.sort();

    files
        .iter()
        .map(|path| parse_file(path).map_err(|e| e.in_file(path)))
        .collect()
}

/// Fold several specifications into one project, as `spec generate --dir` does.
///
/// Header fields and project metadata come from the first document; models,
/// endpoints, requests and rules are concatenated in order. The merged result is
/// validated again, so a model declared in two files is reported.
pub fn merge_specs(specs: Vec<Specification>) -> Result<Specification> {
    let mut iter = specs.into_iter();
    let Some(mut merged) = iter.next() else {
        return Err(GenError::Validation(
            "no specification files to generate from".to_string(),
        ));
    };
    for spec in iter {
        merged.models.extend(spec.models);
        merged.endpoints.extend(spec.endpoints);
        merged.requests.extend(spec.requests);
        merged.rules.extend(spec.rules);
    }
    validate_spec(&merged)?;
    Ok(merged)
}
