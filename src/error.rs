//! Error taxonomy shared by every stage of a generation run.
//!
//! Library code returns [`GenError`]; the CLI layer wraps it in `anyhow` for
//! context chaining. The first failure aborts the run and nothing already written
//! to disk is rolled back.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T, E = GenError> = std::result::Result<T, E>;

/// Every way a generation run can fail.
#[derive(Debug, Error)]
pub enum GenError {
    /// The specification document is not valid YAML or does not match the schema.
    #[error("failed to parse spec {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The document decoded but breaks a structural rule.
    #[error("validation failed: {0}")]
    Validation(String),

    /// DSN shape did not match any supported database. Carries the masked DSN.
    #[error("unsupported database dialect for DSN `{0}`")]
    UnsupportedDialect(String),

    /// Could not open or ping the database.
    #[error("database connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    /// A catalog query failed mid-introspection.
    #[error("catalog query failed ({context}): {source}")]
    Query {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    /// Rendering an artifact failed. Always a generator defect.
    #[error("failed to render {artifact}: {message}")]
    Template { artifact: String, message: String },

    /// Filesystem read or write failure.
    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenError {
    /// Build an [`GenError::Io`] for `path`.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        GenError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn template(artifact: impl Into<String>, err: impl std::fmt::Display) -> Self {
        GenError::Template {
            artifact: artifact.into(),
            message: err.to_string(),
        }
    }

    pub fn query(context: impl Into<String>, source: sqlx::Error) -> Self {
        GenError::Query {
            context: context.into(),
            source,
        }
    }

    /// Attach the originating file name to a validation failure.
    ///
    /// Parse and IO errors already carry their path and are returned unchanged.
    #[must_use]
    pub fn in_file(self, file: &Path) -> Self {
        match self {
            GenError::Validation(msg) => {
                let name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file.display().to_string());
                GenError::Validation(format!("{name}: {msg}"))
            }
            other => other,
        }
    }
}
