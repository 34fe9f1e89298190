//! Generator configuration.
//!
//! Values are layered: built-in defaults, then an optional `gostart.toml`, then
//! `GOSTART_*` environment variables. Command-line flags are applied last by the
//! CLI itself.
//!
//! ```toml
//! [toolchain]
//! go_bin = "go"
//! go_version = "1.21"
//!
//! [project]
//! default_module = "github.com/yourname/project"
//!
//! [generate]
//! force = false
//! tidy = false
//! scaffold = true
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// File name looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "gostart.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    pub go_bin: String,
    pub go_version: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        ToolchainConfig {
            go_bin: "go".to_string(),
            go_version: "1.21".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDefaults {
    /// Module path used by `gen db` when `--module` is not given.
    pub default_module: String,
}

impl Default for ProjectDefaults {
    fn default() -> Self {
        ProjectDefaults {
            default_module: "github.com/yourname/project".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateDefaults {
    pub force: bool,
    pub tidy: bool,
    pub scaffold: bool,
}

impl Default for GenerateDefaults {
    fn default() -> Self {
        GenerateDefaults {
            force: false,
            tidy: false,
            scaffold: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub toolchain: ToolchainConfig,
    pub project: ProjectDefaults,
    pub generate: GenerateDefaults,
}

impl GeneratorConfig {
    /// Load `path` if it exists, then apply environment overrides.
    ///
    /// A missing file is not an error; a file that exists but does not parse is.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = load_config_file(path)?.unwrap_or_default();
        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(bin) = lookup("GOSTART_GO_BIN") {
            self.toolchain.go_bin = bin;
        }
        if let Some(version) = lookup("GOSTART_GO_VERSION") {
            self.toolchain.go_version = version;
        }
        if let Some(module) = lookup("GOSTART_DEFAULT_MODULE") {
            self.project.default_module = module;
        }
    }
}

/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_config_file(path: &Path) -> anyhow::Result<Option<GeneratorConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config: GeneratorConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    Ok(Some(config))
}
