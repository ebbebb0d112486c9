//! # Tool Configuration
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. built-in defaults ([`ToolConfig::default`])
//! 2. an optional `cobragen.toml` next to the tree document
//! 3. environment variables (`COBRAGEN_TREE`, `COBRAGEN_OUTPUT`)
//!
//! CLI flags are applied on top by the caller.
//!
//! ## Example `cobragen.toml`
//!
//! ```toml
//! tree_file = "commands.yaml"
//! output_dir = "cmd"
//! entry_dir = "examples/cobra-gen"
//! module = "github.com/acme/awsexample"
//! format = true
//! ```

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Default configuration file name
pub const CONFIG_FILE: &str = "cobragen.toml";

/// Tool settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Persisted tree document (`.yaml`/`.yml` or `.json`)
    pub tree_file: PathBuf,
    /// Top-level folder of the generated command packages
    pub output_dir: PathBuf,
    /// Folder receiving the generated program entry file
    pub entry_dir: PathBuf,
    /// Go module path; read from `go.mod` when absent
    pub module: Option<String>,
    /// Run `gofmt`/`goimports` after generation
    pub format: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        ToolConfig {
            tree_file: PathBuf::from("config.yaml"),
            output_dir: PathBuf::from("cmd"),
            entry_dir: PathBuf::from("examples/cobra-gen"),
            module: None,
            format: true,
        }
    }
}

impl ToolConfig {
    /// Apply `COBRAGEN_TREE` and `COBRAGEN_OUTPUT` overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(tree) = env::var("COBRAGEN_TREE") {
            if !tree.is_empty() {
                self.tree_file = PathBuf::from(tree);
            }
        }
        if let Ok(output) = env::var("COBRAGEN_OUTPUT") {
            if !output.is_empty() {
                self.output_dir = PathBuf::from(output);
            }
        }
        self
    }
}

/// Load the configuration file at `path`
///
/// Returns `Ok(None)` if the file does not exist.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file exists but cannot be read and [`Error::Config`] if it is
/// not valid TOML for [`ToolConfig`].
pub fn load_tool_config(path: &Path) -> Result<Option<ToolConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let config: ToolConfig = toml::from_str(&contents).map_err(|e| Error::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    debug!(path = %path.display(), ?config, "loaded tool config");
    Ok(Some(config))
}

/// Resolve the effective configuration
///
/// An explicitly given path must exist; otherwise `cobragen.toml` in the working directory is
/// used when present.
///
/// # Errors
///
/// Propagates errors from [`load_tool_config`] and reports a missing explicit file as
/// [`Error::Io`].
pub fn resolve_tool_config(explicit_path: Option<&Path>) -> Result<ToolConfig> {
    let config = match explicit_path {
        Some(path) => load_tool_config(path)?.ok_or_else(|| {
            Error::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found"),
            )
        })?,
        None => load_tool_config(Path::new(CONFIG_FILE))?.unwrap_or_default(),
    };
    Ok(config.with_env_overrides())
}
