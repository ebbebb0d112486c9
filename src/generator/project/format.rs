use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::error::{Error, Result};

/// Post-generation source formatting
///
/// The project writer only talks to this trait so tests can run without Go tooling installed.
pub trait SourceFormatter {
    /// Fail early if the formatter cannot run at all
    fn ensure_available(&self) -> Result<()> {
        Ok(())
    }

    /// Format every source file under `dir` in place
    fn format(&self, dir: &Path) -> Result<()>;
}

/// Runs `gofmt -w .` then `goimports -w .`
#[derive(Debug, Clone)]
pub struct GoFormatter {
    gofmt: String,
    goimports: String,
}

impl GoFormatter {
    pub fn new(gofmt: impl Into<String>, goimports: impl Into<String>) -> Self {
        GoFormatter {
            gofmt: gofmt.into(),
            goimports: goimports.into(),
        }
    }

    /// Binaries from `COBRAGEN_GOFMT_BIN` / `COBRAGEN_GOIMPORTS_BIN`, else from `PATH`
    pub fn from_env() -> Self {
        // Allow tests to override the tool binaries without mutating PATH
        GoFormatter::new(
            std::env::var("COBRAGEN_GOFMT_BIN").unwrap_or_else(|_| "gofmt".to_string()),
            std::env::var("COBRAGEN_GOIMPORTS_BIN").unwrap_or_else(|_| "goimports".to_string()),
        )
    }

    fn tools(&self) -> [&str; 2] {
        [self.gofmt.as_str(), self.goimports.as_str()]
    }
}

impl Default for GoFormatter {
    fn default() -> Self {
        GoFormatter::new("gofmt", "goimports")
    }
}

/// Locate `bin` the way a shell would: as a path if it has a separator, else on `PATH`
fn find_executable(bin: &str) -> Option<PathBuf> {
    let candidate = Path::new(bin);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(bin))
        .find(|path| path.is_file())
}

fn run_tool(bin: &str, dir: &Path) -> Result<()> {
    debug!(tool = bin, dir = %dir.display(), "running formatter");
    let status = Command::new(bin)
        .args(["-w", "."])
        .current_dir(dir)
        .status()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::MissingTool {
                tool: bin.to_string(),
            },
            _ => Error::io(dir, e),
        })?;
    if !status.success() {
        return Err(Error::ToolFailure {
            tool: bin.to_string(),
            dir: dir.to_path_buf(),
            status: status.to_string(),
        });
    }
    Ok(())
}

impl SourceFormatter for GoFormatter {
    fn ensure_available(&self) -> Result<()> {
        for tool in self.tools() {
            if find_executable(tool).is_none() {
                return Err(Error::MissingTool {
                    tool: tool.to_string(),
                });
            }
        }
        Ok(())
    }

    fn format(&self, dir: &Path) -> Result<()> {
        for tool in self.tools() {
            run_tool(tool, dir)?;
        }
        info!(dir = %dir.display(), "formatted generated sources");
        Ok(())
    }
}

/// Leaves generated sources untouched (`--no-format`)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFormatter;

impl SourceFormatter for NoopFormatter {
    fn format(&self, dir: &Path) -> Result<()> {
        debug!(dir = %dir.display(), "formatting disabled");
        Ok(())
    }
}
