//! Go module path resolution.
//!
//! Generated files import each other by full package path, so the generator needs the module
//! path declared in `go.mod` (or given explicitly).

use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// Module manifest looked up in the project root
pub const GO_MOD: &str = "go.mod";

/// Extract the path from the `module` directive of a `go.mod` file
pub fn parse_module_directive(contents: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or_default().trim();
        let rest = line.strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let path = rest.trim().trim_matches('"');
        (!path.is_empty()).then(|| path.to_string())
    })
}

/// Resolve the module path for a project
///
/// An explicit module wins; otherwise `go.mod` in `project_root` is read.
///
/// # Errors
///
/// Returns [`Error::Io`] if `go.mod` cannot be read and [`Error::Config`] if it has no
/// `module` directive.
pub fn resolve_module(explicit: Option<&str>, project_root: &Path) -> Result<String> {
    if let Some(module) = explicit.filter(|m| !m.is_empty()) {
        return Ok(module.trim_end_matches('/').to_string());
    }
    let path = project_root.join(GO_MOD);
    let contents = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
    let module = parse_module_directive(&contents).ok_or_else(|| Error::Config {
        path: path.clone(),
        message: "no module directive".to_string(),
    })?;
    debug!(module = %module, "resolved module from go.mod");
    Ok(module)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_parse_module_directive() {
        let go_mod = "// generated\nmodule github.com/acme/awsexample // main\n\ngo 1.21\n";
        assert_eq!(
            parse_module_directive(go_mod).as_deref(),
            Some("github.com/acme/awsexample")
        );
        assert_eq!(
            parse_module_directive("module \"example.com/quoted\"\n").as_deref(),
            Some("example.com/quoted")
        );
        assert!(parse_module_directive("modules foo\ngo 1.21\n").is_none());
    }

    #[test]
    fn test_explicit_module_wins() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve_module(Some("example.com/tool/"), dir.path()).unwrap(),
            "example.com/tool"
        );
    }

    #[test]
    fn test_reads_go_mod() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(GO_MOD), "module example.com/tool\n").unwrap();
        assert_eq!(resolve_module(None, dir.path()).unwrap(), "example.com/tool");
    }

    #[test]
    fn test_missing_go_mod() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            resolve_module(None, dir.path()).unwrap_err(),
            Error::Io { .. }
        ));
        std::fs::write(dir.path().join(GO_MOD), "go 1.21\n").unwrap();
        assert!(matches!(
            resolve_module(None, dir.path()).unwrap_err(),
            Error::Config { .. }
        ));
    }
}
