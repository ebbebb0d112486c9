//! Naming conventions for generated code.
//!
//! Command names are kebab-case on the command line. Generated Go code needs exported
//! identifiers (`list-buckets` → `ListBuckets`) and package names (`list-buckets` →
//! `listbuckets`). Both conversions are lossy: `foo-bar` and `foobar` share a package name,
//! so the merge step checks siblings for collisions before creating a command.
//!
//! Package-level Go names are built from the command identifier with a fixed infix, so a
//! command variable (`LsCmd`) never shares its spelling with one of its flag variables
//! (`LsFlagPageSize`).

use crate::error::{Error, Result};

/// Packages every generated command file may import by their default name
pub const IMPORTED_PACKAGES: &[&str] = &["cobra", "fmt"];

/// Names a generated `Run` body cannot use for its locals
const RESERVED_LOCALS: &[&str] = &[
    "args", "break", "case", "chan", "cmd", "cobra", "const", "continue", "default", "defer",
    "else", "fallthrough", "fmt", "for", "func", "go", "goto", "if", "import", "interface",
    "map", "package", "range", "return", "select", "struct", "switch", "type", "var",
];

fn ensure_non_empty(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_name(name, "name must not be empty"));
    }
    Ok(())
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Convert a kebab-case command name into an exported Go identifier
///
/// # Errors
///
/// Returns [`Error::InvalidName`] for an empty name.
pub fn to_identifier(name: &str) -> Result<String> {
    ensure_non_empty(name)?;
    Ok(name.split('-').map(capitalize).collect())
}

/// Convert a name into a Go package name: lowercase, no hyphens, no underscores
///
/// # Errors
///
/// Returns [`Error::InvalidName`] for an empty name.
pub fn to_package_name(name: &str) -> Result<String> {
    ensure_non_empty(name)?;
    Ok(name
        .to_lowercase()
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .collect())
}

/// Convert a positional argument name into a local (unexported) Go variable name
///
/// # Errors
///
/// Returns [`Error::InvalidName`] for an empty name.
pub fn to_variable_name(name: &str) -> Result<String> {
    let ident = to_identifier(name)?;
    let mut chars = ident.chars();
    Ok(match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => ident,
    })
}

/// Local variable holding a positional argument inside `Run`
///
/// Names that would shadow a Go keyword, `cmd`, `args` or an imported package get an `Arg`
/// suffix, so `type` becomes `typeArg`.
///
/// # Errors
///
/// Returns [`Error::InvalidName`] for an empty name.
pub fn to_local_variable(name: &str) -> Result<String> {
    let variable = to_variable_name(name)?;
    if RESERVED_LOCALS.contains(&variable.as_str()) {
        Ok(format!("{variable}Arg"))
    } else {
        Ok(variable)
    }
}

/// Package-level variable holding the `*cobra.Command` for `command`
///
/// # Errors
///
/// Returns [`Error::InvalidName`] for an empty name.
pub fn command_variable(command: &str) -> Result<String> {
    Ok(format!("{}Cmd", to_identifier(command)?))
}

/// Package-level variable bound to `flag` of `command`
///
/// # Errors
///
/// Returns [`Error::InvalidName`] if either name is empty.
pub fn flag_variable(command: &str, flag: &str) -> Result<String> {
    Ok(format!(
        "{}Flag{}",
        to_identifier(command)?,
        to_identifier(flag)?
    ))
}
