//! Package-level name checks for the code generated from a tree.
//!
//! Commands without subcommands share their parent's Go package, so the names their files
//! declare have to be unique across every file of that package, not just among siblings.

use std::collections::HashMap;

use tracing::debug;

use super::command::{CommandId, CommandTree};
use crate::error::{Error, Result};
use crate::naming::{
    command_variable, flag_variable, to_local_variable, to_package_name, IMPORTED_PACKAGES,
};

/// Command whose folder holds the file of `id`
fn package_owner(tree: &CommandTree, id: CommandId) -> CommandId {
    let cmd = tree.get(id);
    match cmd.parent() {
        Some(parent) if !cmd.has_children() => parent,
        _ => id,
    }
}

fn declare(
    declared: &mut HashMap<(CommandId, String), String>,
    owner: CommandId,
    variable: String,
    what: String,
    name: &str,
) -> Result<()> {
    if let Some(other) = declared.get(&(owner, variable.clone())) {
        return Err(Error::invalid_name(
            name,
            format!("{what} declares {variable}, already declared by {other}"),
        ));
    }
    declared.insert((owner, variable), what);
    Ok(())
}

/// Reject trees whose generated sources would declare a name twice
///
/// Checks, per Go package, the command and flag variables of every file in it. Per command it
/// checks the locals of its positional args. It also rejects a command with its own package
/// whose package name would shadow an import every generated file uses.
///
/// # Errors
///
/// Returns [`Error::InvalidName`] naming the first clashing command, flag or argument.
pub fn check_generated_names(tree: &CommandTree) -> Result<()> {
    let mut declared = HashMap::new();
    for id in tree.iter() {
        let cmd = tree.get(id);
        let path = tree.name_path(id).join(" ");
        let owner = package_owner(tree, id);

        if id != tree.root() && cmd.has_children() {
            let package = to_package_name(cmd.name())?;
            if IMPORTED_PACKAGES.contains(&package.as_str()) {
                return Err(Error::invalid_name(
                    cmd.name(),
                    format!("package {package:?} of {path:?} shadows an imported package"),
                ));
            }
        }

        declare(
            &mut declared,
            owner,
            command_variable(cmd.name())?,
            format!("command {path:?}"),
            cmd.name(),
        )?;
        for flag in cmd.flags() {
            declare(
                &mut declared,
                owner,
                flag_variable(cmd.name(), flag)?,
                format!("flag --{flag} of {path:?}"),
                flag,
            )?;
        }

        let mut locals: HashMap<String, &str> = HashMap::new();
        for arg in cmd.args() {
            let local = to_local_variable(arg)?;
            if let Some(other) = locals.insert(local.clone(), arg.as_str()) {
                return Err(Error::invalid_name(
                    arg,
                    format!("argument collides with {other:?} of {path:?} (both become {local:?})"),
                ));
            }
        }
    }
    debug!(names = declared.len(), "checked generated names");
    Ok(())
}
