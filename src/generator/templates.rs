use askama::Template;
use tracing::debug;

use super::layout::{FilePlan, FolderPlan};
use crate::error::{Error, Result};
use crate::naming::{flag_variable, to_identifier, to_local_variable};
use crate::tree::CommandTree;

/// Positional argument read inside `Run`
#[derive(Debug, Clone)]
pub struct ArgDef {
    /// Name as stored in the tree
    pub name: String,
    /// Local variable holding the value
    pub variable: String,
    /// Position in `args`
    pub index: usize,
}

/// String flag bound to a package-level variable
#[derive(Debug, Clone)]
pub struct FlagDef {
    pub name: String,
    pub variable: String,
}

/// Subcommand living in another package
#[derive(Debug, Clone)]
pub struct ImportedSubcommand {
    pub package: String,
    pub import_path: String,
    pub identifier: String,
}

/// Template data for one command source file
#[derive(Template)]
#[template(path = "command.go.txt", escape = "none")]
pub struct CommandTemplateData {
    pub package_name: String,
    /// Exported identifier; the command variable is `<identifier>Cmd` and flag variables are
    /// `<identifier>Flag<FlagIdentifier>`
    pub identifier: String,
    /// Space-separated names from the root down to this command
    pub name_path: String,
    /// Cobra `Use` line: name plus one placeholder per argument
    pub use_line: String,
    pub args: Vec<ArgDef>,
    pub flags: Vec<FlagDef>,
    /// `PersistentFlags` on commands with subcommands, `Flags` otherwise
    pub flag_set: &'static str,
    pub local_subcommands: Vec<String>,
    pub imported_subcommands: Vec<ImportedSubcommand>,
}

/// Template data for the program entry file
#[derive(Template)]
#[template(path = "main.go.txt", escape = "none")]
pub struct EntryTemplateData {
    pub import_path: String,
    pub package_name: String,
    pub identifier: String,
}

impl CommandTemplateData {
    /// Collect everything the template needs for `file`
    pub fn from_plan(tree: &CommandTree, file: &FilePlan) -> Result<Self> {
        let cmd = tree.get(file.command);
        let identifier = to_identifier(cmd.name())?;

        let args = cmd
            .args()
            .iter()
            .enumerate()
            .map(|(index, name)| {
                Ok(ArgDef {
                    name: name.clone(),
                    variable: to_local_variable(name)?,
                    index,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let flags = cmd
            .flags()
            .iter()
            .map(|name| {
                Ok(FlagDef {
                    name: name.clone(),
                    variable: flag_variable(cmd.name(), name)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut use_line = cmd.name().to_string();
        for arg in cmd.args() {
            use_line.push_str(&format!(" [{arg}]"));
        }

        let mut local_subcommands = Vec::new();
        let mut imported_subcommands = Vec::new();
        for sub in &file.subcommands {
            match &sub.package {
                None => local_subcommands.push(sub.identifier.clone()),
                Some(pkg) => imported_subcommands.push(ImportedSubcommand {
                    package: pkg.name.clone(),
                    import_path: pkg.import_path.clone(),
                    identifier: sub.identifier.clone(),
                }),
            }
        }

        Ok(CommandTemplateData {
            package_name: file.package_name.clone(),
            identifier,
            name_path: tree.name_path(file.command).join(" "),
            use_line,
            args,
            flags,
            flag_set: if cmd.has_children() {
                "PersistentFlags"
            } else {
                "Flags"
            },
            local_subcommands,
            imported_subcommands,
        })
    }
}

/// Render the source file described by `file`
///
/// # Errors
///
/// Returns [`Error::InvalidName`] for names that convert to empty identifiers and
/// [`Error::Template`] if rendering fails.
pub fn render_command(tree: &CommandTree, file: &FilePlan) -> Result<String> {
    let data = CommandTemplateData::from_plan(tree, file)?;
    debug!(path = %file.path.display(), args = data.args.len(), flags = data.flags.len(), "rendering command");
    Ok(data.render()?)
}

/// Render the program entry file that executes the root command of `plan`
///
/// # Errors
///
/// Returns [`Error::MalformedTree`] if the plan has no root file and [`Error::Template`] if
/// rendering fails.
pub fn render_entry(tree: &CommandTree, plan: &FolderPlan) -> Result<String> {
    let root = plan
        .root_file()
        .ok_or_else(|| Error::MalformedTree("layout has no root command file".to_string()))?;
    let data = EntryTemplateData {
        import_path: format!("{}/{}", root.root_module, plan.package_path),
        package_name: plan.name.clone(),
        identifier: to_identifier(tree.get(root.command).name())?,
    };
    Ok(data.render()?)
}
