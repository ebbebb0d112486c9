//! Folder and file layout derived from a command tree.
//!
//! Every command gets one source file. A command with subcommands also gets its own folder
//! (its own Go package) holding its file and the files of its subcommands; a command without
//! subcommands lives in its parent's folder. The root command's file sits in the top-level
//! folder next to the root's direct subcommands:
//!
//! ```text
//! aws ─┬─ s3 ─┬─ ls        cmd/aws.go
//!      │      └─ mb        cmd/ec2.go
//!      └─ ec2              cmd/s3/s3.go
//!                          cmd/s3/ls.go
//!                          cmd/s3/mb.go
//! ```

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{Error, Result};
use crate::naming::{to_identifier, to_package_name};
use crate::tree::{check_generated_names, CommandId, CommandTree};

/// Suffix of every generated source file
pub const SOURCE_SUFFIX: &str = ".go";

/// A package imported by a file to register one of its subcommands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedPackage {
    /// Package qualifier used at the call site
    pub name: String,
    /// Full import path (`module/cmd/s3`)
    pub import_path: String,
}

/// A subcommand a file must register on its own command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subcommand {
    /// Exported identifier of the subcommand (`ListBuckets`)
    pub identifier: String,
    /// `None` when the subcommand's file shares this file's package
    pub package: Option<ImportedPackage>,
}

/// One planned source file
#[derive(Debug, Clone)]
pub struct FilePlan {
    pub command: CommandId,
    pub file_name: String,
    /// Path relative to the project root
    pub path: PathBuf,
    pub package_name: String,
    /// Slash-separated package path relative to the module root (`cmd/s3`)
    pub package_path: String,
    /// Package name derived from the parent command's name, `None` for the root
    pub parent_package: Option<String>,
    pub root_module: String,
    /// True when the file sits in the same folder as its parent command's file
    pub shares_parent_package: bool,
    pub subcommands: Vec<Subcommand>,
}

/// One planned folder (one Go package)
#[derive(Debug, Clone)]
pub struct FolderPlan {
    pub name: String,
    /// Path relative to the project root
    pub path: PathBuf,
    pub package_path: String,
    pub folders: Vec<FolderPlan>,
    pub files: Vec<FilePlan>,
}

impl FolderPlan {
    fn new(name: String, path: PathBuf, package_path: String) -> Self {
        FolderPlan {
            name,
            path,
            package_path,
            folders: Vec::new(),
            files: Vec::new(),
        }
    }

    fn child(&self, name: String) -> Self {
        let path = self.path.join(&name);
        let package_path = format!("{}/{name}", self.package_path);
        FolderPlan::new(name, path, package_path)
    }

    /// All planned files: this folder's files first, then each subfolder's, recursively
    pub fn files(&self) -> Vec<&FilePlan> {
        self.files
            .iter()
            .chain(self.folders.iter().flat_map(|f| f.files()))
            .collect()
    }

    /// Paths of this folder and every nested folder
    pub fn folders(&self) -> Vec<&PathBuf> {
        std::iter::once(&self.path)
            .chain(self.folders.iter().flat_map(|f| f.folders()))
            .collect()
    }

    /// The file of the tree's root command
    pub fn root_file(&self) -> Option<&FilePlan> {
        self.files.iter().find(|f| f.parent_package.is_none())
    }
}

struct Planner<'a> {
    tree: &'a CommandTree,
    module: &'a str,
}

impl Planner<'_> {
    fn file(&self, id: CommandId, folder: &FolderPlan, shares_parent: bool) -> Result<FilePlan> {
        let cmd = self.tree.get(id);
        let file_name = format!("{}{SOURCE_SUFFIX}", cmd.name());
        let parent_package = cmd
            .parent()
            .map(|p| to_package_name(self.tree.get(p).name()))
            .transpose()?;
        let subcommands = cmd
            .children()
            .iter()
            .map(|child| self.subcommand(*child, folder))
            .collect::<Result<Vec<_>>>()?;
        debug!(path = %folder.path.join(&file_name).display(), "planned file");
        Ok(FilePlan {
            command: id,
            path: folder.path.join(&file_name),
            file_name,
            package_name: folder.name.clone(),
            package_path: folder.package_path.clone(),
            parent_package,
            root_module: self.module.to_string(),
            shares_parent_package: shares_parent,
            subcommands,
        })
    }

    /// Registration of `child` from a file living in `folder`
    fn subcommand(&self, child: CommandId, folder: &FolderPlan) -> Result<Subcommand> {
        let cmd = self.tree.get(child);
        let identifier = to_identifier(cmd.name())?;
        let package = if cmd.has_children() {
            let name = to_package_name(cmd.name())?;
            let import_path = format!("{}/{}/{name}", self.module, folder.package_path);
            Some(ImportedPackage { name, import_path })
        } else {
            None
        };
        Ok(Subcommand {
            identifier,
            package,
        })
    }

    fn children(&self, id: CommandId, folder: &mut FolderPlan) -> Result<()> {
        for child in self.tree.get(id).children() {
            let cmd = self.tree.get(*child);
            if cmd.has_children() {
                let mut sub = folder.child(to_package_name(cmd.name())?);
                sub.files.push(self.file(*child, &sub, false)?);
                self.children(*child, &mut sub)?;
                folder.folders.push(sub);
            } else {
                folder.files.push(self.file(*child, folder, true)?);
            }
        }
        check_unique(self.tree, folder)
    }
}

/// Reject folders whose files or subfolders would clash after name conversion
fn check_unique(tree: &CommandTree, folder: &FolderPlan) -> Result<()> {
    let mut files = HashSet::new();
    let mut identifiers = HashSet::new();
    for file in &folder.files {
        let name = tree.get(file.command).name();
        if !files.insert(file.file_name.as_str()) || !identifiers.insert(to_identifier(name)?) {
            return Err(Error::invalid_name(
                name,
                format!("clashes with another file in {}", folder.package_path),
            ));
        }
    }
    let mut folders = HashSet::new();
    for sub in &folder.folders {
        if !folders.insert(sub.name.as_str()) {
            return Err(Error::invalid_name(
                &sub.name,
                format!("two packages named {:?} in {}", sub.name, folder.package_path),
            ));
        }
    }
    Ok(())
}

fn split_root_folder(root_folder: &str) -> Result<(String, String)> {
    let segments: Vec<&str> = root_folder
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    let last = segments
        .last()
        .ok_or_else(|| Error::invalid_name(root_folder, "output folder must not be empty"))?;
    Ok((to_package_name(last)?, segments.join("/")))
}

/// Plan the generated layout of `tree` under `root_folder`
///
/// `root_folder` is relative to the project root and doubles as the package path used in
/// import statements (`module/root_folder/...`). Returns `Ok(None)` when the root command has
/// no subcommands: there is nothing to wire together yet.
///
/// # Errors
///
/// Returns [`Error::InvalidName`] if names are empty or collide after conversion.
pub fn plan(tree: &CommandTree, root_folder: &str, module: &str) -> Result<Option<FolderPlan>> {
    if !tree.has_subcommands() {
        return Ok(None);
    }
    check_generated_names(tree)?;
    let (name, package_path) = split_root_folder(root_folder)?;
    let mut folder = FolderPlan::new(name, PathBuf::from(&package_path), package_path);
    let planner = Planner { tree, module };
    let root = tree.root();
    folder.files.push(planner.file(root, &folder, false)?);
    planner.children(root, &mut folder)?;
    Ok(Some(folder))
}
