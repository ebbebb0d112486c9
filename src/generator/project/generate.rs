use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::format::SourceFormatter;
use crate::error::{Error, Result};
use crate::generator::layout::{plan, FolderPlan};
use crate::generator::templates::{render_command, render_entry};
use crate::tree::CommandTree;

/// Name of the generated program entry file
pub const ENTRY_FILE: &str = "main.go";

/// Where and how to generate
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Directory all other paths are relative to
    pub project_root: PathBuf,
    /// Top-level package folder, relative to `project_root`; must not exist yet
    pub output_dir: PathBuf,
    /// Folder receiving [`ENTRY_FILE`], relative to `project_root`
    pub entry_dir: PathBuf,
    /// Go module path prefixed to every import
    pub module: String,
    /// Render and report without touching the filesystem
    pub dry_run: bool,
}

/// Files produced by [`generate_project`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedProject {
    pub output_dir: PathBuf,
    /// Command sources in write order
    pub files: Vec<PathBuf>,
    /// `None` when an entry file was already present and left alone
    pub entry_file: Option<PathBuf>,
}

/// Slash-separated form of a relative folder, used as the package path
fn package_path(dir: &Path) -> String {
    dir.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn write_source(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| Error::io(path, e))?;
    println!("✅ Generated {path:?}");
    Ok(())
}

fn render_all(
    tree: &CommandTree,
    layout: &FolderPlan,
    root: &Path,
) -> Result<Vec<(PathBuf, String)>> {
    layout
        .files()
        .into_iter()
        .map(|file| Ok((root.join(&file.path), render_command(tree, file)?)))
        .collect()
}

/// Generate one source file per command plus the program entry file
///
/// Nothing is written unless every check passes and every file renders: the output folder
/// must be absent and the formatter must be available. An existing entry file is kept.
/// Returns `Ok(None)` when the root command has no subcommands yet.
///
/// # Errors
///
/// - [`Error::TargetExists`] if the output folder already exists
/// - [`Error::MissingTool`] if the formatter is not installed
/// - [`Error::InvalidName`] / [`Error::Template`] from planning and rendering
/// - [`Error::Io`] if a file cannot be written
/// - [`Error::ToolFailure`] if formatting fails after the sources were written
pub fn generate_project(
    tree: &CommandTree,
    options: &GenerateOptions,
    formatter: &dyn SourceFormatter,
) -> Result<Option<GeneratedProject>> {
    let output_dir = options.project_root.join(&options.output_dir);
    if output_dir.exists() {
        return Err(Error::TargetExists(output_dir));
    }

    let Some(layout) = plan(tree, &package_path(&options.output_dir), &options.module)? else {
        info!(root = tree.get(tree.root()).name(), "root has no subcommands, nothing to generate");
        return Ok(None);
    };

    let sources = render_all(tree, &layout, &options.project_root)?;
    let entry_dir = options.project_root.join(&options.entry_dir);
    let entry_path = entry_dir.join(ENTRY_FILE);
    let entry = if entry_path.exists() {
        None
    } else {
        Some(render_entry(tree, &layout)?)
    };
    debug!(files = sources.len(), folders = layout.folders().len(), "rendered layout");

    let project = GeneratedProject {
        output_dir: output_dir.clone(),
        files: sources.iter().map(|(path, _)| path.clone()).collect(),
        entry_file: entry.as_ref().map(|_| entry_path.clone()),
    };

    if options.dry_run {
        for path in project.files.iter().chain(project.entry_file.iter()) {
            println!("📄 Would generate {path:?}");
        }
        return Ok(Some(project));
    }

    formatter.ensure_available()?;

    for (path, contents) in &sources {
        write_source(path, contents)?;
    }
    match entry {
        Some(contents) => write_source(&entry_path, &contents)?,
        None => println!("⚠️  Skipping existing entry file: {entry_path:?}"),
    }

    formatter.format(&output_dir)?;
    if project.entry_file.is_some() {
        formatter.format(&entry_dir)?;
    }
    info!(
        output = %output_dir.display(),
        files = project.files.len(),
        "generated command sources"
    );
    Ok(Some(project))
}
