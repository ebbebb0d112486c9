//! # Generator Module
//!
//! Turns a [`CommandTree`](crate::tree::CommandTree) into Go source files for the cobra
//! framework: one file per command, one package per command that has subcommands, plus a
//! program entry file.
//!
//! ## Architecture
//!
//! ```text
//! CommandTree → layout::plan → FolderPlan → templates::render_command → write → format
//! ```
//!
//! 1. **Layout** - Decides which folder (package) every command's file lands in and how each
//!    file registers its subcommands
//! 2. **Template Rendering** - Renders Askama templates from data precomputed in Rust
//! 3. **Project Writer** - Refuses to touch an existing output folder, renders every file in
//!    memory, then writes them and runs the formatter
//!
//! ## Generated Structure
//!
//! ```text
//! cmd/
//! ├── aws.go                  # Root command, registers s3 and ec2
//! ├── ec2.go                  # Leaf: same package as its parent
//! └── s3/
//!     ├── s3.go               # Own package, registers ls
//!     └── ls.go
//! examples/cobra-gen/
//! └── main.go                 # Executes the root command
//! ```
//!
//! ## Programmatic Usage
//!
//! ```rust,ignore
//! use cobragen::generator::{generate_project, GenerateOptions, NoopFormatter};
//!
//! # fn main() -> cobragen::Result<()> {
//! let tree = cobragen::store::load_tree("config.yaml".as_ref())?;
//! let options = GenerateOptions {
//!     project_root: ".".into(),
//!     output_dir: "cmd".into(),
//!     entry_dir: "examples/cobra-gen".into(),
//!     module: "github.com/acme/awsexample".into(),
//!     dry_run: false,
//! };
//! generate_project(&tree, &options, &NoopFormatter)?;
//! # Ok(())
//! # }
//! ```
//!
//! Templates live in `templates/` at the crate root:
//!
//! - `command.go.txt` - One command with its flags, args and subcommand registrations
//! - `main.go.txt` - Program entry point

pub mod layout;
mod module;
mod project;
mod templates;
#[cfg(test)]
mod tests;

pub use layout::{plan, FilePlan, FolderPlan, ImportedPackage, Subcommand, SOURCE_SUFFIX};
pub use module::{parse_module_directive, resolve_module, GO_MOD};
pub use project::{
    generate_project, GenerateOptions, GeneratedProject, GoFormatter, NoopFormatter,
    SourceFormatter, ENTRY_FILE,
};
pub use templates::{
    render_command, render_entry, ArgDef, CommandTemplateData, EntryTemplateData, FlagDef,
    ImportedSubcommand,
};
