//! # cobragen
//!
//! **cobragen** grows a hierarchical command tree one invocation at a time, persists it as a
//! YAML (or JSON) document, and generates Go source for the [cobra](https://github.com/spf13/cobra)
//! framework from it: one file per command, one package per command that has subcommands.
//!
//! ## Architecture
//!
//! - **[`naming`]** - Command names to exported identifiers, package names and variables
//! - **[`tree`]** - The command tree, its document codec and the merge algorithm
//! - **[`store`]** - Reading and writing the tree document
//! - **[`generator`]** - Layout planning, template rendering and the project writer
//! - **[`config`]** - `cobragen.toml` and environment overrides
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - The `cobragen` command line
//!
//! ### Flow
//!
//! ```text
//! cobragen add s3 ls +bucket --page-size
//!   store::load_tree ─▶ tree::apply ─▶ store::save_tree
//!
//! cobragen generate
//!   store::load_tree ─▶ generator::plan ─▶ render every file ─▶ write ─▶ gofmt/goimports
//! ```
//!
//! ## Example
//!
//! ```rust
//! use cobragen::tree::{apply, encode, CommandTree};
//!
//! # fn main() -> cobragen::Result<()> {
//! let mut tree = CommandTree::new("aws")?;
//! apply(&mut tree, &["s3", "ls"], &["+bucket", "--page-size"])?;
//! apply(&mut tree, &["s3", "ls"], &["--page-size"])?;
//!
//! let s3 = tree.find_child(tree.root(), "s3").expect("created");
//! let ls = tree.find_child(s3, "ls").expect("created");
//! assert_eq!(tree.get(ls).args(), ["bucket"]);
//! assert_eq!(tree.get(ls).flags().len(), 1);
//! # let _ = encode(&tree);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod naming;
pub mod store;
pub mod tree;

pub use error::{Error, Result};
