//! # CLI Module
//!
//! Command-line surface of cobragen.
//!
//! ## Commands
//!
//! ### `init`
//!
//! Create the tree document with just a root command:
//!
//! ```bash
//! cobragen init aws
//! ```
//!
//! ### `add`
//!
//! Merge a command path plus its args (`+name`) and flags (`-name`/`--name`) into the tree.
//! Every intermediate command is created on demand; params attach to the deepest command
//! only:
//!
//! ```bash
//! cobragen add s3 ls +bucket --page-size
//! ```
//!
//! ### `show`
//!
//! Print the tree, one command per line with its args and flags.
//!
//! ### `generate`
//!
//! Generate the cobra sources for the whole tree:
//!
//! ```bash
//! cobragen generate --output cmd --module github.com/acme/awsexample
//! ```
//!
//! Options:
//! - `--output <DIR>` - Top-level package folder, must not exist yet (default: `cmd`)
//! - `--entry-dir <DIR>` - Folder receiving `main.go` (default: `examples/cobra-gen`)
//! - `--module <MOD>` - Go module path (default: read from `go.mod`)
//! - `--no-format` - Skip `gofmt`/`goimports`
//! - `--dry-run` - List the files that would be generated
//!
//! `--tree <FILE>` and `--config <FILE>` go before the subcommand and select the tree
//! document and the tool configuration.

mod commands;


pub use commands::{execute, run_cli, Cli, Commands};
