use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::config::{resolve_tool_config, ToolConfig};
use crate::error::Error;
use crate::generator::{
    generate_project, resolve_module, GenerateOptions, GoFormatter, NoopFormatter,
    SourceFormatter,
};
use crate::logging::{init_logging, LogConfig};
use crate::store::{init_tree, load_tree, save_tree};
use crate::tree::{apply, partition_tokens, CommandTree};

/// Command-line interface for cobragen
///
/// Grows a persisted command tree one invocation at a time and generates cobra command
/// sources from it.
#[derive(Parser, Debug)]
#[command(name = "cobragen", version)]
#[command(about = "Build a cobra command tree and generate its Go sources", long_about = None)]
pub struct Cli {
    /// Tree document to read and update (default: `tree_file` from the config, else config.yaml)
    #[arg(long)]
    pub tree: Option<PathBuf>,

    /// Tool configuration file (default: cobragen.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log decisions at debug level
    #[arg(long, default_value_t = false)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available cobragen commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new tree document holding only the root command
    Init {
        /// Name of the root command
        root: String,
    },
    /// Merge one command path with its args and flags into the tree
    ///
    /// Plain tokens name the path from below the root down to the target command; tokens
    /// starting with `+` add positional args and tokens starting with `-` add flags to it:
    ///
    #[cfg_attr(doc, doc = "```text")]
    ///     cobragen add s3 ls +bucket --page-size
    #[cfg_attr(doc, doc = "```")]
    Add {
        /// Path segments, `+arg` and `-flag` tokens in any order
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        tokens: Vec<String>,
    },
    /// Print the tree with each command's args and flags
    Show,
    /// Generate one Go source file per command plus the program entry file
    Generate {
        /// Top-level package folder; must not exist yet (default from config: cmd)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Folder receiving main.go (default from config: examples/cobra-gen)
        #[arg(long)]
        entry_dir: Option<PathBuf>,

        /// Go module path (default: read from go.mod)
        #[arg(long)]
        module: Option<String>,

        /// Skip gofmt/goimports
        #[arg(long, default_value_t = false)]
        no_format: bool,

        /// Perform a dry run: show what would be generated without writing files
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
}

fn load(path: &Path) -> anyhow::Result<CommandTree> {
    load_tree(path).map_err(|e| {
        let missing = matches!(
            &e,
            Error::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        );
        let err = anyhow::Error::new(e);
        if missing {
            err.context(format!(
                "No command tree at {path:?}; run `cobragen init <root>` to create one"
            ))
        } else {
            err.context(format!("Failed to load command tree from {path:?}"))
        }
    })
}

fn add(tree_path: &Path, tokens: &[String]) -> anyhow::Result<()> {
    if tokens.is_empty() {
        println!("No commands provided.");
        return Ok(());
    }
    let (path, params) = partition_tokens(tokens)?;
    let mut tree = load(tree_path)?;
    apply(&mut tree, &path, &params)
        .with_context(|| format!("Failed to add {}", tokens.join(" ")))?;
    let text = save_tree(tree_path, &tree)
        .with_context(|| format!("Failed to save command tree to {tree_path:?}"))?;
    println!("✅ Updated {tree_path:?}");
    print!("{text}");
    Ok(())
}

fn generate(
    tree_path: &Path,
    config: &ToolConfig,
    output: Option<PathBuf>,
    entry_dir: Option<PathBuf>,
    module: Option<String>,
    no_format: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    let tree = load(tree_path)?;
    let project_root = PathBuf::from(".");
    let module = module.or_else(|| config.module.clone());
    let module = resolve_module(module.as_deref(), &project_root)
        .context("Failed to determine the Go module path (pass --module or add a go.mod)")?;
    let options = GenerateOptions {
        project_root,
        output_dir: output.unwrap_or_else(|| config.output_dir.clone()),
        entry_dir: entry_dir.unwrap_or_else(|| config.entry_dir.clone()),
        module,
        dry_run,
    };
    let formatter: Box<dyn SourceFormatter> = if no_format || !config.format {
        Box::new(NoopFormatter)
    } else {
        Box::new(GoFormatter::from_env())
    };
    debug!(?options, "generating");

    match generate_project(&tree, &options, formatter.as_ref())
        .with_context(|| format!("Failed to generate into {:?}", options.output_dir))?
    {
        Some(project) if !dry_run => {
            println!(
                "✅ Generated {} command files under {:?}",
                project.files.len(),
                project.output_dir
            );
        }
        Some(_) => {}
        None => println!(
            "Nothing to generate: {} has no subcommands yet.",
            tree.get(tree.root()).name()
        ),
    }
    Ok(())
}

/// Run an already-parsed command line
///
/// # Errors
///
/// Returns any error from the selected command, with context for the user.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config =
        resolve_tool_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let tree_path = cli.tree.unwrap_or_else(|| config.tree_file.clone());
    debug!(tree = %tree_path.display(), "resolved tree document");

    match cli.command {
        Commands::Init { root } => {
            init_tree(&tree_path, &root)
                .with_context(|| format!("Failed to create {tree_path:?}"))?;
            println!("✅ Created {tree_path:?} with root command {root:?}");
            Ok(())
        }
        Commands::Add { tokens } => add(&tree_path, &tokens),
        Commands::Show => {
            let tree = load(&tree_path)?;
            print!("{tree}");
            Ok(())
        }
        Commands::Generate {
            output,
            entry_dir,
            module,
            no_format,
            dry_run,
        } => generate(
            &tree_path, &config, output, entry_dir, module, no_format, dry_run,
        ),
    }
}

/// Parse the process arguments, set up logging and run the selected command
///
/// # Errors
///
/// Returns any error from logging setup or from the selected command.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config = log_config.verbose();
    }
    init_logging(&log_config)?;
    execute(cli)
}
