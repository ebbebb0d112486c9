use std::collections::BTreeSet;
use std::fmt;

use crate::error::{Error, Result};

/// Index of a [`Command`] inside its owning [`CommandTree`]
///
/// Ids are only handed out by the tree that owns the node and nodes are never removed, so an
/// id stays valid for the lifetime of that tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(usize);

/// One subcommand: its positional arguments, its flags and its subcommands
#[derive(Debug, Clone)]
pub struct Command {
    name: String,
    args: Vec<String>,
    flags: BTreeSet<String>,
    children: Vec<CommandId>,
    parent: Option<CommandId>,
}

impl Command {
    fn new(name: &str, parent: Option<CommandId>) -> Self {
        Command {
            name: name.to_string(),
            args: Vec::new(),
            flags: BTreeSet::new(),
            children: Vec::new(),
            parent,
        }
    }

    /// Command name as typed on the command line
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Positional arguments in declaration order
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Flag names
    pub fn flags(&self) -> &BTreeSet<String> {
        &self.flags
    }

    /// Subcommands in declaration order
    pub fn children(&self) -> &[CommandId] {
        &self.children
    }

    /// The command holding this one, `None` for the root
    pub fn parent(&self) -> Option<CommandId> {
        self.parent
    }

    /// True when the command has at least one subcommand
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// True when the command declares nothing: no args, no flags, no subcommands
    pub fn is_bare(&self) -> bool {
        self.args.is_empty() && self.flags.is_empty() && self.children.is_empty()
    }

    /// Append a positional argument unless it is already declared. Returns `true` if added.
    pub(crate) fn add_arg(&mut self, arg: &str) -> bool {
        if self.args.iter().any(|a| a == arg) {
            return false;
        }
        self.args.push(arg.to_string());
        true
    }

    /// Insert a flag unless it is already declared. Returns `true` if added.
    pub(crate) fn add_flag(&mut self, flag: &str) -> bool {
        self.flags.insert(flag.to_string())
    }
}

/// Check that `name` can be used as a command name
///
/// A command name must be non-empty and must not start with `+` or `-`, otherwise it would be
/// read back as a positional argument or a flag.
pub(crate) fn validate_command_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_name(name, "command name must not be empty"));
    }
    if name.starts_with('+') || name.starts_with('-') {
        return Err(Error::invalid_name(
            name,
            "command name must not start with '+' or '-'",
        ));
    }
    Ok(())
}

/// A command hierarchy stored as an arena
///
/// All nodes live in one `Vec` owned by the tree. Parent and child links are indices, so the
/// back reference to the parent never owns anything. The root is always the first node.
#[derive(Debug, Clone)]
pub struct CommandTree {
    nodes: Vec<Command>,
}

impl CommandTree {
    /// Create a tree holding only a root command
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidName`] if `root_name` is not a valid command name.
    pub fn new(root_name: &str) -> Result<Self> {
        validate_command_name(root_name)?;
        Ok(CommandTree {
            nodes: vec![Command::new(root_name, None)],
        })
    }

    /// Id of the root command, always the first node
    pub fn root(&self) -> CommandId {
        CommandId(0)
    }

    /// Look up a command by id
    ///
    /// Ids are only produced by this tree, so the lookup cannot miss.
    #[allow(clippy::indexing_slicing)]
    pub fn get(&self, id: CommandId) -> &Command {
        &self.nodes[id.0]
    }

    #[allow(clippy::indexing_slicing)]
    pub(crate) fn get_mut(&mut self, id: CommandId) -> &mut Command {
        &mut self.nodes[id.0]
    }

    /// Number of commands in the tree, root included
    pub fn command_count(&self) -> usize {
        self.nodes.len()
    }

    /// True when the root has at least one subcommand
    pub fn has_subcommands(&self) -> bool {
        self.get(self.root()).has_children()
    }

    /// First child of `parent` named `name`
    pub fn find_child(&self, parent: CommandId, name: &str) -> Option<CommandId> {
        self.get(parent)
            .children
            .iter()
            .copied()
            .find(|child| self.get(*child).name == name)
    }

    /// Attach a new, empty command under `parent` and return its id
    ///
    /// Sibling uniqueness is the caller's concern: the decoder and the merger check it with
    /// their own error semantics before calling this.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidName`] if `name` is not a valid command name.
    pub(crate) fn add_child(&mut self, parent: CommandId, name: &str) -> Result<CommandId> {
        validate_command_name(name)?;
        let id = CommandId(self.nodes.len());
        self.nodes.push(Command::new(name, Some(parent)));
        self.get_mut(parent).children.push(id);
        Ok(id)
    }

    /// Names from the root down to `id`
    pub fn name_path(&self, id: CommandId) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            let cmd = self.get(cur);
            names.push(cmd.name());
            current = cmd.parent;
        }
        names.reverse();
        names
    }

    /// All command ids in depth-first pre-order, root first
    pub fn iter(&self) -> Vec<CommandId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.get(id).children.iter().rev().copied());
        }
        out
    }

    fn same_subtree(&self, id: CommandId, other: &CommandTree, other_id: CommandId) -> bool {
        let a = self.get(id);
        let b = other.get(other_id);
        a.name == b.name
            && a.args == b.args
            && a.flags == b.flags
            && a.children.len() == b.children.len()
            && a.children
                .iter()
                .zip(b.children.iter())
                .all(|(x, y)| self.same_subtree(*x, other, *y))
    }

    fn fmt_command(&self, f: &mut fmt::Formatter<'_>, id: CommandId, level: usize) -> fmt::Result {
        let indent = "  ".repeat(level);
        let cmd = self.get(id);
        writeln!(f, "{indent}Command: {}", self.name_path(id).join(" "))?;
        writeln!(f, "{indent}Args:")?;
        for arg in &cmd.args {
            writeln!(f, "{indent}  {arg}")?;
        }
        writeln!(f, "{indent}Flags:")?;
        for flag in &cmd.flags {
            writeln!(f, "{indent}  {flag}")?;
        }
        for child in &cmd.children {
            self.fmt_command(f, *child, level + 1)?;
        }
        Ok(())
    }
}

/// Structural equality: names, args in order, flags as a set, children in order.
///
/// Node ids are not compared; two trees built in different insertion orders are equal as long
/// as their shapes match.
impl PartialEq for CommandTree {
    fn eq(&self, other: &Self) -> bool {
        self.same_subtree(self.root(), other, other.root())
    }
}

impl Eq for CommandTree {}

impl fmt::Display for CommandTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_command(f, self.root(), 0)
    }
}
