//! Conversion between the persisted document shape and [`CommandTree`].
//!
//! The document is a single-key mapping `{root: body}`. A body is null or a list whose items
//! are `+arg` strings, `-flag`/`--flag` strings, bare subcommand names, or `{name: body}`
//! mappings:
//!
//! ```yaml
//! aws:
//!   - --profile
//!   - s3:
//!       - ls:
//!           - +mybucket
//!           - --page-size
//!       - mb
//!   - ec2
//! ```

use serde_yaml::{Mapping, Value};
use tracing::debug;

use super::command::{CommandId, CommandTree};
use crate::error::{Error, Result};

/// One item of a command body, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// `+name`: a positional argument
    Arg(String),
    /// `-name` or `--name`: a flag
    Flag(String),
    /// A subcommand that declares nothing
    Leaf(String),
    /// `{name: body}`: a subcommand with its own body
    Branch(String, Vec<Element>),
}

impl Element {
    /// Classify a single string token
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidToken`] for an empty token
    /// - [`Error::InvalidName`] when the prefix leaves nothing usable as a name
    pub fn from_token(token: &str) -> Result<Self> {
        if token.is_empty() {
            return Err(Error::invalid_token(token, "token must not be empty"));
        }
        if let Some(arg) = token.strip_prefix('+') {
            if arg.is_empty() {
                return Err(Error::invalid_name(arg, "argument name must not be empty"));
            }
            return Ok(Element::Arg(arg.to_string()));
        }
        if token.starts_with('-') {
            let flag = strip_dashes(token);
            if flag.is_empty() {
                return Err(Error::invalid_name(flag, "flag name must not be empty"));
            }
            if flag.starts_with('-') {
                return Err(Error::invalid_name(
                    flag,
                    "flags take at most two leading dashes",
                ));
            }
            return Ok(Element::Flag(flag.to_string()));
        }
        Ok(Element::Leaf(token.to_string()))
    }
}

/// Strip one or two leading dashes
pub(crate) fn strip_dashes(token: &str) -> &str {
    let once = token.strip_prefix('-').unwrap_or(token);
    once.strip_prefix('-').unwrap_or(once)
}

fn key_name(key: &Value) -> Result<&str> {
    key.as_str()
        .ok_or_else(|| Error::MalformedTree(format!("command name must be a string, got {key:?}")))
}

fn parse_entries(map: &Mapping) -> Result<Vec<Element>> {
    map.iter()
        .map(|(key, body)| Ok(Element::Branch(key_name(key)?.to_string(), parse_body(body)?)))
        .collect()
}

fn parse_item(item: &Value) -> Result<Vec<Element>> {
    match item {
        Value::String(token) => Ok(vec![Element::from_token(token)?]),
        Value::Mapping(map) if !map.is_empty() => parse_entries(map),
        Value::Mapping(_) => Err(Error::MalformedTree(
            "empty mapping in command body".to_string(),
        )),
        other => Err(Error::MalformedTree(format!(
            "unexpected list element {other:?}"
        ))),
    }
}

/// Classify a command body into elements
///
/// # Errors
///
/// Returns [`Error::MalformedTree`] when the body is neither null, a list nor a mapping, or
/// holds an element of an unexpected shape.
pub fn parse_body(body: &Value) -> Result<Vec<Element>> {
    match body {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.extend(parse_item(item)?);
            }
            Ok(out)
        }
        Value::Mapping(map) => parse_entries(map),
        other => Err(Error::MalformedTree(format!(
            "command body must be a list or a mapping, got {other:?}"
        ))),
    }
}

fn add_unique_child(tree: &mut CommandTree, parent: CommandId, name: &str) -> Result<CommandId> {
    if tree.find_child(parent, name).is_some() {
        return Err(Error::MalformedTree(format!(
            "duplicate command {name:?} under {:?}",
            tree.name_path(parent).join(" ")
        )));
    }
    tree.add_child(parent, name)
}

fn attach(tree: &mut CommandTree, id: CommandId, elements: Vec<Element>) -> Result<()> {
    for element in elements {
        match element {
            Element::Arg(arg) => {
                tree.get_mut(id).add_arg(&arg);
            }
            Element::Flag(flag) => {
                tree.get_mut(id).add_flag(&flag);
            }
            Element::Leaf(name) => {
                add_unique_child(tree, id, &name)?;
            }
            Element::Branch(name, body) => {
                let child = add_unique_child(tree, id, &name)?;
                attach(tree, child, body)?;
            }
        }
    }
    Ok(())
}

/// Build a [`CommandTree`] from the persisted document
///
/// # Errors
///
/// - [`Error::MalformedTree`] if the document is not a single-key mapping, a body has an
///   unexpected shape, or two sibling commands share a name
/// - [`Error::InvalidToken`] / [`Error::InvalidName`] for unusable tokens
pub fn decode(document: &Value) -> Result<CommandTree> {
    let map = document.as_mapping().ok_or_else(|| {
        Error::MalformedTree("document must be a mapping with a single root command".to_string())
    })?;
    let mut entries = map.iter();
    let (key, body) = match (entries.next(), entries.next()) {
        (Some(entry), None) => entry,
        (None, _) => {
            return Err(Error::MalformedTree("no root command".to_string()));
        }
        (Some(_), Some(_)) => {
            return Err(Error::MalformedTree(format!(
                "root command must be only one, found {}",
                map.len()
            )));
        }
    };
    let mut tree = CommandTree::new(key_name(key)?)?;
    let root = tree.root();
    attach(&mut tree, root, parse_body(body)?)?;
    debug!(root = %tree.get(root).name(), commands = tree.command_count(), "decoded command tree");
    Ok(tree)
}

/// Describe the body of `id` as elements: args, then flags, then subcommands
pub fn elements_of(tree: &CommandTree, id: CommandId) -> Vec<Element> {
    let cmd = tree.get(id);
    let args = cmd.args().iter().cloned().map(Element::Arg);
    let flags = cmd.flags().iter().cloned().map(Element::Flag);
    let children = cmd.children().iter().map(|child| {
        let sub = tree.get(*child);
        if sub.is_bare() {
            Element::Leaf(sub.name().to_string())
        } else {
            Element::Branch(sub.name().to_string(), elements_of(tree, *child))
        }
    });
    args.chain(flags).chain(children).collect()
}

fn element_to_value(element: Element) -> Value {
    match element {
        Element::Arg(arg) => Value::String(format!("+{arg}")),
        Element::Flag(flag) => Value::String(format!("--{flag}")),
        Element::Leaf(name) => Value::String(name),
        Element::Branch(name, body) => {
            let mut map = Mapping::new();
            map.insert(Value::String(name), body_to_value(body));
            Value::Mapping(map)
        }
    }
}

fn body_to_value(body: Vec<Element>) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    Value::Sequence(body.into_iter().map(element_to_value).collect())
}

/// Turn a [`CommandTree`] back into the persisted document shape
pub fn encode(tree: &CommandTree) -> Value {
    let root = tree.root();
    let mut map = Mapping::new();
    map.insert(
        Value::String(tree.get(root).name().to_string()),
        body_to_value(elements_of(tree, root)),
    );
    Value::Mapping(map)
}
