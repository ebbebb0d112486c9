//! Reading and writing the persisted tree document.
//!
//! The document is YAML unless the file name ends in `.json`. Either way the core only ever
//! sees a [`serde_yaml::Value`]; text (de)serialization lives here.
//!
//! A missing file is an error: `cobragen init <root>` is the explicit way to start a tree.

use std::path::Path;

use serde_yaml::Value;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::tree::{decode, encode, CommandTree};

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

fn serialization_error(path: &Path, message: impl ToString) -> Error {
    Error::Serialization {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

/// Parse document text in the format implied by `path`
///
/// # Errors
///
/// Returns [`Error::Serialization`] if the text is not valid YAML/JSON.
pub fn parse_document(path: &Path, contents: &str) -> Result<Value> {
    if is_json(path) {
        serde_json::from_str(contents).map_err(|e| serialization_error(path, e))
    } else {
        serde_yaml::from_str(contents).map_err(|e| serialization_error(path, e))
    }
}

/// Render a document as text in the format implied by `path`
///
/// # Errors
///
/// Returns [`Error::Serialization`] if the value cannot be represented.
pub fn render_document(path: &Path, document: &Value) -> Result<String> {
    if is_json(path) {
        serde_json::to_string_pretty(document)
            .map(|mut text| {
                text.push('\n');
                text
            })
            .map_err(|e| serialization_error(path, e))
    } else {
        serde_yaml::to_string(document).map_err(|e| serialization_error(path, e))
    }
}

/// Load and decode the tree stored at `path`
///
/// # Errors
///
/// - [`Error::Io`] if the file cannot be read (including when it does not exist)
/// - [`Error::Serialization`] if it is not valid YAML/JSON
/// - any decode error from [`crate::tree::decode`]
pub fn load_tree(path: &Path) -> Result<CommandTree> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    debug!(path = %path.display(), bytes = contents.len(), "read tree document");
    decode(&parse_document(path, &contents)?)
}

/// Encode `tree` and write it to `path`, returning the written text
///
/// # Errors
///
/// Returns [`Error::Serialization`] or [`Error::Io`] if the document cannot be written.
pub fn save_tree(path: &Path, tree: &CommandTree) -> Result<String> {
    let text = render_document(path, &encode(tree))?;
    std::fs::write(path, &text).map_err(|e| Error::io(path, e))?;
    info!(path = %path.display(), commands = tree.command_count(), "saved tree document");
    Ok(text)
}

/// Create a new tree file holding only `root_name`
///
/// # Errors
///
/// - [`Error::TargetExists`] if `path` already exists
/// - [`Error::InvalidName`] if `root_name` is not a valid command name
/// - [`Error::Io`] / [`Error::Serialization`] if the file cannot be written
pub fn init_tree(path: &Path, root_name: &str) -> Result<CommandTree> {
    if path.exists() {
        return Err(Error::TargetExists(path.to_path_buf()));
    }
    let tree = CommandTree::new(root_name)?;
    save_tree(path, &tree)?;
    Ok(tree)
}
