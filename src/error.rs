//! # Error Handling
//!
//! Every fallible operation in the library returns [`Result<T>`]. None of these errors is
//! recoverable within a single invocation: the CLI reports the diagnostic and exits non-zero.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading, merging, planning or generating a command tree
#[derive(Error, Debug)]
pub enum Error {
    /// The persisted structure does not describe a command tree.
    #[error("malformed command tree: {0}")]
    MalformedTree(String),

    /// A CLI or persisted token is empty or carries an unexpected prefix.
    #[error("invalid token {token:?}: {reason}")]
    InvalidToken { token: String, reason: String },

    /// A command, flag or argument name is empty or collides with an existing one.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// Generation refuses to write into an existing output folder.
    #[error("target {0:?} already exists, refusing to overwrite")]
    TargetExists(PathBuf),

    /// An external formatting tool is not installed.
    #[error("{tool} not found, install it")]
    MissingTool { tool: String },

    /// An external formatting tool ran and exited unsuccessfully.
    #[error("{tool} failed in {dir:?}: {status}")]
    ToolFailure {
        tool: String,
        dir: PathBuf,
        status: String,
    },

    /// Reading or writing the tree document or a generated file failed.
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tree document could not be parsed or serialized.
    #[error("unable to (de)serialize {path:?}: {message}")]
    Serialization { path: PathBuf, message: String },

    /// The tool configuration file is invalid.
    #[error("invalid configuration {path:?}: {message}")]
    Config { path: PathBuf, message: String },

    /// A source template failed to render.
    #[error("template rendering failed: {0}")]
    Template(#[from] askama::Error),
}

impl Error {
    pub(crate) fn invalid_token(token: &str, reason: impl Into<String>) -> Self {
        Error::InvalidToken {
            token: token.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_name(name: &str, reason: impl Into<String>) -> Self {
        Error::InvalidName {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
