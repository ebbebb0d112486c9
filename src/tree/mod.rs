//! # Command Tree
//!
//! The in-memory model of the command hierarchy, its persisted document codec and the merge
//! algorithm that grows it one invocation at a time.
//!
//! ```text
//! document ──decode──▶ CommandTree ──apply(path, params)──▶ CommandTree ──encode──▶ document
//! ```
//!
//! The tree is rebuilt from the document at the start of every invocation and is never
//! shared between threads.

mod codec;
mod command;
mod merge;
mod names;

pub use codec::{decode, elements_of, encode, parse_body, Element};
pub use command::{Command, CommandId, CommandTree};
pub use merge::{apply, partition_tokens};
pub use names::check_generated_names;
