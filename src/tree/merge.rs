//! Find-or-create path insertion with idempotent parameter merge.
//!
//! `apply` walks the path one level at a time, matching children by name only. The first
//! missing segment switches to creation: that segment and every remaining one become a fresh
//! linear chain. Only the deepest node on the path receives the params, and re-applying a
//! param that is already present is a no-op, so running the same invocation twice changes
//! nothing while running the same path with new params accumulates them on that node.

use tracing::{debug, info};

use super::codec::Element;
use super::command::{CommandId, CommandTree};
use super::names::check_generated_names;
use crate::error::{Error, Result};
use crate::naming::{to_identifier, to_local_variable, to_package_name};

/// Split a flat invocation into path segments and param tokens
///
/// Tokens starting with `-` or `+` are params wherever they appear; all other tokens form the
/// path, in order.
///
/// # Errors
///
/// Returns [`Error::InvalidToken`] for an empty token.
pub fn partition_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<(Vec<String>, Vec<String>)> {
    let mut path = Vec::new();
    let mut params = Vec::new();
    for token in tokens {
        let token = token.as_ref();
        if token.is_empty() {
            return Err(Error::invalid_token(token, "token must not be empty"));
        }
        if token.starts_with('-') || token.starts_with('+') {
            params.push(token.to_string());
        } else {
            path.push(token.to_string());
        }
    }
    Ok((path, params))
}

fn parse_segment(segment: &str) -> Result<&str> {
    if segment.is_empty() {
        return Err(Error::invalid_token(segment, "path segment must not be empty"));
    }
    if segment.starts_with('-') || segment.starts_with('+') {
        return Err(Error::invalid_token(
            segment,
            "path segments must not start with '+' or '-'",
        ));
    }
    Ok(segment)
}

#[derive(Debug, Default)]
struct Params {
    args: Vec<String>,
    flags: Vec<String>,
}

fn parse_params<S: AsRef<str>>(tokens: &[S]) -> Result<Params> {
    let mut params = Params::default();
    for token in tokens {
        let token = token.as_ref();
        if !(token.starts_with('-') || token.starts_with('+')) {
            return Err(Error::invalid_token(
                token,
                "params must start with '+' (argument) or '-' (flag)",
            ));
        }
        match Element::from_token(token)? {
            Element::Arg(arg) => params.args.push(arg),
            Element::Flag(flag) => params.flags.push(flag),
            Element::Leaf(_) | Element::Branch(..) => {
                return Err(Error::invalid_token(token, "not a param token"));
            }
        }
    }
    Ok(params)
}

/// Reject `incoming` names whose converted form matches a different name already in use
fn check_collisions<'a>(
    existing: impl Iterator<Item = &'a str>,
    incoming: &[String],
    convert: fn(&str) -> Result<String>,
    what: &str,
) -> Result<()> {
    let mut seen: Vec<(String, String)> = Vec::new();
    for name in existing {
        seen.push((convert(name)?, name.to_string()));
    }
    for name in incoming {
        let converted = convert(name)?;
        if let Some((_, other)) = seen
            .iter()
            .find(|(conv, orig)| *conv == converted && orig != name)
        {
            return Err(Error::invalid_name(
                name,
                format!("{what} collides with {other:?} (both become {converted:?})"),
            ));
        }
        seen.push((converted, name.clone()));
    }
    Ok(())
}

/// Merge `path` and `params` into `tree`
///
/// Returns the id of the command that received the params. The merge runs on a copy that
/// replaces `tree` only once every token has been validated and the generated names of the
/// whole result are collision-free, so a failed call leaves it untouched.
///
/// # Errors
///
/// - [`Error::InvalidToken`] for empty tokens, prefixed path segments or unprefixed params
/// - [`Error::InvalidName`] for empty param names or names that would collide in generated
///   code, see [`check_generated_names`]
pub fn apply<S: AsRef<str>, P: AsRef<str>>(
    tree: &mut CommandTree,
    path: &[S],
    params: &[P],
) -> Result<CommandId> {
    let segments = path
        .iter()
        .map(|s| parse_segment(s.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    let params = parse_params(params)?;

    let mut current = tree.root();
    let mut depth = 0;
    while let Some(segment) = segments.get(depth) {
        match tree.find_child(current, segment) {
            Some(child) => {
                current = child;
                depth += 1;
            }
            None => break,
        }
    }
    let missing = segments.get(depth..).unwrap_or_default();

    if let Some(first) = missing.first() {
        let siblings = tree.get(current).children().iter().map(|c| tree.get(*c).name());
        let incoming = [first.to_string()];
        check_collisions(siblings.clone(), &incoming, to_identifier, "command")?;
        check_collisions(siblings, &incoming, to_package_name, "command")?;
    }
    let (existing_flags, existing_args): (Vec<&str>, Vec<&str>) = if missing.is_empty() {
        let cmd = tree.get(current);
        (
            cmd.flags().iter().map(String::as_str).collect(),
            cmd.args().iter().map(String::as_str).collect(),
        )
    } else {
        (Vec::new(), Vec::new())
    };
    check_collisions(existing_flags.into_iter(), &params.flags, to_identifier, "flag")?;
    check_collisions(existing_args.into_iter(), &params.args, to_local_variable, "argument")?;

    let mut staged = tree.clone();
    for segment in missing {
        current = staged.add_child(current, segment)?;
        debug!(command = %staged.name_path(current).join(" "), "created command");
    }

    let cmd = staged.get_mut(current);
    for flag in &params.flags {
        if cmd.add_flag(flag) {
            debug!(flag = %flag, "added flag");
        }
    }
    for arg in &params.args {
        if cmd.add_arg(arg) {
            debug!(arg = %arg, "added argument");
        }
    }
    check_generated_names(&staged)?;
    *tree = staged;
    info!(
        command = %tree.name_path(current).join(" "),
        created = missing.len(),
        "merged invocation into command tree"
    );
    Ok(current)
}
