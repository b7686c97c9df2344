//! Definition-string parsing.
//!
//! A definition is a whitespace-separated string mixing path segments with
//! bracketed specs:
//!
//! ```text
//! deploy PROJECT [target] [--env=NAME] [-q/--quiet] [extra...]
//! ```
//!
//! Plain words build the command path; an all-uppercase word is a wildcard
//! matching any one call token. Bracketed words never create tree
//! structure: wherever they appear in the string, they attach to the
//! terminal node (the last path segment, or the root if there is none).

use std::collections::BTreeMap;

use crate::error::DefinitionError;
use crate::token::{FLAG_MARKER, is_wildcard_segment, normalize_flag_name};
use crate::tree::{Arity, CmdNode, Handler, HandlerSpec, OptionalParam};

/// Parse `definition` into a single-path chain rooted at an implicit root
/// node, ready to merge into a command tree.
pub(crate) fn parse_definition<R>(
    definition: &str,
    handler: Handler<R>,
    short_description: Option<String>,
    long_description: Option<String>,
) -> Result<CmdNode<R>, DefinitionError> {
    let mut segments: Vec<(String, bool)> = Vec::new();
    let mut mandatory_params = Vec::new();
    let mut optional_params = Vec::new();
    let mut flags = BTreeMap::new();
    let mut flag_aliases = BTreeMap::new();

    for word in definition.split_whitespace() {
        match bracketed(word) {
            Some(interior) if interior.starts_with(FLAG_MARKER) => {
                parse_flag_spec(interior, &mut flags, &mut flag_aliases)?;
            }
            Some(interior) => {
                parse_optional_param(interior, &mut optional_params)?;
            }
            None => {
                let wildcard = is_wildcard_segment(word);
                if wildcard {
                    mandatory_params.push(word.to_string());
                }
                segments.push((word.to_string(), wildcard));
            }
        }
    }

    let mut pending = Some(HandlerSpec {
        usage: definition.trim().to_string(),
        short_description,
        long_description,
        mandatory_params,
        optional_params,
        flags,
        flag_aliases,
        handler,
    });

    // Fold the chain together from the terminal segment outwards.
    let mut tail: Option<CmdNode<R>> = None;
    for (text, wildcard) in segments.into_iter().rev() {
        let mut node = CmdNode::segment(&text, wildcard);
        match tail.take() {
            Some(child) => node.adopt(child),
            None => node.spec = pending.take(),
        }
        tail = Some(node);
    }

    let mut root = CmdNode::root();
    match tail {
        Some(child) => root.adopt(child),
        // An empty definition addresses the root command itself.
        None => root.spec = pending.take(),
    }
    Ok(root)
}

fn bracketed(word: &str) -> Option<&str> {
    word.strip_prefix('[')?.strip_suffix(']')
}

/// `-name[/-alias]*[=PLACEHOLDER]`. The first alias is canonical; a
/// `=PLACEHOLDER` suffix marks the flag value-expecting.
fn parse_flag_spec(
    interior: &str,
    flags: &mut BTreeMap<String, bool>,
    flag_aliases: &mut BTreeMap<String, String>,
) -> Result<(), DefinitionError> {
    let (aliases, expects_value) = match interior.split_once('=') {
        Some((aliases, _placeholder)) => (aliases, true),
        None => (interior, false),
    };

    let mut canonical: Option<String> = None;
    for alias in aliases.split('/') {
        let name = normalize_flag_name(alias);
        if name.is_empty() {
            return Err(DefinitionError::EmptyFlagAlias(alias.to_string()));
        }
        let main = canonical.get_or_insert_with(|| name.clone()).clone();
        flag_aliases.insert(name, main);
    }
    if let Some(main) = canonical {
        flags.insert(main, expects_value);
    }
    Ok(())
}

/// `name` or `name...`; at most one variadic parameter per definition.
fn parse_optional_param(
    interior: &str,
    optional_params: &mut Vec<OptionalParam>,
) -> Result<(), DefinitionError> {
    let (name, arity) = match interior.strip_suffix("...") {
        Some(stem) => (stem, Arity::ZeroOrMore),
        None => (interior, Arity::One),
    };
    if name.is_empty() {
        return Err(DefinitionError::EmptyOptionalName);
    }
    if arity == Arity::ZeroOrMore
        && optional_params.iter().any(|p| p.arity == Arity::ZeroOrMore)
    {
        return Err(DefinitionError::DuplicateVariadic(name.to_string()));
    }
    optional_params.push(OptionalParam {
        name: name.to_string(),
        arity,
    });
    Ok(())
}
