//! Flag and arity validation, then handler invocation.
//!
//! The dispatcher receives the remainder the resolver could not consume as
//! path, partitions it into flags and positionals, validates both against
//! the terminal's [`HandlerSpec`], and hands the handler one [`Invocation`]
//! record. Handler return values pass through untouched.

use std::collections::BTreeMap;

use crate::error::CallError;
use crate::token::{FLAG_MARKER, is_flag_token, normalize_flag_name};
use crate::tree::{Arity, HandlerSpec};

/// Value bound to a canonical flag name in an [`Invocation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    /// A boolean flag that was present on the call. Always `true`; absent
    /// flags are simply missing from the map.
    Bool(bool),
    /// A value-expecting flag: `--user=apa` binds `Some("apa")`, a bare
    /// `--user` binds `None`.
    Value(Option<String>),
}

/// The fully resolved input handed to a handler.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Invocation {
    /// Positional arguments: wildcard path captures first, then leftover
    /// positional tokens, in input order.
    pub args: Vec<String>,
    /// Flag bindings keyed by canonical flag name.
    pub flags: BTreeMap<String, FlagValue>,
}

impl Invocation {
    /// True if the boolean flag `name` was present on the call.
    pub fn is_set(&self, name: &str) -> bool {
        matches!(self.flags.get(name), Some(FlagValue::Bool(true)))
    }

    /// Value of the value-expecting flag `name`, if one was supplied.
    pub fn value(&self, name: &str) -> Option<&str> {
        match self.flags.get(name) {
            Some(FlagValue::Value(Some(value))) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Positional argument at `index`.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}

/// Validate `remainder` against `spec` and invoke the handler.
///
/// `wildcards` are the resolver's path captures; they are prepended to the
/// positional arguments and take no part in the arity check.
pub(crate) fn invoke<R>(
    spec: &HandlerSpec<R>,
    wildcards: Vec<String>,
    remainder: Vec<String>,
) -> Result<R, CallError> {
    let mut positionals = Vec::new();
    let mut flags = BTreeMap::new();

    for token in remainder {
        if is_flag_token(&token) {
            bind_flag(spec, &token, &mut flags)?;
        } else {
            positionals.push(token);
        }
    }

    check_positional_arity(spec, &positionals)?;

    let mut args = wildcards;
    args.extend(positionals);
    Ok((spec.handler)(Invocation { args, flags }))
}

fn bind_flag<R>(
    spec: &HandlerSpec<R>,
    token: &str,
    flags: &mut BTreeMap<String, FlagValue>,
) -> Result<(), CallError> {
    let stripped = token.trim_start_matches(FLAG_MARKER);
    let (name, value) = match stripped.split_once('=') {
        Some((name, value)) => (name, Some(value.to_string())),
        None => (stripped, None),
    };
    let canonical = spec
        .flag_aliases
        .get(&normalize_flag_name(name))
        .ok_or_else(|| CallError::UnknownFlag {
            token: token.to_string(),
        })?;

    let binding = if spec.flags.get(canonical).copied().unwrap_or(false) {
        FlagValue::Value(value)
    } else {
        // Boolean flags ignore any '=value' the caller tacked on.
        FlagValue::Bool(true)
    };
    flags.insert(canonical.clone(), binding);
    Ok(())
}

/// Mandatory params are already satisfied by the path walk; this check
/// covers the bracketed slots only. Each exactly-one slot requires a
/// token; a variadic slot absorbs everything beyond them.
fn check_positional_arity<R>(
    spec: &HandlerSpec<R>,
    positionals: &[String],
) -> Result<(), CallError> {
    let fixed: Vec<_> = spec
        .optional_params
        .iter()
        .filter(|p| p.arity == Arity::One)
        .collect();
    let variadic = spec
        .optional_params
        .iter()
        .any(|p| p.arity == Arity::ZeroOrMore);

    if positionals.len() < fixed.len() {
        return Err(CallError::MissingMandatoryArgument {
            name: fixed[positionals.len()].name.clone(),
        });
    }
    if !variadic && positionals.len() > fixed.len() {
        return Err(CallError::UnknownArgument {
            token: positionals[fixed.len()].clone(),
        });
    }
    Ok(())
}
