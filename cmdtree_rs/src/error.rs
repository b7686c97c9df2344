//! Typed failures for registration and dispatch.
//!
//! Registration problems ([`DefinitionError`]) are programming errors in the
//! definition string and surface immediately from `register`. Dispatch
//! problems ([`CallError`]) are caller-recoverable; the core never catches
//! them itself.

use thiserror::Error;

/// Rejected command definition strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// A definition may declare at most one `[name...]` parameter.
    #[error("definition declares a second variadic parameter '[{0}...]'")]
    DuplicateVariadic(String),

    /// `[]` or `[...]` - an optional parameter needs a name.
    #[error("optional parameter has an empty name")]
    EmptyOptionalName,

    /// A flag alias that is nothing but marker characters, e.g. `[-]`.
    #[error("flag alias '{0}' is empty after stripping markers")]
    EmptyFlagAlias(String),
}

/// Dispatch failures. None of these are fatal; the caller decides whether
/// to print help, exit, or retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    /// No terminal node is reachable for the given tokens.
    #[error("unknown command{}", suggestion_suffix(.suggestion))]
    UnknownCommand {
        /// Closest registered subcommand at the point matching stopped.
        suggestion: Option<String>,
    },

    /// More positional tokens than the resolved command can consume.
    #[error("unknown argument '{token}'")]
    UnknownArgument { token: String },

    /// Too few positional tokens to fill the command's parameter slots.
    #[error("missing mandatory argument '{name}'")]
    MissingMandatoryArgument { name: String },

    /// A `-`-prefixed token that matches no registered flag alias.
    #[error("unknown flag '{token}'")]
    UnknownFlag { token: String },
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(". Did you mean '{s}'?"),
        None => String::new(),
    }
}
