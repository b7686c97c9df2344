//! # cmdtree
//!
//! Declarative command dispatch. Commands are registered with a compact
//! textual definition bound to a handler; at call time a token list
//! (typically process arguments) is resolved against the accumulated
//! command tree and the matched handler runs with validated positional and
//! flag arguments.
//!
//! ```text
//! "deploy PROJECT [target] [-q/--quiet] [--env=NAME]"
//!         │
//!         ▼ register()
//! ┌──────────────────────┐
//! │     command tree     │   literal/wildcard trie, merged incrementally
//! └──────────────────────┘
//!         │
//!         ▼ call(argv)
//! resolver ──► dispatcher ──► handler(Invocation)
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! use cmdtree::{Commander, DispatchResult};
//!
//! let mut commander = Commander::with_program("mockctl");
//! commander
//!     .register("queue ls [--quiet/-q]", |inv| {
//!         if inv.is_set("quiet") { "quiet listing" } else { "full listing" }
//!     })
//!     .unwrap();
//!
//! let result = commander.call(["queue", "ls"]).unwrap();
//! assert!(matches!(result, DispatchResult::Handled("full listing")));
//! ```
//!
//! ## Definition grammar
//!
//! Whitespace-separated words:
//!
//! - plain words are literal path segments (`queue ls`);
//! - all-uppercase words are wildcards matching any one token, forwarded
//!   positionally (`deploy PROJECT`);
//! - `[name]` / `[name...]` declare optional positional parameters, the
//!   latter variadic (at most one per definition);
//! - `[-q/--quiet]` declares a boolean flag with aliases, `[--env=NAME]` a
//!   value-expecting flag. The first alias is the canonical name flag
//!   bindings are keyed by, with `-` normalized to `_`.
//!
//! Bracketed specs may appear anywhere in the string but always belong to
//! the command the definition registers, never to an intermediate path
//! segment.
//!
//! Dispatch failures are typed ([`CallError`]); a literal `--help` token
//! short-circuits into help rendering. The tree itself is process-local:
//! it is rebuilt from `register` calls on every start and is read-only
//! once dispatching begins.

mod commander;
mod definition;
mod dispatch;
mod error;
mod help;
mod resolver;
mod token;
mod tree;

pub use commander::{CommandInfo, Commander, Commands, DispatchResult};
pub use dispatch::{FlagValue, Invocation};
pub use error::{CallError, DefinitionError};
pub use token::{is_flag_token, is_wildcard_segment};
pub use tree::{Arity, Handler, HandlerSpec, OptionalParam};
