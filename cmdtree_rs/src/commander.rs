//! The dispatch surface: registration, resolution, dispatch, help, and
//! enumeration behind one owner of the command tree.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::definition::parse_definition;
use crate::dispatch::{self, Invocation};
use crate::error::{CallError, DefinitionError};
use crate::help;
use crate::resolver;
use crate::tree::{CmdNode, HandlerSpec, OptionalParam};

/// Literal token that short-circuits dispatch into help rendering.
const HELP_TOKEN: &str = "--help";

/// What a successful `call` produced.
#[derive(Debug)]
pub enum DispatchResult<R> {
    /// The resolved handler ran and returned this value.
    Handled(R),
    /// The tokens asked for help; it was printed and no handler ran.
    HelpShown,
}

/// A tree of registered commands plus the dispatch logic over it.
///
/// `R` is the common return type of the registered handlers. Registration
/// mutates the tree; `call` and the enumeration methods are read-only.
pub struct Commander<R> {
    program: Option<String>,
    root: CmdNode<R>,
}

impl<R> Default for Commander<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Commander<R> {
    pub fn new() -> Self {
        Self {
            program: None,
            root: CmdNode::root(),
        }
    }

    /// A commander whose usage lines are prefixed with the program name.
    pub fn with_program(name: impl Into<String>) -> Self {
        Self {
            program: Some(name.into()),
            root: CmdNode::root(),
        }
    }

    /// Register `definition` bound to `handler`.
    ///
    /// The empty definition addresses the root command. Re-registering a
    /// path is additive: existing subtrees are preserved and the first
    /// registered handler wins.
    pub fn register(
        &mut self,
        definition: &str,
        handler: impl Fn(Invocation) -> R + 'static,
    ) -> Result<(), DefinitionError> {
        self.register_described(definition, handler, None, None)
    }

    /// Register with explicit description text. The short description is
    /// the one-liner shown in subcommand listings; the long description is
    /// the rest of the node's help body.
    pub fn register_described(
        &mut self,
        definition: &str,
        handler: impl Fn(Invocation) -> R + 'static,
        short_description: Option<&str>,
        long_description: Option<&str>,
    ) -> Result<(), DefinitionError> {
        let chain = parse_definition(
            definition,
            Box::new(handler),
            short_description.map(str::to_string),
            long_description.map(str::to_string),
        )?;
        self.root.merge(chain);
        debug!(definition, "registered command");
        Ok(())
    }

    /// Resolve `tokens` and invoke the matched handler.
    ///
    /// Empty tokens are dropped. A literal `--help` anywhere renders help
    /// for the surrounding tokens instead of dispatching. All other
    /// failures surface as a [`CallError`]; handler results pass through
    /// unmodified inside [`DispatchResult::Handled`].
    pub fn call<I, S>(&self, tokens: I) -> Result<DispatchResult<R>, CallError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: Vec<String> = tokens
            .into_iter()
            .map(|token| token.as_ref().to_string())
            .collect();

        if tokens.iter().any(|token| token == HELP_TOKEN) {
            print!("{}", self.render_help(&tokens));
            return Ok(DispatchResult::HelpShown);
        }

        let tokens: Vec<String> = tokens.into_iter().filter(|t| !t.is_empty()).collect();
        debug!(tokens = ?tokens, "dispatching");

        let resolution = resolver::resolve(&self.root, &tokens);
        let Some(spec) = resolution.node.spec.as_ref() else {
            let suggestion = resolution
                .remainder
                .first()
                .and_then(|token| resolver::suggest_subcommand(resolution.node, token));
            return Err(CallError::UnknownCommand { suggestion });
        };
        dispatch::invoke(spec, resolution.wildcards, resolution.remainder)
            .map(DispatchResult::Handled)
    }

    /// Dispatch, and on failure print the error plus contextual help.
    ///
    /// This is the convenience layer over [`Commander::call`]: the four
    /// dispatch failures are reported on stderr, followed by help for the
    /// same tokens on stdout. Handler results come back as `Some`.
    pub fn call_with_help<I, S>(&self, tokens: I) -> Option<R>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: Vec<String> = tokens
            .into_iter()
            .map(|token| token.as_ref().to_string())
            .collect();
        match self.call(&tokens) {
            Ok(DispatchResult::Handled(result)) => Some(result),
            Ok(DispatchResult::HelpShown) => None,
            Err(err) => {
                eprintln!("{err}");
                self.help(&tokens);
                None
            }
        }
    }

    /// Print help for the node `tokens` resolve to.
    pub fn help<I, S>(&self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        print!("{}", self.render_help(tokens));
    }

    /// Render help for the node `tokens` resolve to.
    ///
    /// Unlike dispatch, help resolution does not require the node to be
    /// callable: an inactive prefix still reports its subcommands.
    pub fn render_help<I, S>(&self, tokens: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: Vec<String> = tokens
            .into_iter()
            .map(|token| token.as_ref().to_string())
            .collect();
        let resolution = resolver::resolve(&self.root, &tokens);
        help::render_node_help(self.program.as_deref(), resolution.node)
    }

    /// Lazy depth-first enumeration of registered commands, parents before
    /// children. Each call starts a fresh traversal.
    pub fn commands(&self) -> Commands<'_, R> {
        Commands {
            stack: vec![(String::new(), &self.root)],
        }
    }

    /// Serializable summaries for every registered command, in enumeration
    /// order.
    pub fn command_infos(&self) -> Vec<CommandInfo> {
        self.commands()
            .map(|(path, spec)| CommandInfo {
                path,
                usage: spec.usage.clone(),
                short_description: spec.short_description.clone(),
                long_description: spec.long_description.clone(),
                mandatory_params: spec.mandatory_params.clone(),
                optional_params: spec.optional_params.clone(),
                flags: spec.flags.clone(),
            })
            .collect()
    }

    /// The command summaries as pretty-printed JSON, for machine consumers.
    pub fn render_commands_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.command_infos())
    }

    /// One usage line (and short description) per registered command.
    pub fn render_command_list(&self) -> String {
        help::render_command_list(self.program.as_deref(), self.commands())
    }
}

/// Depth-first iterator over registered commands: full path string plus the
/// terminal's spec.
pub struct Commands<'a, R> {
    stack: Vec<(String, &'a CmdNode<R>)>,
}

impl<'a, R> Iterator for Commands<'a, R> {
    type Item = (String, &'a HandlerSpec<R>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((path, node)) = self.stack.pop() {
            // Children go on the stack in reverse listing order so literals
            // pop lexicographically, the wildcard child last.
            let children: Vec<_> = node.children_in_order().collect();
            for child in children.into_iter().rev() {
                let child_path = join_path(&path, &child.display_name());
                self.stack.push((child_path, child));
            }
            if let Some(spec) = node.spec.as_ref() {
                return Some((path, spec));
            }
        }
        None
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix} {name}")
    }
}

/// Serializable summary of one registered command.
#[derive(Debug, Clone, Serialize)]
pub struct CommandInfo {
    /// Space-joined path from the root, e.g. `"queue purge"`.
    pub path: String,
    pub usage: String,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    /// Wildcard parameter names in path order.
    pub mandatory_params: Vec<String>,
    pub optional_params: Vec<OptionalParam>,
    /// Canonical flag name -> expects a value.
    pub flags: BTreeMap<String, bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_call_roundtrip() {
        let mut commander = Commander::new();
        commander.register("mockcmd", |_| "CALLED").unwrap();

        match commander.call(["mockcmd"]) {
            Ok(DispatchResult::Handled(value)) => assert_eq!(value, "CALLED"),
            other => panic!("expected a handled call, got {other:?}"),
        }
    }

    #[test]
    fn test_help_token_short_circuits_dispatch() {
        let mut commander = Commander::new();
        commander.register("mockcmd", |_| "CALLED").unwrap();

        let result = commander.call(["mockcmd", "--help"]).unwrap();
        assert!(matches!(result, DispatchResult::HelpShown));
    }

    #[test]
    fn test_unknown_command_carries_a_suggestion() {
        let mut commander = Commander::new();
        commander.register("scan", |_| ()).unwrap();

        match commander.call(["scna"]) {
            Err(CallError::UnknownCommand { suggestion }) => {
                assert_eq!(suggestion.as_deref(), Some("scan"));
            }
            other => panic!("expected UnknownCommand, got {other:?}"),
        }
    }

    #[test]
    fn test_enumeration_is_depth_first_parent_before_children() {
        let mut commander = Commander::new();
        commander.register("mockcmd queue purge", |_| ()).unwrap();
        commander.register("mockcmd queue", |_| ()).unwrap();
        commander.register("mockcmd", |_| ()).unwrap();
        commander.register("alpha", |_| ()).unwrap();

        let paths: Vec<String> = commander.commands().map(|(path, _)| path).collect();
        assert_eq!(paths, vec!["alpha", "mockcmd", "mockcmd queue", "mockcmd queue purge"]);

        // Restartable: a second traversal sees the same sequence.
        let again: Vec<String> = commander.commands().map(|(path, _)| path).collect();
        assert_eq!(paths, again);
    }

    #[test]
    fn test_root_registration_enumerates_with_an_empty_path() {
        let mut commander = Commander::new();
        commander.register("", |_| ()).unwrap();

        let paths: Vec<String> = commander.commands().map(|(path, _)| path).collect();
        assert_eq!(paths, vec![""]);
    }

    #[test]
    fn test_command_infos_capture_params_and_flags() {
        let mut commander = Commander::new();
        commander
            .register("deploy PROJECT [target] [-q/--quiet]", |_| ())
            .unwrap();

        let infos = commander.command_infos();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].path, "deploy PROJECT");
        assert_eq!(infos[0].mandatory_params, vec!["PROJECT"]);
        assert_eq!(infos[0].optional_params.len(), 1);
        assert_eq!(infos[0].flags.get("q"), Some(&false));
    }

    #[test]
    fn test_render_command_list_uses_the_program_prefix() {
        let mut commander = Commander::with_program("mockctl");
        commander
            .register_described("queue purge", |_| (), Some("Drop everything."), None)
            .unwrap();

        assert_eq!(
            commander.render_command_list(),
            "mockctl queue purge\n\tDrop everything.\n"
        );
    }
}
