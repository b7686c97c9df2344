//! Left-to-right resolution of call tokens against the command tree.

use strsim::levenshtein;

use crate::token::is_flag_token;
use crate::tree::CmdNode;

/// Suggestions further away than this are noise, not typos.
const MAX_SUGGESTION_DISTANCE: usize = 2;

/// Outcome of walking the tree over a token sequence.
pub(crate) struct Resolution<'a, R> {
    /// Deepest node reached; callable only if it is terminal.
    pub node: &'a CmdNode<R>,
    /// Tokens consumed by wildcard segments, in path order.
    pub wildcards: Vec<String>,
    /// Everything from the first unmatched token onwards.
    pub remainder: Vec<String>,
}

/// Walk `tokens` from `root`, consuming path segments greedily.
///
/// A literal child is matched case-sensitively against its lower-cased
/// registered key; the wildcard child is entered only when no literal
/// matches. A flag token stops path matching immediately, and a token
/// matching no child ends the walk with itself and everything after it as
/// remainder.
pub(crate) fn resolve<'a, R>(root: &'a CmdNode<R>, tokens: &[String]) -> Resolution<'a, R> {
    let mut node = root;
    let mut wildcards = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        let next = if is_flag_token(token) {
            None
        } else {
            node.lookup(token)
        };
        match next {
            Some(child) => {
                if child.wildcard {
                    wildcards.push(token.clone());
                }
                node = child;
            }
            None => {
                return Resolution {
                    node,
                    wildcards,
                    remainder: tokens[i..].to_vec(),
                };
            }
        }
    }

    Resolution {
        node,
        wildcards,
        remainder: Vec::new(),
    }
}

/// Closest literal child of `node` to `token`, for "did you mean" hints on
/// unknown commands.
pub(crate) fn suggest_subcommand<R>(node: &CmdNode<R>, token: &str) -> Option<String> {
    let token = token.to_lowercase();
    node.literal_children()
        .map(|child| child.display_name())
        .map(|name| (levenshtein(&token, &name), name))
        .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::parse_definition;

    fn tree(definitions: &[&str]) -> CmdNode<()> {
        let mut root = CmdNode::root();
        for definition in definitions {
            let chain = parse_definition(definition, Box::new(|_| ()), None, None).unwrap();
            root.merge(chain);
        }
        root
    }

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_exact_path_leaves_no_remainder() {
        let root = tree(&["mockcmd queue purge"]);
        let resolution = resolve(&root, &tokens(&["mockcmd", "queue", "purge"]));
        assert!(resolution.node.is_terminal());
        assert!(resolution.remainder.is_empty());
        assert!(resolution.wildcards.is_empty());
    }

    #[test]
    fn test_unmatched_token_and_rest_become_remainder() {
        let root = tree(&["mockcmd queue"]);
        let resolution = resolve(&root, &tokens(&["mockcmd", "queue", "accept", "now"]));
        assert_eq!(resolution.node.display_name(), "queue");
        assert_eq!(resolution.remainder, tokens(&["accept", "now"]));
    }

    #[test]
    fn test_flag_token_stops_path_matching() {
        let root = tree(&["mockcmd queue", "mockcmd queue purge"]);
        let resolution = resolve(&root, &tokens(&["mockcmd", "queue", "-q", "purge"]));
        assert_eq!(resolution.node.display_name(), "queue");
        assert_eq!(resolution.remainder, tokens(&["-q", "purge"]));
    }

    #[test]
    fn test_wildcard_captures_token_and_literal_wins_over_wildcard() {
        let root = tree(&["mockcmd PROJECT", "mockcmd cmd2"]);

        let resolution = resolve(&root, &tokens(&["mockcmd", "apa"]));
        assert!(resolution.node.wildcard);
        assert_eq!(resolution.wildcards, tokens(&["apa"]));

        let resolution = resolve(&root, &tokens(&["mockcmd", "cmd2"]));
        assert!(!resolution.node.wildcard);
        assert!(resolution.wildcards.is_empty());
    }

    #[test]
    fn test_empty_tokens_resolve_to_the_root() {
        let root = tree(&[""]);
        let resolution = resolve(&root, &[]);
        assert!(resolution.node.is_terminal());
        assert!(resolution.remainder.is_empty());
    }

    #[test]
    fn test_suggest_subcommand_within_distance() {
        let root = tree(&["scan", "tree"]);
        assert_eq!(suggest_subcommand(&root, "scna"), Some("scan".into()));
        assert_eq!(suggest_subcommand(&root, "tre"), Some("tree".into()));
        assert_eq!(suggest_subcommand(&root, "completely-else"), None);
    }
}
