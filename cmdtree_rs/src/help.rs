//! Help text rendering.
//!
//! The contract is deliberately small: a usage line, the description text
//! when present, and one line per immediate subcommand. Everything renders
//! into a `String`; printing is the caller's concern.

use crate::tree::{CmdNode, HandlerSpec};

/// Render help for `node`. `program` is the dispatch surface's own name
/// and prefixes usage lines when set.
pub(crate) fn render_node_help<R>(program: Option<&str>, node: &CmdNode<R>) -> String {
    if !node.is_terminal() && !node.has_children() {
        return "No help available.\n".to_string();
    }

    let mut out = String::new();
    if let Some(spec) = node.spec.as_ref() {
        if !spec.usage.is_empty() {
            out.push_str(&format!("Usage: {}{}\n", prefix(program), spec.usage));
        }
        if let Some(short) = &spec.short_description {
            out.push_str(short);
            out.push('\n');
        }
        if let Some(long) = &spec.long_description {
            out.push_str(long);
            out.push('\n');
        }
    }

    if node.has_children() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("Subcommands:\n");
        for child in node.children_in_order() {
            let short = child
                .spec
                .as_ref()
                .and_then(|spec| spec.short_description.as_deref())
                .unwrap_or("");
            out.push_str(&format!("\t{}\t{}\n", child.display_name(), short));
        }
    }
    out
}

/// One usage line (and short description, when present) per registered
/// command, in enumeration order.
pub(crate) fn render_command_list<'a, R: 'a>(
    program: Option<&str>,
    commands: impl Iterator<Item = (String, &'a HandlerSpec<R>)>,
) -> String {
    let mut out = String::new();
    for (_path, spec) in commands {
        out.push_str(&format!("{}{}\n", prefix(program), spec.usage));
        if let Some(short) = &spec.short_description {
            out.push_str(&format!("\t{short}\n"));
        }
    }
    out
}

fn prefix(program: Option<&str>) -> String {
    match program {
        Some(name) => format!("{name} "),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::parse_definition;
    use crate::tree::CmdNode;

    fn tree(definitions: &[(&str, Option<&str>)]) -> CmdNode<()> {
        let mut root = CmdNode::root();
        for (definition, short) in definitions {
            let chain = parse_definition(
                definition,
                Box::new(|_| ()),
                short.map(str::to_string),
                None,
            )
            .unwrap();
            root.merge(chain);
        }
        root
    }

    #[test]
    fn test_terminal_with_children_lists_subcommands() {
        let root = tree(&[("mockcmd", None), ("mockcmd bepa", None)]);
        let node = root.lookup("mockcmd").unwrap();
        assert_eq!(
            render_node_help(None, node),
            "Usage: mockcmd\n\nSubcommands:\n\tbepa\t\n"
        );
    }

    #[test]
    fn test_wildcard_child_is_listed_last_in_upper_case() {
        let root = tree(&[
            ("mockcmd", None),
            ("mockcmd extra", Some("Normal command.")),
            ("mockcmd BEPA", Some("Wildcard command.")),
        ]);
        let node = root.lookup("mockcmd").unwrap();
        assert_eq!(
            render_node_help(None, node),
            "Usage: mockcmd\n\nSubcommands:\n\textra\tNormal command.\n\tBEPA\tWildcard command.\n"
        );
    }

    #[test]
    fn test_program_name_prefixes_the_usage_line() {
        let root = tree(&[("queue purge", Some("Drop everything."))]);
        let node = root.lookup("queue").unwrap().lookup("purge").unwrap();
        assert_eq!(
            render_node_help(Some("mockctl"), node),
            "Usage: mockctl queue purge\nDrop everything.\n"
        );
    }

    #[test]
    fn test_inactive_prefix_still_reports_children() {
        let root = tree(&[("queue purge", None)]);
        let node = root.lookup("queue").unwrap();
        assert_eq!(render_node_help(None, node), "Subcommands:\n\tpurge\t\n");
    }

    #[test]
    fn test_dead_end_renders_the_fallback() {
        let root: CmdNode<()> = CmdNode::root();
        assert_eq!(render_node_help(None, &root), "No help available.\n");
    }
}
