//! The command tree.
//!
//! One node per path segment, keyed by the lower-cased literal text, with
//! at most one wildcard child held in a separate slot. The tree grows by
//! merging single-path chains produced by the definition parser; it is
//! never pruned and is read-only during dispatch.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::dispatch::Invocation;

/// Boxed handler bound to a terminal node. The engine hands it a fully
/// validated [`Invocation`] and passes its return value through untouched.
pub type Handler<R> = Box<dyn Fn(Invocation) -> R>;

/// Arity of an optional positional parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    /// Consumes exactly one call token.
    One,
    /// Consumes every remaining positional token; at most one per command.
    ZeroOrMore,
}

/// One `[name]` / `[name...]` parameter from a definition string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionalParam {
    pub name: String,
    pub arity: Arity,
}

/// Everything a terminal node knows about its command.
pub struct HandlerSpec<R> {
    /// The definition string as registered, used verbatim in usage lines.
    pub usage: String,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    /// Wildcard segment names on the path to this node, in path order.
    pub mandatory_params: Vec<String>,
    /// Bracketed optional parameters, in declaration order.
    pub optional_params: Vec<OptionalParam>,
    /// Canonical flag name -> whether the flag expects a value.
    pub flags: BTreeMap<String, bool>,
    /// Every normalized alias -> canonical flag name. Each canonical name
    /// maps to itself.
    pub flag_aliases: BTreeMap<String, String>,
    pub(crate) handler: Handler<R>,
}

impl<R> fmt::Debug for HandlerSpec<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerSpec")
            .field("usage", &self.usage)
            .field("short_description", &self.short_description)
            .field("long_description", &self.long_description)
            .field("mandatory_params", &self.mandatory_params)
            .field("optional_params", &self.optional_params)
            .field("flags", &self.flags)
            .field("flag_aliases", &self.flag_aliases)
            .finish_non_exhaustive()
    }
}

/// One path segment in the command tree.
#[derive(Debug)]
pub(crate) struct CmdNode<R> {
    /// Raw segment text as registered; `None` for the root.
    pub(crate) name: Option<String>,
    /// Matches any single non-flag token instead of a fixed literal.
    pub(crate) wildcard: bool,
    /// Present iff some definition terminates exactly here.
    pub(crate) spec: Option<HandlerSpec<R>>,
    /// Literal children, keyed by the lower-cased segment text.
    pub(crate) children: BTreeMap<String, CmdNode<R>>,
    /// The at-most-one wildcard child.
    pub(crate) wildcard_child: Option<Box<CmdNode<R>>>,
}

impl<R> CmdNode<R> {
    /// The unnamed root of a dispatch surface.
    pub(crate) fn root() -> Self {
        Self {
            name: None,
            wildcard: false,
            spec: None,
            children: BTreeMap::new(),
            wildcard_child: None,
        }
    }

    pub(crate) fn segment(name: &str, wildcard: bool) -> Self {
        Self {
            name: Some(name.to_string()),
            wildcard,
            ..Self::root()
        }
    }

    pub(crate) fn is_terminal(&self) -> bool {
        self.spec.is_some()
    }

    pub(crate) fn has_children(&self) -> bool {
        !self.children.is_empty() || self.wildcard_child.is_some()
    }

    /// Display form: literals lower-case, wildcards upper-case, root empty.
    pub(crate) fn display_name(&self) -> String {
        match &self.name {
            None => String::new(),
            Some(name) if self.wildcard => name.to_uppercase(),
            Some(name) => name.to_lowercase(),
        }
    }

    /// Literal match first; the wildcard child only when no literal key
    /// equals the token. Literal keys are the lower-cased registered text
    /// and the comparison is case-sensitive.
    pub(crate) fn lookup(&self, token: &str) -> Option<&CmdNode<R>> {
        self.children.get(token).or(self.wildcard_child.as_deref())
    }

    pub(crate) fn literal_children(&self) -> impl Iterator<Item = &CmdNode<R>> {
        self.children.values()
    }

    /// All children in listing order: literals by key, wildcard last.
    pub(crate) fn children_in_order(&self) -> impl Iterator<Item = &CmdNode<R>> {
        self.children.values().chain(self.wildcard_child.as_deref())
    }

    /// Hang `child` off this node in the slot its kind selects. Used by the
    /// definition parser when folding a chain together.
    pub(crate) fn adopt(&mut self, child: CmdNode<R>) {
        if child.wildcard {
            self.wildcard_child = Some(Box::new(child));
        } else {
            let key = child.display_name();
            self.children.insert(key, child);
        }
    }

    /// Merge a freshly parsed chain into this subtree.
    ///
    /// Structure is additive: existing children and their subtrees are
    /// never displaced. An existing spec wins over an incoming one (first
    /// registration wins); a merged-in wildcard renames the slot (last
    /// registration wins).
    pub(crate) fn merge(&mut self, mut other: CmdNode<R>) {
        if other.wildcard {
            self.name = other.name.take();
        }
        if let Some(spec) = other.spec.take() {
            if self.spec.is_none() {
                self.spec = Some(spec);
            } else {
                debug!(
                    segment = %self.display_name(),
                    "keeping first-registered handler"
                );
            }
        }
        for (key, child) in other.children {
            match self.children.entry(key) {
                Entry::Occupied(slot) => slot.into_mut().merge(child),
                Entry::Vacant(slot) => {
                    slot.insert(child);
                }
            }
        }
        if let Some(incoming) = other.wildcard_child {
            match &mut self.wildcard_child {
                Some(existing) => existing.merge(*incoming),
                None => self.wildcard_child = Some(incoming),
            }
        }
    }
}
