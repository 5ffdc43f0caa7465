use std::collections::HashSet;

use crate::cache::{parent_key_in, NodeMap};
use crate::node::NodeKey;

/// Result of a search pass over the tree.
///
/// A blank query is not the same thing as a query with zero hits: the
/// first means "search is off", the second renders an empty list. Keeping
/// them as distinct variants stops the builder from having to guess from
/// set emptiness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Query was blank; search is inactive.
    Inactive,
    /// The set of keys that must be rendered so every match is visible:
    /// each match plus every ancestor up to Root.
    Matches(HashSet<NodeKey>),
}

impl SearchOutcome {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Matches(_))
    }
}

/// Compute the keys needed to reveal every match of `query`.
///
/// Case-insensitive substring match on node names. The walk covers the
/// whole fetched map regardless of `is_expanded`: a collapsed directory
/// containing a match must still surface it. For each match, ancestors are
/// recorded up to Root, stopping early at a key already present (an earlier
/// match has recorded the rest of the path).
pub fn search(map: &NodeMap, query: &str) -> SearchOutcome {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return SearchOutcome::Inactive;
    }

    let mut visible = HashSet::new();
    for children in map.values() {
        for child in children {
            if child.name.to_lowercase().contains(&query) {
                mark_with_ancestors(map, child.key.clone(), &mut visible);
            }
        }
    }
    SearchOutcome::Matches(visible)
}

fn mark_with_ancestors(map: &NodeMap, key: NodeKey, visible: &mut HashSet<NodeKey>) {
    let mut current = key;
    loop {
        if !visible.insert(current.clone()) {
            return;
        }
        match parent_key_in(map, &current) {
            Some(parent) if !parent.is_root() => current = parent,
            _ => return,
        }
    }
}
