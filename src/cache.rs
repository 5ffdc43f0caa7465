use std::collections::HashMap;

use tracing::debug;

use crate::node::{FileNode, NodeKey};

/// Parent key → ordered, unsorted, unfiltered children as last fetched.
///
/// A key absent from the map means "children not yet fetched"; present with
/// an empty vec means "confirmed empty". Every key other than `Root`
/// appears in exactly one parent's sequence.
pub type NodeMap = HashMap<NodeKey, Vec<FileNode>>;

/// The single writer of the [`NodeMap`].
///
/// One cache per workspace/session; switching workspace drops the cache and
/// builds a fresh one. All operations are silent no-ops when addressed with
/// keys that no longer exist: cache mutations race with delayed UI
/// callbacks holding stale nodes, and that is expected.
#[derive(Debug, Default)]
pub struct FileTreeCache {
    nodes: NodeMap,
}

impl FileTreeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all state and re-seed with a new workspace root.
    pub fn set_root(&mut self, root: FileNode) {
        debug!(root = %root.name, "cache reset");
        self.nodes.clear();
        self.nodes.insert(NodeKey::Root, vec![root]);
    }

    /// Install (or replace) the fetched child sequence for `key`.
    ///
    /// Fetched sub-trees of children that vanished in the refresh are
    /// evicted so no orphaned entries survive.
    pub fn put(&mut self, key: NodeKey, children: Vec<FileNode>) {
        if let Some(old) = self.nodes.get(&key) {
            let stale: Vec<NodeKey> = old
                .iter()
                .filter(|o| !children.iter().any(|c| c.key == o.key))
                .map(|o| o.key.clone())
                .collect();
            for gone in stale {
                self.evict_subtree(&gone);
            }
        }
        self.nodes.insert(key, children);
        self.check_invariants();
    }

    /// Replace the single entry `target` with `transform(entry)`.
    ///
    /// Locates the parent by scanning for a sequence containing `target`;
    /// a miss means the node was already removed, which is not an error.
    pub fn update_node<F>(&mut self, target: &NodeKey, transform: F)
    where
        F: FnOnce(&mut FileNode),
    {
        for children in self.nodes.values_mut() {
            if let Some(entry) = children.iter_mut().find(|c| &c.key == target) {
                transform(entry);
                return;
            }
        }
        debug!(?target, "update on stale key ignored");
    }

    /// Remove `target` and every entry reachable from it.
    ///
    /// If the parent's sequence becomes empty, the parent key is evicted
    /// too, so re-expanding it re-triggers a fetch instead of showing a
    /// stale empty directory.
    pub fn remove_node(&mut self, target: &NodeKey) {
        let Some(parent_key) = self.parent_key(target) else {
            return;
        };
        self.evict_subtree(target);
        if let Some(siblings) = self.nodes.get_mut(&parent_key) {
            siblings.retain(|c| &c.key != target);
            if siblings.is_empty() && !parent_key.is_root() {
                self.nodes.remove(&parent_key);
            }
        }
        self.check_invariants();
    }

    /// The FileNode that owns `target`, or `None` for Root / removed keys.
    pub fn parent_node(&self, target: &NodeKey) -> Option<&FileNode> {
        let parent_key = self.parent_key(target)?;
        if parent_key.is_root() {
            return None;
        }
        self.nodes
            .values()
            .flat_map(|children| children.iter())
            .find(|c| c.key == parent_key)
    }

    /// The key whose child sequence contains `target`.
    pub fn parent_key(&self, target: &NodeKey) -> Option<NodeKey> {
        parent_key_in(&self.nodes, target)
    }

    /// True only if every selected node resolves to the same parent key.
    ///
    /// Batch operations (cut, delete, compress) are only legal across
    /// siblings. An empty selection fails the check.
    pub fn ensure_common_parent_key(&self, selection: &[FileNode]) -> bool {
        let mut keys = selection.iter().map(|n| self.parent_key(&n.key));
        let Some(first) = keys.next() else {
            return false;
        };
        if first.is_none() {
            return false;
        }
        keys.all(|k| k == first)
    }

    /// Whether children of `key` have been fetched (possibly empty).
    pub fn contains(&self, key: &NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Fetched children of `key`; empty for not-yet-fetched keys.
    ///
    /// "Not fetched" and "confirmed empty" are distinguished via
    /// [`contains`](Self::contains), not this return value.
    pub fn get(&self, key: &NodeKey) -> &[FileNode] {
        self.nodes.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_all(&self) -> &NodeMap {
        &self.nodes
    }

    /// Point-in-time copy of the map for a display-list build.
    pub fn snapshot(&self) -> NodeMap {
        self.nodes.clone()
    }

    /// Drop the map entries of `root` and everything reachable from it.
    fn evict_subtree(&mut self, root: &NodeKey) {
        let mut stack = vec![root.clone()];
        while let Some(key) = stack.pop() {
            if let Some(children) = self.nodes.remove(&key) {
                stack.extend(children.into_iter().map(|c| c.key));
            }
        }
    }

    /// Duplicate keys across child sequences are a programming error, not a
    /// runtime condition.
    #[cfg(debug_assertions)]
    fn check_invariants(&self) {
        let mut seen = std::collections::HashSet::new();
        for children in self.nodes.values() {
            for child in children {
                assert!(
                    seen.insert(&child.key),
                    "key {:?} appears under two parents",
                    child.key
                );
            }
        }
    }

    #[cfg(not(debug_assertions))]
    fn check_invariants(&self) {}
}

/// The key whose child sequence contains `target`, in a raw map snapshot.
///
/// Linear scan over the whole map; fine at file-explorer scale. If lookup
/// ever shows up in profiles, a child→parent index maintained at the same
/// mutation points would preserve this contract.
pub fn parent_key_in(map: &NodeMap, target: &NodeKey) -> Option<NodeKey> {
    map.iter()
        .find(|(_, children)| children.iter().any(|c| &c.key == target))
        .map(|(key, _)| key.clone())
}
