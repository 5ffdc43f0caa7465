use std::path::{PathBuf, MAIN_SEPARATOR};
use std::time::SystemTime;

/// Identifies which storage backend a node belongs to.
///
/// A workspace can span several stores (local disk, a rooted device, an
/// FTP/SFTP/WebDAV server); the same absolute path on two stores must
/// produce distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BackendId(pub String);

impl BackendId {
    pub fn local() -> Self {
        Self("local".into())
    }
}

impl std::fmt::Display for BackendId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Value-equal identifier of one position in the tree.
///
/// `Root` is the synthetic top of the current workspace; every real entry
/// is keyed by (backend, absolute path). Two `FileNode`s describing the
/// same filesystem entry always compare equal here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKey {
    Root,
    Entry { backend: BackendId, path: PathBuf },
}

impl NodeKey {
    pub fn entry(backend: BackendId, path: impl Into<PathBuf>) -> Self {
        Self::Entry {
            backend,
            path: path.into(),
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }

    /// The path component of the key, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Root => None,
            Self::Entry { path, .. } => Some(path),
        }
    }
}

/// One entry in the hierarchy: backend-reported facts plus view state.
#[derive(Debug, Clone)]
pub struct FileNode {
    pub key: NodeKey,
    pub name: String,
    pub size: u64,
    pub modified: Option<SystemTime>,
    pub is_dir: bool,
    pub is_hidden: bool,

    /// Indentation level in the flattened display list.
    pub depth: usize,
    /// The user has opened this directory.
    pub is_expanded: bool,
    /// A fetch for this node's children is in flight.
    pub is_loading: bool,
    /// Last fetch failed; rendered inline in place of children.
    pub error: Option<String>,
    /// Overrides `name` for rendering; set when this row stands in for a
    /// compacted directory chain.
    display_name: Option<String>,
}

impl FileNode {
    pub fn new(key: NodeKey, name: impl Into<String>, is_dir: bool) -> Self {
        let name = name.into();
        let is_hidden = name.starts_with('.');
        Self {
            key,
            name,
            size: 0,
            modified: None,
            is_dir,
            is_hidden,
            depth: 0,
            is_expanded: false,
            is_loading: false,
            error: None,
            display_name: None,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn with_modified(mut self, modified: Option<SystemTime>) -> Self {
        self.modified = modified;
        self
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.is_hidden = hidden;
        self
    }

    /// The name to render: the compacted-chain label if set, else `name`.
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    pub fn set_display_name(&mut self, label: impl Into<String>) {
        self.display_name = Some(label.into());
    }

    /// Build the one merged row standing in for a compaction chain.
    ///
    /// Display name and depth come from the chain head; identity and
    /// expansion/loading/error state come from the deepest node, since that
    /// is the node whose children are shown when the row is expanded.
    pub fn merged(chain: &[FileNode]) -> FileNode {
        debug_assert!(!chain.is_empty());
        let head = &chain[0];
        let tail = &chain[chain.len() - 1];
        let label = chain
            .iter()
            .map(|n| n.name.as_str())
            .collect::<Vec<_>>()
            .join(&MAIN_SEPARATOR.to_string());
        let mut row = tail.clone();
        row.depth = head.depth;
        row.set_display_name(label);
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_value_equal() {
        let a = NodeKey::entry(BackendId::local(), "/tmp/a");
        let b = NodeKey::entry(BackendId::local(), "/tmp/a");
        assert_eq!(a, b);
    }

    #[test]
    fn same_path_different_backend_differs() {
        let a = NodeKey::entry(BackendId::local(), "/srv/data");
        let b = NodeKey::entry(BackendId("sftp:host".into()), "/srv/data");
        assert_ne!(a, b);
    }

    #[test]
    fn dotfile_is_hidden() {
        let node = FileNode::new(
            NodeKey::entry(BackendId::local(), "/tmp/.env"),
            ".env",
            false,
        );
        assert!(node.is_hidden);
    }

    #[test]
    fn display_name_defaults_to_name() {
        let mut node = FileNode::new(NodeKey::Root, "src", true);
        assert_eq!(node.display_name(), "src");
        node.set_display_name("src/main");
        assert_eq!(node.display_name(), "src/main");
    }

    #[test]
    fn merged_row_takes_head_depth_and_tail_state() {
        let backend = BackendId::local();
        let mut a = FileNode::new(NodeKey::entry(backend.clone(), "/w/a"), "a", true).with_depth(2);
        a.is_expanded = false;
        let b = FileNode::new(NodeKey::entry(backend.clone(), "/w/a/b"), "b", true).with_depth(3);
        let mut c = FileNode::new(NodeKey::entry(backend.clone(), "/w/a/b/c"), "c", true)
            .with_depth(4);
        c.is_expanded = true;

        let row = FileNode::merged(&[a, b, c.clone()]);
        let sep = MAIN_SEPARATOR.to_string();
        assert_eq!(row.display_name(), format!("a{sep}b{sep}c"));
        assert_eq!(row.depth, 2);
        assert!(row.is_expanded);
        assert_eq!(row.key, c.key);
    }
}
