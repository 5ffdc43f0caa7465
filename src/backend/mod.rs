//! Storage backend boundary.
//!
//! The engine never calls a backend itself: the UI layer fetches through
//! this trait and reflects results back into the cache with
//! `put`/`update_node`/`remove_node`. Remote stores (FTP, SFTP, WebDAV,
//! rooted devices) implement the same trait; [`LocalBackend`] is the
//! reference implementation over the local filesystem.

mod local;

pub use local::LocalBackend;

use async_trait::async_trait;

use crate::error::Result;
use crate::node::{BackendId, FileNode};

/// One storage backend of a workspace.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Stable identity; part of every [`NodeKey`](crate::NodeKey) this
    /// backend produces.
    fn id(&self) -> BackendId;

    /// Cheap availability probe (connection/auth still alive).
    async fn is_available(&self) -> bool;

    /// List the immediate children of a directory node, unsorted.
    async fn list_children(&self, node: &FileNode) -> Result<Vec<FileNode>>;

    /// Create an empty file under a directory node.
    async fn create_file(&self, parent: &FileNode, name: &str) -> Result<FileNode>;

    /// Create a directory under a directory node.
    async fn create_dir(&self, parent: &FileNode, name: &str) -> Result<FileNode>;

    /// Rename an entry in place; returns the node at its new position.
    async fn rename(&self, node: &FileNode, new_name: &str) -> Result<FileNode>;

    /// Delete an entry; directories are removed recursively.
    async fn delete(&self, node: &FileNode) -> Result<()>;
}
