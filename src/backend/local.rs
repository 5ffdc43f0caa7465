use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::warn;

use super::Backend;
use crate::error::{EngineError, Result};
use crate::node::{BackendId, FileNode, NodeKey};

/// Backend over the local filesystem.
pub struct LocalBackend {
    id: BackendId,
}

impl LocalBackend {
    pub fn new() -> Self {
        Self {
            id: BackendId::local(),
        }
    }

    /// Build the workspace-root node for a local path.
    pub fn root_node(&self, path: &Path) -> Result<FileNode> {
        let path = path
            .canonicalize()
            .map_err(|_| EngineError::InvalidPath(format!("{} does not exist", path.display())))?;
        self.node_from_path(&path)
    }

    /// Read one entry's metadata into a [`FileNode`].
    ///
    /// Symlinks are not followed; a symlink counts as a file.
    fn node_from_path(&self, path: &Path) -> Result<FileNode> {
        let metadata = std::fs::symlink_metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        let key = NodeKey::entry(self.id.clone(), path);
        Ok(
            FileNode::new(key, name, metadata.is_dir() && !metadata.is_symlink())
                .with_size(metadata.len())
                .with_modified(metadata.modified().ok()),
        )
    }

    fn node_path<'a>(&self, node: &'a FileNode) -> Result<&'a Path> {
        node.key
            .path()
            .ok_or_else(|| EngineError::InvalidPath("node has no backend path".into()))
    }
}

impl Default for LocalBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for LocalBackend {
    fn id(&self) -> BackendId {
        self.id.clone()
    }

    async fn is_available(&self) -> bool {
        true
    }

    /// Unreadable entries (permission denied, broken symlinks racing with
    /// deletion) are skipped with a warning rather than failing the listing.
    async fn list_children(&self, node: &FileNode) -> Result<Vec<FileNode>> {
        let dir = self.node_path(node)?.to_path_buf();
        let mut children = Vec::new();
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            match self.node_from_path(&entry.path()) {
                Ok(child) => children.push(child),
                Err(e) => warn!(path = %entry.path().display(), error = %e, "skipping entry"),
            }
        }
        Ok(children)
    }

    async fn create_file(&self, parent: &FileNode, name: &str) -> Result<FileNode> {
        let path = self.node_path(parent)?.join(name);
        tokio::fs::File::create(&path).await?;
        self.node_from_path(&path)
    }

    async fn create_dir(&self, parent: &FileNode, name: &str) -> Result<FileNode> {
        let path = self.node_path(parent)?.join(name);
        tokio::fs::create_dir(&path).await?;
        self.node_from_path(&path)
    }

    async fn rename(&self, node: &FileNode, new_name: &str) -> Result<FileNode> {
        let from = self.node_path(node)?;
        let to: PathBuf = from
            .parent()
            .ok_or_else(|| EngineError::InvalidPath("cannot rename the filesystem root".into()))?
            .join(new_name);
        tokio::fs::rename(from, &to).await?;
        self.node_from_path(&to)
    }

    async fn delete(&self, node: &FileNode) -> Result<()> {
        let path = self.node_path(node)?;
        if node.is_dir {
            tokio::fs::remove_dir_all(path).await?;
        } else {
            tokio::fs::remove_file(path).await?;
        }
        Ok(())
    }
}
