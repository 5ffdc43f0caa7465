use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::backend::Backend;
use crate::builder::build_display_list;
use crate::cache::FileTreeCache;
use crate::node::{FileNode, NodeKey};
use crate::options::BuildOptions;

/// One finished display-list build.
#[derive(Debug)]
pub struct BuildResult {
    /// Monotonic request number; consumers only ever see an increasing
    /// sequence, ending with the most recently requested build.
    pub generation: u64,
    pub rows: Vec<FileNode>,
}

/// Owns the per-workspace cache and runs display-list builds off the UI
/// thread.
///
/// All cache access goes through [`with_cache`](Self::with_cache), which
/// serializes the read-then-write mutation sequences. Build requests
/// snapshot the cache, run on a blocking task, and are delivered over the
/// result channel only if no newer request has been made in the meantime;
/// a superseded build is dropped, never delivered out of order.
pub struct ProjectionEngine {
    cache: Mutex<FileTreeCache>,
    generation: AtomicU64,
    /// Highest generation already sent; delivery is claimed here before
    /// the send, so a stale build can never land after a newer one.
    delivered: AtomicU64,
    results_tx: mpsc::UnboundedSender<BuildResult>,
}

impl ProjectionEngine {
    /// Create an engine for one workspace/session, plus the receiver the
    /// UI drains for finished builds. Drop both on workspace switch.
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<BuildResult>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = Arc::new(Self {
            cache: Mutex::new(FileTreeCache::new()),
            generation: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            results_tx: tx,
        });
        (engine, rx)
    }

    /// Run `f` against the cache under the single-writer lock.
    pub fn with_cache<R>(&self, f: impl FnOnce(&mut FileTreeCache) -> R) -> R {
        let mut cache = self.cache.lock().expect("cache lock poisoned");
        f(&mut cache)
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.current_generation() == generation
    }

    /// Atomically claim the right to deliver `generation`.
    ///
    /// The checked-then-send window is not atomic on its own: a stale
    /// build could pass the currency check, lose the CPU while a newer
    /// build sends, and then send out of order. Claiming through a
    /// monotonic max closes that window; false means a newer (or equal)
    /// generation already delivered and this result must be dropped.
    fn claim_delivery(&self, generation: u64) -> bool {
        self.delivered.fetch_max(generation, Ordering::SeqCst) < generation
    }

    /// Request a rebuild of the display list.
    ///
    /// Returns the request's generation. The snapshot is taken immediately
    /// under the lock; the traversal itself runs on a blocking task.
    pub fn request_build(self: &Arc<Self>, options: BuildOptions) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = self.with_cache(|cache| cache.snapshot());
        let engine = Arc::clone(self);

        tokio::spawn(async move {
            if !engine.is_current(generation) {
                debug!(generation, "build superseded before start");
                return;
            }
            let rows = tokio::task::spawn_blocking(move || {
                build_display_list(&snapshot, &options)
            })
            .await
            .unwrap_or_default();
            if !engine.claim_delivery(generation) {
                debug!(generation, "build superseded, result dropped");
                return;
            }
            let _ = engine.results_tx.send(BuildResult { generation, rows });
        });
        generation
    }

    /// Fetch a directory's children through `backend` and reflect the
    /// outcome into the cache, then request a rebuild.
    ///
    /// The loading flag is set for the duration of the fetch; a failure
    /// lands in the node's `error` field instead of propagating, so the row
    /// renders the error inline in place of children.
    pub async fn fetch_children(
        self: &Arc<Self>,
        backend: &dyn Backend,
        node: &FileNode,
        options: BuildOptions,
    ) {
        let key = node.key.clone();
        self.with_cache(|cache| {
            cache.update_node(&key, |n| {
                n.is_loading = true;
                n.error = None;
            })
        });

        let outcome = backend.list_children(node).await;

        self.with_cache(|cache| match outcome {
            Ok(children) => {
                cache.put(key.clone(), children);
                cache.update_node(&key, |n| n.is_loading = false);
            }
            Err(e) => {
                warn!(key = ?key, error = %e, "directory fetch failed");
                cache.update_node(&key, |n| {
                    n.is_loading = false;
                    n.error = Some(e.to_string());
                });
            }
        });
        self.request_build(options);
    }

    /// Flip a directory's expansion state and request a rebuild.
    pub fn set_expanded(self: &Arc<Self>, key: &NodeKey, expanded: bool, options: BuildOptions) {
        self.with_cache(|cache| cache.update_node(key, |n| n.is_expanded = expanded));
        self.request_build(options);
    }
}
