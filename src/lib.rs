//! Hierarchical file-tree projection engine for a multi-backend file
//! explorer.
//!
//! The engine owns a lazily-populated tree cache ([`FileTreeCache`]) and
//! turns point-in-time snapshots of it into flat, ordered, render-ready
//! row lists ([`DisplayListBuilder`]) under one of three strategies:
//! plain recursive listing, ancestor-preserving text search, and
//! singleton-directory chain compaction. It performs no I/O itself;
//! storage backends implement the [`Backend`] trait and callers reflect
//! fetch results back into the cache.

pub mod backend;
pub mod builder;
pub mod cache;
pub mod config;
pub mod error;
pub mod merge;
pub mod node;
pub mod options;
pub mod search;
pub mod sort;
pub mod worker;

pub use backend::{Backend, LocalBackend};
pub use builder::{build_display_list, DisplayListBuilder};
pub use cache::{FileTreeCache, NodeMap};
pub use error::{EngineError, Result};
pub use node::{BackendId, FileNode, NodeKey};
pub use options::{BuildOptions, SortMode};
pub use search::{search, SearchOutcome};
pub use worker::{BuildResult, ProjectionEngine};
