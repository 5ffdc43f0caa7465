use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Engine error types.
///
/// Cache mutations and display-list builds never fail for expected
/// conditions (stale keys, blank queries, degenerate chains); errors exist
/// only at the backend boundary.
#[derive(Debug, Error)]
pub enum EngineError {
    /// I/O errors surfaced by a backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A backend could not list or mutate an entry.
    #[error("backend error: {0}")]
    Backend(String),

    /// Invalid path provided by the caller.
    #[error("invalid path: {0}")]
    InvalidPath(String),
}
