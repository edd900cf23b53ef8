//! Error types for the foreman crate.

/// Top-level error type for store and scheduling operations.
///
/// The first five variants are the user-facing rejection kinds; each maps
/// to a distinct message so a view can report exactly why an action was
/// refused. The remaining variants wrap ambient failures.
#[derive(Debug, thiserror::Error)]
pub enum ForemanError {
    /// An operation referenced an id that is not in the store.
    #[error("not found: {0}")]
    NotFound(String),

    /// An insert collided with an existing id.
    #[error("id already exists: {0}")]
    Conflict(String),

    /// A field failed validation (empty title, out-of-range builder number).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The requested builder slot already has an active task.
    #[error("builder {builder_no} already has an active task")]
    SlotBusy {
        /// The contested builder slot number.
        builder_no: u32,
    },

    /// The requested task duration works out to zero minutes.
    #[error("task duration must be greater than zero")]
    InvalidDuration,

    /// Configuration file read/parse/serialize error.
    #[error("config error: {0}")]
    Config(String),

    /// SQLite storage error.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store's connection mutex was poisoned.
    #[error("lock poisoned: {0}")]
    Lock(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ForemanError>;
