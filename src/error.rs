//! Error types for the structure tree engine.
//!
//! This module defines all error types that can occur while searching, editing,
//! and reconciling a tagged document's structure tree.

/// Result type alias for structure tree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during structure tree processing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A search or lookup found nothing (recoverable)
    #[error("Not found: {0}")]
    NotFound(String),

    /// The structure tree references something that does not exist
    #[error("Inconsistent structure tree: {0}")]
    Inconsistent(String),

    /// Malformed type, label, or attribute passed to an edit
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The parent tree has pending mutations and must be rebuilt first
    #[error("Parent tree is stale; rebuild it before looking up owners")]
    StaleIndex,

    /// Recursion depth limit exceeded
    #[error("Recursion depth limit exceeded (max: {0})")]
    RecursionLimitExceeded(u32),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Document store failure
    #[error("Document store error: {0}")]
    Store(String),

    /// Auto-tagging failure
    #[error("Auto-tag error: {0}")]
    AutoTag(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the caller may skip the failed operation and continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
