//! Query application error types.

use thiserror::Error;

/// Errors returned by a [`QueryApplicator`](crate::QueryApplicator).
#[derive(Debug, Clone, Error)]
pub enum ApplyError {
    /// The directives were rejected before reaching the backend.
    #[error("Rejected: {0}")]
    Rejected(String),

    /// The backend failed to apply the directives.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl ApplyError {
    /// Create a rejected error.
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    /// Create a backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
