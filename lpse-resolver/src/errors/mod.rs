//! Error types for the resolver pipeline.

use thiserror::Error;

use lpse_repository::ApplyError;

/// Errors that can occur while resolving a stream of requests.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Reading request lines failed.
    #[error("Read error: {0}")]
    ReadError(String),

    /// Writing resolutions failed.
    #[error("Write error: {0}")]
    WriteError(String),

    /// A resolution could not be serialized.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The query applicator failed.
    #[error("Apply error: {0}")]
    ApplyError(#[from] ApplyError),
}

impl PipelineError {
    /// Create a read error.
    pub fn read(msg: impl Into<String>) -> Self {
        Self::ReadError(msg.into())
    }

    /// Create a write error.
    pub fn write(msg: impl Into<String>) -> Self {
        Self::WriteError(msg.into())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
