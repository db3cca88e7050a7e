//! # LPSE Resolver
//!
//! Reads LPSE request paths line by line and writes one JSON line per
//! request: the canonical URI, the parsed tokens, the query directives and,
//! optionally, the rendered Solr request.
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`reader`]: Request line reader
//! - [`orchestrator`]: Coordinates reading, resolving and writing
//! - [`errors`]: Error types for the pipeline

pub mod config;
pub mod errors;
pub mod orchestrator;
pub mod reader;

pub use config::Dependencies;
pub use errors::PipelineError;

use lpse_repository::ConfigError;
use thiserror::Error;

/// Errors that can occur during resolver initialization or execution.
#[derive(Error, Debug)]
pub enum ResolverError {
    /// The collection configuration is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    /// Tracing could not be initialized.
    #[error("Tracing error: {0}")]
    TracingError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] PipelineError),
}
