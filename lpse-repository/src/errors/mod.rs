//! Error types for the LPSE repository.
//!
//! Configuration problems are fatal and surface as [`ConfigError`]; failures at
//! the search-engine adapter boundary surface as [`ApplyError`]. Per-token
//! decode failures are not errors at all, they mark the token invalid.

mod apply_error;
mod config_error;

pub use apply_error::ApplyError;
pub use config_error::ConfigError;
