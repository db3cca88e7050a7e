//! # LPSE Shared
//!
//! This crate defines the request-scoped data structures shared across the
//! LPSE ecosystem: parsed tokens, the per-request token map, and the
//! abstract query directives handed to a search-engine adapter.

pub mod types;

pub use types::operand::{QueryOperand, SortDirection};
pub use types::query_directive::{QueryDirective, SortClause};
pub use types::token::{Token, TokenDetail};
pub use types::token_map::TokenMap;
