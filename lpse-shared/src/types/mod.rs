//! This module defines the core request-scoped types used by the LPSE codec.
//! It re-exports the token, token map, operand and directive types.

pub mod operand;
pub mod query_directive;
pub mod token;
pub mod token_map;

pub use operand::{QueryOperand, SortDirection};
pub use query_directive::{QueryDirective, SortClause};
pub use token::{Token, TokenDetail};
pub use token_map::TokenMap;
