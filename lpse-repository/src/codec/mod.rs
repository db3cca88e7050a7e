//! The LPSE codec: path tokeniser, canonical URI builder and links.

pub mod canonical;
mod links;
pub mod tokeniser;

pub use canonical::CanonicalUriBuilder;
pub use tokeniser::parse;
