//! Interface definitions for the query application adapter.
//!
//! This module defines the abstract `QueryApplicator` trait that receives the
//! resolved directives and applies them to a concrete search engine request.

mod query_applicator;

pub use query_applicator::QueryApplicator;
