//! Query applicator trait definition.
//!
//! The core only decides what to apply. Building an engine-specific query
//! object and talking to the engine belong to implementations of this trait.

use async_trait::async_trait;

use lpse_shared::QueryDirective;

use crate::errors::ApplyError;
use crate::types::ApplySummary;

/// Abstracts the search engine a collection's queries are applied to.
///
/// Implementations are injected into `LpseService`, so tests can record the
/// directives they receive with a mock instead of a live engine.
///
/// Directives arrive in LPSE order, followed by the field list and the facet
/// directives. An implementation may reject a directive it cannot express but
/// must not reorder filters relative to each other.
#[async_trait]
pub trait QueryApplicator: Send + Sync {
    /// Apply a resolved request's directives.
    ///
    /// # Arguments
    ///
    /// * `collection` - Name of the collection in the search engine
    /// * `directives` - The directives to apply
    ///
    /// # Returns
    ///
    /// * `Ok(ApplySummary)` - What was applied
    /// * `Err(ApplyError)` - If a directive was rejected or the engine failed
    async fn apply(
        &self,
        collection: &str,
        directives: &[QueryDirective],
    ) -> Result<ApplySummary, ApplyError>;
}
