//! LPSE service implementation.
//!
//! This module provides the main entry point for resolving LPSE requests.
//! Resolution itself is synchronous and pure; only applying the resolved
//! directives goes through the async [`QueryApplicator`].

use std::sync::Arc;

use tracing::{debug, info, instrument};

use lpse_shared::{QueryDirective, Token, TokenMap};

use crate::available::available_facets;
use crate::codec::{self, CanonicalUriBuilder};
use crate::config::LpseServiceConfig;
use crate::errors::ApplyError;
use crate::fields::BuildMode;
use crate::interfaces::QueryApplicator;
use crate::registry::Registry;
use crate::types::{ApplySummary, AvailableFacet, FacetCounts, ParsedRequest, Resolution};

/// The main service for resolving LPSE requests against one collection.
///
/// The registry is shared read-only, so one service can serve any number of
/// concurrent requests.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use lpse_repository::{LpseService, Properties, Registry, SolrParamsApplicator};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let properties = Properties::from_path("products.properties")?;
/// let registry = Arc::new(Registry::build("products", "shop", &properties)?);
/// let service = LpseService::new(registry, Box::new(SolrParamsApplicator::new()));
///
/// let resolution = service.resolve("/shop/default/Acme/b/", None);
/// let _summary = service.apply(&resolution).await?;
/// # Ok(())
/// # }
/// ```
pub struct LpseService {
    registry: Arc<Registry>,
    applicator: Box<dyn QueryApplicator>,
    config: LpseServiceConfig,
}

impl LpseService {
    /// Create a new LpseService with default configuration.
    ///
    /// # Arguments
    ///
    /// * `registry` - The collection's registry
    /// * `applicator` - A boxed implementation of `QueryApplicator`
    pub fn new(registry: Arc<Registry>, applicator: Box<dyn QueryApplicator>) -> Self {
        Self {
            registry,
            applicator,
            config: LpseServiceConfig::default(),
        }
    }

    /// Create a new LpseService with custom configuration.
    pub fn with_config(
        registry: Arc<Registry>,
        applicator: Box<dyn QueryApplicator>,
        config: LpseServiceConfig,
    ) -> Self {
        Self {
            registry,
            applicator,
            config,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// A canonical URI builder for this collection.
    pub fn builder(&self) -> CanonicalUriBuilder<'_> {
        CanonicalUriBuilder::new(&self.registry)
    }

    /// Parse an LPSE path without resolving it further.
    pub fn parse(&self, path: &str, query_string: Option<&str>) -> ParsedRequest {
        codec::parse(path, query_string, &self.registry)
    }

    /// Resolve an LPSE path to its canonical URI, tokens and directives.
    ///
    /// # Arguments
    ///
    /// * `path` - The URL path, starting with the collection URI
    /// * `query_string` - The raw query string, without the leading `?`
    ///
    /// # Returns
    ///
    /// The resolution. Malformed parts of the path leave their fields
    /// inactive; resolution itself never fails.
    #[instrument(skip(self), fields(collection = %self.registry.collection_name()))]
    pub fn resolve(&self, path: &str, query_string: Option<&str>) -> Resolution {
        let parsed = self.parse(path, query_string);
        let directives = self.registry.directives(&parsed.tokens, &parsed.fieldset);
        self.resolution(parsed, directives)
    }

    /// Resolve an LPSE path for a type-ahead lookahead query.
    #[instrument(skip(self), fields(collection = %self.registry.collection_name()))]
    pub fn resolve_lookahead(&self, path: &str, query_string: Option<&str>) -> Resolution {
        let parsed = self.parse(path, query_string);
        let directives = self
            .registry
            .lookahead_directives(&parsed.tokens, &parsed.fieldset);
        self.resolution(parsed, directives)
    }

    fn resolution(&self, parsed: ParsedRequest, directives: Vec<QueryDirective>) -> Resolution {
        let mode = if parsed.query_overridden {
            BuildMode::ResetPage
        } else {
            BuildMode::Preserve
        };
        let canonical_uri = self
            .builder()
            .build_with_mode(&parsed.tokens, &parsed.fieldset, mode);

        let explanations = if self.config.explain {
            self.explain_tokens(&parsed.tokens)
        } else {
            Vec::new()
        };

        debug!(
            canonical_uri = %canonical_uri,
            tokens = parsed.tokens.len(),
            directives = directives.len(),
            "Resolved LPSE request"
        );

        Resolution {
            collection: self.registry.collection_name().to_string(),
            fieldset: parsed.fieldset,
            canonical_uri,
            tokens: parsed.tokens,
            directives,
            explanations,
        }
    }

    /// Apply a resolution's directives through the applicator.
    ///
    /// # Returns
    ///
    /// * `Ok(ApplySummary)` - What the applicator applied
    /// * `Err(ApplyError)` - If the applicator rejected the directives or failed
    #[instrument(skip(self, resolution), fields(collection = %resolution.collection, uri = %resolution.canonical_uri))]
    pub async fn apply(&self, resolution: &Resolution) -> Result<ApplySummary, ApplyError> {
        let summary = self
            .applicator
            .apply(&resolution.collection, &resolution.directives)
            .await?;
        info!(applied = summary.applied, "Applied LPSE directives");
        Ok(summary)
    }

    /// Resolve a path and apply it in one step.
    pub async fn resolve_and_apply(
        &self,
        path: &str,
        query_string: Option<&str>,
    ) -> Result<(Resolution, ApplySummary), ApplyError> {
        let resolution = self.resolve(path, query_string);
        let summary = self.apply(&resolution).await?;
        Ok((resolution, summary))
    }

    /// The facet values a user may still select, given engine counts.
    pub fn available_facets(
        &self,
        resolution: &Resolution,
        counts: &[FacetCounts],
        num_found: u64,
    ) -> Vec<AvailableFacet> {
        available_facets(
            &self.builder(),
            &resolution.tokens,
            &resolution.fieldset,
            counts,
            num_found,
        )
    }

    /// Explain every token, known codes in LPSE order first.
    pub fn explain_tokens(&self, tokens: &TokenMap) -> Vec<String> {
        let mut lines: Vec<String> = self
            .registry
            .fields()
            .flat_map(|field| tokens.get(&field.code).iter().map(move |t| field.explain_token(t)))
            .collect();

        lines.extend(
            tokens
                .iter()
                .filter(|(code, _)| self.registry.definition(code).is_none())
                .flat_map(|(_, tokens)| tokens.iter().map(explain_unknown)),
        );
        lines
    }
}

fn explain_unknown(token: &Token) -> String {
    format!(
        "PANL [ INVALID ] <unknown> LPSE code '{}' is not configured for this collection.",
        token.code
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::test_support;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    struct MockApplicator {
        calls: Arc<Mutex<Vec<(String, Vec<QueryDirective>)>>>,
        should_fail: bool,
    }

    #[async_trait]
    impl QueryApplicator for MockApplicator {
        async fn apply(
            &self,
            collection: &str,
            directives: &[QueryDirective],
        ) -> Result<ApplySummary, ApplyError> {
            if self.should_fail {
                return Err(ApplyError::backend("engine unavailable"));
            }
            self.calls
                .lock()
                .await
                .push((collection.to_string(), directives.to_vec()));
            Ok(ApplySummary {
                collection: collection.to_string(),
                applied: directives.len(),
                rendered: None,
            })
        }
    }

    fn service(should_fail: bool) -> (LpseService, Arc<Mutex<Vec<(String, Vec<QueryDirective>)>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let applicator = MockApplicator {
            calls: calls.clone(),
            should_fail,
        };
        let service = LpseService::new(Arc::new(test_support::registry()), Box::new(applicator));
        (service, calls)
    }

    #[test]
    fn test_resolve_canonicalises() {
        let (service, _) = service(false);
        let resolution = service.resolve("/shop/default/2/Acme/pb/", None);

        assert_eq!(resolution.canonical_uri, "/shop/default/Acme/2/bp/");
        assert_eq!(resolution.collection, "products");
        assert!(resolution
            .directives
            .contains(&QueryDirective::filter("brand", "brand:\"Acme\"")));
        assert!(resolution.directives.contains(&QueryDirective::Start(10)));
    }

    #[test]
    fn test_query_override_resets_page() {
        let (service, _) = service(false);
        let resolution = service.resolve("/shop/default/shoe/3/qp/", Some("q=boot"));
        assert_eq!(resolution.canonical_uri, "/shop/default/boot/q/");
    }

    #[test]
    fn test_explanations() {
        let (service, _) = service(false);
        let resolution = service.resolve("/shop/default/Acme/%FF/by/", None);

        assert!(resolution.explanations[0].starts_with("PANL [  VALID  ] <RegularFacet>"));
        assert!(resolution
            .explanations
            .iter()
            .any(|line| line.contains("<unknown> LPSE code 'y'")));

        let quiet = LpseService::with_config(
            Arc::new(test_support::registry()),
            Box::new(crate::solr::SolrParamsApplicator::new()),
            LpseServiceConfig::quiet(),
        );
        assert!(quiet.resolve("/shop/default/Acme/b/", None).explanations.is_empty());
    }

    #[tokio::test]
    async fn test_apply_passes_directives() {
        let (service, calls) = service(false);
        let (resolution, summary) = service
            .resolve_and_apply("/shop/default/Acme/b/", None)
            .await
            .unwrap();

        assert_eq!(summary.applied, resolution.directives.len());
        let calls = calls.lock().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "products");
        assert_eq!(calls[0].1, resolution.directives);
    }

    #[tokio::test]
    async fn test_apply_propagates_errors() {
        let (service, calls) = service(true);
        let resolution = service.resolve("/shop/default/Acme/b/", None);
        let result = service.apply(&resolution).await;

        assert!(matches!(result, Err(ApplyError::Backend(_))));
        assert!(calls.lock().await.is_empty());
    }

    #[test]
    fn test_lookahead() {
        let (service, _) = service(false);
        let resolution = service.resolve_lookahead("/shop/default/Acme/3/bp/", None);
        assert!(resolution.directives.contains(&QueryDirective::Rows(5)));
        assert!(resolution.directives.contains(&QueryDirective::Start(0)));
        assert_eq!(resolution.canonical_uri, "/shop/default/Acme/3/bp/");
    }
}
