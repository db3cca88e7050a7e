//! Dependency initialization and wiring for the resolver.

use std::env;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use lpse_repository::{
    LpseService, LpseServiceConfig, Properties, Registry, SolrParamsApplicator,
};

use crate::orchestrator::{Orchestrator, OrchestratorConfig};
use crate::ResolverError;

/// Default path of the collection properties file.
const DEFAULT_PROPERTIES_PATH: &str = "lpse.properties";

/// Collection name used when the properties path has no file stem.
const DEFAULT_COLLECTION: &str = "default";

/// Render each resolution as Solr parameters unless told otherwise.
const DEFAULT_APPLY: bool = true;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
}

/// Read a boolean flag, accepting `true`/`1`/`yes` case-insensitively.
fn env_flag(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            _ => {
                warn!(key, value = %value, default, "Invalid boolean, using default");
                default
            }
        },
        Err(_) => default,
    }
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `LPSE_PROPERTIES_PATH`: Collection properties file (default: lpse.properties)
    /// - `LPSE_COLLECTION`: Collection name (default: the properties file stem)
    /// - `LPSE_COLLECTION_URI`: First path segment of LPSE URIs (default: the collection name)
    /// - `LPSE_APPLY`: Render each resolution as Solr parameters (default: true)
    /// - `LPSE_LOOKAHEAD`: Resolve requests as lookahead queries (default: false)
    /// - `LPSE_EXPLAIN`: Attach per-token explanations (default: true)
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(ResolverError)` - If the properties cannot be read or the collection is misconfigured
    pub fn new() -> Result<Self, ResolverError> {
        let properties_path = env::var("LPSE_PROPERTIES_PATH")
            .unwrap_or_else(|_| DEFAULT_PROPERTIES_PATH.to_string());
        let collection = env::var("LPSE_COLLECTION").unwrap_or_else(|_| {
            Path::new(&properties_path)
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or(DEFAULT_COLLECTION)
                .to_string()
        });
        let collection_uri = env::var("LPSE_COLLECTION_URI").unwrap_or_else(|_| collection.clone());
        let config = OrchestratorConfig {
            apply: env_flag("LPSE_APPLY", DEFAULT_APPLY),
            lookahead: env_flag("LPSE_LOOKAHEAD", false),
        };
        let service_config = LpseServiceConfig {
            explain: env_flag("LPSE_EXPLAIN", true),
        };

        info!(
            properties_path = %properties_path,
            collection = %collection,
            collection_uri = %collection_uri,
            apply = config.apply,
            lookahead = config.lookahead,
            "Initializing dependencies"
        );

        let properties = Properties::from_path(&properties_path)?;
        let registry = Self::build_registry(&collection, &collection_uri, &properties)?;

        let service = LpseService::with_config(
            Arc::new(registry),
            Box::new(SolrParamsApplicator::new()),
            service_config,
        );
        let orchestrator = Orchestrator::with_config(service, config);

        Ok(Self { orchestrator })
    }

    /// Build and log the collection registry.
    pub fn build_registry(
        collection: &str,
        collection_uri: &str,
        properties: &Properties,
    ) -> Result<Registry, ResolverError> {
        let registry = Registry::build(collection, collection_uri, properties)?;

        for warning in registry.warnings() {
            warn!(collection, warning = %warning, "Collection configuration warning");
        }
        for line in registry.explain() {
            debug!(collection, "{}", line);
        }

        Ok(registry)
    }
}
