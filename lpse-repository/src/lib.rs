//! # LPSE Repository
//!
//! This crate turns a collection's properties into an immutable field
//! registry and uses it to parse, canonicalise and build LPSE faceted-search
//! URIs. Resolved requests become abstract query directives, applied to a
//! search engine through the `QueryApplicator` trait. A Solr request-parameter
//! renderer is included.

pub mod available;
pub mod codec;
pub mod config;
pub mod errors;
pub mod fields;
pub mod interfaces;
pub mod properties;
pub mod registry;
pub mod service;
pub mod solr;
pub mod types;
pub mod utils;

pub use codec::{parse, CanonicalUriBuilder};
pub use config::{CollectionSettings, LpseServiceConfig};
pub use errors::{ApplyError, ConfigError};
pub use fields::{BuildMode, FieldDefinition, FieldKind};
pub use interfaces::QueryApplicator;
pub use properties::Properties;
pub use registry::{ParamCodes, Registry};
pub use service::LpseService;
pub use solr::SolrParamsApplicator;
pub use types::{
    ApplySummary, AvailableFacet, AvailableValue, FacetCount, FacetCounts, ParsedRequest,
    Resolution,
};
