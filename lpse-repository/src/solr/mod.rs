//! Reference Solr applicator.
//!
//! Renders directives to Solr request parameters without talking to a Solr
//! server, which is enough for operators to inspect what a request asks for.

mod params;

pub use params::{query_string, render, SolrParamsApplicator, DEFAULT_QUERY};
