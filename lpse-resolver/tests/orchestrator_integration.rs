//! Integration tests for the resolver orchestrator.
//!
//! These tests use the real Orchestrator and LpseService with an in-memory
//! collection and either the Solr renderer or a failing mock applicator.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use lpse_repository::{
    ApplyError, ApplySummary, LpseService, Properties, QueryApplicator, SolrParamsApplicator,
};
use lpse_resolver::orchestrator::{Orchestrator, OrchestratorConfig};
use lpse_resolver::Dependencies;
use lpse_shared::QueryDirective;

const COLLECTION: &str = r#"
panl.lpse.length=1
panl.param.query=q
panl.param.sort=s
panl.param.page=p
panl.param.numrows=n
panl.param.query.operand=o
panl.facet.b=brand
panl.sort.fields=brand
panl.lpse.order=b,q,s,p,n,o
"#;

struct FailingApplicator;

#[async_trait]
impl QueryApplicator for FailingApplicator {
    async fn apply(
        &self,
        _collection: &str,
        _directives: &[QueryDirective],
    ) -> Result<ApplySummary, ApplyError> {
        Err(ApplyError::backend("engine unavailable"))
    }
}

fn service(applicator: Box<dyn QueryApplicator>) -> LpseService {
    let properties = Properties::parse(COLLECTION);
    let registry = Dependencies::build_registry("products", "shop", &properties).unwrap();
    LpseService::new(Arc::new(registry), applicator)
}

async fn run(orchestrator: &Orchestrator, input: &str) -> Vec<Value> {
    let mut output: Vec<u8> = Vec::new();
    orchestrator
        .run(input.as_bytes(), &mut output)
        .await
        .unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_resolves_each_line() {
    let orchestrator = Orchestrator::new(service(Box::new(SolrParamsApplicator::new())));

    let records = run(
        &orchestrator,
        "# requests\n/shop/default/2/Acme/pb/\n\n/shop/default/Acme/b/?q=boot\n",
    )
    .await;

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["request"]["line"], 2);
    assert_eq!(records[0]["resolution"]["canonical_uri"], "/shop/default/Acme/2/bp/");
    assert_eq!(records[1]["request"]["query_string"], "q=boot");
    assert_eq!(records[1]["resolution"]["canonical_uri"], "/shop/default/Acme/boot/bq/");
    assert!(records[0].get("applied").is_none());
}

#[tokio::test]
async fn test_apply_renders_solr_request() {
    let orchestrator = Orchestrator::with_config(
        service(Box::new(SolrParamsApplicator::new())),
        OrchestratorConfig {
            apply: true,
            lookahead: false,
        },
    );

    let records = run(&orchestrator, "/shop/default/Acme/b/\n").await;

    let rendered = records[0]["applied"]["rendered"].as_str().unwrap();
    assert!(rendered.starts_with("/solr/products/select?"));
    assert!(rendered.contains("fq=brand%3A%22Acme%22"));
}

#[tokio::test]
async fn test_apply_errors_do_not_stop_the_run() {
    let orchestrator = Orchestrator::with_config(
        service(Box::new(FailingApplicator)),
        OrchestratorConfig {
            apply: true,
            lookahead: false,
        },
    );

    let mut output: Vec<u8> = Vec::new();
    let summary = orchestrator
        .run("/shop/default/\n/shop/default/Acme/b/\n".as_bytes(), &mut output)
        .await
        .unwrap();

    assert_eq!(summary.requests, 2);
    assert_eq!(summary.apply_errors, 2);

    let output = String::from_utf8(output).unwrap();
    let first: Value = serde_json::from_str(output.lines().next().unwrap()).unwrap();
    assert_eq!(first["error"], "Backend error: engine unavailable");
}

#[tokio::test]
async fn test_lookahead_rows() {
    let orchestrator = Orchestrator::with_config(
        service(Box::new(SolrParamsApplicator::new())),
        OrchestratorConfig {
            apply: false,
            lookahead: true,
        },
    );

    let records = run(&orchestrator, "/shop/default/3/p/\n").await;
    let directives = records[0]["resolution"]["directives"].as_array().unwrap();

    assert!(directives.contains(&serde_json::json!({"type": "rows", "value": 5})));
    assert!(directives.contains(&serde_json::json!({"type": "start", "value": 0})));
}

#[tokio::test]
async fn test_long_input_runs_to_completion() {
    let orchestrator = Orchestrator::new(service(Box::new(SolrParamsApplicator::new())));
    let input = "/shop/default/Acme/b/\n".repeat(200);

    let mut output: Vec<u8> = Vec::new();
    let summary = orchestrator.run(input.as_bytes(), &mut output).await.unwrap();

    assert_eq!(summary.requests, 200);
    assert_eq!(String::from_utf8(output).unwrap().lines().count(), 200);
}

#[test]
fn test_misconfigured_collection_is_fatal() {
    let properties = Properties::parse(&COLLECTION.replace("panl.param.page=p", ""));
    assert!(Dependencies::build_registry("products", "shop", &properties).is_err());
}
