use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;
use url::form_urlencoded;

use lpse_shared::QueryDirective;

use crate::errors::ApplyError;
use crate::interfaces::QueryApplicator;
use crate::types::ApplySummary;

/// Query used when a request carries no free text.
pub const DEFAULT_QUERY: &str = "*:*";

/// Render directives to ordered Solr parameters.
///
/// # Example
///
/// ```
/// use lpse_repository::solr::render;
/// use lpse_shared::QueryDirective;
///
/// let params = render(&[QueryDirective::filter("brand", "brand:\"Acme\""), QueryDirective::Rows(10)]);
/// assert_eq!(params[0], ("fq".to_string(), "brand:\"Acme\"".to_string()));
/// ```
pub fn render(directives: &[QueryDirective]) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = Vec::new();
    let mut has_query = false;
    let mut param = |key: &str, value: String| params.push((key.to_string(), value));

    for directive in directives {
        match directive {
            QueryDirective::Filter { clause, .. } => param("fq", clause.clone()),
            QueryDirective::Query { q, fields } => {
                has_query = true;
                param("q", q.clone());
                if !fields.is_empty() {
                    param("qf", fields.join(" "));
                }
            }
            QueryDirective::Operand(operand) => param("q.op", operand.engine_value().to_string()),
            QueryDirective::Sort(clauses) => param(
                "sort",
                clauses
                    .iter()
                    .map(|c| format!("{} {}", c.field, c.direction.engine_value()))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            QueryDirective::Rows(rows) => param("rows", rows.to_string()),
            QueryDirective::Start(start) => param("start", start.to_string()),
            QueryDirective::FieldList(Some(fields)) if !fields.is_empty() => {
                param("fl", fields.join(","))
            }
            QueryDirective::FieldList(_) => {}
            QueryDirective::FacetFields(fields) => {
                if !fields.is_empty() {
                    param("facet", "true".to_string());
                }
                for field in fields {
                    param("facet.field", field.clone());
                }
            }
            QueryDirective::FacetMinCount { field: None, min_count } => {
                param("facet.mincount", min_count.to_string())
            }
            QueryDirective::FacetMinCount {
                field: Some(field),
                min_count,
            } => param(&format!("f.{}.facet.mincount", field), min_count.to_string()),
            QueryDirective::FacetLimit(limit) => param("facet.limit", limit.to_string()),
        }
    }

    if !has_query {
        params.insert(0, ("q".to_string(), DEFAULT_QUERY.to_string()));
    }
    params
}

/// Encode rendered parameters as a query string.
pub fn query_string(params: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish()
}

/// Applies directives by rendering them to Solr request parameters.
///
/// The last rendered parameters are kept for inspection.
#[derive(Debug, Default)]
pub struct SolrParamsApplicator {
    last_params: Mutex<Vec<(String, String)>>,
}

impl SolrParamsApplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The parameters rendered by the most recent `apply`.
    pub async fn last_params(&self) -> Vec<(String, String)> {
        self.last_params.lock().await.clone()
    }
}

#[async_trait]
impl QueryApplicator for SolrParamsApplicator {
    async fn apply(
        &self,
        collection: &str,
        directives: &[QueryDirective],
    ) -> Result<ApplySummary, ApplyError> {
        if let Some(QueryDirective::Filter { field, .. }) = directives
            .iter()
            .find(|d| matches!(d, QueryDirective::Filter { clause, .. } if clause.trim().is_empty()))
        {
            return Err(ApplyError::rejected(format!(
                "Empty filter clause for field '{}'",
                field
            )));
        }

        let params = render(directives);
        let rendered = format!("/solr/{}/select?{}", collection, query_string(&params));
        debug!(
            collection = %collection,
            directives = directives.len(),
            params = params.len(),
            "Rendered Solr parameters"
        );

        *self.last_params.lock().await = params;

        Ok(ApplySummary {
            collection: collection.to_string(),
            applied: directives.len(),
            rendered: Some(rendered),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lpse_shared::{QueryOperand, SortClause, SortDirection};

    #[test]
    fn test_render_order_and_keys() {
        let params = render(&[
            QueryDirective::filter("brand", "brand:\"Acme\""),
            QueryDirective::Operand(QueryOperand::Or),
            QueryDirective::Sort(vec![
                SortClause {
                    field: "brand".to_string(),
                    direction: SortDirection::Ascending,
                },
                SortClause {
                    field: "price".to_string(),
                    direction: SortDirection::Descending,
                },
            ]),
            QueryDirective::Rows(10),
            QueryDirective::Start(20),
            QueryDirective::FieldList(None),
            QueryDirective::FacetFields(vec!["brand".to_string()]),
            QueryDirective::FacetMinCount {
                field: Some("colour".to_string()),
                min_count: 0,
            },
            QueryDirective::FacetLimit(100),
        ]);

        let keys: Vec<&str> = params.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "q",
                "fq",
                "q.op",
                "sort",
                "rows",
                "start",
                "facet",
                "facet.field",
                "f.colour.facet.mincount",
                "facet.limit"
            ]
        );
        assert_eq!(params[0].1, DEFAULT_QUERY);
        assert_eq!(params[3].1, "brand asc, price desc");
    }

    #[test]
    fn test_query_with_fields() {
        let params = render(&[QueryDirective::Query {
            q: "(title:\"red\")".to_string(),
            fields: vec!["title".to_string()],
        }]);
        assert_eq!(
            params,
            vec![
                ("q".to_string(), "(title:\"red\")".to_string()),
                ("qf".to_string(), "title".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_apply_keeps_last_params() {
        let applicator = SolrParamsApplicator::new();
        let summary = applicator
            .apply("products", &[QueryDirective::Rows(5)])
            .await
            .unwrap();

        assert_eq!(summary.applied, 1);
        assert_eq!(
            summary.rendered.as_deref(),
            Some("/solr/products/select?q=*%3A*&rows=5")
        );
        assert_eq!(applicator.last_params().await.len(), 2);
    }

    #[tokio::test]
    async fn test_apply_rejects_empty_clause() {
        let applicator = SolrParamsApplicator::new();
        let result = applicator
            .apply("products", &[QueryDirective::filter("brand", " ")])
            .await;
        assert!(matches!(result, Err(ApplyError::Rejected(_))));
    }
}
