//! Request and response types for LPSE resolution.

use serde::{Deserialize, Serialize};

use lpse_shared::{QueryDirective, TokenMap};

/// The request-scoped state parsed from one LPSE path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedRequest {
    /// Resolved fieldset name.
    pub fieldset: String,
    /// Tokens keyed by code.
    pub tokens: TokenMap,
    /// Whether the query string replaced or removed the path's query text.
    pub query_overridden: bool,
}

/// Everything resolved from one LPSE request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub collection: String,
    pub fieldset: String,
    pub canonical_uri: String,
    pub tokens: TokenMap,
    pub directives: Vec<QueryDirective>,
    pub explanations: Vec<String>,
}

/// What a [`QueryApplicator`](crate::QueryApplicator) did with a set of
/// directives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplySummary {
    pub collection: String,
    /// Number of directives applied.
    pub applied: usize,
    /// The rendered engine request, if the applicator produces one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendered: Option<String>,
}

/// One value count returned by the engine for a facet field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub value: String,
    pub count: u64,
}

/// The value counts returned by the engine for one backing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCounts {
    /// Backing field name.
    pub field: String,
    pub values: Vec<FacetCount>,
}

/// A facet value a user may still select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableValue {
    pub value: String,
    pub count: u64,
    /// The value encoded as a URL segment.
    pub encoded: String,
    /// Canonical URI with this value added.
    pub uri: String,
}

/// A facet with its remaining selectable values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableFacet {
    pub code: String,
    pub field: String,
    pub name: String,
    pub is_or_facet: bool,
    pub values: Vec<AvailableValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_summary_skips_missing_render() {
        let summary = ApplySummary {
            collection: "products".to_string(),
            applied: 3,
            rendered: None,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["applied"], 3);
        assert!(json.get("rendered").is_none());
    }

    #[test]
    fn test_facet_counts_from_json() {
        let counts: FacetCounts = serde_json::from_str(
            r#"{"field":"brand","values":[{"value":"Acme","count":4},{"value":"Globex","count":0}]}"#,
        )
        .unwrap();
        assert_eq!(counts.field, "brand");
        assert_eq!(counts.values[1].count, 0);
    }
}
