//! Abstract query directives.
//!
//! The codec decides *what* to apply to a search; an adapter decides how a
//! specific engine expresses it.

use serde::{Deserialize, Serialize};

use super::operand::{QueryOperand, SortDirection};

/// One key of a multi-key sort.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortClause {
    /// Backing field name in the search index.
    pub field: String,
    /// Sort direction.
    pub direction: SortDirection,
}

/// A single instruction for the search-engine adapter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum QueryDirective {
    /// A filter clause on one backing field, e.g. `brand:"Acme"`.
    Filter {
        /// Backing field name.
        field: String,
        /// The full clause.
        clause: String,
    },

    /// The free-text query.
    Query {
        /// The query expression.
        q: String,
        /// Backing fields the query is restricted to, empty for the default field.
        fields: Vec<String>,
    },

    /// The default operator between query terms.
    Operand(QueryOperand),

    /// Multi-key sort, in priority order.
    Sort(Vec<SortClause>),

    /// Number of rows to return.
    Rows(u32),

    /// Offset of the first row.
    Start(u64),

    /// Stored fields to return. `None` means all fields.
    FieldList(Option<Vec<String>>),

    /// Backing fields to compute facet counts for.
    FacetFields(Vec<String>),

    /// Facet minimum count, globally or for one field.
    FacetMinCount {
        /// The field to override, or `None` for the collection default.
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<String>,
        /// Minimum count.
        min_count: u32,
    },

    /// Maximum number of facet values per field.
    FacetLimit(u32),
}

impl QueryDirective {
    /// Create a filter directive.
    pub fn filter(field: impl Into<String>, clause: impl Into<String>) -> Self {
        Self::Filter {
            field: field.into(),
            clause: clause.into(),
        }
    }

    /// Short name of the directive kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Filter { .. } => "filter",
            Self::Query { .. } => "query",
            Self::Operand(_) => "operand",
            Self::Sort(_) => "sort",
            Self::Rows(_) => "rows",
            Self::Start(_) => "start",
            Self::FieldList(_) => "field_list",
            Self::FacetFields(_) => "facet_fields",
            Self::FacetMinCount { .. } => "facet_min_count",
            Self::FacetLimit(_) => "facet_limit",
        }
    }
}
