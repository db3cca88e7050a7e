//! Configuration for the query and sort parameter fields.

use serde::Serialize;

use crate::utils::quote;
use lpse_shared::QueryOperand;

/// A backing field the free-text query may be restricted to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchField {
    /// Search sub-code used after the query code.
    pub code: String,
    /// Backing field name.
    pub backing_name: String,
    /// Boost applied to matches in this field.
    pub boost: f64,
}

/// Configuration for the free-text query field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryConfig {
    /// Fields the query may be restricted to.
    pub search_fields: Vec<SearchField>,
}

impl QueryConfig {
    /// Look up a search field by sub-code.
    pub fn search_field(&self, code: &str) -> Option<&SearchField> {
        self.search_fields.iter().find(|f| f.code == code)
    }

    /// Build the query expression for some text.
    ///
    /// Without restricting fields the terms are quoted and space separated,
    /// leaving the operand to the engine. With restricting fields each field
    /// gets an operand-joined group of boosted clauses and the groups are ORed.
    ///
    /// # Example
    ///
    /// ```
    /// use lpse_repository::fields::param::QueryConfig;
    /// use lpse_shared::QueryOperand;
    ///
    /// let config = QueryConfig::default();
    /// assert_eq!(config.expression("red shoe", &[], QueryOperand::And), "\"red\" \"shoe\"");
    /// ```
    pub fn expression(&self, text: &str, search_codes: &[String], operand: QueryOperand) -> String {
        let terms: Vec<String> = text.split_whitespace().map(quote).collect();

        let fields: Vec<&SearchField> = search_codes
            .iter()
            .filter_map(|code| self.search_field(code))
            .collect();
        if fields.is_empty() {
            return terms.join(" ");
        }

        let joiner = format!(" {} ", operand.engine_value());
        fields
            .iter()
            .map(|field| {
                let boost = if field.boost == 1.0 {
                    String::new()
                } else {
                    format!("^{}", field.boost)
                };
                let clauses: Vec<String> = terms
                    .iter()
                    .map(|term| format!("{}:{}{}", field.backing_name, term, boost))
                    .collect();
                format!("({})", clauses.join(&joiner))
            })
            .collect::<Vec<_>>()
            .join(" OR ")
    }
}

/// A backing field that may be sorted on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortableField {
    /// Code of the facet or field declaring the backing field.
    pub code: String,
    /// Backing field name.
    pub backing_name: String,
}

/// Configuration for the sort field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SortConfig {
    /// Fields that may be sorted on, in configuration order.
    pub fields: Vec<SortableField>,
}

impl SortConfig {
    /// Look up a sortable field by code.
    pub fn field(&self, code: &str) -> Option<&SortableField> {
        self.fields.iter().find(|f| f.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> QueryConfig {
        QueryConfig {
            search_fields: vec![
                SearchField {
                    code: "b".to_string(),
                    backing_name: "brand".to_string(),
                    boost: 2.0,
                },
                SearchField {
                    code: "t".to_string(),
                    backing_name: "title".to_string(),
                    boost: 1.0,
                },
            ],
        }
    }

    #[test]
    fn test_restricted_expression() {
        let expression = config().expression(
            "red shoe",
            &["b".to_string(), "t".to_string()],
            QueryOperand::Or,
        );
        assert_eq!(
            expression,
            "(brand:\"red\"^2 OR brand:\"shoe\"^2) OR (title:\"red\" OR title:\"shoe\")"
        );
    }

    #[test]
    fn test_unknown_search_codes_fall_back() {
        let expression = config().expression("red", &["x".to_string()], QueryOperand::And);
        assert_eq!(expression, "\"red\"");
    }

    #[test]
    fn test_and_operand_joins_terms() {
        let expression = config().expression("red shoe", &["t".to_string()], QueryOperand::And);
        assert_eq!(expression, "(title:\"red\" AND title:\"shoe\")");
    }
}
