//! The collection registry.
//!
//! A [`Registry`] is built once per collection from its properties and is
//! immutable afterwards, so it can be shared across any number of concurrent
//! requests behind an `Arc` without locking.

mod builder;
mod visibility;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use lpse_shared::{QueryDirective, QueryOperand, TokenMap};

use crate::config::CollectionSettings;
use crate::fields::{DirectiveContext, FieldDefinition, FieldKind};

pub use builder::{
    PROPERTY_FACET_ORDER, PROPERTY_IGNORE, PROPERTY_LPSE_ORDER, PROPERTY_PARAM_NUMROWS,
    PROPERTY_PARAM_PAGE, PROPERTY_PARAM_PASSTHROUGH, PROPERTY_PARAM_QUERY,
    PROPERTY_PARAM_QUERY_OPERAND, PROPERTY_PARAM_SORT,
};

/// Name of the fieldset returning every field.
pub const FIELDSET_DEFAULT: &str = "default";

/// Name of the fieldset returning no fields.
pub const FIELDSET_EMPTY: &str = "empty";

/// Codes of the parameter fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamCodes {
    pub query: String,
    pub sort: String,
    pub page: String,
    pub num_rows: String,
    pub query_operand: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_through: Option<String>,
}

/// The validated, immutable configuration of one collection.
#[derive(Debug, Clone, Serialize)]
pub struct Registry {
    collection_name: String,
    collection_uri: String,
    settings: CollectionSettings,
    definitions: HashMap<String, FieldDefinition>,
    lpse_order: Vec<String>,
    facet_order: Vec<String>,
    ignored: BTreeSet<String>,
    when: HashMap<String, BTreeSet<String>>,
    unless: HashMap<String, BTreeSet<String>>,
    fieldsets: BTreeMap<String, Option<Vec<String>>>,
    params: ParamCodes,
    warnings: Vec<String>,
}

impl Registry {
    /// Name of the collection in the search engine.
    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// First path segment of every LPSE URI for this collection.
    pub fn collection_uri(&self) -> &str {
        &self.collection_uri
    }

    pub fn settings(&self) -> &CollectionSettings {
        &self.settings
    }

    pub fn params(&self) -> &ParamCodes {
        &self.params
    }

    /// Non-fatal configuration warnings collected while building.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Look up a field definition by code.
    pub fn definition(&self, code: &str) -> Option<&FieldDefinition> {
        self.definitions.get(code)
    }

    /// Codes in canonical LPSE order.
    pub fn lpse_order(&self) -> &[String] {
        &self.lpse_order
    }

    /// Facet codes in facet response order.
    pub fn facet_order(&self) -> &[String] {
        &self.facet_order
    }

    /// Field definitions in canonical LPSE order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.lpse_order
            .iter()
            .filter_map(|code| self.definitions.get(code))
    }

    /// Facet definitions in facet response order.
    pub fn facets(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.facet_order
            .iter()
            .filter_map(|code| self.definitions.get(code))
    }

    /// Returns true if the code is excluded from available facets.
    pub fn is_ignored(&self, code: &str) -> bool {
        self.ignored.contains(code)
    }

    /// Returns true if any facet in the collection is an OR facet.
    pub fn has_or_facets(&self) -> bool {
        self.facets()
            .any(|f| matches!(f.kind, FieldKind::OrFacet(_)))
    }

    /// Resolve a fieldset name, falling back to the default fieldset.
    ///
    /// # Returns
    ///
    /// The resolved name and its fields; `None` fields means every field.
    pub fn fieldset(&self, name: &str) -> (&str, Option<&[String]>) {
        match self.fieldsets.get_key_value(name) {
            Some((name, fields)) => (name.as_str(), fields.as_deref()),
            None => (FIELDSET_DEFAULT, self.default_fields()),
        }
    }

    fn default_fields(&self) -> Option<&[String]> {
        self.fieldsets
            .get(FIELDSET_DEFAULT)
            .and_then(|fields| fields.as_deref())
    }

    /// Names of every configured fieldset.
    pub fn fieldset_names(&self) -> impl Iterator<Item = &str> {
        self.fieldsets.keys().map(String::as_str)
    }

    /// The request-wide values in effect for a token map.
    pub fn directive_context(&self, tokens: &TokenMap) -> DirectiveContext {
        let first_value = |code: &str| {
            tokens
                .first_valid(code)
                .and_then(|t| t.value.as_deref())
        };

        DirectiveContext {
            rows: first_value(&self.params.num_rows)
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.settings.results_per_page),
            page: first_value(&self.params.page)
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            operand: first_value(&self.params.query_operand)
                .and_then(QueryOperand::from_uri_key)
                .unwrap_or(self.settings.default_operand),
        }
    }

    /// The directives to apply for a token map, in LPSE order, followed by
    /// the field list and the facet directives.
    pub fn directives(&self, tokens: &TokenMap, fieldset: &str) -> Vec<QueryDirective> {
        let context = self.directive_context(tokens);
        let mut directives: Vec<QueryDirective> = self
            .fields()
            .flat_map(|field| field.to_query_directives(tokens, &context))
            .collect();

        let (_, fields) = self.fieldset(fieldset);
        if fields.is_some_and(|f| f.is_empty()) {
            directives.retain(|d| !matches!(d, QueryDirective::Rows(_)));
            directives.push(QueryDirective::Rows(0));
        }
        directives.push(QueryDirective::FieldList(fields.map(<[String]>::to_vec)));
        directives.extend(self.facet_directives(tokens));
        directives
    }

    /// The directives for a type-ahead lookahead query.
    pub fn lookahead_directives(&self, tokens: &TokenMap, fieldset: &str) -> Vec<QueryDirective> {
        self.directives(tokens, fieldset)
            .into_iter()
            .map(|directive| match directive {
                QueryDirective::Rows(_) => QueryDirective::Rows(self.settings.lookahead_rows),
                QueryDirective::Start(_) => QueryDirective::Start(0),
                other => other,
            })
            .collect()
    }

    /// Describe the collection configuration for operators.
    pub fn explain(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "COLLECTION '{}' URI '/{}/' LPSE length {} order '{}'.",
            self.collection_name,
            self.collection_uri,
            self.settings.lpse_length,
            self.lpse_order.concat()
        )];
        for field in self.fields() {
            lines.extend(field.explain());
        }
        lines
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use lpse_shared::Token;

    #[test]
    fn test_directive_context_defaults() {
        let registry = test_support::registry();
        let context = registry.directive_context(&TokenMap::new());
        assert_eq!(context.rows, 10);
        assert_eq!(context.page, 1);
        assert_eq!(context.operand, QueryOperand::And);
    }

    #[test]
    fn test_directives_start_from_page_and_rows() {
        let registry = test_support::registry();
        let mut tokens = TokenMap::new();
        tokens.push(Token::valid("p", "3"));
        tokens.push(Token::valid("n", "20"));

        let directives = registry.directives(&tokens, "default");
        assert!(directives.contains(&QueryDirective::Start(40)));
        assert!(directives.contains(&QueryDirective::Rows(20)));
        assert!(directives.contains(&QueryDirective::FieldList(Some(vec![
            "brand".to_string(),
            "title".to_string()
        ]))));
    }

    #[test]
    fn test_huge_page_saturates_start() {
        let registry = test_support::registry();
        let parsed = crate::codec::parse("/shop/default/9223372036854775807/p/", None, &registry);

        let directives = registry.directives(&parsed.tokens, "default");
        assert!(directives.contains(&QueryDirective::Start(u64::MAX)));
        assert!(directives.contains(&QueryDirective::Rows(10)));
    }

    #[test]
    fn test_empty_fieldset_requests_no_rows() {
        let registry = test_support::registry();
        let directives = registry.directives(&TokenMap::new(), FIELDSET_EMPTY);
        assert!(directives.contains(&QueryDirective::Rows(0)));
        assert!(!directives.contains(&QueryDirective::Rows(10)));
        assert!(directives.contains(&QueryDirective::FieldList(Some(Vec::new()))));
    }

    #[test]
    fn test_unknown_fieldset_falls_back_to_default() {
        let registry = test_support::registry();
        let (name, fields) = registry.fieldset("nope");
        assert_eq!(name, FIELDSET_DEFAULT);
        assert_eq!(fields.map(<[String]>::len), Some(2));
        assert_eq!(registry.fieldset("brief").0, "brief");
    }

    #[test]
    fn test_lookahead_directives() {
        let registry = test_support::registry();
        let mut tokens = TokenMap::new();
        tokens.push(Token::valid("p", "4"));

        let directives = registry.lookahead_directives(&tokens, "default");
        assert!(directives.contains(&QueryDirective::Rows(5)));
        assert!(directives.contains(&QueryDirective::Start(0)));
    }
}
