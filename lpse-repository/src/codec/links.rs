//! Links derived from the current request state.
//!
//! Every link is a canonical URI for a modified copy of the token map. All
//! links except pagination return to page one.

use lpse_shared::{QueryOperand, SortDirection, Token, TokenDetail, TokenMap};

use super::canonical::CanonicalUriBuilder;
use crate::fields::FieldKind;

impl CanonicalUriBuilder<'_> {
    /// The URI with a value added to a facet.
    ///
    /// Single-valued kinds replace their current value; other facets gain
    /// the value unless it is already selected.
    pub fn add_value(&self, tokens: &TokenMap, fieldset: &str, code: &str, value: &str) -> String {
        let mut next = tokens.clone();
        let token = Token::valid(code, value);
        let single = self
            .registry()
            .definition(code)
            .is_some_and(|d| d.kind.is_single_valued());
        if single {
            next.replace(code, vec![token]);
        } else {
            next.push_unique(token);
        }
        self.build_reset(&next, fieldset)
    }

    /// The URI with a range selected on a range facet.
    pub fn add_range(&self, tokens: &TokenMap, fieldset: &str, code: &str, from: &str, to: &str) -> String {
        let has_infix = matches!(
            self.registry().definition(code).map(|d| &d.kind),
            Some(FieldKind::RangeFacet(config)) if config.has_infix()
        );
        let mut next = tokens.clone();
        next.replace(code, vec![Token::range(code, from, to, has_infix)]);
        self.build_reset(&next, fieldset)
    }

    /// The URI with one value of a code removed, or every value when `value`
    /// is `None`.
    pub fn remove_value(&self, tokens: &TokenMap, fieldset: &str, code: &str, value: Option<&str>) -> String {
        let mut next = tokens.clone();
        match value {
            Some(value) => {
                next.remove_where(code, |t| t.value.as_deref() == Some(value));
            }
            None => {
                next.remove(code);
            }
        }
        self.build_reset(&next, fieldset)
    }

    /// The URI for a page, keeping everything else.
    pub fn page(&self, tokens: &TokenMap, fieldset: &str, page: u64) -> String {
        let code = self.registry().params().page.as_str();
        let mut next = tokens.clone();
        next.replace(code, vec![Token::valid(code, page.max(1).to_string())]);
        self.build(&next, fieldset)
    }

    /// The URI with the query operand flipped.
    pub fn toggle_operand(&self, tokens: &TokenMap, fieldset: &str) -> String {
        let code = self.registry().params().query_operand.as_str();
        let current = tokens
            .first_valid(code)
            .and_then(|t| t.value.as_deref())
            .and_then(QueryOperand::from_uri_key)
            .unwrap_or(self.registry().settings().default_operand);

        let mut next = tokens.clone();
        next.replace(code, vec![Token::operand(code, current.toggled())]);
        self.build_reset(&next, fieldset)
    }

    /// The URI sorted by one field, replacing any current sort.
    pub fn sort(&self, tokens: &TokenMap, fieldset: &str, field_code: &str, direction: SortDirection) -> String {
        let code = self.registry().params().sort.as_str();
        let mut next = tokens.clone();
        next.replace(code, vec![Token::sort(code, field_code, direction)]);
        self.build_reset(&next, fieldset)
    }

    /// The URI with a further sort key appended to the current sort.
    pub fn then_sort(&self, tokens: &TokenMap, fieldset: &str, field_code: &str, direction: SortDirection) -> String {
        let code = self.registry().params().sort.as_str();
        let mut next = tokens.clone();
        next.remove_where(code, |t| {
            matches!(&t.detail, TokenDetail::Sort { field_code: f, .. } if f == field_code)
        });
        next.push(Token::sort(code, field_code, direction));
        self.build_reset(&next, fieldset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::tokeniser::parse;
    use crate::registry::test_support;

    fn state(path: &str) -> TokenMap {
        parse(path, None, &test_support::registry()).tokens
    }

    #[test]
    fn test_add_value_resets_page() {
        let registry = test_support::registry();
        let builder = CanonicalUriBuilder::new(&registry);
        let tokens = state("/shop/default/2/p/");

        assert_eq!(
            builder.add_value(&tokens, "default", "b", "brand-name"),
            "/shop/default/brand-name/b/"
        );
    }

    #[test]
    fn test_add_or_value_appends() {
        let registry = test_support::registry();
        let builder = CanonicalUriBuilder::new(&registry);
        let tokens = state("/shop/default/red/c/");

        assert_eq!(
            builder.add_value(&tokens, "default", "c", "blue"),
            "/shop/default/red/blue/cc/"
        );
        assert_eq!(
            builder.add_value(&tokens, "default", "c", "red"),
            "/shop/default/red/c/"
        );
    }

    #[test]
    fn test_boolean_value_replaced() {
        let registry = test_support::registry();
        let builder = CanonicalUriBuilder::new(&registry);
        let tokens = state("/shop/default/yes/i/");

        assert_eq!(
            builder.add_value(&tokens, "default", "i", "false"),
            "/shop/default/no/i/"
        );
    }

    #[test]
    fn test_remove_value() {
        let registry = test_support::registry();
        let builder = CanonicalUriBuilder::new(&registry);
        let tokens = state("/shop/default/Acme/red/blue/3/bccp/");

        assert_eq!(
            builder.remove_value(&tokens, "default", "c", Some("red")),
            "/shop/default/Acme/blue/bc/"
        );
        assert_eq!(
            builder.remove_value(&tokens, "default", "c", None),
            "/shop/default/Acme/b/"
        );
    }

    #[test]
    fn test_pagination_keeps_state() {
        let registry = test_support::registry();
        let builder = CanonicalUriBuilder::new(&registry);
        let tokens = state("/shop/default/Acme/20/bn/");

        assert_eq!(
            builder.page(&tokens, "default", 3),
            "/shop/default/Acme/3/20/bpn/"
        );
        assert_eq!(builder.page(&tokens, "default", 1), "/shop/default/Acme/20/bn/");
    }

    #[test]
    fn test_toggle_operand() {
        let registry = test_support::registry();
        let builder = CanonicalUriBuilder::new(&registry);
        let tokens = state("/shop/default/Acme/4/bp/");

        let toggled = builder.toggle_operand(&tokens, "default");
        assert_eq!(toggled, "/shop/default/Acme/bo-/");
        assert_eq!(
            builder.toggle_operand(&state(&toggled), "default"),
            "/shop/default/Acme/b/"
        );
    }

    #[test]
    fn test_sort_links() {
        let registry = test_support::registry();
        let builder = CanonicalUriBuilder::new(&registry);
        let tokens = state("/shop/default/Acme/2/bp/");

        let sorted = builder.sort(&tokens, "default", "b", SortDirection::Ascending);
        assert_eq!(sorted, "/shop/default/Acme/bsb+/");
        assert_eq!(
            builder.then_sort(&state(&sorted), "default", "t", SortDirection::Descending),
            "/shop/default/Acme/bsb+st-/"
        );
    }
}
