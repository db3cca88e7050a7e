//! Which facets are requested from the engine for a given request.

use lpse_shared::{QueryDirective, TokenMap};

use crate::fields::{FieldDefinition, FieldKind};

use super::Registry;

impl Registry {
    /// Returns true if a facet's values should be surfaced for a request.
    ///
    /// A facet is hidden when it is ignored, not enumerable, any of its
    /// `unless` codes is active, or it has `when` codes and none is active.
    /// `unless` is checked first and always wins.
    pub fn is_facet_visible(&self, code: &str, tokens: &TokenMap) -> bool {
        let Some(definition) = self.definitions.get(code) else {
            return false;
        };
        if self.is_ignored(code) || !definition.kind.is_enumerable() {
            return false;
        }
        if let Some(unless) = self.unless.get(code) {
            if unless.iter().any(|other| tokens.is_active(other)) {
                return false;
            }
        }
        match self.when.get(code) {
            Some(when) => when.iter().any(|other| tokens.is_active(other)),
            None => true,
        }
    }

    /// Visible facets, in facet order.
    pub fn visible_facets<'a>(&'a self, tokens: &'a TokenMap) -> impl Iterator<Item = &'a FieldDefinition> + 'a {
        self.facets()
            .filter(move |facet| self.is_facet_visible(&facet.code, tokens))
    }

    /// Returns true if an OR facet's counts must be requested with a zero
    /// minimum, so that selecting one value does not hide its siblings.
    pub fn needs_zero_min_count(&self, code: &str, tokens: &TokenMap) -> bool {
        let Some(FieldKind::OrFacet(config)) = self.definitions.get(code).map(|d| &d.kind) else {
            return false;
        };
        if !tokens.is_active(code) {
            return false;
        }
        if config.always_or {
            return true;
        }
        self.facet_order
            .iter()
            .filter(|other| tokens.is_active(other))
            .all(|other| other == code)
    }

    /// Facet field, min count and limit directives for a request.
    pub fn facet_directives(&self, tokens: &TokenMap) -> Vec<QueryDirective> {
        let visible: Vec<&FieldDefinition> = self.visible_facets(tokens).collect();

        let mut directives = vec![
            QueryDirective::FacetFields(
                visible
                    .iter()
                    .map(|facet| facet.backing_name.clone())
                    .collect(),
            ),
            QueryDirective::FacetMinCount {
                field: None,
                min_count: self.settings.facet_min_count,
            },
        ];
        directives.extend(
            visible
                .iter()
                .filter(|facet| self.needs_zero_min_count(&facet.code, tokens))
                .map(|facet| QueryDirective::FacetMinCount {
                    field: Some(facet.backing_name.clone()),
                    min_count: 0,
                }),
        );
        directives.push(QueryDirective::FacetLimit(self.settings.facet_limit));
        directives
    }
}
