//! Available facet values.
//!
//! Turns the value counts an engine returned for the visible facets into the
//! values a user may still select, each with the canonical URI that selects it.

use lpse_shared::TokenMap;

use crate::codec::CanonicalUriBuilder;
use crate::fields::FieldKind;
use crate::types::{AvailableFacet, AvailableValue, FacetCounts};

/// Filter engine facet counts down to the selectable values.
///
/// # Arguments
///
/// * `builder` - Builder for the request's collection
/// * `tokens` - The request's tokens
/// * `fieldset` - The request's fieldset
/// * `counts` - Engine value counts, keyed by backing field
/// * `num_found` - Number of documents the request matched
///
/// # Returns
///
/// The available facets in facet order. Facets with nothing left to select
/// are omitted.
pub fn available_facets(
    builder: &CanonicalUriBuilder<'_>,
    tokens: &TokenMap,
    fieldset: &str,
    counts: &[FacetCounts],
    num_found: u64,
) -> Vec<AvailableFacet> {
    let registry = builder.registry();
    let settings = registry.settings();
    let has_or_facets = registry.has_or_facets();

    let mut available = Vec::new();
    for facet in registry.visible_facets(tokens) {
        let Some(facet_counts) = counts.iter().find(|c| c.field == facet.backing_name) else {
            continue;
        };
        let is_or_facet = matches!(facet.kind, FieldKind::OrFacet(_));

        let values: Vec<AvailableValue> = facet_counts
            .values
            .iter()
            .filter(|count| {
                !tokens
                    .valid(&facet.code)
                    .any(|t| t.value.as_deref() == Some(count.value.as_str()))
            })
            .filter(|count| is_or_facet || !(has_or_facets && count.count == 0))
            .filter(|count| {
                is_or_facet || settings.include_same_number_facets || count.count != num_found
            })
            .map(|count| AvailableValue {
                value: count.value.clone(),
                count: count.count,
                encoded: facet.encode(&count.value),
                uri: builder.add_value(tokens, fieldset, &facet.code, &count.value),
            })
            .collect();

        if values.is_empty() || (values.len() == 1 && !is_or_facet && !settings.include_single_facets) {
            continue;
        }

        available.push(AvailableFacet {
            code: facet.code.clone(),
            field: facet.backing_name.clone(),
            name: facet.display_name.clone(),
            is_or_facet,
            values,
        });
    }
    available
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::parse;
    use crate::properties::Properties;
    use crate::registry::{test_support, Registry};
    use crate::types::FacetCount;

    fn counts(field: &str, values: &[(&str, u64)]) -> FacetCounts {
        FacetCounts {
            field: field.to_string(),
            values: values
                .iter()
                .map(|(value, count)| FacetCount {
                    value: value.to_string(),
                    count: *count,
                })
                .collect(),
        }
    }

    #[test]
    fn test_active_and_same_number_values_dropped() {
        let registry = test_support::registry();
        let builder = CanonicalUriBuilder::new(&registry);
        let parsed = parse("/shop/default/Acme/b/", None, &registry);

        let available = available_facets(
            &builder,
            &parsed.tokens,
            &parsed.fieldset,
            &[counts("brand", &[("Acme", 9), ("Globex", 4), ("Initech", 9), ("Umbrella", 2)])],
            9,
        );

        assert_eq!(available.len(), 1);
        let values: Vec<&str> = available[0].values.iter().map(|v| v.value.as_str()).collect();
        assert_eq!(values, vec!["Globex", "Umbrella"]);
        assert_eq!(available[0].values[0].uri, "/shop/default/Acme/Globex/bb/");
    }

    #[test]
    fn test_single_value_dropped_unless_or_facet() {
        let registry = test_support::registry();
        let builder = CanonicalUriBuilder::new(&registry);
        let parsed = parse("/shop/default/Acme/b/", None, &registry);

        let available = available_facets(
            &builder,
            &parsed.tokens,
            &parsed.fieldset,
            &[
                counts("brand", &[("Globex", 4)]),
                counts("colour", &[("red", 3)]),
            ],
            9,
        );

        assert_eq!(available.len(), 1);
        assert_eq!(available[0].code, "c");
        assert!(available[0].is_or_facet);
        assert_eq!(available[0].values[0].uri, "/shop/default/Acme/red/bc/");
    }

    #[test]
    fn test_zero_counts_dropped_for_regular_facets() {
        let registry = test_support::registry();
        let builder = CanonicalUriBuilder::new(&registry);
        let tokens = TokenMap::new();

        let available = available_facets(
            &builder,
            &tokens,
            "default",
            &[counts("brand", &[("Acme", 3), ("Globex", 0), ("Initech", 2)])],
            9,
        );

        let values: Vec<&str> = available[0].values.iter().map(|v| v.value.as_str()).collect();
        assert_eq!(values, vec!["Acme", "Initech"]);
    }

    #[test]
    fn test_hidden_facets_not_listed() {
        let registry = test_support::registry();
        let builder = CanonicalUriBuilder::new(&registry);

        let available = available_facets(
            &builder,
            &TokenMap::new(),
            "default",
            &[
                counts("colour", &[("red", 3), ("blue", 2)]),
                counts("released", &[("2024-01-01", 3), ("2024-02-01", 1)]),
            ],
            9,
        );
        assert!(available.is_empty());
    }

    #[test]
    fn test_date_range_facets_never_available() {
        let properties = Properties::parse(&format!(
            "{}\npanl.facet.r=launched\npanl.type.r=solr.DatePointField\npanl.range.facet.r=true\npanl.lpse.order=b,c,w,g,i,d,t,r,q,s,p,n,o,z\n",
            test_support::PROPERTIES
        ));
        let registry = Registry::build("products", "shop", &properties).unwrap();
        let builder = CanonicalUriBuilder::new(&registry);

        let available = available_facets(
            &builder,
            &TokenMap::new(),
            "default",
            &[
                counts("launched", &[("2024-01-01", 3), ("2024-02-01", 2)]),
                counts("brand", &[("Acme", 3), ("Globex", 2)]),
            ],
            9,
        );

        assert_eq!(available.len(), 1);
        assert_eq!(available[0].code, "b");
    }
}
