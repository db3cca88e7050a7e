//! Regular and OR facet configuration.

use serde::Serialize;

/// Configuration for a regular (AND) facet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegularFacetConfig {
    /// The backing field holds multiple values per document.
    pub is_multivalued: bool,

    /// When set, every selected value is joined into one URL segment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multivalue_separator: Option<String>,
}

/// Configuration for an OR facet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrFacetConfig {
    /// When set, one URL segment may carry several values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,

    /// Always request zero-count values for this facet while it is active.
    pub always_or: bool,
}

/// Split a decoded segment on a separator, dropping empty parts.
pub(crate) fn split_values<'a>(decoded: &'a str, separator: &'a str) -> impl Iterator<Item = &'a str> {
    decoded.split(separator).filter(|part| !part.is_empty())
}

/// Build `field:("a" OR "b")`, or `field:"a"` for one value.
pub(crate) fn or_clause(field: &str, quoted: &[String]) -> String {
    match quoted {
        [single] => format!("{}:{}", field, single),
        many => format!("{}:({})", field, many.join(" OR ")),
    }
}
