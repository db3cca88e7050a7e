//! Boolean facet configuration.

use serde::Serialize;

/// Configuration for a boolean facet.
///
/// The value space is exactly `true` / `false`; either word may be replaced
/// in URLs by a configured literal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BooleanConfig {
    /// Literal used in URLs for `true`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub true_value: Option<String>,

    /// Literal used in URLs for `false`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub false_value: Option<String>,
}

impl BooleanConfig {
    /// Decode a URL value to `"true"` or `"false"`.
    ///
    /// Replacement literals are tried first, then a case-insensitive match on
    /// the words themselves.
    pub fn decode(&self, value: &str) -> Option<&'static str> {
        if self.true_value.as_deref() == Some(value) {
            return Some("true");
        }
        if self.false_value.as_deref() == Some(value) {
            return Some("false");
        }
        if value.eq_ignore_ascii_case("true") {
            Some("true")
        } else if value.eq_ignore_ascii_case("false") {
            Some("false")
        } else {
            None
        }
    }

    /// The URL literal for a logical value.
    pub fn encode<'a>(&'a self, value: &'a str) -> &'a str {
        match value {
            "true" => self.true_value.as_deref().unwrap_or("true"),
            "false" => self.false_value.as_deref().unwrap_or("false"),
            other => other,
        }
    }

    /// The URL literal for the opposite of a logical value.
    pub fn inverse(&self, value: &str) -> &str {
        if value == "true" {
            self.encode("false")
        } else {
            self.encode("true")
        }
    }
}
