//! Range facet configuration.
//!
//! A range value is either a single value or a from/to pair. With an infix
//! configured the pair shares one URL segment (`10to50`); without one, the
//! pair is split across two positional segments.

use serde::Serialize;

/// Configuration for a range facet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RangeConfig {
    /// Lowest value of the range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,

    /// Highest value of the range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,

    /// Literal between the from and to values in a single segment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub infix: Option<String>,

    /// Literal before an infixed pair.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_prefix: Option<String>,

    /// Literal after an infixed pair.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_suffix: Option<String>,

    /// Literal standing in for a from value equal to `min`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_replacement: Option<String>,

    /// Literal standing in for a to value equal to `max`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_replacement: Option<String>,

    /// Query with `*` when the from value equals `min`.
    pub min_wildcard: bool,

    /// Query with `*` when the to value equals `max`.
    pub max_wildcard: bool,

    /// Leave this facet out of the available facet listing.
    pub suppress: bool,
}

impl RangeConfig {
    /// Returns true if from/to pairs share one segment.
    pub fn has_infix(&self) -> bool {
        self.infix.is_some()
    }

    /// Resolve a min replacement literal.
    pub fn resolve_min<'a>(&'a self, value: &'a str) -> Option<&'a str> {
        match (&self.min_replacement, &self.min) {
            (Some(replacement), Some(min)) if replacement == value => Some(min.as_str()),
            _ => None,
        }
    }

    /// Resolve a max replacement literal.
    pub fn resolve_max<'a>(&'a self, value: &'a str) -> Option<&'a str> {
        match (&self.max_replacement, &self.max) {
            (Some(replacement), Some(max)) if replacement == value => Some(max.as_str()),
            _ => None,
        }
    }

    /// The URL literal for a from value, when it is replaced.
    pub fn from_replacement(&self, from: &str) -> Option<&str> {
        match (&self.min_replacement, &self.min) {
            (Some(replacement), Some(min)) if min == from => Some(replacement.as_str()),
            _ => None,
        }
    }

    /// The URL literal for a to value, when it is replaced.
    pub fn to_replacement(&self, to: &str) -> Option<&str> {
        match (&self.max_replacement, &self.max) {
            (Some(replacement), Some(max)) if max == to => Some(replacement.as_str()),
            _ => None,
        }
    }

    /// The outer prefix and suffix of an infixed segment.
    ///
    /// The range prefix/suffix win when set; otherwise the field's value
    /// prefix/suffix wrap the whole segment.
    fn outer_affixes<'a>(
        &'a self,
        value_prefix: Option<&'a str>,
        value_suffix: Option<&'a str>,
    ) -> (Option<&'a str>, Option<&'a str>) {
        (
            self.range_prefix.as_deref().or(value_prefix),
            self.range_suffix.as_deref().or(value_suffix),
        )
    }

    /// Split an infixed, decoded segment into its from and to parts.
    ///
    /// Replacement literals and the outer prefix/suffix are resolved; the
    /// parts are not yet validated.
    pub fn split_infixed<'a>(
        &'a self,
        decoded: &'a str,
        value_prefix: Option<&'a str>,
        value_suffix: Option<&'a str>,
    ) -> Option<(&'a str, &'a str)> {
        let infix = self.infix.as_deref()?;
        let (prefix, suffix) = self.outer_affixes(value_prefix, value_suffix);
        let mut parts = decoded.split(infix);
        let (from, to) = match (parts.next(), parts.next(), parts.next()) {
            (Some(from), Some(to), None) => (from, to),
            _ => return None,
        };

        let from = match self.resolve_min(from) {
            Some(min) => min,
            None => match prefix {
                Some(prefix) => from.strip_prefix(prefix)?,
                None => from,
            },
        };
        let to = match self.resolve_max(to) {
            Some(max) => max,
            None => match suffix {
                Some(suffix) => to.strip_suffix(suffix)?,
                None => to,
            },
        };

        Some((from, to))
    }

    /// Join a from/to pair into one unencoded segment around the infix.
    pub fn join_infixed(
        &self,
        from: &str,
        to: &str,
        value_prefix: Option<&str>,
        value_suffix: Option<&str>,
    ) -> Option<String> {
        let infix = self.infix.as_deref()?;
        let (prefix, suffix) = self.outer_affixes(value_prefix, value_suffix);
        let from = match self.from_replacement(from) {
            Some(replacement) => replacement.to_string(),
            None => format!("{}{}", prefix.unwrap_or(""), from),
        };
        let to = match self.to_replacement(to) {
            Some(replacement) => replacement.to_string(),
            None => format!("{}{}", to, suffix.unwrap_or("")),
        };
        Some(format!("{}{}{}", from, infix, to))
    }

    /// The engine clause for a from/to pair.
    ///
    /// # Example
    ///
    /// ```
    /// use lpse_repository::fields::range::RangeConfig;
    ///
    /// let config = RangeConfig {
    ///     min: Some("0".to_string()),
    ///     min_wildcard: true,
    ///     ..RangeConfig::default()
    /// };
    /// assert_eq!(config.clause("weight", "0", "40"), "weight:[* TO 40]");
    /// assert_eq!(config.clause("weight", "10", "40"), "weight:[10 TO 40]");
    /// ```
    pub fn clause(&self, field: &str, from: &str, to: &str) -> String {
        let from = if self.min_wildcard && self.min.as_deref() == Some(from) {
            "*"
        } else {
            from
        };
        let to = if self.max_wildcard && self.max.as_deref() == Some(to) {
            "*"
        } else {
            to
        };
        format!("{}:[{} TO {}]", field, from, to)
    }
}
