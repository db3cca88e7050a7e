//! Value validation by backing field type.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// How decoded values are validated before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValidationKind {
    /// Any non-blank value.
    #[default]
    None,
    /// Integers. Non-digit characters are stripped.
    Number,
    /// Decimals using the collection's decimal separator.
    Decimal,
    /// ISO-8601 dates or date-times.
    Date,
}

impl ValidationKind {
    /// Map an engine field type name to its validation kind.
    ///
    /// # Example
    ///
    /// ```
    /// use lpse_repository::fields::ValidationKind;
    ///
    /// assert_eq!(ValidationKind::from_engine_type("solr.IntPointField"), ValidationKind::Number);
    /// assert_eq!(ValidationKind::from_engine_type("solr.StrField"), ValidationKind::None);
    /// ```
    pub fn from_engine_type(type_name: &str) -> Self {
        match type_name {
            "solr.IntPointField" | "solr.LongPointField" => Self::Number,
            "solr.DoublePointField" | "solr.FloatPointField" => Self::Decimal,
            "solr.DatePointField" => Self::Date,
            _ => Self::None,
        }
    }

    /// Validate and normalise a decoded value.
    ///
    /// # Arguments
    ///
    /// * `value` - The value after prefix/suffix stripping
    /// * `decimal_separator` - The collection's decimal separator
    ///
    /// # Returns
    ///
    /// The normalised value, or `None` if it is blank or fails validation.
    pub fn validate(&self, value: &str, decimal_separator: char) -> Option<String> {
        if value.trim().is_empty() {
            return None;
        }

        match self {
            Self::None => Some(value.to_string()),
            Self::Number => {
                let stripped = strip_to(value, |c| c.is_ascii_digit());
                stripped.parse::<i64>().ok().map(|_| stripped)
            }
            Self::Decimal => {
                let stripped = strip_to(value, |c| c.is_ascii_digit() || c == decimal_separator);
                // Parsed only to check; the value keeps the collection's separator.
                let normalised = stripped.replace(decimal_separator, ".");
                normalised.parse::<f64>().ok().map(|_| stripped)
            }
            Self::Date => {
                let trimmed = value.trim();
                let parses = DateTime::parse_from_rfc3339(trimmed).is_ok()
                    || NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S").is_ok()
                    || NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_ok();
                parses.then(|| trimmed.to_string())
            }
        }
    }
}

/// Keep a leading minus sign and the characters accepted by `keep`.
fn strip_to<F>(value: &str, keep: F) -> String
where
    F: Fn(char) -> bool,
{
    let trimmed = value.trim_start();
    let negative = trimmed.starts_with('-');
    let mut stripped: String = trimmed.chars().filter(|&c| keep(c)).collect();
    if negative && !stripped.is_empty() {
        stripped.insert(0, '-');
    }
    stripped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_strips_non_digits() {
        assert_eq!(ValidationKind::Number.validate("12kg", '.').as_deref(), Some("12"));
        assert_eq!(ValidationKind::Number.validate("-5", '.').as_deref(), Some("-5"));
        assert_eq!(ValidationKind::Number.validate("abc", '.'), None);
    }

    #[test]
    fn test_decimal_respects_separator() {
        assert_eq!(ValidationKind::Decimal.validate("1.5", '.').as_deref(), Some("1.5"));
        assert_eq!(ValidationKind::Decimal.validate("1,5", ',').as_deref(), Some("1,5"));
        assert_eq!(ValidationKind::Decimal.validate("1.2.3", '.'), None);
    }

    #[test]
    fn test_decimal_keeps_configured_separator() {
        assert_eq!(ValidationKind::Decimal.validate("€12,75", ',').as_deref(), Some("12,75"));
        assert_eq!(ValidationKind::Decimal.validate("0,5", ',').as_deref(), Some("0,5"));
    }

    #[test]
    fn test_date_formats() {
        let kind = ValidationKind::Date;
        assert!(kind.validate("2024-02-29T10:00:00Z", '.').is_some());
        assert!(kind.validate("2024-02-29", '.').is_some());
        assert!(kind.validate("2023-02-29", '.').is_none());
        assert!(kind.validate("tomorrow", '.').is_none());
    }

    #[test]
    fn test_blank_is_invalid() {
        assert_eq!(ValidationKind::None.validate("  ", '.'), None);
        assert_eq!(ValidationKind::None.validate("x", '.').as_deref(), Some("x"));
    }
}
