//! Date and date-range facet configuration.
//!
//! Besides literal dates, a date facet accepts relative values such as
//! `next 3 days` or `last 2 months`, built from a direction indicator, an
//! integer and a unit suffix.

use serde::Serialize;

/// Engine-level date arithmetic unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateUnit {
    Years,
    Months,
    Days,
    Hours,
}

impl DateUnit {
    /// All units, in property order.
    pub const ALL: [DateUnit; 4] = [Self::Years, Self::Months, Self::Days, Self::Hours];

    /// The engine unit token.
    pub fn engine_value(&self) -> &'static str {
        match self {
            Self::Years => "YEARS",
            Self::Months => "MONTHS",
            Self::Days => "DAYS",
            Self::Hours => "HOURS",
        }
    }

    /// The property key suffix naming this unit.
    pub fn property_suffix(&self) -> &'static str {
        match self {
            Self::Years => "years",
            Self::Months => "months",
            Self::Days => "days",
            Self::Hours => "hours",
        }
    }
}

/// Direction of a relative date value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateDirection {
    /// From now into the future.
    Next,
    /// From the past up to now.
    Previous,
}

/// A parsed relative date value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativeDate {
    pub direction: DateDirection,
    pub amount: u32,
    pub unit: DateUnit,
}

impl RelativeDate {
    /// The engine range clause for this value on a field.
    ///
    /// # Example
    ///
    /// ```
    /// use lpse_repository::fields::date::{DateDirection, DateUnit, RelativeDate};
    ///
    /// let next = RelativeDate { direction: DateDirection::Next, amount: 3, unit: DateUnit::Days };
    /// assert_eq!(next.clause("released"), "released:[NOW TO NOW+3DAYS]");
    /// ```
    pub fn clause(&self, field: &str) -> String {
        let span = format!("{}{}", self.amount, self.unit.engine_value());
        match self.direction {
            DateDirection::Next => format!("{}:[NOW TO NOW+{}]", field, span),
            DateDirection::Previous => format!("{}:[NOW-{} TO NOW]", field, span),
        }
    }
}

/// The shape of a decoded date value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateShape {
    /// A literal date, matched by equality.
    Literal,
    /// A relative value.
    Relative(RelativeDate),
    /// Started with an indicator but the rest does not parse.
    Malformed,
}

/// Configuration shared by date and date-range facets.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DateConfig {
    /// Indicator for future-relative values, e.g. `next `.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_indicator: Option<String>,

    /// Indicator for past-relative values, e.g. `last `.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_indicator: Option<String>,

    /// Configured unit suffixes.
    pub unit_suffixes: Vec<(String, DateUnit)>,
}

impl DateConfig {
    /// Returns true if relative values can be decoded.
    pub fn supports_relative(&self) -> bool {
        (self.next_indicator.is_some() || self.previous_indicator.is_some())
            && !self.unit_suffixes.is_empty()
    }

    /// Classify a decoded value.
    pub fn shape(&self, value: &str) -> DateShape {
        let mut indicators: Vec<(&str, DateDirection)> = Vec::with_capacity(2);
        if let Some(next) = self.next_indicator.as_deref().filter(|s| !s.is_empty()) {
            indicators.push((next, DateDirection::Next));
        }
        if let Some(previous) = self.previous_indicator.as_deref().filter(|s| !s.is_empty()) {
            indicators.push((previous, DateDirection::Previous));
        }
        indicators.sort_by_key(|(indicator, _)| std::cmp::Reverse(indicator.len()));

        let Some((rest, direction)) = indicators
            .iter()
            .find_map(|(indicator, direction)| value.strip_prefix(indicator).map(|r| (r, *direction)))
        else {
            return DateShape::Literal;
        };

        let Some((amount, unit)) = self.split_unit(rest) else {
            return DateShape::Malformed;
        };

        match amount.trim().parse::<u32>() {
            Ok(amount) => DateShape::Relative(RelativeDate {
                direction,
                amount,
                unit,
            }),
            Err(_) => DateShape::Malformed,
        }
    }

    /// Strip the longest unit suffix ending `value`.
    fn split_unit<'a>(&self, value: &'a str) -> Option<(&'a str, DateUnit)> {
        self.unit_suffixes
            .iter()
            .filter(|(suffix, _)| !suffix.is_empty() && value.ends_with(suffix.as_str()))
            .max_by_key(|(suffix, _)| suffix.len())
            .map(|(suffix, unit)| (&value[..value.len() - suffix.len()], *unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DateConfig {
        DateConfig {
            next_indicator: Some("next ".to_string()),
            previous_indicator: Some("last ".to_string()),
            unit_suffixes: vec![
                (" years".to_string(), DateUnit::Years),
                (" months".to_string(), DateUnit::Months),
                (" days".to_string(), DateUnit::Days),
                (" hours".to_string(), DateUnit::Hours),
            ],
        }
    }

    #[test]
    fn test_relative_next() {
        assert_eq!(
            config().shape("next 3 days"),
            DateShape::Relative(RelativeDate {
                direction: DateDirection::Next,
                amount: 3,
                unit: DateUnit::Days
            })
        );
    }

    #[test]
    fn test_relative_previous_clause() {
        let DateShape::Relative(date) = config().shape("last 2 months") else {
            panic!("expected relative date");
        };
        assert_eq!(date.clause("released"), "released:[NOW-2MONTHS TO NOW]");
    }

    #[test]
    fn test_malformed_amount() {
        assert_eq!(config().shape("next many days"), DateShape::Malformed);
        assert_eq!(config().shape("next 3 weeks"), DateShape::Malformed);
    }

    #[test]
    fn test_literal() {
        assert_eq!(config().shape("2024-01-01"), DateShape::Literal);
    }

    #[test]
    fn test_longest_unit_suffix_wins() {
        let config = DateConfig {
            next_indicator: Some("+".to_string()),
            previous_indicator: None,
            unit_suffixes: vec![
                ("s".to_string(), DateUnit::Hours),
                ("days".to_string(), DateUnit::Days),
            ],
        };
        assert_eq!(
            config.shape("+4days"),
            DateShape::Relative(RelativeDate {
                direction: DateDirection::Next,
                amount: 4,
                unit: DateUnit::Days
            })
        );
    }
}
