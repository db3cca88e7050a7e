//! Query operand and sort direction types.
//!
//! Both are encoded in the LPSE code string as a single `+` or `-` character.

use serde::{Deserialize, Serialize};

/// The default boolean operator applied between free-text query terms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryOperand {
    /// All terms must match. Encoded as `+`.
    #[default]
    And,

    /// Any term may match. Encoded as `-`.
    Or,
}

impl QueryOperand {
    /// Parse an operand from its URI key (`+` or `-`).
    ///
    /// # Example
    ///
    /// ```
    /// use lpse_shared::QueryOperand;
    ///
    /// assert_eq!(QueryOperand::from_uri_key("-"), Some(QueryOperand::Or));
    /// assert_eq!(QueryOperand::from_uri_key("x"), None);
    /// ```
    pub fn from_uri_key(key: &str) -> Option<Self> {
        match key {
            "+" => Some(Self::And),
            "-" => Some(Self::Or),
            _ => None,
        }
    }

    /// The URI key for this operand.
    pub fn uri_key(&self) -> &'static str {
        match self {
            Self::And => "+",
            Self::Or => "-",
        }
    }

    /// The engine-level operator name (`AND` / `OR`).
    pub fn engine_value(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// The other operand.
    pub fn toggled(&self) -> Self {
        match self {
            Self::And => Self::Or,
            Self::Or => Self::And,
        }
    }
}

/// Direction of a single sort key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDirection {
    /// Encoded as `+`.
    Ascending,

    /// Encoded as `-`.
    #[default]
    Descending,
}

impl SortDirection {
    /// Parse a direction from its URI key (`+` or `-`).
    pub fn from_uri_key(key: &str) -> Option<Self> {
        match key {
            "+" => Some(Self::Ascending),
            "-" => Some(Self::Descending),
            _ => None,
        }
    }

    /// The URI key for this direction.
    pub fn uri_key(&self) -> &'static str {
        match self {
            Self::Ascending => "+",
            Self::Descending => "-",
        }
    }

    /// The engine-level direction name (`asc` / `desc`).
    pub fn engine_value(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    /// The opposite direction.
    pub fn inverse(&self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}
