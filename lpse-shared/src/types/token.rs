//! Token types.
//!
//! A token is one parsed occurrence of a field's value in a single request.

use serde::{Deserialize, Serialize};

use super::operand::{QueryOperand, SortDirection};

/// Kind-specific detail carried by a token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TokenDetail {
    /// A single value with no extra structure.
    #[default]
    Value,

    /// A from/to range. The from value lives in [`Token::value`].
    Range {
        /// Upper bound of the range.
        to_value: String,
        /// Whether the range was encoded in one segment around an infix.
        has_infix: bool,
    },

    /// One key of a multi-key sort.
    Sort {
        /// Code of the field being sorted on.
        field_code: String,
        /// Sort direction.
        direction: SortDirection,
    },

    /// Free-text query, optionally restricted to a set of search fields.
    Query {
        /// Search field sub-codes restricting the query.
        search_codes: Vec<String>,
        /// Whether the text came from the query string rather than the path.
        overridden: bool,
    },

    /// The query operand.
    Operand {
        /// The selected operand.
        operand: QueryOperand,
    },
}

/// One parsed, request-scoped occurrence of a field's value.
///
/// An invalid token still records its code (it occupied a positional slot
/// while parsing) but never contributes to the query or the canonical URI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    /// The LPSE code this token belongs to.
    pub code: String,

    /// The raw, still URL-encoded segment(s) this token was read from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_value: Option<String>,

    /// The decoded value after prefix/suffix stripping and validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// False if decoding failed.
    pub is_valid: bool,

    /// Kind-specific detail.
    #[serde(default)]
    pub detail: TokenDetail,
}

impl Token {
    /// Create a valid single-value token.
    ///
    /// # Arguments
    ///
    /// * `code` - The LPSE code
    /// * `value` - The decoded value
    ///
    /// # Example
    ///
    /// ```
    /// use lpse_shared::Token;
    ///
    /// let token = Token::valid("b", "Acme");
    /// assert!(token.is_valid);
    /// assert_eq!(token.value.as_deref(), Some("Acme"));
    /// ```
    pub fn valid(code: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            raw_value: None,
            value: Some(value.into()),
            is_valid: true,
            detail: TokenDetail::Value,
        }
    }

    /// Create an invalid token for a code.
    pub fn invalid(code: impl Into<String>, raw_value: Option<String>) -> Self {
        Self {
            code: code.into(),
            raw_value,
            value: None,
            is_valid: false,
            detail: TokenDetail::Value,
        }
    }

    /// Create a valid range token.
    pub fn range(
        code: impl Into<String>,
        from_value: impl Into<String>,
        to_value: impl Into<String>,
        has_infix: bool,
    ) -> Self {
        Self {
            code: code.into(),
            raw_value: None,
            value: Some(from_value.into()),
            is_valid: true,
            detail: TokenDetail::Range {
                to_value: to_value.into(),
                has_infix,
            },
        }
    }

    /// Create a sort token.
    pub fn sort(
        code: impl Into<String>,
        field_code: impl Into<String>,
        direction: SortDirection,
    ) -> Self {
        Self {
            code: code.into(),
            raw_value: None,
            value: None,
            is_valid: true,
            detail: TokenDetail::Sort {
                field_code: field_code.into(),
                direction,
            },
        }
    }

    /// Create a query operand token.
    pub fn operand(code: impl Into<String>, operand: QueryOperand) -> Self {
        Self {
            code: code.into(),
            raw_value: None,
            value: Some(operand.uri_key().to_string()),
            is_valid: true,
            detail: TokenDetail::Operand { operand },
        }
    }

    /// Attach the raw segment this token was read from.
    pub fn with_raw_value(mut self, raw_value: impl Into<String>) -> Self {
        self.raw_value = Some(raw_value.into());
        self
    }

    /// Attach kind-specific detail.
    pub fn with_detail(mut self, detail: TokenDetail) -> Self {
        self.detail = detail;
        self
    }

    /// Mark the token invalid, dropping its decoded value.
    pub fn invalidate(mut self) -> Self {
        self.is_valid = false;
        self.value = None;
        self
    }

    /// The upper bound, if this is a range token.
    pub fn to_value(&self) -> Option<&str> {
        match &self.detail {
            TokenDetail::Range { to_value, .. } => Some(to_value),
            _ => None,
        }
    }

    /// Returns true if this token holds a from/to pair.
    pub fn is_range(&self) -> bool {
        matches!(self.detail, TokenDetail::Range { .. })
    }

    /// Returns true if this token's value came from the query string.
    pub fn is_overridden(&self) -> bool {
        matches!(
            self.detail,
            TokenDetail::Query {
                overridden: true,
                ..
            }
        )
    }

    /// Two valid tokens are equivalent when they select the same value.
    pub fn is_equivalent(&self, other: &Token) -> bool {
        self.code == other.code && self.value == other.value && self.detail == other.detail
    }
}
