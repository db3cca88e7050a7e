//! Collection configuration error types.
//!
//! A `ConfigError` is raised while building a [`Registry`](crate::Registry)
//! and prevents the collection from serving requests.

use thiserror::Error;

/// Fatal errors raised while building a collection registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A mandatory property is absent.
    #[error("Missing mandatory property '{0}'")]
    MissingProperty(String),

    /// A property is present but its value cannot be used.
    #[error("Invalid value for property '{key}': {reason}")]
    InvalidProperty { key: String, reason: String },

    /// A code does not have the collection's configured code length.
    #[error("LPSE code '{code}' has length {actual}, expected {expected}")]
    InvalidCodeLength {
        code: String,
        expected: usize,
        actual: usize,
    },

    /// The same code is declared by more than one property.
    #[error("Duplicate LPSE code '{0}'")]
    DuplicateCode(String),

    /// A facet is flagged as both an OR facet and a range facet.
    #[error("LPSE code '{0}' cannot be both an OR facet and a range facet")]
    ConflictingFacetKind(String),

    /// Mandatory parameter codes missing from the LPSE order.
    #[error("Mandatory LPSE codes missing from panl.lpse.order: {}", .0.join(", "))]
    MissingMandatoryCodes(Vec<String>),

    /// The property source could not be read.
    #[error("IO error: {0}")]
    Io(String),
}

impl ConfigError {
    /// Create a missing property error.
    pub fn missing_property(key: impl Into<String>) -> Self {
        Self::MissingProperty(key.into())
    }

    /// Create an invalid property error.
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidProperty {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid code length error.
    pub fn code_length(code: &str, expected: usize) -> Self {
        Self::InvalidCodeLength {
            code: code.to_string(),
            expected,
            actual: code.chars().count(),
        }
    }

    /// Create a duplicate code error.
    pub fn duplicate_code(code: impl Into<String>) -> Self {
        Self::DuplicateCode(code.into())
    }

    /// Create an IO error.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_length_counts_characters() {
        let err = ConfigError::code_length("abc", 2);
        assert_eq!(
            err,
            ConfigError::InvalidCodeLength {
                code: "abc".to_string(),
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn test_missing_mandatory_codes_message() {
        let err = ConfigError::MissingMandatoryCodes(vec!["p".to_string(), "n".to_string()]);
        assert_eq!(
            err.to_string(),
            "Mandatory LPSE codes missing from panl.lpse.order: p, n"
        );
    }
}
