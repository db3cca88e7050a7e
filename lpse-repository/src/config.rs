//! Collection-wide settings.
//!
//! These are the settings shared by every field of a collection, parsed once
//! from the collection's properties and carried on the [`Registry`](crate::Registry).

use lpse_shared::QueryOperand;
use serde::Serialize;

use crate::errors::ConfigError;
use crate::properties::Properties;

pub const PROPERTY_LPSE_LENGTH: &str = "panl.lpse.length";
pub const PROPERTY_DEFAULT_OPERAND: &str = "solr.default.query.operand";
pub const PROPERTY_FACET_MIN_COUNT: &str = "solr.facet.min.count";
pub const PROPERTY_NUMROWS_DEFAULT: &str = "solr.numrows.default";
pub const PROPERTY_NUMROWS_MAXIMUM: &str = "solr.numrows.maximum";
pub const PROPERTY_NUMROWS_LOOKAHEAD: &str = "solr.numrows.lookahead";
pub const PROPERTY_FACET_LIMIT: &str = "solr.facet.limit";
pub const PROPERTY_QUERY_RESPOND_TO: &str = "panl.form.query.respondto";
pub const PROPERTY_DECIMAL_POINT: &str = "panl.decimal.point";
pub const PROPERTY_INCLUDE_SINGLE_FACETS: &str = "panl.include.single.facets";
pub const PROPERTY_INCLUDE_SAME_NUMBER_FACETS: &str = "panl.include.same.number.facets";
pub const PROPERTY_PASSTHROUGH_CANONICAL: &str = "panl.param.passthrough.canonical";

/// Default minimum facet count.
const DEFAULT_FACET_MIN_COUNT: u32 = 1;

/// Default number of results per page.
const DEFAULT_RESULTS_PER_PAGE: u32 = 10;

/// Default upper bound on results per page.
const DEFAULT_MAX_RESULTS_PER_PAGE: u32 = 1000;

/// Default number of rows for a lookahead query.
const DEFAULT_LOOKAHEAD_ROWS: u32 = 5;

/// Default maximum number of values per facet.
const DEFAULT_FACET_LIMIT: u32 = 100;

/// Default query-string parameter carrying free text.
const DEFAULT_QUERY_RESPOND_TO: &str = "q";

/// Settings shared by every field of one collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionSettings {
    /// Length of every LPSE code.
    pub lpse_length: usize,

    /// Operand used when a request does not carry one.
    pub default_operand: QueryOperand,

    /// Collection-wide minimum facet count.
    pub facet_min_count: u32,

    /// Rows per page when a request does not carry a row count.
    pub results_per_page: u32,

    /// Upper bound for a requested row count.
    pub max_results_per_page: u32,

    /// Rows returned by a lookahead query.
    pub lookahead_rows: u32,

    /// Maximum number of values per facet.
    pub facet_limit: u32,

    /// Query-string parameter that overrides the free-text query.
    pub query_respond_to: String,

    /// `true` when `.` is the decimal separator, `false` for `,`.
    pub decimal_point: bool,

    /// Keep a facet whose only remaining value is listed.
    pub include_single_facets: bool,

    /// Keep facet values whose count equals the number of results.
    pub include_same_number_facets: bool,

    /// Emit pass-through values in the canonical URI.
    pub passthrough_canonical: bool,
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            lpse_length: 1,
            default_operand: QueryOperand::And,
            facet_min_count: DEFAULT_FACET_MIN_COUNT,
            results_per_page: DEFAULT_RESULTS_PER_PAGE,
            max_results_per_page: DEFAULT_MAX_RESULTS_PER_PAGE,
            lookahead_rows: DEFAULT_LOOKAHEAD_ROWS,
            facet_limit: DEFAULT_FACET_LIMIT,
            query_respond_to: DEFAULT_QUERY_RESPOND_TO.to_string(),
            decimal_point: true,
            include_single_facets: false,
            include_same_number_facets: false,
            passthrough_canonical: false,
        }
    }
}

impl CollectionSettings {
    /// Parse the collection-wide settings.
    ///
    /// # Arguments
    ///
    /// * `properties` - The collection's properties
    ///
    /// # Returns
    ///
    /// * `Ok(CollectionSettings)` - The parsed settings
    /// * `Err(ConfigError)` - If `panl.lpse.length` is missing or any value is malformed
    pub fn from_properties(properties: &Properties) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let lpse_length = properties
            .get_parsed::<usize>(PROPERTY_LPSE_LENGTH)?
            .ok_or_else(|| ConfigError::missing_property(PROPERTY_LPSE_LENGTH))?;
        if lpse_length == 0 {
            return Err(ConfigError::invalid(
                PROPERTY_LPSE_LENGTH,
                "must be greater than zero",
            ));
        }

        let default_operand = match properties.get_non_blank(PROPERTY_DEFAULT_OPERAND) {
            Some(key) => QueryOperand::from_uri_key(key).ok_or_else(|| {
                ConfigError::invalid(PROPERTY_DEFAULT_OPERAND, "must be '+' or '-'")
            })?,
            None => defaults.default_operand,
        };

        let results_per_page = properties
            .get_parsed::<u32>(PROPERTY_NUMROWS_DEFAULT)?
            .unwrap_or(defaults.results_per_page);
        let max_results_per_page = properties
            .get_parsed::<u32>(PROPERTY_NUMROWS_MAXIMUM)?
            .unwrap_or(defaults.max_results_per_page);
        if results_per_page == 0 || results_per_page > max_results_per_page {
            return Err(ConfigError::invalid(
                PROPERTY_NUMROWS_DEFAULT,
                format!("must be between 1 and {}", max_results_per_page),
            ));
        }

        Ok(Self {
            lpse_length,
            default_operand,
            facet_min_count: properties
                .get_parsed(PROPERTY_FACET_MIN_COUNT)?
                .unwrap_or(defaults.facet_min_count),
            results_per_page,
            max_results_per_page,
            lookahead_rows: properties
                .get_parsed(PROPERTY_NUMROWS_LOOKAHEAD)?
                .unwrap_or(defaults.lookahead_rows),
            facet_limit: properties
                .get_parsed(PROPERTY_FACET_LIMIT)?
                .unwrap_or(defaults.facet_limit),
            query_respond_to: properties
                .get_non_blank(PROPERTY_QUERY_RESPOND_TO)
                .map(str::to_string)
                .unwrap_or(defaults.query_respond_to),
            decimal_point: properties.get_bool(PROPERTY_DECIMAL_POINT, defaults.decimal_point),
            include_single_facets: properties.get_bool(
                PROPERTY_INCLUDE_SINGLE_FACETS,
                defaults.include_single_facets,
            ),
            include_same_number_facets: properties.get_bool(
                PROPERTY_INCLUDE_SAME_NUMBER_FACETS,
                defaults.include_same_number_facets,
            ),
            passthrough_canonical: properties.get_bool(
                PROPERTY_PASSTHROUGH_CANONICAL,
                defaults.passthrough_canonical,
            ),
        })
    }

    /// The decimal separator character.
    pub fn decimal_separator(&self) -> char {
        if self.decimal_point {
            '.'
        } else {
            ','
        }
    }
}

/// Configuration for the [`LpseService`](crate::LpseService).
#[derive(Debug, Clone)]
pub struct LpseServiceConfig {
    /// Attach per-token explanations to every resolution.
    pub explain: bool,
}

impl Default for LpseServiceConfig {
    fn default() -> Self {
        Self { explain: true }
    }
}

impl LpseServiceConfig {
    /// Create a config that skips explanations.
    pub fn quiet() -> Self {
        Self { explain: false }
    }
}
