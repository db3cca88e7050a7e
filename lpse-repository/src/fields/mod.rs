//! Field definitions.
//!
//! Every LPSE code maps to one [`FieldDefinition`], whose [`FieldKind`] holds
//! the kind-specific configuration. Decoding, encoding, query directives and
//! canonical fragments are implemented once here as exhaustive matches over
//! the kind.

pub mod boolean;
pub mod date;
pub mod facet;
pub mod param;
pub mod range;
mod validation;

use serde::Serialize;

use lpse_shared::{QueryDirective, QueryOperand, SortClause, Token, TokenDetail, TokenMap};

use crate::config::CollectionSettings;
use crate::utils::{quote, url_decode, url_encode};

pub use boolean::BooleanConfig;
pub use date::{DateConfig, DateShape, DateUnit};
pub use facet::{OrFacetConfig, RegularFacetConfig};
pub use param::{QueryConfig, SearchField, SortConfig, SortableField};
pub use range::RangeConfig;
pub use validation::ValidationKind;

/// How the page field renders while building a canonical URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Keep the incoming page.
    #[default]
    Preserve,
    /// The request state changed; always return to page one.
    ResetPage,
}

/// Request-wide values some directives depend on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectiveContext {
    /// Rows per page in effect.
    pub rows: u32,
    /// One-based page number in effect.
    pub page: u64,
    /// Query operand in effect.
    pub operand: QueryOperand,
}

/// Kind-specific configuration of a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// A backing field that can be sorted on or returned, never filtered.
    Plain,
    RegularFacet(RegularFacetConfig),
    OrFacet(OrFacetConfig),
    RangeFacet(RangeConfig),
    BooleanFacet(BooleanConfig),
    DateFacet(DateConfig),
    DateRangeFacet(DateConfig),
    Query(QueryConfig),
    Sort(SortConfig),
    Page,
    NumRows,
    QueryOperand,
    PassThrough,
}

impl FieldKind {
    /// Human readable kind name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Plain => "Plain",
            Self::RegularFacet(_) => "RegularFacet",
            Self::OrFacet(_) => "OrFacet",
            Self::RangeFacet(_) => "RangeFacet",
            Self::BooleanFacet(_) => "BooleanFacet",
            Self::DateFacet(_) => "DateFacet",
            Self::DateRangeFacet(_) => "DateRangeFacet",
            Self::Query(_) => "Query",
            Self::Sort(_) => "Sort",
            Self::Page => "Page",
            Self::NumRows => "NumRows",
            Self::QueryOperand => "QueryOperand",
            Self::PassThrough => "PassThrough",
        }
    }

    /// Returns true for every facet kind.
    pub fn is_facet(&self) -> bool {
        matches!(
            self,
            Self::RegularFacet(_)
                | Self::OrFacet(_)
                | Self::RangeFacet(_)
                | Self::BooleanFacet(_)
                | Self::DateFacet(_)
                | Self::DateRangeFacet(_)
        )
    }

    /// Returns true if the field's values can be listed as available facets.
    pub fn is_enumerable(&self) -> bool {
        match self {
            Self::RangeFacet(config) => !config.suppress,
            Self::DateRangeFacet(_) => false,
            other => other.is_facet(),
        }
    }

    /// Returns true if at most one value per request is honoured.
    pub fn is_single_valued(&self) -> bool {
        matches!(
            self,
            Self::RangeFacet(_)
                | Self::BooleanFacet(_)
                | Self::DateRangeFacet(_)
                | Self::Query(_)
                | Self::Page
                | Self::NumRows
                | Self::QueryOperand
                | Self::PassThrough
        )
    }
}

/// An immutable field definition, built once per collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDefinition {
    /// The LPSE code.
    pub code: String,

    /// Backing field name in the search index, or the parameter role for
    /// parameter fields.
    pub backing_name: String,

    /// Human readable name.
    pub display_name: String,

    /// Literal before every encoded value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Literal after every encoded value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    /// How decoded values are validated.
    pub validation: ValidationKind,

    /// Kind-specific configuration.
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldDefinition {
    /// Create a field definition with no affixes and no validation.
    ///
    /// The display name defaults to the backing name.
    pub fn new(code: impl Into<String>, backing_name: impl Into<String>, kind: FieldKind) -> Self {
        let backing_name = backing_name.into();
        Self {
            code: code.into(),
            display_name: backing_name.clone(),
            backing_name,
            prefix: None,
            suffix: None,
            validation: ValidationKind::None,
            kind,
        }
    }

    /// Set the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Set the value prefix and suffix. Empty literals count as absent.
    pub fn with_affixes(mut self, prefix: Option<String>, suffix: Option<String>) -> Self {
        self.prefix = prefix.filter(|p| !p.is_empty());
        self.suffix = suffix.filter(|s| !s.is_empty());
        self
    }

    /// Set the validation kind.
    pub fn with_validation(mut self, validation: ValidationKind) -> Self {
        self.validation = validation;
        self
    }

    /// Returns true if the field reads a positional value segment.
    pub fn consumes_segment(&self) -> bool {
        !matches!(
            self.kind,
            FieldKind::Plain | FieldKind::Sort(_) | FieldKind::QueryOperand
        )
    }

    /// The separator that packs several values into one segment, if any.
    pub fn value_separator(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::OrFacet(config) => config.separator.as_deref(),
            FieldKind::RegularFacet(config) => config.multivalue_separator.as_deref(),
            _ => None,
        }
    }

    /// Strip the configured prefix and suffix, failing if either is absent.
    pub fn strip_affixes<'a>(&self, value: &'a str) -> Option<&'a str> {
        let value = match self.prefix.as_deref() {
            Some(prefix) => value.strip_prefix(prefix)?,
            None => value,
        };
        match self.suffix.as_deref() {
            Some(suffix) => value.strip_suffix(suffix),
            None => Some(value),
        }
    }

    /// Wrap a value in the configured prefix and suffix.
    pub fn wrap_affixes(&self, value: &str) -> String {
        format!(
            "{}{}{}",
            self.prefix.as_deref().unwrap_or(""),
            value,
            self.suffix.as_deref().unwrap_or("")
        )
    }

    fn validate(&self, value: &str, settings: &CollectionSettings) -> Option<String> {
        self.validation.validate(value, settings.decimal_separator())
    }

    /// Decode one raw URL segment.
    ///
    /// # Returns
    ///
    /// The decoded value, or `None` when the segment is invalid for this field.
    pub fn decode(&self, raw: &str, settings: &CollectionSettings) -> Option<String> {
        let decoded = url_decode(raw)?;
        self.decode_value(&decoded, settings)
    }

    /// Decode an already URL-decoded value.
    pub fn decode_value(&self, decoded: &str, settings: &CollectionSettings) -> Option<String> {
        match &self.kind {
            FieldKind::Plain | FieldKind::Sort(_) => None,
            FieldKind::RegularFacet(_) | FieldKind::OrFacet(_) => {
                self.validate(self.strip_affixes(decoded)?, settings)
            }
            FieldKind::RangeFacet(config) => {
                let inner = match config.resolve_min(decoded).or_else(|| config.resolve_max(decoded)) {
                    Some(bound) => bound,
                    None => self.strip_affixes(decoded)?,
                };
                self.validate(inner, settings)
            }
            FieldKind::BooleanFacet(config) => {
                config.decode(self.strip_affixes(decoded)?).map(str::to_string)
            }
            FieldKind::DateFacet(config) | FieldKind::DateRangeFacet(config) => {
                let inner = self.strip_affixes(decoded)?;
                match config.shape(inner) {
                    DateShape::Literal => self.validate(inner, settings),
                    DateShape::Relative(_) => Some(inner.to_string()),
                    DateShape::Malformed => None,
                }
            }
            FieldKind::Query(_) => {
                let inner = self.strip_affixes(decoded)?;
                (!inner.trim().is_empty()).then(|| inner.to_string())
            }
            FieldKind::Page => {
                let number = ValidationKind::Number.validate(self.strip_affixes(decoded)?, '.')?;
                let page = number.parse::<i64>().ok()?;
                Some(page.max(1).to_string())
            }
            FieldKind::NumRows => {
                let number = ValidationKind::Number.validate(self.strip_affixes(decoded)?, '.')?;
                let rows = number.parse::<i64>().ok().filter(|&n| n > 0)?;
                Some(rows.min(i64::from(settings.max_results_per_page)).to_string())
            }
            FieldKind::QueryOperand => {
                QueryOperand::from_uri_key(decoded).map(|op| op.uri_key().to_string())
            }
            FieldKind::PassThrough => (!decoded.is_empty()).then(|| decoded.to_string()),
        }
    }

    /// Decode a segment that may pack several values around a separator.
    ///
    /// Fields without a separator decode to exactly one entry.
    pub fn decode_many(&self, raw: &str, settings: &CollectionSettings) -> Vec<Option<String>> {
        let Some(separator) = self.value_separator() else {
            return vec![self.decode(raw, settings)];
        };
        let Some(decoded) = url_decode(raw) else {
            return vec![None];
        };
        let values: Vec<Option<String>> = facet::split_values(&decoded, separator)
            .map(|part| self.decode_value(part, settings))
            .collect();
        if values.is_empty() {
            vec![None]
        } else {
            values
        }
    }

    /// Decode a range pair split across two segments.
    pub fn decode_range_pair(
        &self,
        from_raw: &str,
        to_raw: &str,
        settings: &CollectionSettings,
    ) -> Option<(String, String)> {
        let FieldKind::RangeFacet(config) = &self.kind else {
            return None;
        };
        let from_decoded = url_decode(from_raw)?;
        let to_decoded = url_decode(to_raw)?;

        let from = match config.resolve_min(&from_decoded) {
            Some(min) => min,
            None => self.strip_affixes(&from_decoded)?,
        };
        let to = match config.resolve_max(&to_decoded) {
            Some(max) => max,
            None => self.strip_affixes(&to_decoded)?,
        };

        Some((self.validate(from, settings)?, self.validate(to, settings)?))
    }

    /// Decode a range pair sharing one segment around the infix.
    pub fn decode_range_infixed(
        &self,
        raw: &str,
        settings: &CollectionSettings,
    ) -> Option<(String, String)> {
        let FieldKind::RangeFacet(config) = &self.kind else {
            return None;
        };
        let decoded = url_decode(raw)?;
        let (from, to) =
            config.split_infixed(&decoded, self.prefix.as_deref(), self.suffix.as_deref())?;
        Some((self.validate(from, settings)?, self.validate(to, settings)?))
    }

    /// Encode one value as a URL segment.
    pub fn encode(&self, value: &str) -> String {
        match &self.kind {
            FieldKind::BooleanFacet(config) => url_encode(&self.wrap_affixes(config.encode(value))),
            FieldKind::QueryOperand => value.to_string(),
            FieldKind::PassThrough => url_encode(value),
            _ => url_encode(&self.wrap_affixes(value)),
        }
    }

    /// Encode a range pair as one or two URL segments.
    pub fn encode_range(&self, from: &str, to: &str) -> Vec<String> {
        let FieldKind::RangeFacet(config) = &self.kind else {
            return vec![self.encode(from)];
        };
        if let Some(joined) =
            config.join_infixed(from, to, self.prefix.as_deref(), self.suffix.as_deref())
        {
            return vec![url_encode(&joined)];
        }
        let from = match config.from_replacement(from) {
            Some(replacement) => url_encode(replacement),
            None => self.encode(from),
        };
        let to = match config.to_replacement(to) {
            Some(replacement) => url_encode(replacement),
            None => self.encode(to),
        };
        vec![from, to]
    }

    /// The query directives contributed by this field's tokens.
    ///
    /// Page, row count and operand always contribute, from `context`; every
    /// other kind contributes nothing when it has no valid token.
    pub fn to_query_directives(
        &self,
        tokens: &TokenMap,
        context: &DirectiveContext,
    ) -> Vec<QueryDirective> {
        let field = self.backing_name.as_str();
        let values: Vec<&str> = unique_valid(tokens, &self.code)
            .iter()
            .filter_map(|t| t.value.as_deref())
            .collect();

        match &self.kind {
            FieldKind::Plain | FieldKind::PassThrough => Vec::new(),
            FieldKind::RegularFacet(_) => values
                .iter()
                .map(|v| QueryDirective::filter(field, format!("{}:{}", field, quote(v))))
                .collect(),
            FieldKind::OrFacet(_) => {
                if values.is_empty() {
                    return Vec::new();
                }
                let quoted: Vec<String> = values.iter().map(|v| quote(v)).collect();
                vec![QueryDirective::filter(field, facet::or_clause(field, &quoted))]
            }
            FieldKind::RangeFacet(config) => tokens
                .first_valid(&self.code)
                .and_then(|token| {
                    let from = token.value.as_deref()?;
                    let clause = match token.to_value() {
                        Some(to) => config.clause(field, from, to),
                        None => format!("{}:{}", field, quote(from)),
                    };
                    Some(vec![QueryDirective::filter(field, clause)])
                })
                .unwrap_or_default(),
            FieldKind::BooleanFacet(_) => values
                .first()
                .map(|v| vec![QueryDirective::filter(field, format!("{}:{}", field, quote(v)))])
                .unwrap_or_default(),
            FieldKind::DateFacet(config) => values
                .iter()
                .map(|v| QueryDirective::filter(field, date_clause(config, field, v)))
                .collect(),
            FieldKind::DateRangeFacet(config) => values
                .first()
                .map(|v| vec![QueryDirective::filter(field, date_clause(config, field, v))])
                .unwrap_or_default(),
            FieldKind::Query(config) => tokens
                .first_valid(&self.code)
                .and_then(|token| {
                    let text = token.value.as_deref()?;
                    let search_codes = search_codes(token);
                    let fields = search_codes
                        .iter()
                        .filter_map(|code| config.search_field(code))
                        .map(|f| f.backing_name.clone())
                        .collect();
                    Some(vec![QueryDirective::Query {
                        q: config.expression(text, search_codes, context.operand),
                        fields,
                    }])
                })
                .unwrap_or_default(),
            FieldKind::Sort(config) => {
                let clauses: Vec<SortClause> = tokens
                    .get(&self.code)
                    .iter()
                    .map_while(|token| match (&token.detail, token.is_valid) {
                        (TokenDetail::Sort { field_code, direction }, true) => {
                            config.field(field_code).map(|f| SortClause {
                                field: f.backing_name.clone(),
                                direction: *direction,
                            })
                        }
                        _ => None,
                    })
                    .collect();
                if clauses.is_empty() {
                    Vec::new()
                } else {
                    vec![QueryDirective::Sort(clauses)]
                }
            }
            FieldKind::Page => vec![QueryDirective::Start(
                context
                    .page
                    .saturating_sub(1)
                    .saturating_mul(u64::from(context.rows)),
            )],
            FieldKind::NumRows => vec![QueryDirective::Rows(context.rows)],
            FieldKind::QueryOperand => vec![QueryDirective::Operand(context.operand)],
        }
    }

    /// The value segments this field contributes to a canonical URI, each
    /// terminated by `/`.
    pub fn canonical_value_fragment(
        &self,
        tokens: &TokenMap,
        settings: &CollectionSettings,
        mode: BuildMode,
    ) -> String {
        self.canonical_parts(tokens, settings, mode)
            .0
            .iter()
            .map(|segment| format!("{}/", segment))
            .collect()
    }

    /// The codes this field contributes to a canonical URI's code string.
    pub fn canonical_code_fragment(
        &self,
        tokens: &TokenMap,
        settings: &CollectionSettings,
        mode: BuildMode,
    ) -> String {
        self.canonical_parts(tokens, settings, mode).1
    }

    fn canonical_parts(
        &self,
        tokens: &TokenMap,
        settings: &CollectionSettings,
        mode: BuildMode,
    ) -> (Vec<String>, String) {
        let code = self.code.as_str();
        let valid = unique_valid(tokens, code);
        let first = valid.first().copied();
        let first_value = first.and_then(|t| t.value.as_deref());
        let empty = (Vec::new(), String::new());

        match &self.kind {
            FieldKind::Plain => empty,
            FieldKind::RegularFacet(RegularFacetConfig {
                multivalue_separator: Some(separator),
                ..
            }) => {
                let wrapped: Vec<String> = valid
                    .iter()
                    .filter_map(|t| t.value.as_deref())
                    .map(|v| self.wrap_affixes(v))
                    .collect();
                if wrapped.is_empty() {
                    empty
                } else {
                    (vec![url_encode(&wrapped.join(separator.as_str()))], code.to_string())
                }
            }
            FieldKind::RegularFacet(_) | FieldKind::OrFacet(_) | FieldKind::DateFacet(_) => {
                let segments: Vec<String> = valid
                    .iter()
                    .filter_map(|t| t.value.as_deref())
                    .map(|v| self.encode(v))
                    .collect();
                let codes = code.repeat(segments.len());
                (segments, codes)
            }
            FieldKind::RangeFacet(config) => match first {
                Some(token) => match (token.value.as_deref(), token.to_value()) {
                    (Some(from), Some(to)) => {
                        let designator = if config.has_infix() { "-" } else { "+" };
                        (
                            self.encode_range(from, to),
                            format!("{}{}{}", code, designator, code),
                        )
                    }
                    (Some(value), None) => (vec![self.encode(value)], code.to_string()),
                    _ => empty,
                },
                None => empty,
            },
            FieldKind::BooleanFacet(_) | FieldKind::DateRangeFacet(_) => match first_value {
                Some(value) => (vec![self.encode(value)], code.to_string()),
                None => empty,
            },
            FieldKind::Query(_) => match (first, first_value) {
                (Some(token), Some(value)) => {
                    let search_codes = search_codes(token);
                    let codes = if search_codes.is_empty() {
                        code.to_string()
                    } else {
                        format!("{}.{}.", code, search_codes.concat())
                    };
                    (vec![self.encode(value)], codes)
                }
                _ => empty,
            },
            FieldKind::Sort(_) => {
                let all = tokens.get(code);
                if all.is_empty() || all.iter().any(|t| !t.is_valid) {
                    return empty;
                }
                let codes = all
                    .iter()
                    .filter_map(|t| match &t.detail {
                        TokenDetail::Sort { field_code, direction } => {
                            Some(format!("{}{}{}", code, field_code, direction.uri_key()))
                        }
                        _ => None,
                    })
                    .collect();
                (Vec::new(), codes)
            }
            FieldKind::Page => {
                if mode == BuildMode::ResetPage {
                    return empty;
                }
                match first_value.and_then(|v| v.parse::<u64>().ok()) {
                    Some(page) if page > 1 => (vec![self.encode(&page.to_string())], code.to_string()),
                    _ => empty,
                }
            }
            FieldKind::NumRows => match first_value.and_then(|v| v.parse::<u32>().ok()) {
                Some(rows) if rows != settings.results_per_page => {
                    (vec![self.encode(&rows.to_string())], code.to_string())
                }
                _ => empty,
            },
            FieldKind::QueryOperand => {
                match first_value.and_then(QueryOperand::from_uri_key) {
                    Some(operand) if operand != settings.default_operand => {
                        (Vec::new(), format!("{}{}", code, operand.uri_key()))
                    }
                    _ => empty,
                }
            }
            FieldKind::PassThrough => match first_value {
                Some(value) if settings.passthrough_canonical => {
                    (vec![self.encode(value)], code.to_string())
                }
                _ => empty,
            },
        }
    }

    /// Describe this field's configuration for operators.
    pub fn explain(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "FIELD CONFIG [ {} ] LPSE code '{}' backing field '{}' display name '{}'.",
            self.kind.name(),
            self.code,
            self.backing_name,
            self.display_name
        )];

        if self.prefix.is_some() || self.suffix.is_some() {
            lines.push(format!(
                "  Value prefix '{}', suffix '{}'.",
                self.prefix.as_deref().unwrap_or(""),
                self.suffix.as_deref().unwrap_or("")
            ));
        }
        if self.validation != ValidationKind::None {
            lines.push(format!("  Values validated as {:?}.", self.validation));
        }

        match &self.kind {
            FieldKind::Plain => {
                lines.push("  Sortable or returnable only, never read from the URI.".to_string())
            }
            FieldKind::RegularFacet(config) => {
                if let Some(separator) = &config.multivalue_separator {
                    lines.push(format!("  Multiple values share one segment, separated by '{}'.", separator));
                }
            }
            FieldKind::OrFacet(config) => {
                lines.push("  Values are ORed together.".to_string());
                if let Some(separator) = &config.separator {
                    lines.push(format!("  Incoming values may be separated by '{}'.", separator));
                }
                if config.always_or {
                    lines.push("  Zero-count values are always requested.".to_string());
                }
            }
            FieldKind::RangeFacet(config) => {
                lines.push(format!(
                    "  Range min '{}' max '{}', {}.",
                    config.min.as_deref().unwrap_or(""),
                    config.max.as_deref().unwrap_or(""),
                    match &config.infix {
                        Some(infix) => format!("infix '{}'", infix),
                        None => "pairs split across two segments".to_string(),
                    }
                ));
            }
            FieldKind::BooleanFacet(config) => {
                lines.push(format!(
                    "  true encoded as '{}', false encoded as '{}'.",
                    config.encode("true"),
                    config.encode("false")
                ));
            }
            FieldKind::DateFacet(config) | FieldKind::DateRangeFacet(config) => {
                if config.supports_relative() {
                    let units: Vec<String> = config
                        .unit_suffixes
                        .iter()
                        .map(|(suffix, unit)| format!("'{}'={}", suffix, unit.engine_value()))
                        .collect();
                    lines.push(format!(
                        "  Relative values: next '{}', previous '{}', units {}.",
                        config.next_indicator.as_deref().unwrap_or(""),
                        config.previous_indicator.as_deref().unwrap_or(""),
                        units.join(", ")
                    ));
                }
            }
            FieldKind::Query(config) => {
                for field in &config.search_fields {
                    lines.push(format!(
                        "  Search code '{}' restricts to '{}' (boost {}).",
                        field.code, field.backing_name, field.boost
                    ));
                }
            }
            FieldKind::Sort(config) => {
                for field in &config.fields {
                    lines.push(format!(
                        "  Sortable by '{}' via code '{}'.",
                        field.backing_name, field.code
                    ));
                }
            }
            FieldKind::Page => {
                lines.push("  Page number, omitted from canonical URIs when 1.".to_string())
            }
            FieldKind::NumRows => lines.push(
                "  Rows per page, omitted from canonical URIs when the default.".to_string(),
            ),
            FieldKind::QueryOperand => lines.push(
                "  '+' for AND, '-' for OR; omitted from canonical URIs when the default."
                    .to_string(),
            ),
            FieldKind::PassThrough => {
                lines.push("  Passed through untouched, never applied to the query.".to_string())
            }
        }

        lines
    }

    /// Describe how one token was parsed.
    pub fn explain_token(&self, token: &Token) -> String {
        let status = if token.is_valid {
            "[  VALID  ]"
        } else {
            "[ INVALID ]"
        };
        let detail = match &token.detail {
            TokenDetail::Range { to_value, has_infix } => format!(
                " range to '{}'{}",
                to_value,
                if *has_infix { " (infix)" } else { "" }
            ),
            TokenDetail::Sort { field_code, direction } => format!(
                " sort code '{}' {}",
                field_code,
                direction.engine_value()
            ),
            TokenDetail::Query {
                search_codes,
                overridden,
            } => format!(
                "{}{}",
                if search_codes.is_empty() {
                    String::new()
                } else {
                    format!(" search codes '{}'", search_codes.concat())
                },
                if *overridden {
                    " (overridden by query parameter)"
                } else {
                    ""
                }
            ),
            TokenDetail::Operand { operand } => format!(" (q.op={})", operand.engine_value()),
            TokenDetail::Value => String::new(),
        };

        format!(
            "PANL {} <{}> LPSE code '{}' backing field '{}' value '{}'{}, incoming value '{}'.",
            status,
            self.kind.name(),
            token.code,
            self.backing_name,
            token.value.as_deref().unwrap_or(""),
            detail,
            token.raw_value.as_deref().unwrap_or("")
        )
    }
}

/// Valid tokens for a code with equivalent duplicates removed.
fn unique_valid<'a>(tokens: &'a TokenMap, code: &str) -> Vec<&'a Token> {
    let mut unique: Vec<&Token> = Vec::new();
    for token in tokens.valid(code) {
        if !unique.iter().any(|u| u.is_equivalent(token)) {
            unique.push(token);
        }
    }
    unique
}

fn search_codes(token: &Token) -> &[String] {
    match &token.detail {
        TokenDetail::Query { search_codes, .. } => search_codes,
        _ => &[],
    }
}

fn date_clause(config: &DateConfig, field: &str, value: &str) -> String {
    match config.shape(value) {
        DateShape::Relative(relative) => relative.clause(field),
        _ => format!("{}:{}", field, quote(value)),
    }
}
