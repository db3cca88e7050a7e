//! The LPSE tokeniser.
//!
//! A path has the shape `/<collection>/<fieldset>/<value>*/<codes>/`. The
//! code string is walked in chunks of the collection's code length and each
//! code consumes its value segments from the left. A failure never aborts the
//! parse: the offending code gets an invalid token and parsing carries on.

use tracing::debug;
use url::form_urlencoded;

use lpse_shared::{QueryOperand, SortDirection, Token, TokenDetail, TokenMap};

use crate::fields::{FieldDefinition, FieldKind};
use crate::registry::Registry;
use crate::types::ParsedRequest;
use crate::utils::split_chars;

/// Positional value segments, consumed strictly left to right.
struct Segments<'a> {
    values: &'a [&'a str],
    cursor: usize,
}

impl<'a> Segments<'a> {
    fn next(&mut self) -> Option<&'a str> {
        let segment = self.values.get(self.cursor).copied();
        if segment.is_some() {
            self.cursor += 1;
        }
        segment
    }
}

/// Parse an LPSE path and optional query string against a registry.
///
/// # Arguments
///
/// * `path` - The URL path, starting with the collection URI
/// * `query_string` - The raw query string, without the leading `?`
/// * `registry` - The collection's registry
///
/// # Returns
///
/// The parsed request. Unknown fieldsets resolve to the default fieldset.
pub fn parse(path: &str, query_string: Option<&str>, registry: &Registry) -> ParsedRequest {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let fieldset = registry
        .fieldset(segments.get(1).copied().unwrap_or_default())
        .0
        .to_string();

    let mut tokens = TokenMap::new();
    if segments.len() >= 3 {
        let code_string = segments[segments.len() - 1];
        let mut values = Segments {
            values: &segments[2..segments.len() - 1],
            cursor: 0,
        };
        walk(code_string, &mut values, registry, &mut tokens);

        if values.cursor < values.values.len() {
            debug!(
                unused = values.values.len() - values.cursor,
                "Value segments left over after the code string"
            );
        }
    }

    let query_overridden = match query_string {
        Some(query_string) => apply_query_override(query_string, registry, &mut tokens),
        None => false,
    };

    ParsedRequest {
        fieldset,
        tokens,
        query_overridden,
    }
}

fn walk(code_string: &str, values: &mut Segments<'_>, registry: &Registry, tokens: &mut TokenMap) {
    let length = registry.settings().lpse_length;
    let mut rest = code_string;

    while !rest.is_empty() {
        let (code, tail) = split_chars(rest, length);
        rest = tail;

        let Some(definition) = registry.definition(code) else {
            debug!(code, "Unknown LPSE code");
            tokens.push(Token::invalid(code, None));
            continue;
        };

        let parsed = match &definition.kind {
            FieldKind::Plain => vec![Token::invalid(code, None)],
            FieldKind::Sort(config) => {
                let (field_code, tail) = split_chars(rest, length);
                let (designator, tail) = split_chars(tail, 1);
                rest = tail;

                let direction = SortDirection::from_uri_key(designator);
                let token = Token::sort(code, field_code, direction.unwrap_or_default())
                    .with_raw_value(format!("{}{}", field_code, designator));
                if direction.is_some() && config.field(field_code).is_some() {
                    vec![token]
                } else {
                    vec![token.invalidate()]
                }
            }
            FieldKind::QueryOperand => {
                let (designator, tail) = split_chars(rest, 1);
                rest = tail;
                match QueryOperand::from_uri_key(designator) {
                    Some(operand) => vec![Token::operand(code, operand)],
                    None => vec![Token::invalid(code, Some(designator.to_string()))],
                }
            }
            FieldKind::RangeFacet(_) => {
                let (designator, tail) = split_chars(rest, 1);
                let (second, after) = split_chars(tail, length);
                if (designator == "+" || designator == "-") && second == code {
                    rest = after;
                    vec![range_token(definition, designator == "-", values, registry)]
                } else {
                    vec![single_token(definition, values, registry)]
                }
            }
            FieldKind::Query(config) => {
                let mut search_codes = Vec::new();
                if let Some(after_dot) = rest.strip_prefix('.') {
                    if let Some(end) = after_dot.find('.') {
                        let mut sub_codes = &after_dot[..end];
                        rest = &after_dot[end + 1..];
                        while !sub_codes.is_empty() {
                            let (sub_code, tail) = split_chars(sub_codes, length);
                            sub_codes = tail;
                            if config.search_field(sub_code).is_some() {
                                search_codes.push(sub_code.to_string());
                            } else {
                                debug!(code, sub_code, "Unknown search code dropped");
                            }
                        }
                    }
                }
                let token = single_token(definition, values, registry);
                if token.is_valid {
                    vec![token.with_detail(TokenDetail::Query {
                        search_codes,
                        overridden: false,
                    })]
                } else {
                    vec![token]
                }
            }
            _ => match values.next() {
                Some(raw) => definition
                    .decode_many(raw, registry.settings())
                    .into_iter()
                    .map(|decoded| to_token(code, raw, decoded))
                    .collect(),
                None => vec![Token::invalid(code, None)],
            },
        };

        for token in parsed {
            debug!(
                code = %token.code,
                valid = token.is_valid,
                value = token.value.as_deref().unwrap_or(""),
                "Token parsed"
            );
            tokens.push(token);
        }
    }
}

fn to_token(code: &str, raw: &str, decoded: Option<String>) -> Token {
    match decoded {
        Some(value) => Token::valid(code, value).with_raw_value(raw),
        None => Token::invalid(code, Some(raw.to_string())),
    }
}

fn single_token(definition: &FieldDefinition, values: &mut Segments<'_>, registry: &Registry) -> Token {
    match values.next() {
        Some(raw) => to_token(
            &definition.code,
            raw,
            definition.decode(raw, registry.settings()),
        ),
        None => Token::invalid(definition.code.as_str(), None),
    }
}

fn range_token(
    definition: &FieldDefinition,
    has_infix: bool,
    values: &mut Segments<'_>,
    registry: &Registry,
) -> Token {
    let code = definition.code.as_str();
    let settings = registry.settings();

    if has_infix {
        let Some(raw) = values.next() else {
            return Token::invalid(code, None);
        };
        return match definition.decode_range_infixed(raw, settings) {
            Some((from, to)) => Token::range(code, from, to, true).with_raw_value(raw),
            None => Token::invalid(code, Some(raw.to_string())),
        };
    }

    let (Some(from_raw), Some(to_raw)) = (values.next(), values.next()) else {
        return Token::invalid(code, None);
    };
    let raw = format!("{}/{}", from_raw, to_raw);
    match definition.decode_range_pair(from_raw, to_raw, settings) {
        Some((from, to)) => Token::range(code, from, to, false).with_raw_value(raw),
        None => Token::invalid(code, Some(raw)),
    }
}

/// Replace the query token with the query string's free text.
///
/// Returns true if the query string carried the parameter. An empty value
/// removes the query.
fn apply_query_override(query_string: &str, registry: &Registry, tokens: &mut TokenMap) -> bool {
    let respond_to = registry.settings().query_respond_to.as_str();
    let Some(text) = form_urlencoded::parse(query_string.as_bytes())
        .find(|(key, _)| key == respond_to)
        .map(|(_, value)| value.trim().to_string())
    else {
        return false;
    };

    let code = registry.params().query.as_str();
    let search_codes = tokens
        .first_valid(code)
        .and_then(|token| match &token.detail {
            TokenDetail::Query { search_codes, .. } => Some(search_codes.clone()),
            _ => None,
        })
        .unwrap_or_default();

    if text.is_empty() {
        tokens.remove(code);
    } else {
        debug!(code, query = %text, "Query overridden from the query string");
        let token = Token::valid(code, text).with_detail(TokenDetail::Query {
            search_codes,
            overridden: true,
        });
        tokens.replace(code, vec![token]);
    }
    true
}
