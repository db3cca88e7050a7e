//! Utility functions for the LPSE repository.

use std::borrow::Cow;

use url::form_urlencoded;

/// Decode a URL path segment.
///
/// `+` decodes to a space, matching the form encoding used by [`url_encode`].
///
/// # Returns
///
/// * `Some(String)` - The decoded segment
/// * `None` - If the percent-decoded bytes are not valid UTF-8
///
/// # Example
///
/// ```
/// use lpse_repository::utils::url_decode;
///
/// assert_eq!(url_decode("brand+name").as_deref(), Some("brand name"));
/// assert_eq!(url_decode("50%25").as_deref(), Some("50%"));
/// ```
pub fn url_decode(raw: &str) -> Option<String> {
    let spaced: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };
    urlencoding::decode(&spaced).ok().map(Cow::into_owned)
}

/// Encode a value as a URL path segment, with spaces as `+`.
pub fn url_encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Split a comma separated property value into trimmed, non-empty entries.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Quote a value for use in an engine clause, escaping `\` and `"`.
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Split a string into its leading `n` characters and the rest.
pub fn split_chars(value: &str, n: usize) -> (&str, &str) {
    match value.char_indices().nth(n) {
        Some((idx, _)) => value.split_at(idx),
        None => (value, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_encode_uses_plus_for_space() {
        assert_eq!(url_encode("brand name"), "brand+name");
        assert_eq!(url_encode("a/b"), "a%2Fb");
        assert_eq!(url_encode("a+b"), "a%2Bb");
    }

    #[test]
    fn test_url_decode_rejects_invalid_utf8() {
        assert!(url_decode("%FF%FE").is_none());
        assert_eq!(url_decode("a%2Bb").as_deref(), Some("a+b"));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" a, b ,,c "), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("Acme"), "\"Acme\"");
        assert_eq!(quote("say \"hi\""), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn test_split_chars() {
        assert_eq!(split_chars("abc", 1), ("a", "bc"));
        assert_eq!(split_chars("ab", 5), ("ab", ""));
        assert_eq!(split_chars("éa", 1), ("é", "a"));
    }
}
