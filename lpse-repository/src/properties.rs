//! Property source parsing.
//!
//! Collections are configured with Java-style `.properties` text. This module
//! turns that text into an ordered key/value store; nothing downstream of the
//! registry builder reads raw property strings.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::errors::ConfigError;

/// An ordered set of configuration properties.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl Properties {
    /// Create an empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `.properties` text.
    ///
    /// Supports `key=value`, `key: value` and `key value` separators, `#` and
    /// `!` comment lines, trailing-backslash continuation lines and the usual
    /// escapes (`\t`, `\n`, `\uXXXX`, escaped separators). A repeated key keeps
    /// its first position and takes the last value.
    ///
    /// # Example
    ///
    /// ```
    /// use lpse_repository::Properties;
    ///
    /// let properties = Properties::parse("# comment\npanl.lpse.length=1\npanl.name.b = Brand Name\n");
    /// assert_eq!(properties.get("panl.lpse.length"), Some("1"));
    /// assert_eq!(properties.get("panl.name.b"), Some("Brand Name"));
    /// ```
    pub fn parse(text: &str) -> Self {
        let mut properties = Self::new();
        let mut pending = String::new();

        for line in text.lines() {
            let trimmed = line.trim_start();
            if pending.is_empty() && (trimmed.is_empty() || trimmed.starts_with(['#', '!'])) {
                continue;
            }

            if ends_with_continuation(trimmed) {
                pending.push_str(&trimmed[..trimmed.len() - 1]);
                continue;
            }

            pending.push_str(trimmed);
            let logical = std::mem::take(&mut pending);
            if let Some((key, value)) = split_logical_line(&logical) {
                properties.insert(key, value);
            }
        }

        if !pending.is_empty() {
            if let Some((key, value)) = split_logical_line(&pending) {
                properties.insert(key, value);
            }
        }

        properties
    }

    /// Read and parse a `.properties` file.
    ///
    /// # Returns
    ///
    /// * `Ok(Properties)` - The parsed properties
    /// * `Err(ConfigError::Io)` - If the file cannot be read
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::io(format!("{}: {}", path.display(), e)))?;
        let properties = Self::parse(&text);
        debug!(path = %path.display(), count = properties.len(), "Loaded properties");
        Ok(properties)
    }

    /// Insert or overwrite a property.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&position) => self.entries[position].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// Look up a property value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&position| self.entries[position].1.as_str())
    }

    /// Look up a property value, treating a blank value as absent.
    pub fn get_non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Look up a mandatory property.
    pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
        self.get_non_blank(key)
            .ok_or_else(|| ConfigError::missing_property(key))
    }

    /// Look up a boolean property; only `true` (any case) is true.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get_non_blank(key) {
            Some(value) => value.eq_ignore_ascii_case("true"),
            None => default,
        }
    }

    /// Look up and parse a property.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(T))` - If the property is present and parses
    /// * `Ok(None)` - If the property is absent or blank
    /// * `Err(ConfigError::InvalidProperty)` - If the value does not parse
    pub fn get_parsed<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_non_blank(key) {
            Some(value) => value
                .parse::<T>()
                .map(Some)
                .map_err(|e| ConfigError::invalid(key, e.to_string())),
            None => Ok(None),
        }
    }

    /// Properties whose key starts with `prefix`, as `(suffix, value)` pairs in
    /// file order.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.entries.iter().filter_map(move |(key, value)| {
            key.strip_prefix(prefix)
                .map(|suffix| (suffix, value.as_str()))
        })
    }

    /// Every property in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no properties.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Properties
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Self::new();
        for (key, value) in iter {
            properties.insert(key, value);
        }
        properties
    }
}

/// A line continues when it ends in an odd number of backslashes.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn split_logical_line(line: &str) -> Option<(String, String)> {
    let mut key = String::new();
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    push_escaped(&mut key, escaped, &mut chars);
                }
            }
            '=' | ':' => break,
            c if c.is_whitespace() => {
                while chars.next_if(|c| c.is_whitespace()).is_some() {}
                chars.next_if(|&c| c == '=' || c == ':');
                break;
            }
            c => key.push(c),
        }
    }

    while chars.next_if(|c| c.is_whitespace()).is_some() {}

    let mut value = String::new();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                push_escaped(&mut value, escaped, &mut chars);
            }
        } else {
            value.push(c);
        }
    }

    if key.is_empty() {
        None
    } else {
        Some((key, value))
    }
}

fn push_escaped<I>(out: &mut String, escaped: char, chars: &mut std::iter::Peekable<I>)
where
    I: Iterator<Item = char>,
{
    match escaped {
        't' => out.push('\t'),
        'n' => out.push('\n'),
        'r' => out.push('\r'),
        'f' => out.push('\u{c}'),
        'u' => {
            let hex: String = (0..4).filter_map(|_| chars.next()).collect();
            match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                Some(c) => out.push(c),
                None => {
                    out.push('u');
                    out.push_str(&hex);
                }
            }
        }
        other => out.push(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_separators_and_comments() {
        let properties = Properties::parse(
            "# comment\n! bang comment\n\na=1\nb : 2\nc 3\n  d=  spaced value  \n",
        );
        assert_eq!(properties.get("a"), Some("1"));
        assert_eq!(properties.get("b"), Some("2"));
        assert_eq!(properties.get("c"), Some("3"));
        assert_eq!(properties.get("d"), Some("spaced value  "));
        assert_eq!(properties.len(), 4);
    }

    #[test]
    fn test_parse_continuation_lines() {
        let properties = Properties::parse("panl.lpse.order=a,\\\n    b,\\\n    c\n");
        assert_eq!(properties.get("panl.lpse.order"), Some("a,b,c"));
    }

    #[test]
    fn test_parse_escapes() {
        let properties = Properties::parse("key\\=with\\:seps=caf\\u00e9\\tx\n");
        assert_eq!(properties.get("key=with:seps"), Some("café\tx"));
    }

    #[test]
    fn test_escaped_backslash_is_not_continuation() {
        let properties = Properties::parse("a=ends\\\\\nb=2\n");
        assert_eq!(properties.get("a"), Some("ends\\"));
        assert_eq!(properties.get("b"), Some("2"));
    }

    #[test]
    fn test_repeated_key_takes_last_value() {
        let properties = Properties::parse("a=1\nb=2\na=3\n");
        let keys: Vec<_> = properties.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(properties.get("a"), Some("3"));
    }

    #[test]
    fn test_with_prefix_preserves_order() {
        let properties = Properties::parse("panl.facet.b=brand\nother=x\npanl.facet.a=colour\n");
        let facets: Vec<_> = properties.with_prefix("panl.facet.").collect();
        assert_eq!(facets, vec![("b", "brand"), ("a", "colour")]);
    }

    #[test]
    fn test_get_parsed() {
        let properties: Properties = [("n", "10"), ("bad", "ten"), ("blank", " ")]
            .into_iter()
            .collect();
        assert_eq!(properties.get_parsed::<u32>("n").unwrap(), Some(10));
        assert_eq!(properties.get_parsed::<u32>("blank").unwrap(), None);
        assert!(matches!(
            properties.get_parsed::<u32>("bad"),
            Err(ConfigError::InvalidProperty { .. })
        ));
    }

    #[test]
    fn test_get_bool() {
        let properties: Properties = [("a", "TRUE"), ("b", "yes")].into_iter().collect();
        assert!(properties.get_bool("a", false));
        assert!(!properties.get_bool("b", true));
        assert!(properties.get_bool("missing", true));
    }

    #[test]
    fn test_require() {
        let properties: Properties = [("a", "1")].into_iter().collect();
        assert_eq!(properties.require("a").unwrap(), "1");
        assert_eq!(
            properties.require("b"),
            Err(ConfigError::MissingProperty("b".to_string()))
        );
    }
}
