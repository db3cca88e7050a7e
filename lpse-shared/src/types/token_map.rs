//! The per-request token map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::token::Token;

/// Maps each LPSE code to its tokens, in encounter order.
///
/// Codes are kept in a sorted map so that iteration never depends on the
/// order codes appeared in the incoming path.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct TokenMap {
    tokens: BTreeMap<String, Vec<Token>>,
}

impl TokenMap {
    /// Create an empty token map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token to its code's list.
    pub fn push(&mut self, token: Token) {
        self.tokens
            .entry(token.code.clone())
            .or_default()
            .push(token);
    }

    /// Append a token unless an equivalent valid token is already present.
    ///
    /// # Returns
    ///
    /// `true` if the token was added.
    pub fn push_unique(&mut self, token: Token) -> bool {
        if token.is_valid && self.valid(&token.code).any(|t| t.is_equivalent(&token)) {
            return false;
        }
        self.push(token);
        true
    }

    /// All tokens (valid or not) for a code.
    pub fn get(&self, code: &str) -> &[Token] {
        self.tokens.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Valid tokens for a code, in encounter order.
    pub fn valid<'a>(&'a self, code: &str) -> impl Iterator<Item = &'a Token> + 'a {
        self.get(code).iter().filter(|t| t.is_valid)
    }

    /// The first valid token for a code.
    pub fn first_valid(&self, code: &str) -> Option<&Token> {
        self.valid(code).next()
    }

    /// Returns true if the code has at least one valid token.
    pub fn is_active(&self, code: &str) -> bool {
        self.first_valid(code).is_some()
    }

    /// Returns true if the code has any token, valid or not.
    pub fn contains(&self, code: &str) -> bool {
        self.tokens.contains_key(code)
    }

    /// Replace every token for a code.
    pub fn replace(&mut self, code: &str, tokens: Vec<Token>) {
        if tokens.is_empty() {
            self.tokens.remove(code);
        } else {
            self.tokens.insert(code.to_string(), tokens);
        }
    }

    /// Remove every token for a code.
    pub fn remove(&mut self, code: &str) -> Vec<Token> {
        self.tokens.remove(code).unwrap_or_default()
    }

    /// Remove the valid tokens for a code that match a predicate.
    ///
    /// # Returns
    ///
    /// The number of tokens removed.
    pub fn remove_where<F>(&mut self, code: &str, mut predicate: F) -> usize
    where
        F: FnMut(&Token) -> bool,
    {
        let Some(tokens) = self.tokens.get_mut(code) else {
            return 0;
        };
        let before = tokens.len();
        tokens.retain(|t| !(t.is_valid && predicate(t)));
        let removed = before - tokens.len();
        if tokens.is_empty() {
            self.tokens.remove(code);
        }
        removed
    }

    /// Codes with at least one valid token.
    pub fn active_codes(&self) -> impl Iterator<Item = &str> {
        self.tokens
            .iter()
            .filter(|(_, tokens)| tokens.iter().any(|t| t.is_valid))
            .map(|(code, _)| code.as_str())
    }

    /// Every token in the map, grouped by code.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Token])> {
        self.tokens
            .iter()
            .map(|(code, tokens)| (code.as_str(), tokens.as_slice()))
    }

    /// Total number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.values().map(Vec::len).sum()
    }

    /// Returns true if the map holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_encounter_order() {
        let mut map = TokenMap::new();
        map.push(Token::valid("o", "red"));
        map.push(Token::valid("o", "blue"));

        let values: Vec<_> = map.valid("o").filter_map(|t| t.value.as_deref()).collect();
        assert_eq!(values, vec!["red", "blue"]);
    }

    #[test]
    fn test_invalid_tokens_are_not_active() {
        let mut map = TokenMap::new();
        map.push(Token::invalid("p", Some("abc".to_string())));

        assert!(map.contains("p"));
        assert!(!map.is_active("p"));
        assert_eq!(map.active_codes().count(), 0);
    }

    #[test]
    fn test_push_unique_skips_duplicates() {
        let mut map = TokenMap::new();
        assert!(map.push_unique(Token::valid("b", "Acme")));
        assert!(!map.push_unique(Token::valid("b", "Acme")));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove_where() {
        let mut map = TokenMap::new();
        map.push(Token::valid("o", "red"));
        map.push(Token::valid("o", "blue"));

        let removed = map.remove_where("o", |t| t.value.as_deref() == Some("red"));
        assert_eq!(removed, 1);
        assert_eq!(map.len(), 1);

        map.remove_where("o", |_| true);
        assert!(!map.contains("o"));
    }

    #[test]
    fn test_iteration_order_is_independent_of_insertion() {
        let mut a = TokenMap::new();
        a.push(Token::valid("z", "1"));
        a.push(Token::valid("a", "2"));

        let mut b = TokenMap::new();
        b.push(Token::valid("a", "2"));
        b.push(Token::valid("z", "1"));

        assert_eq!(a, b);
    }
}
