//! The canonical URI builder.

use lpse_shared::TokenMap;

use crate::fields::BuildMode;
use crate::registry::Registry;

/// Builds the single canonical LPSE path for a token map.
///
/// The output is a pure function of the valid tokens: codes are walked in
/// LPSE order, so two maps selecting the same values produce byte-identical
/// paths regardless of the order the codes appeared in the incoming URL.
#[derive(Debug, Clone, Copy)]
pub struct CanonicalUriBuilder<'a> {
    registry: &'a Registry,
}

impl<'a> CanonicalUriBuilder<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Build the canonical path, keeping the current page.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use lpse_repository::{CanonicalUriBuilder, Registry};
    /// use lpse_shared::{Token, TokenMap};
    ///
    /// # fn example(registry: &Registry) {
    /// let mut tokens = TokenMap::new();
    /// tokens.push(Token::valid("b", "Acme"));
    /// let uri = CanonicalUriBuilder::new(registry).build(&tokens, "default");
    /// # }
    /// ```
    pub fn build(&self, tokens: &TokenMap, fieldset: &str) -> String {
        self.build_with_mode(tokens, fieldset, BuildMode::Preserve)
    }

    /// Build the canonical path back on page one.
    pub fn build_reset(&self, tokens: &TokenMap, fieldset: &str) -> String {
        self.build_with_mode(tokens, fieldset, BuildMode::ResetPage)
    }

    pub fn build_with_mode(&self, tokens: &TokenMap, fieldset: &str, mode: BuildMode) -> String {
        let settings = self.registry.settings();
        let fieldset = self.registry.fieldset(fieldset).0;

        let mut values = String::new();
        let mut codes = String::new();
        for field in self.registry.fields() {
            values.push_str(&field.canonical_value_fragment(tokens, settings, mode));
            codes.push_str(&field.canonical_code_fragment(tokens, settings, mode));
        }

        if codes.is_empty() {
            format!("/{}/{}/", self.registry.collection_uri(), fieldset)
        } else {
            format!(
                "/{}/{}/{}{}/",
                self.registry.collection_uri(),
                fieldset,
                values,
                codes
            )
        }
    }
}
