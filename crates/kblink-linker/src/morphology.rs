//! Morphological normalization
//!
//! The linker only needs a total `token -> base form` function; where
//! a real analyzer is unavailable these implementations stand in
//! behind the same seam.

use std::collections::HashMap;

use kblink_core::Lemmatizer;

/// Identity lemmatizer for configurations without morphology support.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLemmatizer;

impl Lemmatizer for NoopLemmatizer {
    fn lemma(&self, token: &str) -> String {
        token.to_string()
    }
}

/// Table-driven lemmatizer mapping inflected forms to base forms.
///
/// Unknown tokens come back unchanged, keeping the function total.
#[derive(Debug, Clone, Default)]
pub struct DictionaryLemmatizer {
    forms: HashMap<String, String>,
}

impl DictionaryLemmatizer {
    /// Create an empty lemmatizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a base form together with its inflected variants.
    pub fn add_form(&mut self, lemma: &str, inflections: &[&str]) {
        for inflection in inflections {
            self.forms
                .insert((*inflection).to_string(), lemma.to_string());
        }
    }
}

impl Lemmatizer for DictionaryLemmatizer {
    fn lemma(&self, token: &str) -> String {
        self.forms
            .get(token)
            .cloned()
            .unwrap_or_else(|| token.to_string())
    }
}
