use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Term to definition mapping attached to an essay.
///
/// Keys are stored as written; every lookup folds case, because the word
/// carried by a click is the text as it appears in the paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Glossary {
    entries: BTreeMap<String, String>,
}

impl Glossary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, term: impl Into<String>, definition: impl Into<String>) {
        self.entries.insert(term.into(), definition.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Glossary keys in lexical order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(term, definition)| (term.as_str(), definition.as_str()))
    }

    /// Returns the stored key matching `word`, ignoring case.
    pub fn resolve(&self, word: &str) -> Option<&str> {
        if let Some((key, _)) = self.entries.get_key_value(word) {
            return Some(key.as_str());
        }
        let folded = word.to_lowercase();
        self.entries
            .keys()
            .find(|key| key.to_lowercase() == folded)
            .map(String::as_str)
    }

    /// Returns the definition for `word`, ignoring case.
    pub fn definition(&self, word: &str) -> Option<&str> {
        self.resolve(word)
            .and_then(|key| self.entries.get(key))
            .map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for Glossary
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(term, definition)| (term.into(), definition.into()))
                .collect(),
        }
    }
}

/// Case-insensitive equality used wherever a clicked word meets a key.
pub fn same_term(left: &str, right: &str) -> bool {
    left == right || left.to_lowercase() == right.to_lowercase()
}
