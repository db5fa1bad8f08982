//! Static substitution
//!
//! Literal `{key}` -> value replacement from a caller-supplied map. No
//! external lookup is involved.
//!
//! Entries are applied one after another against the current string, in the
//! map's insertion order. A value that contains another key's token can
//! therefore be substituted again by a later entry. There is no escaping:
//! a literal `{name}` in the template is always a token.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Insertion-ordered key/value map with unique keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubstitutionMap {
    entries: Vec<(String, String)>,
}

impl SubstitutionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in application order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SubstitutionMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// The token a key is written as in a template
pub fn token(key: &str) -> String {
    format!("{{{}}}", key)
}

/// Replace every `{key}` in `template` with its value, entry by entry.
///
/// An absent template yields an empty string; an empty map returns the
/// template unchanged.
pub fn apply_static(template: Option<&str>, substitutions: &SubstitutionMap) -> String {
    let Some(template) = template else {
        debug!("apply_static: no template");
        return String::new();
    };
    debug!(template_len = template.len(), entries = substitutions.len(), "apply_static: called");

    let mut result = template.to_string();
    for (key, value) in substitutions.iter() {
        let token = token(key);
        if result.contains(&token) {
            result = result.replace(&token, value);
        }
    }
    result
}

/// Accumulates entries for a [`SubstitutionMap`]
#[derive(Debug, Clone, Default)]
pub struct PlaceholderSet {
    entries: SubstitutionMap,
}

impl PlaceholderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, replacing any earlier value for `key`
    pub fn add(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.entries.insert(key, value.to_string());
        self
    }

    /// Snapshot of the entries accumulated so far
    pub fn build(&self) -> SubstitutionMap {
        self.entries.clone()
    }

    /// Apply the accumulated entries to `template`
    pub fn apply(&self, template: &str) -> String {
        apply_static(Some(template), &self.entries)
    }

    /// One-shot static substitution without building a set
    pub fn apply_to_static(template: Option<&str>, substitutions: &SubstitutionMap) -> String {
        apply_static(template, substitutions)
    }
}
