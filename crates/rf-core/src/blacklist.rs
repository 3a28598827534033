//! Blacklist data model
//!
//! A blacklist maps a match key to a [`PathRule`]. Keys are either an exact
//! hostname (`www.example.com`) or a suffix pattern starting with `.`
//! (`.example.com`, matching any subdomain of `example.com`).
//!
//! The JSON form is an object whose values are `null` (block every path) or
//! an array of literal path prefixes:
//!
//! ```json
//! { "graph.facebook.com": null, "www.google.com": ["/jsapi"] }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Which paths of a key are blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<Vec<String>>", into = "Option<Vec<String>>")]
pub enum PathRule {
    /// Every path is blocked
    All,
    /// Only paths starting with one of these literal prefixes are blocked.
    /// Checked in order, first match wins. An empty list blocks nothing.
    Prefixes(Vec<String>),
}

impl PathRule {
    /// Whether `path` is blocked by this rule.
    #[inline]
    pub fn blocks(&self, path: &str) -> bool {
        match self {
            Self::All => true,
            Self::Prefixes(prefixes) => prefixes.iter().any(|prefix| path.starts_with(prefix.as_str())),
        }
    }
}

impl From<Option<Vec<String>>> for PathRule {
    fn from(value: Option<Vec<String>>) -> Self {
        match value {
            Some(prefixes) => Self::Prefixes(prefixes),
            None => Self::All,
        }
    }
}

impl From<PathRule> for Option<Vec<String>> {
    fn from(rule: PathRule) -> Self {
        match rule {
            PathRule::All => None,
            PathRule::Prefixes(prefixes) => Some(prefixes),
        }
    }
}

/// Mapping from match key to path rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Blacklist {
    entries: HashMap<String, PathRule>,
}

impl Blacklist {
    /// Create an empty blacklist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a blacklist that blocks every path of every key.
    pub fn from_domains<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        keys.into_iter()
            .map(|key| (key.into(), PathRule::All))
            .collect()
    }

    /// Insert or replace the rule for `key`. Returns the previous rule.
    pub fn insert(&mut self, key: impl Into<String>, rule: PathRule) -> Option<PathRule> {
        self.entries.insert(key.into(), rule)
    }

    /// Block every path under `key`.
    pub fn block(&mut self, key: impl Into<String>) {
        self.insert(key, PathRule::All);
    }

    /// Block only the given path prefixes under `key`.
    pub fn block_paths<I, S>(&mut self, key: impl Into<String>, prefixes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prefixes = prefixes.into_iter().map(Into::into).collect();
        self.insert(key, PathRule::Prefixes(prefixes));
    }

    /// Rule for `key`, if present.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&PathRule> {
        self.entries.get(key)
    }

    /// Whether `key` is present and its rule blocks `path`.
    #[inline]
    pub fn matches(&self, key: &str, path: &str) -> bool {
        self.get(key).is_some_and(|rule| rule.blocks(path))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PathRule)> {
        self.entries.iter().map(|(key, rule)| (key.as_str(), rule))
    }
}

impl<K: Into<String>> FromIterator<(K, PathRule)> for Blacklist {
    fn from_iter<T: IntoIterator<Item = (K, PathRule)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(key, rule)| (key.into(), rule)).collect(),
        }
    }
}
