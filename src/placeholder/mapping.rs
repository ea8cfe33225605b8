//! Ordered, case-insensitive token table

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Token delimiter wrapped around every placeholder key
pub const DELIMITER: char = '%';

/// Case-insensitive mapping from `%key%` tokens to replacement values.
///
/// Iteration follows insertion order. Re-inserting a key that already exists
/// (under case-insensitive comparison) replaces the value but keeps the
/// original position, so the substitution order of a merged mapping is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableMapping {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl VariableMapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a token. Bare keys (`name`) are wrapped into `%name%`.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Result<()>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let token = canonical_token(key.as_ref())?;
        let folded = token.to_lowercase();
        let value = value.into();

        match self.index.get(&folded) {
            Some(&pos) => self.entries[pos].1 = value,
            None => {
                self.index.insert(folded, self.entries.len());
                self.entries.push((token, value));
            }
        }
        Ok(())
    }

    /// Builder-style insert
    pub fn with<K, V>(mut self, key: K, value: V) -> Result<Self>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        self.insert(key, value)?;
        Ok(self)
    }

    /// Look up a value by token, ignoring case
    pub fn get(&self, key: &str) -> Option<&str> {
        let token = canonical_token(key).ok()?;
        self.index
            .get(&token.to_lowercase())
            .map(|&pos| self.entries[pos].1.as_str())
    }

    /// Check whether a token is present, ignoring case
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Overlay every entry of `other` onto this mapping
    pub fn extend_from(&mut self, other: &VariableMapping) {
        for (token, value) in other.iter() {
            let folded = token.to_lowercase();
            match self.index.get(&folded) {
                Some(&pos) => self.entries[pos].1 = value.to_string(),
                None => {
                    self.index.insert(folded, self.entries.len());
                    self.entries.push((token.to_string(), value.to_string()));
                }
            }
        }
    }

    /// Entries in substitution order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Tokens in substitution order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are present
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalise a key into its `%key%` token form.
pub fn canonical_token(key: &str) -> Result<String> {
    let key = key.trim();
    let bare = key
        .strip_prefix(DELIMITER)
        .and_then(|k| k.strip_suffix(DELIMITER))
        .unwrap_or(key);

    if bare.is_empty() || bare.contains(DELIMITER) {
        return Err(Error::invalid_input(format!(
            "placeholder key '{}' is empty or contains '{}'",
            key, DELIMITER
        )));
    }

    Ok(format!("{DELIMITER}{bare}{DELIMITER}"))
}
