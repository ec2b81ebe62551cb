//! Configuration key to raw value mapping.

use std::collections::HashMap;
use std::path::Path;

use rivet_coerce::ValueSource;
use rivet_common::error::{Result, RivetError};

use crate::properties::parse_properties;

/// Raw configuration values, queried read-only during construction.
///
/// Values are opaque strings; they are only interpreted when a value
/// directive coerces them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueStore {
    entries: HashMap<String, String>,
}

impl ValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from `.properties` text.
    ///
    /// # Errors
    ///
    /// Returns `ValueLoadFailed` if the text cannot be parsed.
    pub fn from_properties(text: &str) -> Result<Self> {
        let entries = parse_properties(text).map_err(|e| RivetError::ValueLoadFailed {
            message: e.to_string(),
        })?;
        Ok(entries.into_iter().collect())
    }

    /// Replaces every entry with the given ones.
    pub fn replace<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        *self = entries.into_iter().collect();
        tracing::info!(entries = self.entries.len(), "value store replaced");
    }

    /// Replaces the contents with the entries of `.properties` text.
    /// On error the previous contents are kept.
    ///
    /// # Errors
    ///
    /// Returns `ValueLoadFailed` if the text cannot be parsed.
    pub fn load_str(&mut self, text: &str) -> Result<usize> {
        let loaded = Self::from_properties(text)?;
        *self = loaded;
        tracing::info!(entries = self.entries.len(), "value store loaded");
        Ok(self.entries.len())
    }

    /// Replaces the contents with the entries of a `.properties` file.
    /// On error the previous contents are kept.
    ///
    /// # Errors
    ///
    /// Returns `ValueLoadFailed` if the file cannot be read or parsed.
    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        tracing::info!(path = %path.display(), "loading value file");
        let content = std::fs::read_to_string(path).map_err(|e| RivetError::ValueLoadFailed {
            message: format!("{}: {e}", path.display()),
        })?;
        self.load_str(&content)
    }

    /// Returns the raw value stored under `key`.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entries sorted by key.
    #[must_use]
    pub fn sorted_entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort_unstable();
        entries
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ValueStore {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ValueSource for ValueStore {
    fn raw_value(&self, key: &str) -> Option<&str> {
        self.lookup(key)
    }
}
