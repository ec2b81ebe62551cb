//! Abstract type to concrete type bindings.

use std::collections::HashMap;
use std::path::Path;

use rivet_common::error::{Result, RivetError};
use rivet_common::types::TypeName;

use crate::properties::parse_properties;

/// Substitutions consulted before a constructor is selected.
///
/// Lookups compare names exactly. A name without a binding resolves to
/// itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingRegistry {
    bindings: HashMap<TypeName, TypeName>,
}

fn load_err(message: String) -> RivetError {
    RivetError::BindingLoadFailed { message }
}

impl BindingRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from `(abstract, concrete)` name pairs.
    ///
    /// # Errors
    ///
    /// Returns `BindingLoadFailed` if a name is empty or contains
    /// whitespace.
    pub fn from_entries<I, A, C>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (A, C)>,
        A: Into<String>,
        C: Into<String>,
    {
        let mut bindings = HashMap::new();
        for (abstract_name, concrete_name) in entries {
            let abstract_name = abstract_name.into();
            let concrete_name = concrete_name.into();
            for name in [&abstract_name, &concrete_name] {
                if !TypeName::is_valid(name) {
                    return Err(load_err(format!("invalid type name {name:?}")));
                }
            }
            let _ = bindings.insert(TypeName::from(abstract_name), TypeName::from(concrete_name));
        }
        Ok(Self { bindings })
    }

    /// Builds a registry from `.properties` text.
    ///
    /// # Errors
    ///
    /// Returns `BindingLoadFailed` if the text cannot be parsed or holds an
    /// invalid type name.
    pub fn from_properties(text: &str) -> Result<Self> {
        let entries = parse_properties(text).map_err(|e| load_err(e.to_string()))?;
        Self::from_entries(entries)
    }

    /// Reads a registry from a `.properties` file.
    ///
    /// # Errors
    ///
    /// Returns `BindingLoadFailed` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::info!(path = %path.display(), "loading binding file");
        let content = std::fs::read_to_string(path)
            .map_err(|e| load_err(format!("{}: {e}", path.display())))?;
        Self::from_properties(&content)
    }

    /// Replaces every binding with the given pairs. On error the previous
    /// bindings are kept.
    ///
    /// # Errors
    ///
    /// Returns `BindingLoadFailed` if a name is invalid.
    pub fn load<I, A, C>(&mut self, entries: I) -> Result<usize>
    where
        I: IntoIterator<Item = (A, C)>,
        A: Into<String>,
        C: Into<String>,
    {
        *self = Self::from_entries(entries)?;
        tracing::info!(bindings = self.len(), "binding registry loaded");
        Ok(self.len())
    }

    /// Replaces every binding with those of `.properties` text. On error
    /// the previous bindings are kept.
    ///
    /// # Errors
    ///
    /// Returns `BindingLoadFailed` if the text cannot be parsed.
    pub fn load_str(&mut self, text: &str) -> Result<usize> {
        *self = Self::from_properties(text)?;
        tracing::info!(bindings = self.len(), "binding registry loaded");
        Ok(self.len())
    }

    /// Replaces every binding with those of a `.properties` file. On error
    /// the previous bindings are kept.
    ///
    /// # Errors
    ///
    /// Returns `BindingLoadFailed` if the file cannot be read or parsed.
    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        *self = Self::from_file(path)?;
        Ok(self.len())
    }

    /// Returns the concrete type bound to `abstract_name`.
    #[must_use]
    pub fn lookup(&self, abstract_name: &str) -> Option<&TypeName> {
        self.bindings.get(abstract_name)
    }

    /// Returns the bound concrete type, or `name` itself when unbound.
    #[must_use]
    pub fn resolve<'a>(&'a self, name: &'a TypeName) -> &'a TypeName {
        self.lookup(name.as_str()).unwrap_or(name)
    }

    /// Returns the number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if no bindings are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Returns the bindings sorted by abstract name.
    #[must_use]
    pub fn sorted_entries(&self) -> Vec<(&TypeName, &TypeName)> {
        let mut entries: Vec<_> = self.bindings.iter().collect();
        entries.sort_unstable();
        entries
    }
}
