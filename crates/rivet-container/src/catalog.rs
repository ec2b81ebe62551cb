//! Registry of type descriptors.

use std::collections::{HashMap, HashSet};

use rivet_common::error::{Result, RivetError};
use rivet_common::types::TypeName;
use rivet_config::BindingRegistry;

use crate::descriptor::TypeDescriptor;

/// All types an injector knows how to build, plus the abstract type names
/// that may appear on the left side of a binding.
#[derive(Debug, Default)]
pub struct TypeCatalog {
    types: HashMap<TypeName, TypeDescriptor>,
    abstracts: HashSet<TypeName>,
}

impl TypeCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a descriptor, replacing any previous one of the same name.
    pub fn register(&mut self, descriptor: TypeDescriptor) {
        tracing::debug!(type_name = %descriptor.name(), "registering type");
        let _ = self.types.insert(descriptor.name().clone(), descriptor);
    }

    /// Registers a descriptor, builder style.
    #[must_use]
    pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    /// Declares an abstract type name that has no descriptor of its own.
    pub fn declare_abstract(&mut self, name: impl Into<TypeName>) {
        let _ = self.abstracts.insert(name.into());
    }

    /// Declares an abstract type name, builder style.
    #[must_use]
    pub fn with_abstract(mut self, name: impl Into<TypeName>) -> Self {
        self.declare_abstract(name);
        self
    }

    /// Returns the descriptor registered under `name`.
    #[must_use]
    pub fn descriptor(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    /// Returns `true` if `name` was declared abstract.
    #[must_use]
    pub fn is_abstract(&self, name: &str) -> bool {
        self.abstracts.contains(name)
    }

    /// Returns `true` if `name` is registered or declared abstract.
    #[must_use]
    pub fn is_known(&self, name: &str) -> bool {
        self.types.contains_key(name) || self.is_abstract(name)
    }

    /// Number of registered descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no descriptor is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Returns the descriptor for `name`, distinguishing abstract names
    /// without a descriptor from names never seen.
    ///
    /// # Errors
    ///
    /// Returns `NoUsableConstructor` for an abstract name and `UnknownType`
    /// otherwise.
    pub fn require(&self, name: &TypeName) -> Result<&TypeDescriptor> {
        self.descriptor(name.as_str()).ok_or_else(|| {
            if self.is_abstract(name.as_str()) {
                RivetError::NoUsableConstructor {
                    type_name: name.to_string(),
                }
            } else {
                RivetError::UnknownType {
                    name: name.to_string(),
                }
            }
        })
    }

    /// Checks that every binding names known types and that every concrete
    /// side is constructible.
    ///
    /// # Errors
    ///
    /// Returns `BindingLoadFailed` describing the first offending binding.
    pub fn validate_bindings(&self, bindings: &BindingRegistry) -> Result<()> {
        for (abstract_name, concrete_name) in bindings.sorted_entries() {
            if !self.is_known(abstract_name.as_str()) {
                return Err(RivetError::BindingLoadFailed {
                    message: format!("unknown abstract type {abstract_name}"),
                });
            }
            let descriptor = self.descriptor(concrete_name.as_str()).ok_or_else(|| {
                RivetError::BindingLoadFailed {
                    message: format!("{abstract_name} is bound to unknown type {concrete_name}"),
                }
            })?;
            if let Err(e) = descriptor.select_constructor() {
                return Err(RivetError::BindingLoadFailed {
                    message: format!("{abstract_name} is bound to {concrete_name}: {e}"),
                });
            }
            if abstract_name != concrete_name && !descriptor.exposes(abstract_name.as_str()) {
                tracing::warn!(
                    abstract_type = %abstract_name,
                    concrete_type = %concrete_name,
                    "bound type declares no conversion, instances are handed out as the concrete type"
                );
            }
        }
        Ok(())
    }
}
