//! Injector facade: one catalog, one configuration snapshot, many graphs.

use std::any::type_name;
use std::path::Path;

use rivet_common::config::InjectorSettings;
use rivet_common::error::{Result, RivetError};
use rivet_common::types::TypeName;
use rivet_config::{BindingRegistry, ValueStore};
use rivet_container::{DependencyPlan, Instance, ObjectGraphBuilder, TypeCatalog};

/// Owns the type catalog and the binding and value tables consulted by
/// every construction.
///
/// Tables are replaced wholesale by the `load_*` methods; a failed load
/// leaves the previous table in place. Constructions always see the tables
/// as they were when the call started.
#[derive(Debug)]
pub struct Injector {
    catalog: TypeCatalog,
    bindings: BindingRegistry,
    values: ValueStore,
    settings: InjectorSettings,
}

impl Injector {
    /// Creates an injector with empty tables and default settings.
    #[must_use]
    pub fn new(catalog: TypeCatalog) -> Self {
        Self {
            catalog,
            bindings: BindingRegistry::new(),
            values: ValueStore::new(),
            settings: InjectorSettings::default(),
        }
    }

    /// Replaces the settings.
    #[must_use]
    pub fn with_settings(mut self, settings: InjectorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The registered types.
    #[must_use]
    pub const fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// The current bindings.
    #[must_use]
    pub const fn bindings(&self) -> &BindingRegistry {
        &self.bindings
    }

    /// The current configuration values.
    #[must_use]
    pub const fn values(&self) -> &ValueStore {
        &self.values
    }

    /// The active settings.
    #[must_use]
    pub const fn settings(&self) -> &InjectorSettings {
        &self.settings
    }

    fn install_bindings(&mut self, bindings: BindingRegistry) -> Result<usize> {
        self.catalog.validate_bindings(&bindings)?;
        self.bindings = bindings;
        tracing::info!(bindings = self.bindings.len(), "bindings installed");
        Ok(self.bindings.len())
    }

    /// Replaces the bindings with `(abstract, concrete)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `BindingLoadFailed` if a name is invalid, unknown to the
    /// catalog, or bound to a type that cannot be constructed. The previous
    /// bindings are kept.
    pub fn load_bindings<I, A, C>(&mut self, entries: I) -> Result<usize>
    where
        I: IntoIterator<Item = (A, C)>,
        A: Into<String>,
        C: Into<String>,
    {
        let bindings = BindingRegistry::from_entries(entries)?;
        self.install_bindings(bindings)
    }

    /// Replaces the bindings with those of `.properties` text.
    ///
    /// # Errors
    ///
    /// See [`Injector::load_bindings`]; parse errors are reported as
    /// `BindingLoadFailed` as well.
    pub fn load_bindings_str(&mut self, text: &str) -> Result<usize> {
        let bindings = BindingRegistry::from_properties(text)?;
        self.install_bindings(bindings)
    }

    /// Replaces the bindings with those of a `.properties` file.
    ///
    /// # Errors
    ///
    /// See [`Injector::load_bindings_str`].
    pub fn load_bindings_file(&mut self, path: &Path) -> Result<usize> {
        let bindings = BindingRegistry::from_file(path)?;
        self.install_bindings(bindings)
    }

    /// Replaces the configuration values.
    pub fn load_values<I, K, V>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.values.replace(entries);
        self.values.len()
    }

    /// Replaces the configuration values with those of `.properties` text.
    ///
    /// # Errors
    ///
    /// Returns `ValueLoadFailed` if the text cannot be parsed. The previous
    /// values are kept.
    pub fn load_values_str(&mut self, text: &str) -> Result<usize> {
        self.values.load_str(text)
    }

    /// Replaces the configuration values with those of a `.properties` file.
    ///
    /// # Errors
    ///
    /// Returns `ValueLoadFailed` if the file cannot be read or parsed. The
    /// previous values are kept.
    pub fn load_values_file(&mut self, path: &Path) -> Result<usize> {
        self.values.load_file(path)
    }

    /// A builder over the current tables.
    #[must_use]
    pub const fn builder(&self) -> ObjectGraphBuilder<'_> {
        ObjectGraphBuilder::new(&self.catalog, &self.bindings, &self.values, &self.settings)
    }

    /// Constructs a fresh instance of `name`, or of the type bound to it.
    ///
    /// # Errors
    ///
    /// Returns the construction error; see [`ObjectGraphBuilder::construct`].
    pub fn construct(&self, name: &str) -> Result<Instance> {
        self.builder().construct(&TypeName::new(name))
    }

    /// Constructs `name` and unwraps it as a `T`. For an abstract name bound
    /// to a type exposing it, `T` is the exposed representation, for
    /// example `Box<dyn Engine>`.
    ///
    /// # Errors
    ///
    /// Returns the construction error, or `ConstructionFailed` if the
    /// instance is not a `T`.
    pub fn construct_as<T: 'static>(&self, name: &str) -> Result<T> {
        let instance = self.construct(name)?;
        instance
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| RivetError::ConstructionFailed {
                type_name: name.to_owned(),
                message: format!("instance is not a {}", type_name::<T>()),
            })
    }

    /// The static dependency graph reachable from `name`.
    #[must_use]
    pub fn dependency_plan(&self, name: &str) -> DependencyPlan {
        DependencyPlan::build(&self.catalog, &self.bindings, &TypeName::new(name))
    }

    /// The order in which the types reachable from `name` are constructed,
    /// dependencies first.
    ///
    /// # Errors
    ///
    /// Returns `CyclicDependency` if the graph has a cycle.
    pub fn plan(&self, name: &str) -> Result<Vec<TypeName>> {
        self.dependency_plan(name).order()
    }
}

#[cfg(test)]
mod tests {
    use rivet_coerce::ValueDirective;
    use rivet_container::TypeDescriptor;

    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Clock {
        tick: i32,
    }

    fn injector() -> Injector {
        let catalog = TypeCatalog::new().with_abstract("app.TimeSource").with(
            TypeDescriptor::of::<Clock>("app.Clock")
                .default_constructor()
                .value_field("tick", ValueDirective::new("clock.tick"), |c: &mut Clock, n| {
                    c.tick = n;
                })
                .build(),
        );
        Injector::new(catalog)
    }

    #[test]
    fn construct_as_downcasts() {
        let mut injector = injector();
        let _ = injector.load_values([("clock.tick", "5")]);
        let clock: Clock = injector.construct_as("app.Clock").expect("clock");
        assert_eq!(clock, Clock { tick: 5 });
    }

    #[test]
    fn construct_as_wrong_type() {
        let err = injector().construct_as::<String>("app.Clock").unwrap_err();
        assert!(matches!(err, RivetError::ConstructionFailed { .. }));
    }

    #[test]
    fn bindings_are_validated_against_catalog() {
        let mut injector = injector();
        let _ = injector
            .load_bindings([("app.TimeSource", "app.Clock")])
            .expect("valid");
        let err = injector
            .load_bindings([("app.TimeSource", "app.Sundial")])
            .unwrap_err();
        assert!(matches!(err, RivetError::BindingLoadFailed { .. }));
        assert_eq!(
            injector.bindings().lookup("app.TimeSource").map(TypeName::as_str),
            Some("app.Clock")
        );
    }

    #[test]
    fn failed_value_load_keeps_values() {
        let mut injector = injector();
        let _ = injector.load_values_str("clock.tick=3\n").expect("load");
        assert!(injector.load_values_str("clock.tick=\\u00\n").is_err());
        assert_eq!(injector.values().lookup("clock.tick"), Some("3"));
    }

    #[test]
    fn settings_are_applied() {
        let settings = InjectorSettings {
            detect_cycles: false,
            ..InjectorSettings::default()
        };
        let injector = injector().with_settings(settings.clone());
        assert_eq!(injector.settings(), &settings);
    }
}
