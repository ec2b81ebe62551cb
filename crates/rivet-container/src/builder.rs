//! Recursive object-graph construction.
//!
//! A construction request resolves the bound concrete type, selects its
//! constructor, resolves every parameter (recursively for dependencies,
//! through value coercion for directives), invokes the factory and finally
//! injects the declared fields the same way.

use rivet_coerce::{InjectableShape, ValueDirective};
use rivet_common::config::{FailurePolicy, InjectorSettings};
use rivet_common::error::{Result, RivetError};
use rivet_common::types::TypeName;
use rivet_config::{BindingRegistry, ValueStore};

use crate::arguments::Arguments;
use crate::catalog::TypeCatalog;
use crate::descriptor::{FieldKind, Injection, Instance, ParamDescriptor, TypeDescriptor};
use crate::guard::ConstructionStack;

/// Builds object graphs from a catalog and one configuration snapshot.
///
/// The builder holds no instances: every call to [`construct`] produces a
/// fresh graph owned by the caller.
///
/// [`construct`]: ObjectGraphBuilder::construct
#[derive(Debug, Clone, Copy)]
pub struct ObjectGraphBuilder<'a> {
    catalog: &'a TypeCatalog,
    bindings: &'a BindingRegistry,
    values: &'a ValueStore,
    settings: &'a InjectorSettings,
}

impl<'a> ObjectGraphBuilder<'a> {
    /// Creates a builder over the given configuration snapshot.
    #[must_use]
    pub const fn new(
        catalog: &'a TypeCatalog,
        bindings: &'a BindingRegistry,
        values: &'a ValueStore,
        settings: &'a InjectorSettings,
    ) -> Self {
        Self {
            catalog,
            bindings,
            values,
            settings,
        }
    }

    /// Constructs an instance of `target`, or of the type bound to it.
    ///
    /// When `target` is bound to another type and that type declares a
    /// conversion for `target`, the converted representation is returned.
    ///
    /// # Errors
    ///
    /// Returns `UnknownType`, `NoUsableConstructor`, `ConstructionFailed`,
    /// `FieldInjectionFailed` or `CyclicDependency`. Under the isolating
    /// failure policy only failures of `target` itself are reported; failed
    /// dependencies become absent.
    pub fn construct(&self, target: &TypeName) -> Result<Instance> {
        let mut stack = ConstructionStack::new(self.settings.detect_cycles);
        self.construct_in(target, &mut stack)
    }

    fn construct_in(&self, requested: &TypeName, stack: &mut ConstructionStack) -> Result<Instance> {
        let concrete = self.bindings.resolve(requested);
        let descriptor = self.catalog.require(concrete)?;
        tracing::debug!(
            requested = %requested,
            concrete = %concrete,
            depth = stack.depth(),
            "constructing"
        );

        stack.push(concrete)?;
        let built = self.build(descriptor, stack);
        stack.pop();
        let instance = built?;

        if requested == concrete {
            Ok(instance)
        } else {
            descriptor.convert(requested, instance)
        }
    }

    fn build(&self, descriptor: &TypeDescriptor, stack: &mut ConstructionStack) -> Result<Instance> {
        let type_name = descriptor.name();
        let constructor = descriptor.select_constructor()?;

        let mut slots = Vec::with_capacity(constructor.params().len());
        for (index, param) in constructor.params().iter().enumerate() {
            let outcome = match param {
                ParamDescriptor::Dependency(dependency) => {
                    self.construct_in(dependency, stack).map(Injection::Object)
                }
                ParamDescriptor::Value { directive, shape } => self.coerce(directive, *shape),
            };
            let slot = self.absorb(outcome, |e| RivetError::ConstructionFailed {
                type_name: type_name.to_string(),
                message: format!("parameter {index}: {e}"),
            })?;
            slots.push(slot);
        }

        let mut args = Arguments::new(type_name.clone(), slots);
        let mut instance = constructor.invoke(&mut args).map_err(|e| match e {
            RivetError::ConstructionFailed { .. } => e,
            other => RivetError::ConstructionFailed {
                type_name: type_name.to_string(),
                message: other.to_string(),
            },
        })?;

        for field in descriptor.fields() {
            let outcome = match field.kind() {
                FieldKind::Inject(dependency) => {
                    self.construct_in(dependency, stack).map(Injection::Object)
                }
                FieldKind::Value { directive, shape } => self.coerce(directive, *shape),
            };
            let failed = |message: String| RivetError::FieldInjectionFailed {
                type_name: type_name.to_string(),
                field: field.name().to_owned(),
                message,
            };
            let injected = outcome.and_then(|injection| {
                field.set(&mut *instance, injection).map_err(failed)
            });
            let _ = self.absorb(injected.map(|()| Injection::Absent), |e| match e {
                RivetError::FieldInjectionFailed { .. } => e,
                other => failed(other.to_string()),
            })?;
        }

        Ok(instance)
    }

    fn coerce(&self, directive: &ValueDirective, shape: InjectableShape) -> Result<Injection> {
        let coerced = rivet_coerce::resolve(directive, shape, self.values)?;
        Ok(Injection::Value(coerced.value))
    }

    /// Applies the failure policy to the outcome of one parameter or field.
    /// Fatal errors always propagate; `wrap` attaches the site to the others.
    fn absorb<F>(&self, outcome: Result<Injection>, wrap: F) -> Result<Injection>
    where
        F: FnOnce(RivetError) -> RivetError,
    {
        match outcome {
            Ok(injection) => Ok(injection),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                let e = wrap(e);
                match self.settings.failure_policy {
                    FailurePolicy::Abort => Err(e),
                    FailurePolicy::Isolate => {
                        tracing::warn!(error = %e, "injection failed, leaving it absent");
                        Ok(Injection::Absent)
                    }
                }
            }
        }
    }
}
