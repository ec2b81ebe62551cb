//! Statically declared construction metadata.
//!
//! A [`TypeDescriptor`] states how a type is built: its constructors with
//! their parameter lists, the fields injected after construction, and the
//! abstract types it can be handed out as. Descriptors are assembled with
//! the typed [`TypeDescriptorBuilder`] so that factories and setters work on
//! the concrete Rust type while the builder only sees type-erased
//! [`Instance`]s.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use rivet_coerce::{Injectable, InjectableShape, Value, ValueDirective};
use rivet_common::error::{Result, RivetError};
use rivet_common::types::TypeName;

use crate::arguments::Arguments;

/// A constructed, type-erased object.
pub type Instance = Box<dyn Any>;

/// What the builder produced for one parameter or field.
#[derive(Debug)]
pub enum Injection {
    /// A recursively constructed dependency.
    Object(Instance),
    /// A coerced configuration value.
    Value(Value),
    /// Nothing could be produced.
    Absent,
}

/// One constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamDescriptor {
    /// Constructed recursively from the named type.
    Dependency(TypeName),
    /// Coerced from configuration.
    Value {
        /// Key-or-literal expression and delimiter.
        directive: ValueDirective,
        /// Shape derived from the parameter's Rust type.
        shape: InjectableShape,
    },
}

impl ParamDescriptor {
    /// A parameter constructed from `type_name`.
    #[must_use]
    pub fn dependency(type_name: impl Into<TypeName>) -> Self {
        Self::Dependency(type_name.into())
    }

    /// A parameter of Rust type `V`, coerced from `directive`.
    #[must_use]
    pub fn value<V: Injectable>(directive: ValueDirective) -> Self {
        Self::Value {
            directive,
            shape: V::shape(),
        }
    }
}

type Factory = Box<dyn Fn(&mut Arguments) -> Result<Instance>>;

/// A constructor: parameter list, injection marker and factory.
pub struct ConstructorDescriptor {
    params: Vec<ParamDescriptor>,
    injectable: bool,
    factory: Factory,
}

impl ConstructorDescriptor {
    /// Parameters in declaration order.
    #[must_use]
    pub fn params(&self) -> &[ParamDescriptor] {
        &self.params
    }

    /// Whether the constructor carries the injection marker.
    #[must_use]
    pub const fn is_injectable(&self) -> bool {
        self.injectable
    }

    /// Invokes the factory with resolved arguments.
    ///
    /// # Errors
    ///
    /// Returns the factory's error.
    pub fn invoke(&self, args: &mut Arguments) -> Result<Instance> {
        (self.factory)(args)
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("params", &self.params)
            .field("injectable", &self.injectable)
            .finish_non_exhaustive()
    }
}

/// How a field receives its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Constructed recursively from the named type.
    Inject(TypeName),
    /// Coerced from configuration.
    Value {
        /// Key-or-literal expression and delimiter.
        directive: ValueDirective,
        /// Shape derived from the field's Rust type.
        shape: InjectableShape,
    },
}

type Setter = Box<dyn Fn(&mut dyn Any, Injection) -> std::result::Result<(), String>>;

/// A field injected after construction.
pub struct FieldDescriptor {
    name: String,
    kind: FieldKind,
    setter: Setter,
}

impl FieldDescriptor {
    /// Field name, used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// How the field receives its value.
    #[must_use]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Stores `injection` into the field of `target`.
    ///
    /// # Errors
    ///
    /// Returns a description of the mismatch if `target` or `injection`
    /// has an unexpected type.
    pub fn set(&self, target: &mut dyn Any, injection: Injection) -> std::result::Result<(), String> {
        (self.setter)(target, injection)
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

type Conversion = Box<dyn Fn(Instance) -> std::result::Result<Instance, String>>;

/// Everything the builder needs to know about one concrete type.
pub struct TypeDescriptor {
    name: TypeName,
    constructors: Vec<ConstructorDescriptor>,
    fields: Vec<FieldDescriptor>,
    conversions: HashMap<TypeName, Conversion>,
}

impl TypeDescriptor {
    /// Starts a descriptor for the Rust type `T`, registered as `name`.
    #[must_use]
    pub fn of<T: 'static>(name: impl Into<TypeName>) -> TypeDescriptorBuilder<T> {
        TypeDescriptorBuilder {
            descriptor: Self {
                name: name.into(),
                constructors: Vec::new(),
                fields: Vec::new(),
                conversions: HashMap::new(),
            },
            _marker: PhantomData,
        }
    }

    /// The registered type name.
    #[must_use]
    pub const fn name(&self) -> &TypeName {
        &self.name
    }

    /// Constructors in declaration order.
    #[must_use]
    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }

    /// Injected fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns `true` if instances can be handed out as `abstract_name`.
    #[must_use]
    pub fn exposes(&self, abstract_name: &str) -> bool {
        self.conversions.contains_key(abstract_name)
    }

    /// Picks the constructor to invoke: the first one carrying the
    /// injection marker, otherwise the zero-parameter one.
    ///
    /// # Errors
    ///
    /// Returns `NoUsableConstructor` if neither exists.
    pub fn select_constructor(&self) -> Result<&ConstructorDescriptor> {
        let mut marked = self.constructors.iter().filter(|c| c.is_injectable());
        if let Some(first) = marked.next() {
            if marked.next().is_some() {
                tracing::warn!(
                    type_name = %self.name,
                    "several injectable constructors declared, using the first"
                );
            }
            return Ok(first);
        }
        self.constructors
            .iter()
            .find(|c| c.params.is_empty())
            .ok_or_else(|| RivetError::NoUsableConstructor {
                type_name: self.name.to_string(),
            })
    }

    /// Converts an instance of this type into the representation requested
    /// under `requested`. Instances are returned unchanged when no
    /// conversion is declared for that name.
    ///
    /// # Errors
    ///
    /// Returns `ConstructionFailed` if the instance is not of this type.
    pub fn convert(&self, requested: &TypeName, instance: Instance) -> Result<Instance> {
        match self.conversions.get(requested) {
            Some(convert) => convert(instance).map_err(|message| RivetError::ConstructionFailed {
                type_name: self.name.to_string(),
                message,
            }),
            None => Ok(instance),
        }
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut exposed: Vec<&TypeName> = self.conversions.keys().collect();
        exposed.sort_unstable();
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("constructors", &self.constructors)
            .field("fields", &self.fields)
            .field("exposes", &exposed)
            .finish()
    }
}

fn downcast_target<T: 'static>(target: &mut dyn Any) -> std::result::Result<&mut T, String> {
    target
        .downcast_mut::<T>()
        .ok_or_else(|| format!("target is not a {}", type_name::<T>()))
}

/// Typed builder for a [`TypeDescriptor`] of `T`.
pub struct TypeDescriptorBuilder<T> {
    descriptor: TypeDescriptor,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> TypeDescriptorBuilder<T> {
    fn push_constructor<F>(mut self, params: Vec<ParamDescriptor>, injectable: bool, factory: F) -> Self
    where
        F: Fn(&mut Arguments) -> Result<T> + 'static,
    {
        self.descriptor.constructors.push(ConstructorDescriptor {
            params,
            injectable,
            factory: Box::new(move |args| Ok(Box::new(factory(args)?) as Instance)),
        });
        self
    }

    /// Adds an unmarked constructor. It is only selected when it takes no
    /// parameters and no constructor carries the injection marker.
    #[must_use]
    pub fn constructor<F>(self, params: Vec<ParamDescriptor>, factory: F) -> Self
    where
        F: Fn(&mut Arguments) -> Result<T> + 'static,
    {
        self.push_constructor(params, false, factory)
    }

    /// Adds a constructor carrying the injection marker.
    #[must_use]
    pub fn inject_constructor<F>(self, params: Vec<ParamDescriptor>, factory: F) -> Self
    where
        F: Fn(&mut Arguments) -> Result<T> + 'static,
    {
        self.push_constructor(params, true, factory)
    }

    /// Adds a field constructed from `dependency` and stored by `setter`.
    /// `D` is the Rust type the dependency is delivered as, for example
    /// `Box<dyn Engine>` for an abstract type.
    #[must_use]
    pub fn inject_field<D, F>(mut self, name: &str, dependency: impl Into<TypeName>, setter: F) -> Self
    where
        D: 'static,
        F: Fn(&mut T, D) + 'static,
    {
        self.descriptor.fields.push(FieldDescriptor {
            name: name.to_owned(),
            kind: FieldKind::Inject(dependency.into()),
            setter: Box::new(move |target, injection| {
                let target = downcast_target::<T>(target)?;
                match injection {
                    Injection::Object(object) => {
                        let dependency = object
                            .downcast::<D>()
                            .map_err(|_| format!("dependency is not a {}", type_name::<D>()))?;
                        setter(target, *dependency);
                        Ok(())
                    }
                    Injection::Value(_) => Err("expected an object, got a value".into()),
                    Injection::Absent => Err("dependency is absent".into()),
                }
            }),
        });
        self
    }

    /// Adds a field of Rust type `V` coerced from `directive` and stored by
    /// `setter`.
    #[must_use]
    pub fn value_field<V, F>(mut self, name: &str, directive: ValueDirective, setter: F) -> Self
    where
        V: Injectable,
        F: Fn(&mut T, V) + 'static,
    {
        self.descriptor.fields.push(FieldDescriptor {
            name: name.to_owned(),
            kind: FieldKind::Value {
                directive,
                shape: V::shape(),
            },
            setter: Box::new(move |target, injection| {
                let target = downcast_target::<T>(target)?;
                match injection {
                    Injection::Value(value) => {
                        let value = V::from_value(value)
                            .ok_or_else(|| format!("value is not a {}", V::shape()))?;
                        setter(target, value);
                        Ok(())
                    }
                    Injection::Object(_) => Err("expected a value, got an object".into()),
                    Injection::Absent => Err("value is absent".into()),
                }
            }),
        });
        self
    }

    /// Declares that instances may be requested as `abstract_name`, in
    /// which case they are handed out as `convert(instance)`.
    #[must_use]
    pub fn exposes_as<I, F>(mut self, abstract_name: impl Into<TypeName>, convert: F) -> Self
    where
        I: 'static,
        F: Fn(T) -> I + 'static,
    {
        let _ = self.descriptor.conversions.insert(
            abstract_name.into(),
            Box::new(move |instance: Instance| {
                let concrete = instance
                    .downcast::<T>()
                    .map_err(|_| format!("instance is not a {}", type_name::<T>()))?;
                Ok(Box::new(convert(*concrete)) as Instance)
            }),
        );
        self
    }

    /// Finishes the descriptor.
    #[must_use]
    pub fn build(self) -> TypeDescriptor {
        self.descriptor
    }
}

impl<T: Default + 'static> TypeDescriptorBuilder<T> {
    /// Adds a zero-parameter constructor using `T::default()`.
    #[must_use]
    pub fn default_constructor(self) -> Self {
        self.constructor(Vec::new(), |_| Ok(T::default()))
    }
}
