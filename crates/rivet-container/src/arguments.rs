//! Typed access to resolved constructor arguments.

use std::any::type_name;

use rivet_coerce::Injectable;
use rivet_common::error::{Result, RivetError};
use rivet_common::types::TypeName;

use crate::descriptor::Injection;

/// Arguments handed to a constructor factory, one slot per parameter.
///
/// Each slot can be taken once; taking it again yields an absent slot.
#[derive(Debug)]
pub struct Arguments {
    type_name: TypeName,
    slots: Vec<Injection>,
}

impl Arguments {
    /// Wraps resolved slots for the constructor of `type_name`.
    #[must_use]
    pub const fn new(type_name: TypeName, slots: Vec<Injection>) -> Self {
        Self { type_name, slots }
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the constructor takes no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn fail(&self, message: String) -> RivetError {
        RivetError::ConstructionFailed {
            type_name: self.type_name.to_string(),
            message,
        }
    }

    fn take(&mut self, index: usize) -> Result<Injection> {
        let count = self.slots.len();
        match self.slots.get_mut(index) {
            Some(slot) => Ok(std::mem::replace(slot, Injection::Absent)),
            None => Err(self.fail(format!(
                "argument {index} out of range, constructor has {count}"
            ))),
        }
    }

    /// Takes the dependency in slot `index`, or `None` if it is absent.
    ///
    /// # Errors
    ///
    /// Returns `ConstructionFailed` if the slot holds something other than
    /// a `T`.
    pub fn object<T: 'static>(&mut self, index: usize) -> Result<Option<T>> {
        match self.take(index)? {
            Injection::Object(object) => object.downcast::<T>().map(|boxed| Some(*boxed)).map_err(|_| {
                self.fail(format!("argument {index} is not a {}", type_name::<T>()))
            }),
            Injection::Absent => Ok(None),
            Injection::Value(_) => Err(self.fail(format!(
                "argument {index} is a configured value, expected a {}",
                type_name::<T>()
            ))),
        }
    }

    /// Takes the dependency in slot `index`.
    ///
    /// # Errors
    ///
    /// Returns `ConstructionFailed` if the slot is absent or holds something
    /// other than a `T`.
    pub fn require<T: 'static>(&mut self, index: usize) -> Result<T> {
        self.object(index)?
            .ok_or_else(|| self.fail(format!("required argument {index} is absent")))
    }

    fn take_value<V: Injectable>(&mut self, index: usize) -> Result<Option<V>> {
        match self.take(index)? {
            Injection::Value(value) => V::from_value(value).map(Some).ok_or_else(|| {
                self.fail(format!("argument {index} is not a {}", V::shape()))
            }),
            Injection::Absent => Ok(None),
            Injection::Object(_) => Err(self.fail(format!(
                "argument {index} is an object, expected a {}",
                V::shape()
            ))),
        }
    }

    /// Takes the coerced value in slot `index`.
    ///
    /// # Errors
    ///
    /// Returns `ConstructionFailed` if the slot is absent or holds a value
    /// of another shape.
    pub fn value<V: Injectable>(&mut self, index: usize) -> Result<V> {
        self.take_value(index)?
            .ok_or_else(|| self.fail(format!("required value {index} is absent")))
    }

    /// Takes the coerced value in slot `index`, falling back to
    /// `V::default()` when it is absent.
    ///
    /// # Errors
    ///
    /// Returns `ConstructionFailed` if the slot holds a value of another
    /// shape.
    pub fn value_or_default<V: Injectable + Default>(&mut self, index: usize) -> Result<V> {
        Ok(self.take_value(index)?.unwrap_or_default())
    }
}
