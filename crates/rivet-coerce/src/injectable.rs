//! Static mapping from Rust types to coercion shapes.
//!
//! A parameter or field declared as `Vec<i32>` coerces as `list<int>`,
//! `Box<[bool]>` as `array<bool>`, and so on. The shape is known before any
//! raw string is looked at.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::shape::{InjectableShape, ScalarKind};
use crate::value::{Scalar, Value};

/// A primitive Rust type that a single token can coerce into.
pub trait FromScalar: Sized + 'static {
    /// The scalar kind this type coerces from.
    const KIND: ScalarKind;

    /// Extracts `Self` from a scalar of the matching kind.
    fn from_scalar(scalar: Scalar) -> Option<Self>;
}

impl FromScalar for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            Scalar::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl FromScalar for i32 {
    const KIND: ScalarKind = ScalarKind::Int;

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            Scalar::Int(n) => Some(n),
            _ => None,
        }
    }
}

impl FromScalar for String {
    const KIND: ScalarKind = ScalarKind::Str;

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// A Rust type that a value directive can be injected into.
pub trait Injectable: Sized + 'static {
    /// The shape raw strings are coerced into for this type.
    fn shape() -> InjectableShape;

    /// Converts a coerced value of [`Self::shape`] into `Self`.
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! scalar_injectable {
    ($($ty:ty),*) => {
        $(
            impl Injectable for $ty {
                fn shape() -> InjectableShape {
                    InjectableShape::Scalar(<$ty as FromScalar>::KIND)
                }

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::Scalar(scalar) => <$ty as FromScalar>::from_scalar(scalar),
                        _ => None,
                    }
                }
            }
        )*
    };
}

scalar_injectable!(bool, i32, String);

fn collect_scalars<T: FromScalar, C: FromIterator<T>>(
    items: impl IntoIterator<Item = Scalar>,
) -> Option<C> {
    items.into_iter().map(T::from_scalar).collect()
}

impl<T: FromScalar> Injectable for Box<[T]> {
    fn shape() -> InjectableShape {
        InjectableShape::Array(T::KIND)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(items) => collect_scalars::<T, Vec<T>>(items).map(Vec::into_boxed_slice),
            _ => None,
        }
    }
}

impl<T: FromScalar> Injectable for Vec<T> {
    fn shape() -> InjectableShape {
        InjectableShape::List(T::KIND)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::List(items) => collect_scalars::<T, Self>(items),
            _ => None,
        }
    }
}

impl<T: FromScalar + Eq + Hash> Injectable for HashSet<T> {
    fn shape() -> InjectableShape {
        InjectableShape::Set(T::KIND)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Set(items) => collect_scalars::<T, Self>(items),
            _ => None,
        }
    }
}

impl<K: FromScalar + Eq + Hash, V: FromScalar> Injectable for HashMap<K, V> {
    fn shape() -> InjectableShape {
        InjectableShape::Map(K::KIND, V::KIND)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| Some((K::from_scalar(k)?, V::from_scalar(v)?)))
                .collect(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_follow_rust_types() {
        assert_eq!(bool::shape(), InjectableShape::Scalar(ScalarKind::Bool));
        assert_eq!(<Box<[i32]>>::shape(), InjectableShape::Array(ScalarKind::Int));
        assert_eq!(<Vec<String>>::shape(), InjectableShape::List(ScalarKind::Str));
        assert_eq!(<HashSet<bool>>::shape(), InjectableShape::Set(ScalarKind::Bool));
        assert_eq!(
            <HashMap<String, i32>>::shape(),
            InjectableShape::Map(ScalarKind::Str, ScalarKind::Int)
        );
    }

    #[test]
    fn scalar_conversion_checks_kind() {
        assert_eq!(i32::from_value(Value::Scalar(Scalar::Int(5))), Some(5));
        assert_eq!(i32::from_value(Value::Scalar(Scalar::Bool(true))), None);
        assert_eq!(String::from_value(Value::List(Vec::new())), None);
    }

    #[test]
    fn list_and_array_are_distinct() {
        let items = vec![Scalar::Int(1), Scalar::Int(2)];
        assert_eq!(
            <Vec<i32>>::from_value(Value::List(items.clone())),
            Some(vec![1, 2])
        );
        assert_eq!(<Vec<i32>>::from_value(Value::Array(items.clone())), None);
        let array = <Box<[i32]>>::from_value(Value::Array(items)).expect("array");
        assert_eq!(&*array, &[1, 2]);
    }

    #[test]
    fn map_conversion() {
        let mut entries = HashMap::new();
        let _ = entries.insert(Scalar::Str("a".into()), Scalar::Int(1));
        let map = <HashMap<String, i32>>::from_value(Value::Map(entries)).expect("map");
        assert_eq!(map.get("a"), Some(&1));
    }
}
