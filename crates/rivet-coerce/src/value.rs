//! Typed values produced by coercion.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::shape::ScalarKind;

/// A single coerced primitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scalar {
    /// A boolean.
    Bool(bool),
    /// A signed 32-bit integer.
    Int(i32),
    /// A string.
    Str(String),
}

impl Scalar {
    /// Returns the value produced when no token is accepted for `kind`.
    #[must_use]
    pub const fn default_for(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Bool => Self::Bool(false),
            ScalarKind::Int => Self::Int(0),
            ScalarKind::Str => Self::Str(String::new()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

/// A coerced value of any supported shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A single primitive.
    Scalar(Scalar),
    /// Elements in token order.
    Array(Vec<Scalar>),
    /// Elements in token order.
    List(Vec<Scalar>),
    /// Distinct elements.
    Set(HashSet<Scalar>),
    /// Entries with distinct keys.
    Map(HashMap<Scalar, Scalar>),
}

impl Value {
    /// Returns the number of elements, or 1 for a scalar.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Array(items) | Self::List(items) => items.len(),
            Self::Set(items) => items.len(),
            Self::Map(entries) => entries.len(),
        }
    }

    /// Returns `true` for an empty composite.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    open: char,
    items: &[T],
    close: char,
) -> fmt::Result {
    write!(f, "{open}")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "{close}")
}

// Sets and maps are printed sorted so output is stable across runs.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => write!(f, "{s}"),
            Self::Array(items) | Self::List(items) => write_joined(f, '[', items, ']'),
            Self::Set(items) => {
                let mut sorted: Vec<&Scalar> = items.iter().collect();
                sorted.sort();
                write_joined(f, '{', &sorted, '}')
            }
            Self::Map(entries) => {
                let mut sorted: Vec<(&Scalar, &Scalar)> = entries.iter().collect();
                sorted.sort();
                let rendered: Vec<String> =
                    sorted.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write_joined(f, '{', &rendered, '}')
            }
        }
    }
}
