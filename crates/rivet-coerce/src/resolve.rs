//! Directive resolution: store lookup followed by shape dispatch.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use rivet_common::error::Result;

use crate::composite;
use crate::directive::ValueDirective;
use crate::scalar;
use crate::shape::InjectableShape;
use crate::value::Value;

/// Read-only lookup of raw configuration values by key.
pub trait ValueSource {
    /// Returns the raw value stored under `key`.
    fn raw_value(&self, key: &str) -> Option<&str>;
}

impl<S: BuildHasher> ValueSource for HashMap<String, String, S> {
    fn raw_value(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl ValueSource for BTreeMap<String, String> {
    fn raw_value(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

/// A coerced value and the number of tokens or entries rejected on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coerced {
    /// The coerced value.
    pub value: Value,
    /// Rejected tokens (composites) or rejected leading candidates (scalars).
    pub dropped: usize,
}

/// Returns the candidate string for a directive: the stored value when the
/// expression names a key, the expression itself otherwise.
pub fn candidate<'a, S: ValueSource + ?Sized>(directive: &'a ValueDirective, source: &'a S) -> &'a str {
    source
        .raw_value(directive.expression())
        .unwrap_or_else(|| directive.expression())
}

/// Coerces a raw candidate string into `shape`.
///
/// # Errors
///
/// Returns an error if a composite candidate is not bracketed.
pub fn coerce(shape: InjectableShape, candidate: &str, delimiter: &str) -> Result<Coerced> {
    let coerced = match shape {
        InjectableShape::Scalar(kind) => {
            let (value, dropped) = scalar::first_accepted(kind, candidate, delimiter);
            Coerced {
                value: Value::Scalar(value),
                dropped,
            }
        }
        InjectableShape::Array(kind) => {
            let parsed = composite::sequence(kind, candidate, delimiter)?;
            Coerced {
                value: Value::Array(parsed.items),
                dropped: parsed.dropped,
            }
        }
        InjectableShape::List(kind) => {
            let parsed = composite::sequence(kind, candidate, delimiter)?;
            Coerced {
                value: Value::List(parsed.items),
                dropped: parsed.dropped,
            }
        }
        InjectableShape::Set(kind) => {
            let parsed = composite::set(kind, candidate, delimiter)?;
            Coerced {
                value: Value::Set(parsed.items),
                dropped: parsed.dropped,
            }
        }
        InjectableShape::Map(key, value) => {
            let parsed = composite::map(key, value, candidate, delimiter)?;
            Coerced {
                value: Value::Map(parsed.items),
                dropped: parsed.dropped,
            }
        }
    };
    Ok(coerced)
}

/// Resolves a directive against `source` and coerces it into `shape`.
///
/// # Errors
///
/// Returns an error if a composite candidate is not bracketed.
pub fn resolve<S: ValueSource + ?Sized>(
    directive: &ValueDirective,
    shape: InjectableShape,
    source: &S,
) -> Result<Coerced> {
    let raw = candidate(directive, source);
    let coerced = coerce(shape, raw, directive.delimiter())?;
    if coerced.dropped > 0 {
        tracing::debug!(
            expression = directive.expression(),
            %shape,
            dropped = coerced.dropped,
            "rejected tokens while coercing value"
        );
    }
    Ok(coerced)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::shape::ScalarKind;
    use crate::value::Scalar;

    fn store(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn literal_used_when_key_missing() {
        let source = store(&[]);
        let coerced = resolve(
            &ValueDirective::new("true,false"),
            InjectableShape::Scalar(ScalarKind::Bool),
            &source,
        )
        .expect("resolve");
        assert_eq!(coerced.value, Value::Scalar(Scalar::Bool(true)));
    }

    #[test]
    fn stored_value_replaces_key() {
        let source = store(&[("car.seats", "x,5")]);
        let coerced = resolve(
            &ValueDirective::new("car.seats"),
            InjectableShape::Scalar(ScalarKind::Int),
            &source,
        )
        .expect("resolve");
        assert_eq!(coerced.value, Value::Scalar(Scalar::Int(5)));
        assert_eq!(coerced.dropped, 1);
    }

    #[test]
    fn list_from_literal_drops_bad_token() {
        let coerced = resolve(
            &ValueDirective::new("[1,2,x,3]"),
            InjectableShape::List(ScalarKind::Int),
            &store(&[]),
        )
        .expect("resolve");
        assert_eq!(
            coerced.value,
            Value::List(vec![Scalar::Int(1), Scalar::Int(2), Scalar::Int(3)])
        );
        assert_eq!(coerced.dropped, 1);
    }

    #[test]
    fn set_from_stored_value() {
        let source = store(&[("tags", "{a|b|a}")]);
        let coerced = resolve(
            &ValueDirective::new("tags").with_delimiter("|"),
            InjectableShape::Set(ScalarKind::Str),
            &source,
        )
        .expect("resolve");
        let expected: HashSet<Scalar> = ["a", "b"]
            .iter()
            .map(|s| Scalar::Str((*s).to_owned()))
            .collect();
        assert_eq!(coerced.value, Value::Set(expected));
    }

    #[test]
    fn array_keeps_array_variant() {
        let coerced = coerce(InjectableShape::Array(ScalarKind::Bool), "[true,false]", ",")
            .expect("coerce");
        assert!(matches!(coerced.value, Value::Array(ref items) if items.len() == 2));
    }

    #[test]
    fn map_from_literal() {
        let coerced = coerce(
            InjectableShape::Map(ScalarKind::Str, ScalarKind::Int),
            "[a:1,b:x,c:3]",
            ",",
        )
        .expect("coerce");
        let Value::Map(entries) = coerced.value else {
            panic!("expected a map");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries.get(&Scalar::Str("a".into())), Some(&Scalar::Int(1)));
        assert_eq!(entries.get(&Scalar::Str("c".into())), Some(&Scalar::Int(3)));
    }

    #[test]
    fn unbracketed_composite_is_an_error() {
        let err = coerce(InjectableShape::List(ScalarKind::Int), "1", ",").unwrap_err();
        assert!(err.to_string().contains("brackets"));
    }

    #[test]
    fn btree_source_is_supported() {
        let mut source = BTreeMap::new();
        let _ = source.insert("name".to_owned(), "rivet".to_owned());
        let directive = ValueDirective::new("name");
        assert_eq!(candidate(&directive, &source), "rivet");
    }
}
