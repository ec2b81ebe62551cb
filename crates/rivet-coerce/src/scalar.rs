//! Acceptance predicates and parsers for single tokens.
//!
//! `accepts` and `parse` are split so composite coercion can filter tokens
//! before committing to a value.

use crate::shape::ScalarKind;
use crate::value::Scalar;

/// Returns `true` if `token` is a valid literal of `kind`.
///
/// - bool: `true` or `false`, ASCII case-insensitive.
/// - int: an optionally signed decimal that fits in an `i32`.
/// - string: always.
#[must_use]
pub fn accepts(kind: ScalarKind, token: &str) -> bool {
    match kind {
        ScalarKind::Bool => parse_bool(token).is_some(),
        ScalarKind::Int => token.parse::<i32>().is_ok(),
        ScalarKind::Str => true,
    }
}

/// Parses `token` as `kind`, or returns `None` if it is not accepted.
#[must_use]
pub fn parse(kind: ScalarKind, token: &str) -> Option<Scalar> {
    match kind {
        ScalarKind::Bool => parse_bool(token).map(Scalar::Bool),
        ScalarKind::Int => token.parse().ok().map(Scalar::Int),
        ScalarKind::Str => Some(Scalar::Str(token.to_owned())),
    }
}

fn parse_bool(token: &str) -> Option<bool> {
    if token.eq_ignore_ascii_case("true") {
        Some(true)
    } else if token.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Splits `candidate` on a literal delimiter. An empty delimiter keeps the
/// candidate whole.
pub(crate) fn split<'a>(candidate: &'a str, delimiter: &str) -> Vec<&'a str> {
    if delimiter.is_empty() {
        vec![candidate]
    } else {
        candidate.split(delimiter).collect()
    }
}

/// Coerces the first accepted token of `candidate`, falling back to the
/// kind's default. Returns the value and the number of rejected tokens
/// examined before it.
#[must_use]
pub fn first_accepted(kind: ScalarKind, candidate: &str, delimiter: &str) -> (Scalar, usize) {
    let mut rejected = 0;
    for token in split(candidate, delimiter) {
        if let Some(parsed) = parse(kind, token) {
            return (parsed, rejected);
        }
        rejected += 1;
    }
    (Scalar::default_for(kind), rejected)
}
