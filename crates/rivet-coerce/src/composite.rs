//! Coercion of bracketed, delimited composite literals.
//!
//! A composite literal such as `[1,2,3]` or `{a:1,b:2}` loses exactly one
//! character at each end, is split on the directive's delimiter, and every
//! non-empty token is coerced independently. Tokens that do not coerce are
//! dropped and counted.

use std::collections::{HashMap, HashSet};

use rivet_common::constants::MAP_ENTRY_SEPARATOR;
use rivet_common::error::{Result, RivetError};

use crate::scalar::{self, split};
use crate::shape::ScalarKind;
use crate::value::Scalar;

/// Elements kept from a composite literal, plus how many were rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<T> {
    /// Accepted elements.
    pub items: T,
    /// Non-empty tokens that were rejected.
    pub dropped: usize,
}

/// Removes the enclosing bracket characters of a composite literal.
///
/// # Errors
///
/// Returns an error if the candidate is shorter than two characters.
pub fn strip_brackets(candidate: &str) -> Result<&str> {
    let mut chars = candidate.chars();
    match (chars.next(), chars.next_back()) {
        (Some(_), Some(_)) => Ok(chars.as_str()),
        _ => Err(RivetError::Coercion {
            candidate: candidate.to_owned(),
            message: "composite literal must be wrapped in brackets".into(),
        }),
    }
}

fn tokens<'a>(candidate: &'a str, delimiter: &str) -> Result<Vec<&'a str>> {
    let body = strip_brackets(candidate)?;
    Ok(split(body, delimiter)
        .into_iter()
        .filter(|token| !token.is_empty())
        .collect())
}

/// Coerces an ordered sequence of `kind`, keeping token order.
///
/// # Errors
///
/// Returns an error if the candidate is not a bracketed literal.
pub fn sequence(kind: ScalarKind, candidate: &str, delimiter: &str) -> Result<Parsed<Vec<Scalar>>> {
    let mut items = Vec::new();
    let mut dropped = 0;
    for token in tokens(candidate, delimiter)? {
        match scalar::parse(kind, token) {
            Some(parsed) => items.push(parsed),
            None => dropped += 1,
        }
    }
    Ok(Parsed { items, dropped })
}

/// Coerces a set of `kind`; duplicate values collapse into one element.
///
/// # Errors
///
/// Returns an error if the candidate is not a bracketed literal.
pub fn set(kind: ScalarKind, candidate: &str, delimiter: &str) -> Result<Parsed<HashSet<Scalar>>> {
    let Parsed { items, dropped } = sequence(kind, candidate, delimiter)?;
    Ok(Parsed {
        items: items.into_iter().collect(),
        dropped,
    })
}

/// Coerces a map whose entries are written `key:value`.
///
/// An entry is kept only when it has exactly one separator and both sides
/// are accepted by their kinds. Later entries overwrite earlier ones with an
/// equal typed key.
///
/// # Errors
///
/// Returns an error if the candidate is not a bracketed literal.
pub fn map(
    key_kind: ScalarKind,
    value_kind: ScalarKind,
    candidate: &str,
    delimiter: &str,
) -> Result<Parsed<HashMap<Scalar, Scalar>>> {
    let mut items = HashMap::new();
    let mut dropped = 0;
    for token in tokens(candidate, delimiter)? {
        match parse_entry(key_kind, value_kind, token) {
            Some((key, value)) => {
                let _ = items.insert(key, value);
            }
            None => dropped += 1,
        }
    }
    Ok(Parsed { items, dropped })
}

fn parse_entry(key_kind: ScalarKind, value_kind: ScalarKind, token: &str) -> Option<(Scalar, Scalar)> {
    let mut parts = token.split(MAP_ENTRY_SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(key), Some(value), None) => Some((
            scalar::parse(key_kind, key)?,
            scalar::parse(value_kind, value)?,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i32]) -> Vec<Scalar> {
        values.iter().copied().map(Scalar::Int).collect()
    }

    #[test]
    fn strip_removes_one_char_each_side() {
        assert_eq!(strip_brackets("[a,b]").expect("strip"), "a,b");
        assert_eq!(strip_brackets("[]").expect("strip"), "");
        assert_eq!(strip_brackets("[[x]]").expect("strip"), "[x]");
    }

    #[test]
    fn strip_handles_multibyte_brackets() {
        assert_eq!(strip_brackets("「1,2」").expect("strip"), "1,2");
    }

    #[test]
    fn strip_rejects_short_candidates() {
        assert!(strip_brackets("").is_err());
        assert!(strip_brackets("[").is_err());
    }

    #[test]
    fn sequence_drops_rejected_tokens_in_order() {
        let parsed = sequence(ScalarKind::Int, "[1,2,x,3]", ",").expect("sequence");
        assert_eq!(parsed.items, ints(&[1, 2, 3]));
        assert_eq!(parsed.dropped, 1);
    }

    #[test]
    fn sequence_skips_empty_tokens_without_counting() {
        let parsed = sequence(ScalarKind::Str, "[a,,b,]", ",").expect("sequence");
        assert_eq!(
            parsed.items,
            vec![Scalar::Str("a".into()), Scalar::Str("b".into())]
        );
        assert_eq!(parsed.dropped, 0);
    }

    #[test]
    fn sequence_of_bools_with_custom_delimiter() {
        let parsed = sequence(ScalarKind::Bool, "[true;no;FALSE]", ";").expect("sequence");
        assert_eq!(parsed.items, vec![Scalar::Bool(true), Scalar::Bool(false)]);
        assert_eq!(parsed.dropped, 1);
    }

    #[test]
    fn empty_literal_yields_empty_sequence() {
        let parsed = sequence(ScalarKind::Int, "[]", ",").expect("sequence");
        assert!(parsed.items.is_empty());
    }

    #[test]
    fn set_deduplicates() {
        let parsed = set(ScalarKind::Int, "[1,2,2,1,3]", ",").expect("set");
        assert_eq!(parsed.items.len(), 3);
        assert!(parsed.items.contains(&Scalar::Int(2)));
        assert_eq!(parsed.dropped, 0);
    }

    #[test]
    fn map_drops_bad_entries() {
        let parsed = map(ScalarKind::Str, ScalarKind::Int, "[a:1,b:x,c:3]", ",").expect("map");
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.items.get(&Scalar::Str("a".into())), Some(&Scalar::Int(1)));
        assert_eq!(parsed.items.get(&Scalar::Str("c".into())), Some(&Scalar::Int(3)));
        assert_eq!(parsed.dropped, 1);
    }

    #[test]
    fn map_requires_exactly_one_separator() {
        let parsed = map(ScalarKind::Str, ScalarKind::Str, "[a:b:c,d,e:f]", ",").expect("map");
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(
            parsed.items.get(&Scalar::Str("e".into())),
            Some(&Scalar::Str("f".into()))
        );
        assert_eq!(parsed.dropped, 2);
    }

    #[test]
    fn map_keys_collapse_after_coercion() {
        let parsed = map(ScalarKind::Int, ScalarKind::Int, "[1:10,+1:20,2:30]", ",").expect("map");
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.items.get(&Scalar::Int(1)), Some(&Scalar::Int(20)));
    }

    #[test]
    fn map_with_bool_keys() {
        let parsed = map(ScalarKind::Bool, ScalarKind::Str, "{true:on|false:off|maybe:?}", "|")
            .expect("map");
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.dropped, 1);
    }
}
