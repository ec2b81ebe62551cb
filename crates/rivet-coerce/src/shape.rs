//! Coercion targets and their textual notation.
//!
//! Shapes are written `bool`, `int`, `string`, `array<K>`, `list<K>`,
//! `set<K>` and `map<K, V>`; the parser is built on `nom`.

use std::fmt;
use std::str::FromStr;

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, multispace0},
    combinator::{all_consuming, map, value},
    sequence::{delimited, preceded, separated_pair},
};
use rivet_common::error::RivetError;

/// One of the three primitive kinds a token can be coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// `true` / `false`, case-insensitive.
    Bool,
    /// Signed 32-bit integer.
    Int,
    /// Any string, taken verbatim.
    Str,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Str => write!(f, "string"),
        }
    }
}

/// The shape a parameter or field expects its configured value to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InjectableShape {
    /// A single primitive.
    Scalar(ScalarKind),
    /// A fixed-size sequence, order preserved.
    Array(ScalarKind),
    /// A growable sequence, order preserved.
    List(ScalarKind),
    /// An unordered collection without duplicates.
    Set(ScalarKind),
    /// Key/value pairs with unique keys.
    Map(ScalarKind, ScalarKind),
}

impl InjectableShape {
    /// Returns `true` for shapes written as bracketed composite literals.
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        !matches!(self, Self::Scalar(_))
    }
}

impl fmt::Display for InjectableShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::Array(kind) => write!(f, "array<{kind}>"),
            Self::List(kind) => write!(f, "list<{kind}>"),
            Self::Set(kind) => write!(f, "set<{kind}>"),
            Self::Map(key, value) => write!(f, "map<{key},{value}>"),
        }
    }
}

fn scalar_kind(input: &str) -> IResult<&str, ScalarKind> {
    alt((
        value(ScalarKind::Bool, alt((tag("boolean"), tag("bool")))),
        value(ScalarKind::Int, alt((tag("integer"), tag("int")))),
        value(ScalarKind::Str, alt((tag("string"), tag("str")))),
    ))
    .parse(input)
}

fn padded_kind(input: &str) -> IResult<&str, ScalarKind> {
    delimited(multispace0, scalar_kind, multispace0).parse(input)
}

/// Parses `<K>`.
fn element(input: &str) -> IResult<&str, ScalarKind> {
    delimited(char('<'), padded_kind, char('>')).parse(input)
}

/// Parses `<K, V>`.
fn entry(input: &str) -> IResult<&str, (ScalarKind, ScalarKind)> {
    delimited(
        char('<'),
        separated_pair(padded_kind, char(','), padded_kind),
        char('>'),
    )
    .parse(input)
}

fn shape(input: &str) -> IResult<&str, InjectableShape> {
    alt((
        map(preceded(tag("array"), element), InjectableShape::Array),
        map(preceded(tag("list"), element), InjectableShape::List),
        map(preceded(tag("set"), element), InjectableShape::Set),
        map(preceded(tag("map"), entry), |(k, v)| InjectableShape::Map(k, v)),
        map(scalar_kind, InjectableShape::Scalar),
    ))
    .parse(input)
}

impl FromStr for InjectableShape {
    type Err = RivetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        all_consuming(shape)
            .parse(lowered.as_str())
            .map(|(_, parsed)| parsed)
            .map_err(|e| RivetError::Config {
                message: format!("invalid shape {s:?}: {e}"),
            })
    }
}
