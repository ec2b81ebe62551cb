//! `.properties` parser built on `nom`.
//!
//! Supports the subset used by binding and value files:
//! - lines end at `\n`, `\r\n` or a lone `\r`;
//! - blanks are space, tab and form feed;
//! - blank lines and lines starting with `#` or `!` are ignored;
//! - `key=value`, `key:value` and `key value` are all accepted, the key
//!   ending at the first unescaped `=`, `:` or blank;
//! - a line ending in an odd number of backslashes continues on the next
//!   line, whose leading blanks are dropped;
//! - escapes `\t \n \r \f \uXXXX`; any other escaped character stands for
//!   itself.
//!
//! Later duplicate keys overwrite earlier ones when collected into a map.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{is_not, take_while, take_while_m_n},
    character::complete::{anychar, char, one_of},
    combinator::{cut, map, map_opt, opt, value},
    sequence::preceded,
};
use rivet_common::error::{Result, RivetError};

const BLANKS: [char; 3] = [' ', '\t', '\x0c'];

/// A piece of an escaped key or value.
enum Fragment<'a> {
    Literal(&'a str),
    Char(char),
}

const fn translate(c: char) -> char {
    match c {
        't' => '\t',
        'n' => '\n',
        'r' => '\r',
        'f' => '\x0c',
        other => other,
    }
}

fn unicode_escape(input: &str) -> IResult<&str, char> {
    preceded(
        char('u'),
        cut(map_opt(
            take_while_m_n(4, 4, |c: char| c.is_ascii_hexdigit()),
            |hex: &str| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32),
        )),
    )
    .parse(input)
}

fn fragment(input: &str) -> IResult<&str, Fragment<'_>> {
    alt((
        map(is_not("\\"), Fragment::Literal),
        map(preceded(char('\\'), unicode_escape), Fragment::Char),
        map(preceded(char('\\'), anychar), |c| Fragment::Char(translate(c))),
    ))
    .parse(input)
}

fn unescape(raw: &str, line: usize) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while !rest.is_empty() {
        match fragment(rest) {
            Ok((next, Fragment::Literal(s))) => {
                out.push_str(s);
                rest = next;
            }
            Ok((next, Fragment::Char(c))) => {
                out.push(c);
                rest = next;
            }
            Err(_) => {
                return Err(parse_err(line, format!("malformed escape near {rest:?}")));
            }
        }
    }
    Ok(out)
}

/// Splits off the raw (still escaped) key, stopping at the first
/// unescaped separator.
fn raw_key(input: &str) -> (&str, &str) {
    let mut escaped = false;
    for (idx, c) in input.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || BLANKS.contains(&c) {
            return (&input[..idx], &input[idx..]);
        }
    }
    (input, "")
}

fn blanks(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| BLANKS.contains(&c)).parse(input)
}

/// Consumes blanks, at most one `=` or `:`, then blanks again.
fn separator(input: &str) -> IResult<&str, ()> {
    value((), (blanks, opt(one_of("=:")), blanks)).parse(input)
}

fn parse_err(line: usize, message: String) -> RivetError {
    RivetError::Config {
        message: format!("line {line}: {message}"),
    }
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Splits on `\r\n`, `\n` and a lone `\r`.
fn physical_lines(input: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = input;
    while !rest.is_empty() {
        let Some(idx) = rest.find(['\r', '\n']) else {
            lines.push(rest);
            break;
        };
        lines.push(&rest[..idx]);
        let width = if rest[idx..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[idx + width..];
    }
    lines
}

/// Joins continuation lines and drops comments and blank lines. Each
/// logical line is paired with the 1-based number of its first physical
/// line.
fn logical_lines(input: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut lines = physical_lines(input).into_iter().enumerate();
    while let Some((idx, line)) = lines.next() {
        let trimmed = line.trim_start_matches(BLANKS);
        if trimmed.is_empty() || trimmed.starts_with(['#', '!']) {
            continue;
        }
        let mut logical = trimmed.to_owned();
        while ends_with_continuation(&logical) {
            let _ = logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start_matches(BLANKS)),
                None => break,
            }
        }
        out.push((idx + 1, logical));
    }
    out
}

/// Parses `.properties` text into entries in file order.
///
/// # Errors
///
/// Returns an error naming the line of a malformed `\u` escape.
pub fn parse_properties(input: &str) -> Result<Vec<(String, String)>> {
    let mut entries = Vec::new();
    for (line, logical) in logical_lines(input) {
        let (key, rest) = raw_key(&logical);
        let (raw_value, ()) = separator(rest)
            .map_err(|e| parse_err(line, format!("invalid separator: {e}")))?;
        entries.push((unescape(key, line)?, unescape(raw_value, line)?));
    }
    tracing::debug!(entries = entries.len(), "parsed properties input");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(input: &str) -> Vec<(String, String)> {
        parse_properties(input).expect("should parse")
    }

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_owned(), v.to_owned())
    }

    #[test]
    fn all_separator_styles() {
        let parsed = pairs("a=1\nb:2\nc 3\nd  =  4\ne\t:\t5\n");
        assert_eq!(
            parsed,
            vec![pair("a", "1"), pair("b", "2"), pair("c", "3"), pair("d", "4"), pair("e", "5")]
        );
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let parsed = pairs("# comment\n! also comment\n\n   \nkey=value\n");
        assert_eq!(parsed, vec![pair("key", "value")]);
    }

    #[test]
    fn value_keeps_colons_and_brackets() {
        let parsed = pairs("ages=[a:1,b:x,c:3]\n");
        assert_eq!(parsed, vec![pair("ages", "[a:1,b:x,c:3]")]);
    }

    #[test]
    fn binding_style_type_names() {
        let parsed = pairs("dependency_injection.Engine=dependency_injection.V8Engine\n");
        assert_eq!(
            parsed,
            vec![pair("dependency_injection.Engine", "dependency_injection.V8Engine")]
        );
    }

    #[test]
    fn continuation_lines_are_joined() {
        let parsed = pairs("list=[1,\\\n      2,\\\n  3]\n");
        assert_eq!(parsed, vec![pair("list", "[1,2,3]")]);
    }

    #[test]
    fn even_backslashes_do_not_continue() {
        let parsed = pairs("path=C:\\\\\nnext=1\n");
        assert_eq!(parsed, vec![pair("path", "C:\\"), pair("next", "1")]);
    }

    #[test]
    fn escaped_separators_belong_to_key() {
        let parsed = pairs("a\\=b\\:c\\ d=value\n");
        assert_eq!(parsed, vec![pair("a=b:c d", "value")]);
    }

    #[test]
    fn escapes_are_translated() {
        let parsed = pairs("tab=a\\tb\nuni=\\u0041\\u00e9\n");
        assert_eq!(parsed, vec![pair("tab", "a\tb"), pair("uni", "A\u{e9}")]);
    }

    #[test]
    fn malformed_unicode_escape_reports_line() {
        let err = parse_properties("ok=1\nbad=\\u12G4\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "got: {err}");
    }

    #[test]
    fn key_without_value() {
        let parsed = pairs("flag\nempty=\n");
        assert_eq!(parsed, vec![pair("flag", ""), pair("empty", "")]);
    }

    #[test]
    fn trailing_value_whitespace_is_preserved() {
        let parsed = pairs("k = v  \n");
        assert_eq!(parsed, vec![pair("k", "v  ")]);
    }

    #[test]
    fn crlf_line_endings() {
        let parsed = pairs("a=1\r\nb=2\r\n");
        assert_eq!(parsed, vec![pair("a", "1"), pair("b", "2")]);
    }

    #[test]
    fn form_feed_separates_key_from_value() {
        let parsed = pairs("key\x0cvalue\nk\x0c=\x0cv\n\x0cindented=1\n");
        assert_eq!(
            parsed,
            vec![pair("key", "value"), pair("k", "v"), pair("indented", "1")]
        );
    }

    #[test]
    fn bare_carriage_returns_end_lines() {
        let parsed = pairs("a=1\rb=2\r\nc=[1,\\\r  2]\r");
        assert_eq!(parsed, vec![pair("a", "1"), pair("b", "2"), pair("c", "[1,2]")]);
    }

    #[test]
    fn lone_carriage_return_line_numbers() {
        let err = parse_properties("ok=1\rbad=\\u12G4\r").unwrap_err();
        assert!(err.to_string().contains("line 2"), "got: {err}");
    }
}
