//! Lexical rules of the DOT language.
//!
//! The serializer decides for every identifier and value whether it can be
//! written bare or must be quoted. This module owns those rules and their
//! inverse, [`parse_id`], which reads a single DOT ID token back into the
//! string it denotes.
//!
//! A bare ID is either an alphanumeric string (letters, `_`, digits and
//! non-ASCII characters, not starting with a digit) or a numeral. DOT
//! keywords are matched case-insensitively and always need quotes.
//!
//! Inside quotes the escapes are `\"` for a quote, `\\` for a backslash and
//! `\n` for a line break. Any other backslash sequence is kept verbatim so
//! Graphviz label escapes such as `\l` survive.

use std::borrow::Cow;

use thiserror::Error;
use winnow::{
    Parser as _,
    combinator::{alt, delimited, preceded, repeat},
    error::{ContextError, ModalResult},
    token::{any, none_of, take_while},
};

/// DOT keywords; an ID spelled like one of these must be quoted.
const KEYWORDS: [&str; 6] = ["node", "edge", "graph", "digraph", "subgraph", "strict"];

/// Attribute names whose values are always written quoted.
pub const LABEL_KEYS: [&str; 4] = ["label", "xlabel", "headlabel", "taillabel"];

/// Error returned by [`parse_id`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid DOT identifier at offset {offset}: {input:?}")]
pub struct ParseIdError {
    input: String,
    offset: usize,
}

impl ParseIdError {
    /// Byte offset where parsing stopped.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

fn is_id_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_id_continue(c: char) -> bool {
    is_id_start(c) || c.is_ascii_digit()
}

fn is_keyword(text: &str) -> bool {
    KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(text))
}

/// Returns `true` for numerals: `[-]?(.[0-9]+ | [0-9]+(.[0-9]*)?)`.
fn is_numeral(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits, None),
    };
    let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());

    match fraction {
        None => !integer.is_empty() && all_digits(integer),
        Some(fraction) => {
            all_digits(integer)
                && all_digits(fraction)
                && (!integer.is_empty() || !fraction.is_empty())
        }
    }
}

/// Returns `true` if `text` can be written as a DOT ID without quotes.
///
/// ```
/// use dotloom_core::dot::is_bare_id;
///
/// assert!(is_bare_id("llm_gen"));
/// assert!(is_bare_id("2.0"));
/// assert!(!is_bare_id("#2c3e50"));
/// assert!(!is_bare_id("subgraph"));
/// ```
pub fn is_bare_id(text: &str) -> bool {
    if text.is_empty() || is_keyword(text) {
        return false;
    }
    if is_numeral(text) {
        return true;
    }
    let mut chars = text.chars();
    chars.next().is_some_and(is_id_start) && chars.all(is_id_continue)
}

/// Escapes `text` for use between double quotes.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Wraps `text` in double quotes, escaping as needed.
pub fn quote(text: &str) -> String {
    format!("\"{}\"", escape(text))
}

/// Formats `text` as a DOT ID: bare when allowed, quoted otherwise.
///
/// ```
/// use dotloom_core::dot::format_id;
///
/// assert_eq!(format_id("tabview"), "tabview");
/// assert_eq!(format_id("rounded,filled"), "\"rounded,filled\"");
/// ```
pub fn format_id(text: &str) -> Cow<'_, str> {
    if is_bare_id(text) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(quote(text))
    }
}

/// Formats an attribute value. Label-like keys are always quoted.
pub fn format_value<'a>(key: &str, value: &'a str) -> Cow<'a, str> {
    if LABEL_KEYS.contains(&key) {
        Cow::Owned(quote(value))
    } else {
        format_id(value)
    }
}

enum Fragment {
    Char(char),
    Verbatim(char),
}

fn escape_sequence(input: &mut &str) -> ModalResult<Fragment> {
    preceded('\\', any)
        .map(|c: char| match c {
            '"' => Fragment::Char('"'),
            '\\' => Fragment::Char('\\'),
            'n' => Fragment::Char('\n'),
            other => Fragment::Verbatim(other),
        })
        .parse_next(input)
}

fn quoted_char(input: &mut &str) -> ModalResult<Fragment> {
    none_of(['"', '\\']).map(Fragment::Char).parse_next(input)
}

fn quoted(input: &mut &str) -> ModalResult<String> {
    let content = repeat(0.., alt((escape_sequence, quoted_char))).fold(
        String::new,
        |mut acc, fragment| {
            match fragment {
                Fragment::Char(c) => acc.push(c),
                Fragment::Verbatim(c) => {
                    acc.push('\\');
                    acc.push(c);
                }
            }
            acc
        },
    );

    delimited('"', content, '"').parse_next(input)
}

fn bare(input: &mut &str) -> ModalResult<String> {
    take_while(1.., |c: char| is_id_continue(c) || c == '.' || c == '-')
        .verify(|text: &str| is_bare_id(text))
        .map(str::to_owned)
        .parse_next(input)
}

/// Parses one DOT ID token (bare or quoted) and returns the string it denotes.
///
/// This is the inverse of [`format_id`] and [`format_value`].
///
/// ```
/// use dotloom_core::dot::{parse_id, quote};
///
/// let label = "say \"hi\"\nnow";
/// assert_eq!(parse_id(&quote(label)).unwrap(), label);
/// assert_eq!(parse_id("node_1").unwrap(), "node_1");
/// ```
pub fn parse_id(text: &str) -> Result<String, ParseIdError> {
    alt((quoted, bare))
        .parse(text)
        .map_err(|err: winnow::error::ParseError<&str, ContextError>| ParseIdError {
            input: text.to_owned(),
            offset: err.offset(),
        })
}
