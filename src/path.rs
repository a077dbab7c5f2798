//! The dotted path mini-language.
//!
//! A path is a sequence of segments joined by `.`. A segment is a
//! decimal array index, a bare field name, or a `"quoted"` field name.
//! Quoting makes any text addressable: a field that starts with a
//! digit or contains a reserved character (`.` or `*`) must be quoted
//! when rendered, and a quoted segment is always a field, never an
//! index.

use std::borrow::Cow;
use std::fmt::{self, Write};

use nom::branch::alt;
use nom::bytes::complete::escaped_transform;
use nom::character::complete::{char, none_of};
use nom::combinator::value;
use nom::sequence::delimited;
use nom::{IResult, Parser};
use regex::Regex;

use crate::error::Error;

/// Path segment separator.
pub const SEP: char = '.';
/// Glob wildcard character.
pub const GLOB: char = '*';

/// One step of a path: an array index or an object field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment<'a> {
    Index(u64),
    Field(Cow<'a, str>),
}

impl Segment<'_> {
    pub fn as_index(&self) -> Option<u64> {
        match self {
            Segment::Index(i) => Some(*i),
            Segment::Field(_) => None,
        }
    }

    pub fn as_field(&self) -> Option<&str> {
        match self {
            Segment::Field(f) => Some(f),
            Segment::Index(_) => None,
        }
    }

    pub fn into_owned(self) -> Segment<'static> {
        match self {
            Segment::Index(i) => Segment::Index(i),
            Segment::Field(f) => Segment::Field(Cow::Owned(f.into_owned())),
        }
    }
}

impl From<u64> for Segment<'static> {
    fn from(i: u64) -> Self {
        Segment::Index(i)
    }
}

impl From<usize> for Segment<'static> {
    fn from(i: usize) -> Self {
        Segment::Index(i as u64)
    }
}

impl<'a> From<&'a str> for Segment<'a> {
    fn from(f: &'a str) -> Self {
        Segment::Field(Cow::Borrowed(f))
    }
}

impl From<String> for Segment<'static> {
    fn from(f: String) -> Self {
        Segment::Field(Cow::Owned(f))
    }
}

/// Renders the segment the way [`join_key`] would: indices as decimal
/// digits, fields quoted when they would otherwise be ambiguous.
impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Index(i) => write!(f, "{i}"),
            Segment::Field(name) if needs_quote(name) => {
                f.write_char('"')?;
                for c in name.chars() {
                    if c == '"' || c == '\\' {
                        f.write_char('\\')?;
                    }
                    f.write_char(c)?;
                }
                f.write_char('"')
            }
            Segment::Field(name) => f.write_str(name),
        }
    }
}

fn needs_quote(name: &str) -> bool {
    name.as_bytes().first().is_some_and(u8::is_ascii_digit)
        || name.starts_with('"')
        || name.contains(SEP)
        || name.contains(GLOB)
}

fn index_hint(raw: &str) -> bool {
    raw.as_bytes().first().is_some_and(u8::is_ascii_digit)
}

fn parse_index(raw: &str) -> Option<u64> {
    if index_hint(raw) {
        raw.parse().ok()
    } else {
        None
    }
}

fn quoted(input: &str) -> IResult<&str, String> {
    if let Some(rest) = input.strip_prefix("\"\"") {
        return Ok((rest, String::new()));
    }
    delimited(
        char('"'),
        escaped_transform(
            none_of("\\\""),
            '\\',
            alt((
                value('\\', char('\\')),
                value('"', char('"')),
                value('\n', char('n')),
                value('\r', char('r')),
                value('\t', char('t')),
            )),
        ),
        char('"'),
    )
    .parse(input)
}

/// Splits off the raw text of the first segment, honoring quoting so a
/// quoted field may contain the separator. Returns the raw segment
/// text (quotes included), the remainder, and whether this was the
/// last segment.
pub(crate) fn cut_raw(path: &str) -> (&str, &str, bool) {
    if path.starts_with('"') {
        if let Ok((rest, _)) = quoted(path) {
            let raw = &path[..path.len() - rest.len()];
            if rest.is_empty() {
                return (raw, "", true);
            }
            if let Some(tail) = rest.strip_prefix(SEP) {
                return (raw, tail, false);
            }
            // Trailing junk after the closing quote; fall through and
            // treat the segment as literal text.
        }
    }
    match path.split_once(SEP) {
        Some((head, tail)) => (head, tail, false),
        None => (path, "", true),
    }
}

/// Interprets one raw segment. A quoted segment is always a field; an
/// unquoted segment is an index iff it starts with a digit and the
/// whole text parses as a decimal integer.
pub(crate) fn segment_from_raw(raw: &str) -> Segment<'_> {
    if raw.starts_with('"') {
        if let Ok(("", field)) = quoted(raw) {
            return Segment::Field(Cow::Owned(field));
        }
    }
    match parse_index(raw) {
        Some(i) => Segment::Index(i),
        None => Segment::Field(Cow::Borrowed(raw)),
    }
}

/// Pops the first segment of `path`.
///
/// Returns the segment, the remaining path, and whether the popped
/// segment was the last one. Total over all inputs: malformed quoting
/// degrades to the literal text up to the next separator.
///
/// ```
/// use dotson::{cut, Segment};
///
/// let (head, tail, last) = cut("a.1.b");
/// assert_eq!(head, Segment::from("a"));
/// assert_eq!((tail, last), ("1.b", false));
///
/// let (head, _, _) = cut("1.b");
/// assert_eq!(head, Segment::Index(1));
/// ```
pub fn cut(path: &str) -> (Segment<'_>, &str, bool) {
    let (raw, tail, last) = cut_raw(path);
    (segment_from_raw(raw), tail, last)
}

/// Whether `path` consists of a single segment.
pub fn is_leaf(path: &str) -> bool {
    let (_, _, last) = cut_raw(path);
    last
}

/// Appends one rendered segment to a path buffer.
pub fn push_key(buf: &mut String, segment: &Segment<'_>) {
    if !buf.is_empty() {
        buf.push(SEP);
    }
    let _ = write!(buf, "{segment}");
}

/// Joins rendered segments onto a base path.
///
/// ```
/// use dotson::join_key;
///
/// let key = join_key("foo.bar", ["a", "b", "0"]);
/// assert_eq!(key, r#"foo.bar.a.b."0""#);
///
/// let key = join_key("foo.bar", [".", "*", ""]);
/// assert_eq!(key, r#"foo.bar."."."*"."#);
/// ```
pub fn join_key<'a, I>(base: &str, segments: I) -> String
where
    I: IntoIterator,
    I::Item: Into<Segment<'a>>,
{
    let mut out = String::from(base);
    for segment in segments {
        push_key(&mut out, &segment.into());
    }
    out
}

/// Bounds for walking untrusted paths.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    /// Maximum number of segments; 0 disables the check.
    pub max_depth: usize,
    /// Maximum admissible index value.
    pub max_index: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_depth: 6,
            max_index: 32,
        }
    }
}

/// Walks the segments of `path` under `limits`, failing fast with
/// [`Error::MaxDepth`] or [`Error::MaxIndex`] instead of recursing
/// into adversarial input.
pub fn each_segment<F>(path: &str, limits: Limits, mut visit: F) -> Result<(), Error>
where
    F: FnMut(&Segment<'_>),
{
    let mut rest = path;
    for depth in 1.. {
        if limits.max_depth > 0 && depth > limits.max_depth {
            return Err(Error::MaxDepth(limits.max_depth));
        }
        let (head, tail, last) = cut(rest);
        if head.as_index().is_some_and(|i| i > limits.max_index) {
            return Err(Error::MaxIndex(limits.max_index));
        }
        visit(&head);
        if last {
            break;
        }
        rest = tail;
    }
    Ok(())
}

/// A glob pattern compiled for matching fully-joined path strings.
///
/// `*` matches one segment, `**` matches any (possibly empty) run of
/// segments. The pattern text is escaped literally apart from the
/// wildcards, and anchored at both ends.
#[derive(Debug, Clone)]
pub struct KeyMatcher(Regex);

impl KeyMatcher {
    pub fn compile(pattern: &str) -> Result<KeyMatcher, Error> {
        let escaped = regex::escape(pattern)
            .replace(r"\*\*", ".*")
            .replace(r"\*", "[^.]*");
        let re = Regex::new(&format!("^{escaped}$")).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(KeyMatcher(re))
    }

    pub fn matches(&self, key: &str) -> bool {
        self.0.is_match(key)
    }
}
