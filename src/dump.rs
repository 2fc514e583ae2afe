// SPDX-License-Identifier: BSD-3-Clause
//! Grammar of points-to dumps.
//!
//! One line per analyzed value:
//!
//! ```text
//! NodeID 7 (val:main::%p) PointsTo: { 3 12 }
//! ```
//!
//! The leading `NodeID` is the value's own node in the analysis graph and is
//! not kept; only the name and the points-to set matter here.

use std::collections::BTreeSet;

use tracing::{debug, trace_span};

use crate::{
    name::{NodeId, ValueName, GLOBAL_SIGIL, LOCAL_SEPARATOR},
    parse::{
        alt, digit, many, map, pair, peek, sep_by, some, tag, whitespace, word_char, Input,
        ParseError, ParseResult,
    },
};

/// One decoded line: a value and the nodes it may point to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointsTo {
    pub name: ValueName,
    pub nodes: BTreeSet<NodeId>,
}

/// A line that did not match the grammar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Skipped {
    /// 1-based line number
    pub line: usize,
    pub error: ParseError,
}

/// Every line of a dump, decoded or skipped.
#[derive(Clone, Debug, Default)]
pub struct Log {
    pub records: Vec<PointsTo>,
    pub skipped: Vec<Skipped>,
}

// ------------------------------------------------------------------
// Names

fn word(input: Input<'_>) -> ParseResult<'_, String> {
    map(some(word_char), |cs: Vec<char>| cs.into_iter().collect::<String>())(input)
}

fn global_name(input: Input<'_>) -> ParseResult<'_, ValueName> {
    let (input, _) = tag(GLOBAL_SIGIL)(input)?;
    let (input, name) = word(input)?;
    Ok((input, ValueName::global(&name)))
}

fn local_name(input: Input<'_>) -> ParseResult<'_, ValueName> {
    let (input, function) = word(input)?;
    let (input, _) = tag(LOCAL_SEPARATOR)(input)?;
    let (input, local) = word(input)?;
    Ok((input, ValueName::local(&function, &local)))
}

/// `@name` or `function::%name`. The global form is tried first.
pub fn parse_name(input: Input<'_>) -> ParseResult<'_, ValueName> {
    alt(global_name, local_name)(input)
}

// ------------------------------------------------------------------
// Node sets

/// A decimal node id. Digits are combined by place value; ids that do not
/// fit in a `u64` are rejected rather than wrapped.
pub fn parse_node_id(input: Input<'_>) -> ParseResult<'_, NodeId> {
    let (rest, digits) = some(digit)(input)?;
    digits
        .iter()
        .try_fold(0u64, |acc, &d| acc.checked_mul(10)?.checked_add(u64::from(d)))
        .map(|id| (rest, NodeId::new(id)))
        .ok_or_else(|| ParseError::NodeIdOverflow {
            digits: digits.iter().map(|&d| char::from(b'0' + d)).collect(),
        })
}

/// Whitespace-separated node ids. Duplicates collapse.
///
/// The separator only matches whitespace that precedes another id, so the
/// padding before a closing `}` is left for the caller.
pub fn parse_node_set(input: Input<'_>) -> ParseResult<'_, BTreeSet<NodeId>> {
    let separator = pair(some(whitespace), peek(digit));
    map(sep_by(parse_node_id, separator), |ids: Vec<NodeId>| {
        ids.into_iter().collect::<BTreeSet<_>>()
    })(input)
}

// ------------------------------------------------------------------
// Lines

/// Decode one line. Anything after the closing `}` is left unconsumed.
pub fn parse_line(input: Input<'_>) -> ParseResult<'_, PointsTo> {
    let (input, _) = tag("NodeID")(input)?;
    let (input, _) = some(whitespace)(input)?;
    let (input, _) = some(digit)(input)?;
    let (input, _) = some(whitespace)(input)?;
    let (input, _) = tag("(val:")(input)?;
    let (input, _) = many(whitespace)(input)?;
    let (input, name) = parse_name(input)?;
    let (input, _) = tag(")")(input)?;
    let (input, _) = many(whitespace)(input)?;
    let (input, _) = tag("PointsTo:")(input)?;
    let (input, _) = many(whitespace)(input)?;
    let (input, _) = tag("{")(input)?;
    let (input, _) = many(whitespace)(input)?;
    let (input, nodes) = parse_node_set(input)?;
    let (input, _) = many(whitespace)(input)?;
    let (input, _) = tag("}")(input)?;
    Ok((input, PointsTo { name, nodes }))
}

/// Decode a whole dump. Lines that fail to parse are recorded in
/// [`Log::skipped`] and otherwise ignored; blank lines are dropped silently.
pub fn parse_log(text: &str) -> Log {
    let span = trace_span!("parse_log");
    let _span = span.enter();
    let mut log = Log::default();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(Input::new(line)) {
            Ok((_, record)) => log.records.push(record),
            Err(error) => {
                debug!(line = idx + 1, %error, "skipping line");
                log.skipped.push(Skipped {
                    line: idx + 1,
                    error,
                });
            }
        }
    }
    log
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(xs: &[u64]) -> BTreeSet<NodeId> {
        xs.iter().copied().map(NodeId::new).collect()
    }

    #[test]
    fn global_and_local_names() {
        let (rest, name) = parse_name(Input::new("@foo")).unwrap();
        assert_eq!(name, "@foo");
        assert!(name.is_global());
        assert!(rest.is_empty());

        let (rest, name) = parse_name(Input::new("bar::%baz")).unwrap();
        assert_eq!(name, "bar::%baz");
        assert!(!name.is_global());
        assert!(rest.is_empty());
    }

    #[test]
    fn global_name_stops_at_separator() {
        let (rest, name) = parse_name(Input::new("@a::%b")).unwrap();
        assert_eq!(name, "@a");
        assert_eq!(rest.rest(), "::%b");
    }

    #[test]
    fn global_with_local_suffix_fails_in_line() {
        let err = parse_line(Input::new("NodeID 1 (val:@a::%b) PointsTo: { 1 }")).unwrap_err();
        assert_eq!(
            err,
            ParseError::TagMismatch {
                expected: ")",
                found: "::%b) PointsTo: { 1 }".to_string(),
            }
        );
    }

    #[test]
    fn local_name_needs_separator() {
        assert!(matches!(
            parse_name(Input::new("plain)")),
            Err(ParseError::TagMismatch { expected: "::%", .. })
        ));
    }

    #[test]
    fn names_round_trip() {
        for s in ["@g", "@llvm.memcpy.p0i8", "main::%x.addr", "f_1::%_2"] {
            let (_, name) = parse_name(Input::new(s)).unwrap();
            let (rest, again) = parse_name(Input::new(name.as_str())).unwrap();
            assert_eq!(name, again);
            assert_eq!(again, s);
            assert!(rest.is_empty());
        }
    }

    #[test]
    fn node_ids_use_place_value() {
        assert_eq!(parse_node_id(Input::new("123")).unwrap().1, NodeId::new(123));
        assert_eq!(parse_node_id(Input::new("007")).unwrap().1, NodeId::new(7));
    }

    #[test]
    fn node_id_overflow_is_an_error() {
        assert_eq!(
            parse_node_id(Input::new("18446744073709551615")).unwrap().1,
            NodeId::new(u64::MAX)
        );
        assert_eq!(
            parse_node_id(Input::new("18446744073709551616")),
            Err(ParseError::NodeIdOverflow {
                digits: "18446744073709551616".to_string()
            })
        );
    }

    #[test]
    fn node_sets_ignore_order_and_duplicates() {
        let (_, a) = parse_node_set(Input::new("1 2 2 3")).unwrap();
        let (_, b) = parse_node_set(Input::new("3 2 1")).unwrap();
        assert_eq!(a, ids(&[1, 2, 3]));
        assert_eq!(a, b);
    }

    #[test]
    fn node_set_leaves_trailing_padding() {
        let (rest, set) = parse_node_set(Input::new("4\t 5  }")).unwrap();
        assert_eq!(set, ids(&[4, 5]));
        assert_eq!(rest.rest(), "  }");
    }

    #[test]
    fn whole_line() {
        let (rest, pts) =
            parse_line(Input::new("NodeID 17 (val:main::%p) PointsTo: { 10 20 }\n")).unwrap();
        assert_eq!(pts.name, "main::%p");
        assert_eq!(pts.nodes, ids(&[10, 20]));
        assert_eq!(rest.rest(), "\n");
    }

    #[test]
    fn tight_spacing() {
        let (_, pts) = parse_line(Input::new("NodeID 1 (val:@g)PointsTo:{7}")).unwrap();
        assert_eq!(pts.name, "@g");
        assert_eq!(pts.nodes, ids(&[7]));
    }

    #[test]
    fn missing_brace_fails() {
        assert_eq!(
            parse_line(Input::new("NodeID 1 (val:@g) PointsTo: { 1 2 ")),
            Err(ParseError::TagMismatch {
                expected: "}",
                found: String::new()
            })
        );
    }

    #[test]
    fn empty_set_fails() {
        assert!(matches!(
            parse_line(Input::new("NodeID 1 (val:@g) PointsTo: { }")),
            Err(ParseError::NotADigit { .. })
        ));
    }

    #[test]
    fn log_keeps_going_past_bad_lines() {
        let text = "NodeID 1 (val:@a) PointsTo: { 1 }\n\
                    garbage\n\
                    \n\
                    NodeID 2 (val:@b) PointsTo: { 2 3 }\n";
        let log = parse_log(text);
        assert_eq!(log.records.len(), 2);
        assert_eq!(log.skipped.len(), 1);
        assert_eq!(log.skipped[0].line, 2);
        assert!(matches!(
            log.skipped[0].error,
            ParseError::TagMismatch {
                expected: "NodeID",
                ..
            }
        ));
    }
}
