// SPDX-License-Identifier: BSD-3-Clause
//! Reading alias groups back from text output.
//!
//! One set per line, in the notation [`crate::AliasGroup`] renders:
//!
//! ```text
//! {'@a', 'main::%p'}
//! ```

use std::collections::BTreeSet;

use crate::{
    dump::parse_name,
    name::ValueName,
    parse::{alt, eof, many, map, pair, peek, sep_by, tag, whitespace, Input, ParseError, ParseResult},
};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("malformed alias set on line {line}: {source}")]
pub struct AliasSetError {
    /// 1-based line number
    pub line: usize,
    pub source: ParseError,
}

fn quoted_name(input: Input<'_>) -> ParseResult<'_, ValueName> {
    let (input, _) = tag("'")(input)?;
    let (input, name) = parse_name(input)?;
    let (input, _) = tag("'")(input)?;
    Ok((input, name))
}

fn members(input: Input<'_>) -> ParseResult<'_, BTreeSet<ValueName>> {
    let separator = pair(tag(","), many(whitespace));
    let nonempty = map(sep_by(quoted_name, separator), |names: Vec<ValueName>| {
        names.into_iter().collect::<BTreeSet<_>>()
    });
    let empty = map(peek(tag("}")), |_| BTreeSet::new());
    alt(nonempty, empty)(input)
}

/// Decode one `{...}` line; trailing whitespace is allowed.
pub fn parse_alias_set(input: Input<'_>) -> ParseResult<'_, BTreeSet<ValueName>> {
    let (input, _) = tag("{")(input)?;
    let (input, set) = members(input)?;
    let (input, _) = tag("}")(input)?;
    let (input, _) = many(whitespace)(input)?;
    let (input, _) = eof(input)?;
    Ok((input, set))
}

/// Decode every non-blank line of `text` as an alias set.
pub fn parse_alias_sets(text: &str) -> Result<Vec<BTreeSet<ValueName>>, AliasSetError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            parse_alias_set(Input::new(line))
                .map(|(_, set)| set)
                .map_err(|source| AliasSetError {
                    line: idx + 1,
                    source,
                })
        })
        .collect()
}
