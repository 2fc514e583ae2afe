// SPDX-License-Identifier: BSD-3-Clause
//! Single-token matchers

use super::{Input, ParseError, ParseResult};

/// Consume one character satisfying `pred`, or fail with `err(preview)`.
#[inline]
fn satisfy<'a>(
    input: Input<'a>,
    pred: impl Fn(char) -> bool,
    err: impl Fn(String) -> ParseError,
) -> ParseResult<'a, char> {
    match input.peek_char() {
        Some(c) if pred(c) => Ok((input.advance(c.len_utf8()), c)),
        _ => Err(err(input.preview())),
    }
}

/// Match the literal `literal` at the front of the input.
pub fn tag<'a>(literal: &'static str) -> impl Fn(Input<'a>) -> ParseResult<'a, &'static str> {
    move |input: Input<'a>| {
        if input.rest().starts_with(literal) {
            Ok((input.advance(literal.len()), literal))
        } else {
            Err(ParseError::TagMismatch {
                expected: literal,
                found: input.preview(),
            })
        }
    }
}

/// An ASCII decimal digit, as its value.
pub fn digit(input: Input<'_>) -> ParseResult<'_, u8> {
    let (rest, c) = satisfy(
        input,
        |c| c.is_ascii_digit(),
        |found| ParseError::NotADigit { found },
    )?;
    // ASCII digits are contiguous from '0'
    Ok((rest, c as u8 - b'0'))
}

pub fn whitespace(input: Input<'_>) -> ParseResult<'_, char> {
    satisfy(
        input,
        char::is_whitespace,
        |found| ParseError::NotWhitespace { found },
    )
}

/// Alphanumeric, dot or underscore: the characters of an LLVM-style name.
pub fn word_char(input: Input<'_>) -> ParseResult<'_, char> {
    satisfy(
        input,
        |c| c.is_alphanumeric() || c == '.' || c == '_',
        |found| ParseError::NotWordChar { found },
    )
}

/// Succeeds only on exhausted input.
pub fn eof(input: Input<'_>) -> ParseResult<'_, ()> {
    if input.is_empty() {
        Ok((input, ()))
    } else {
        Err(ParseError::TrailingInput {
            found: input.preview(),
        })
    }
}
