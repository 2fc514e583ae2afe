// SPDX-License-Identifier: BSD-3-Clause
//! Format-agnostic combinators
//!
//! Every combinator takes and returns plain `Fn(Input) -> ParseResult`
//! values. None of them consumes input when it fails: the caller still holds
//! the cursor it passed in.

use super::{Input, ParseResult};

/// Apply `p` as often as it succeeds, appending to `xs`. A success that
/// consumes nothing ends the repetition, so `many(many(p))` terminates.
fn repeat<'a, T, P>(p: &P, mut input: Input<'a>, xs: &mut Vec<T>) -> Input<'a>
where
    P: Fn(Input<'a>) -> ParseResult<'a, T>,
{
    while let Ok((rest, x)) = p(input) {
        if rest.position() == input.position() {
            break;
        }
        xs.push(x);
        input = rest;
    }
    input
}

/// Zero or more `p`. Never fails.
pub fn many<'a, T, P>(p: P) -> impl Fn(Input<'a>) -> ParseResult<'a, Vec<T>>
where
    P: Fn(Input<'a>) -> ParseResult<'a, T>,
{
    move |input: Input<'a>| {
        let mut xs = Vec::new();
        let rest = repeat(&p, input, &mut xs);
        Ok((rest, xs))
    }
}

/// One or more `p`; fails with `p`'s error if the first attempt fails.
pub fn some<'a, T, P>(p: P) -> impl Fn(Input<'a>) -> ParseResult<'a, Vec<T>>
where
    P: Fn(Input<'a>) -> ParseResult<'a, T>,
{
    move |input: Input<'a>| {
        let (rest, x) = p(input)?;
        let mut xs = vec![x];
        let rest = repeat(&p, rest, &mut xs);
        Ok((rest, xs))
    }
}

/// `first`, or else `second` from the same starting point.
pub fn alt<'a, T, P1, P2>(first: P1, second: P2) -> impl Fn(Input<'a>) -> ParseResult<'a, T>
where
    P1: Fn(Input<'a>) -> ParseResult<'a, T>,
    P2: Fn(Input<'a>) -> ParseResult<'a, T>,
{
    move |input: Input<'a>| first(input).or_else(|_| second(input))
}

/// `main (sep main)*`.
///
/// Once `sep` matches, the following `main` is mandatory: a dangling
/// separator fails the whole list with `main`'s error.
pub fn sep_by<'a, T, S, P, Q>(main: P, sep: Q) -> impl Fn(Input<'a>) -> ParseResult<'a, Vec<T>>
where
    P: Fn(Input<'a>) -> ParseResult<'a, T>,
    Q: Fn(Input<'a>) -> ParseResult<'a, S>,
{
    move |input: Input<'a>| {
        let (mut input, x) = main(input)?;
        let mut xs = vec![x];
        while let Ok((after_sep, _)) = sep(input) {
            let (rest, x) = main(after_sep)?;
            xs.push(x);
            input = rest;
        }
        Ok((input, xs))
    }
}

pub fn map<'a, T, U, P, F>(p: P, f: F) -> impl Fn(Input<'a>) -> ParseResult<'a, U>
where
    P: Fn(Input<'a>) -> ParseResult<'a, T>,
    F: Fn(T) -> U,
{
    move |input: Input<'a>| p(input).map(|(rest, x)| (rest, f(x)))
}

/// `first` then `second`, keeping both results.
pub fn pair<'a, T, U, P1, P2>(first: P1, second: P2) -> impl Fn(Input<'a>) -> ParseResult<'a, (T, U)>
where
    P1: Fn(Input<'a>) -> ParseResult<'a, T>,
    P2: Fn(Input<'a>) -> ParseResult<'a, U>,
{
    move |input: Input<'a>| {
        let (rest, x) = first(input)?;
        let (rest, y) = second(rest)?;
        Ok((rest, (x, y)))
    }
}

/// Run `p` without consuming anything.
pub fn peek<'a, T, P>(p: P) -> impl Fn(Input<'a>) -> ParseResult<'a, T>
where
    P: Fn(Input<'a>) -> ParseResult<'a, T>,
{
    move |input: Input<'a>| p(input).map(|(_, x)| (input, x))
}
