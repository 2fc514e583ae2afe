// SPDX-License-Identifier: BSD-3-Clause
//! A small parser-combinator engine.
//!
//! A parser is any `Fn(Input<'a>) -> ParseResult<'a, T>`. Primitive matchers
//! recognize one character or a literal; combinators build larger parsers
//! out of them. Failures are ordinary values, and since [`Input`] is a
//! `Copy` cursor a failed attempt never consumes anything.

mod combinator;
pub use combinator::*;
mod error;
pub use error::*;
mod input;
pub use input::*;
mod primitive;
pub use primitive::*;

pub type ParseResult<'a, T> = Result<(Input<'a>, T), ParseError>;
