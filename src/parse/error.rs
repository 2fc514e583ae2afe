// SPDX-License-Identifier: BSD-3-Clause

/// Why a matcher rejected its input. `found` holds at most 30 characters of
/// the input at the point of failure.
#[derive(Clone, Debug, Hash, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("tag {expected:?} not matched on {found:?}")]
    TagMismatch {
        expected: &'static str,
        found: String,
    },
    #[error("could not match digit on {found:?}")]
    NotADigit { found: String },
    #[error("could not match whitespace on {found:?}")]
    NotWhitespace { found: String },
    #[error("could not match word character on {found:?}")]
    NotWordChar { found: String },
    #[error("unexpected trailing input {found:?}")]
    TrailingInput { found: String },
    #[error("node id {digits} does not fit in 64 bits")]
    NodeIdOverflow { digits: String },
}
