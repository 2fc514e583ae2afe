// SPDX-License-Identifier: BSD-3-Clause

/// Maximum number of characters of remaining input quoted in diagnostics.
const PREVIEW_CHARS: usize = 30;

/// A cursor into one line of text.
///
/// Matchers never mutate the line; they hand back a new cursor. Because the
/// cursor is `Copy`, the value a combinator held before a failed attempt is
/// already the snapshot to restore.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Input<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> Input<'a> {
    #[inline]
    pub fn new(line: &'a str) -> Self {
        Input { line, pos: 0 }
    }

    /// The unconsumed remainder.
    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    /// Byte offset into the original line.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.line.len()
    }

    #[inline]
    pub(crate) fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Advance by `bytes`, which must land on a char boundary.
    #[inline]
    pub(crate) fn advance(self, bytes: usize) -> Self {
        debug_assert!(self.line.is_char_boundary(self.pos + bytes));
        Input {
            line: self.line,
            pos: self.pos + bytes,
        }
    }

    pub(crate) fn preview(&self) -> String {
        self.rest().chars().take(PREVIEW_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Input;

    #[test]
    fn advance_leaves_original_untouched() {
        let start = Input::new("NodeID 1");
        let next = start.advance(6);
        assert_eq!(start.rest(), "NodeID 1");
        assert_eq!(next.rest(), " 1");
        assert_eq!(next.position(), 6);
    }

    #[test]
    fn preview_is_bounded() {
        let long = "x".repeat(100);
        assert_eq!(Input::new(&long).preview().len(), 30);
        assert_eq!(Input::new("ab").preview(), "ab");
    }

    #[test]
    fn preview_counts_chars_not_bytes() {
        let wide = "é".repeat(40);
        assert_eq!(Input::new(&wide).preview().chars().count(), 30);
    }
}
