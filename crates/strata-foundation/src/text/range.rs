//! Selection ranges over char offsets.

use std::ops::Range;

/// A pair of char offsets. `start` is where the gesture anchored and may
/// lie after `end` when a selection was dragged backwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// An empty range sitting at `offset`.
    pub const fn cursor(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub const fn collapsed(&self) -> bool {
        self.start == self.end
    }

    pub const fn reversed(&self) -> bool {
        self.start > self.end
    }

    /// Number of chars covered regardless of direction.
    pub const fn char_count(&self) -> usize {
        self.ordered().end - self.ordered().start
    }

    /// The covered chars as a forward `Range`, usable for slicing.
    pub const fn ordered(&self) -> Range<usize> {
        if self.reversed() {
            self.end..self.start
        } else {
            self.start..self.end
        }
    }
}

impl From<Range<usize>> for TextRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backwards_drag_orders_its_offsets() {
        let dragged = TextRange::new(7, 2);
        assert!(dragged.reversed());
        assert_eq!(dragged.ordered(), 2..7);
        assert_eq!(dragged.char_count(), 5);
    }

    #[test]
    fn cursor_covers_nothing() {
        let caret = TextRange::cursor(4);
        assert!(caret.collapsed());
        assert!(!caret.reversed());
        assert_eq!(caret.char_count(), 0);
        assert_eq!(TextRange::from(4..4), caret);
    }
}
