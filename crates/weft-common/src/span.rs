//! Half-open position ranges.

use serde::Serialize;

/// A `[start, end)` range of positions in an input stream.
///
/// Positions count code points for the HTML tokenizer and code points for
/// the CSS tokenizer; they are never byte offsets into a single chunk, so a
/// span stays meaningful when the input arrived in several pieces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// First position covered.
    pub start: usize,
    /// One past the last position covered.
    pub end: usize,
}

impl Span {
    /// Create a span from its bounds.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-length span at `at`.
    #[must_use]
    pub const fn empty(at: usize) -> Self {
        Self { start: at, end: at }
    }

    /// Number of positions covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Smallest span covering both `self` and `other`.
    #[must_use]
    pub fn join(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}
