//! Byte ranges into the original source text

use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open `[start, end)` byte range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {} after end {}", start, end);
        Self { start, end }
    }

    /// A zero-width span used for insertions
    pub fn empty(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `other` lies completely inside this span
    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn contains_offset(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Whether the two spans share at least one byte
    pub fn intersects(&self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Smallest span covering both
    pub fn cover(&self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Slice the source text covered by this span
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects() {
        assert!(Span::new(0, 5).intersects(Span::new(4, 8)));
        assert!(!Span::new(0, 5).intersects(Span::new(5, 8)));
        assert!(!Span::empty(3).intersects(Span::new(0, 5)));
    }

    #[test]
    fn test_cover_and_contains() {
        let span = Span::new(2, 4).cover(Span::new(6, 9));
        assert_eq!(span, Span::new(2, 9));
        assert!(span.contains(Span::new(3, 7)));
        assert!(!span.contains(Span::new(1, 3)));
    }
}
