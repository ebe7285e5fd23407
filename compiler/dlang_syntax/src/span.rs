//! Source location spans.
//!
//! Compact 8-byte representation: start and end byte offsets into the
//! source buffer, end exclusive.

use std::fmt;

/// Source location span.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Dummy span for synthesized tokens.
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    /// Create a new span.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Length of the span in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Check if span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if an offset is within this span.
    #[inline]
    pub fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Check if another span is fully contained within this span.
    #[inline]
    pub fn contains_span(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Check if two spans overlap (share at least one byte).
    #[inline]
    pub fn intersects(&self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Merge two spans to create one covering both.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(span: Span) -> Self {
        span.start as usize..span.end as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containment() {
        let outer = Span::new(10, 20);
        assert!(outer.contains(10));
        assert!(outer.contains(19));
        assert!(!outer.contains(20));
        assert!(outer.contains_span(Span::new(12, 18)));
        assert!(outer.contains_span(outer));
        assert!(!outer.contains_span(Span::new(5, 15)));
    }

    #[test]
    fn intersection() {
        let a = Span::new(10, 20);
        assert!(a.intersects(Span::new(15, 25)));
        assert!(a.intersects(Span::new(0, 11)));
        assert!(!a.intersects(Span::new(20, 30)));
        assert!(!a.intersects(Span::new(0, 10)));
    }

    #[test]
    fn merge_covers_both() {
        let m = Span::new(5, 10).merge(Span::new(8, 20));
        assert_eq!(m, Span::new(5, 20));
    }
}
