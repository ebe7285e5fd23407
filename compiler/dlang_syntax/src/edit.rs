//! Text edits and affected-region tracking for incremental reparsing.
//!
//! A [`TextChange`] is the standard three-offset edit description: the
//! region `[start, old_end)` of the old text is replaced by `new_len`
//! bytes of new text. A [`ChangeMarker`] widens the change to the damaged
//! region the reparse controller must reconsider (token boundaries plus
//! lookahead context) and carries the position delta for spans after it.

use crate::Span;

/// A single text edit: `[start, old_end)` in the old text is replaced
/// with `new_len` bytes of new text.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct TextChange {
    /// Start byte offset in old text.
    pub start: u32,
    /// End byte offset in old text (exclusive).
    pub old_end: u32,
    /// Length of replacement text in bytes.
    pub new_len: u32,
}

impl TextChange {
    /// Create a new text change.
    #[inline]
    pub const fn new(start: u32, old_end: u32, new_len: u32) -> Self {
        TextChange {
            start,
            old_end,
            new_len,
        }
    }

    /// Create an insertion (no bytes removed).
    #[inline]
    pub const fn insert(at: u32, len: u32) -> Self {
        TextChange {
            start: at,
            old_end: at,
            new_len: len,
        }
    }

    /// Create a deletion (no bytes inserted).
    #[inline]
    pub const fn delete(start: u32, len: u32) -> Self {
        TextChange {
            start,
            old_end: start + len,
            new_len: 0,
        }
    }

    /// Create a replacement.
    #[inline]
    pub const fn replace(start: u32, old_len: u32, new_len: u32) -> Self {
        TextChange {
            start,
            old_end: start + old_len,
            new_len,
        }
    }

    /// Net change in document length (positive = grew, negative = shrank).
    #[inline]
    pub fn delta(&self) -> i64 {
        i64::from(self.new_len) - i64::from(self.old_end - self.start)
    }

    /// Length of the removed region in the old text.
    #[inline]
    pub const fn old_len(&self) -> u32 {
        self.old_end - self.start
    }

    /// End position of the replacement in the new text.
    #[inline]
    pub const fn new_end(&self) -> u32 {
        self.start + self.new_len
    }

    /// Check if this change intersects a span in the old text.
    #[inline]
    pub fn intersects(&self, span: Span) -> bool {
        self.start < span.end && span.start < self.old_end
    }
}

/// The damaged region of the old text, widened from a [`TextChange`] to
/// token boundaries plus lookahead context.
///
/// Any node whose span intersects the region must be reparsed; nodes
/// entirely before are reusable in place, nodes entirely after are
/// reusable shifted by `delta`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ChangeMarker {
    /// Start of the damaged region (may be earlier than `change.start`
    /// because of token-boundary extension and parser lookahead).
    pub affected_start: u32,
    /// End of the damaged region in the old text (may be later than
    /// `change.old_end`, same reason).
    pub affected_end: u32,
    /// Position delta for spans after the damaged region.
    pub delta: i64,
}

impl ChangeMarker {
    /// Create a marker directly from a damaged region and delta.
    #[inline]
    pub const fn new(affected_start: u32, affected_end: u32, delta: i64) -> Self {
        ChangeMarker {
            affected_start,
            affected_end,
            delta,
        }
    }

    /// Create a marker from a text change with explicit widening bounds.
    #[inline]
    pub fn from_change(change: &TextChange, widen_start: u32, widen_end: u32) -> Self {
        ChangeMarker {
            affected_start: widen_start.min(change.start),
            affected_end: widen_end.max(change.old_end),
            delta: change.delta(),
        }
    }

    /// Check if a span (in old-text coordinates) intersects the damaged
    /// region.
    #[inline]
    pub fn intersects(&self, span: Span) -> bool {
        self.affected_start < span.end && span.start < self.affected_end
    }

    /// Adjust an old-text position to its new-text equivalent.
    ///
    /// Positions before the damaged region are unchanged; positions after
    /// it shift by `delta`. Positions inside the region have no stable
    /// mapping and are clamped to the region start.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "delta magnitude is bounded by document length, which fits in u32"
    )]
    pub fn adjust_position(&self, pos: u32) -> u32 {
        if pos <= self.affected_start {
            pos
        } else if pos >= self.affected_end {
            (i64::from(pos) + self.delta) as u32
        } else {
            self.affected_start
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deltas() {
        assert_eq!(TextChange::insert(10, 5).delta(), 5);
        assert_eq!(TextChange::delete(5, 3).delta(), -3);
        assert_eq!(TextChange::replace(0, 3, 5).delta(), 2);
    }

    #[test]
    fn intersection_is_half_open() {
        let change = TextChange::replace(10, 5, 5); // [10, 15)
        assert!(change.intersects(Span::new(14, 20)));
        assert!(change.intersects(Span::new(0, 11)));
        assert!(!change.intersects(Span::new(15, 20)));
        assert!(!change.intersects(Span::new(0, 10)));
    }

    #[test]
    fn marker_adjusts_positions() {
        let change = TextChange::replace(100, 10, 15);
        let marker = ChangeMarker::from_change(&change, 95, 110);
        assert_eq!(marker.adjust_position(50), 50);
        assert_eq!(marker.adjust_position(200), 205);
        assert_eq!(marker.adjust_position(100), 95);
    }

    #[test]
    fn marker_widening_covers_change() {
        let change = TextChange::replace(100, 10, 15);
        let marker = ChangeMarker::from_change(&change, 120, 90);
        // Widening bounds never shrink the damaged region
        assert_eq!(marker.affected_start, 100);
        assert_eq!(marker.affected_end, 110);
    }
}
