//! Visible range calculation result

use std::ops::Range;

/// Rows intersecting the viewport for one scroll position.
///
/// # Invariants
/// - `start <= end`
/// - `first_row_top <= 0` (the first row may be partly scrolled off)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VisibleRange {
    /// Index of first visible row (inclusive).
    pub start: usize,
    /// Index of last visible row (exclusive).
    pub end: usize,
    /// Viewport y of the first row's top edge.
    pub first_row_top: f32,
}

impl VisibleRange {
    /// Create new visible range.
    ///
    /// # Panics
    /// In debug builds, panics if start > end.
    pub fn new(start: usize, end: usize, first_row_top: f32) -> Self {
        debug_assert!(start <= end, "visible range start {start} > end {end}");
        Self {
            start,
            end,
            first_row_top,
        }
    }

    /// Number of visible rows.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if range is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Iterate over visible row indices.
    pub fn indices(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Check if a specific row is visible.
    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }
}
