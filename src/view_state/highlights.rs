//! Scrollbar highlight markers, one per store row.

use crate::model::{HighlightKind, ScrollbarHighlight};
use crate::store::Snapshot;
use std::collections::VecDeque;

/// Bounded deque of markers aligned 1:1 with the rows of the view's
/// snapshot.
#[derive(Debug, Clone, Default)]
pub struct HighlightMarkers {
    capacity: usize,
    markers: VecDeque<ScrollbarHighlight>,
}

impl HighlightMarkers {
    /// Empty marker list holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            markers: VecDeque::new(),
        }
    }

    /// Number of rows tracked.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether no rows are tracked.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Marker for a newly appended row.
    pub fn push_back(&mut self, highlight: ScrollbarHighlight) {
        if self.capacity == 0 {
            return;
        }
        if self.markers.len() >= self.capacity {
            self.markers.pop_front();
        }
        self.markers.push_back(highlight);
    }

    /// Drop the marker of an evicted head row.
    pub fn pop_front(&mut self) -> Option<ScrollbarHighlight> {
        self.markers.pop_front()
    }

    /// Markers for a history batch (oldest first), trimming the tail.
    pub fn push_front_batch(&mut self, highlights: &[ScrollbarHighlight]) {
        for highlight in highlights.iter().rev() {
            self.markers.push_front(*highlight);
        }
        self.markers.truncate(self.capacity);
    }

    /// Replace the marker at `index`. Out-of-range indices are ignored.
    pub fn replace(&mut self, index: usize, highlight: ScrollbarHighlight) -> bool {
        match self.markers.get_mut(index) {
            Some(slot) => {
                *slot = highlight;
                true
            }
            None => false,
        }
    }

    /// Remove every marker.
    pub fn clear(&mut self) {
        self.markers.clear();
    }

    /// Rebuild from the rows of `snapshot`.
    pub fn rebuild(&mut self, snapshot: &Snapshot) {
        self.markers.clear();
        self.markers
            .extend(snapshot.iter().map(|record| record.scrollbar_highlight()));
    }

    /// Non-null markers as `(row, kind)` pairs.
    pub fn markers(&self) -> impl Iterator<Item = (usize, HighlightKind)> + '_ {
        self.markers
            .iter()
            .enumerate()
            .filter(|(_, highlight)| !highlight.is_null())
            .map(|(row, highlight)| (row, highlight.kind()))
    }
}
