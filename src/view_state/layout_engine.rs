//! Identity-keyed layout side table.
//!
//! Records are immutable and shared with the producer thread, so derived
//! geometry lives here, keyed by [`MessageId`], and is pruned when a record
//! leaves the snapshot.

use super::layout::{LayoutOptions, MessageLayout};
use super::measure::{CellMeasure, TextMeasure};
use super::types::LayoutKey;
use crate::model::{MessageId, MessageRecord};
use crate::store::Snapshot;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// Computes and memoizes [`MessageLayout`]s.
#[derive(Debug)]
pub struct LayoutEngine<M = CellMeasure> {
    measure: M,
    layouts: HashMap<MessageId, MessageLayout>,
    expanded: HashSet<MessageId>,
    collapse_threshold: usize,
    next_generation: u64,
}

impl Default for LayoutEngine<CellMeasure> {
    fn default() -> Self {
        Self::new(CellMeasure, 0)
    }
}

impl<M: TextMeasure> LayoutEngine<M> {
    /// Create an engine. `collapse_threshold` of 0 disables collapsing.
    pub fn new(measure: M, collapse_threshold: usize) -> Self {
        Self {
            measure,
            layouts: HashMap::new(),
            expanded: HashSet::new(),
            collapse_threshold,
            next_generation: 1,
        }
    }

    /// Glyph metrics in use.
    pub fn measure(&self) -> &M {
        &self.measure
    }

    /// Change the collapse threshold; every layout is recomputed lazily.
    pub fn set_collapse_threshold(&mut self, threshold: usize) {
        if self.collapse_threshold != threshold {
            self.collapse_threshold = threshold;
            self.invalidate_all();
        }
    }

    /// Cached layout for `id`, regardless of geometry.
    pub fn get(&self, id: MessageId) -> Option<&MessageLayout> {
        self.layouts.get(&id)
    }

    /// Number of cached layouts.
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Whether no layouts are cached.
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Drop every cached layout.
    pub fn invalidate_all(&mut self) {
        self.layouts.clear();
    }

    /// Drop the layout of one record.
    pub fn invalidate(&mut self, id: MessageId) {
        self.layouts.remove(&id);
    }

    /// Lay out `record` for `key` unless an up-to-date layout exists.
    ///
    /// Returns whether a new layout was computed.
    pub fn ensure(&mut self, record: &MessageRecord, key: LayoutKey) -> bool {
        let id = record.id();
        if self.layouts.get(&id).is_some_and(|layout| layout.key() == key) {
            return false;
        }

        let generation = self.next_generation;
        self.next_generation += 1;
        let layout = MessageLayout::compute(
            record,
            &self.measure,
            LayoutOptions {
                key,
                collapse_threshold: self.collapse_threshold,
                expanded_by_user: self.expanded.contains(&id),
                generation,
            },
        );
        trace!(%id, height = layout.height(), generation, "laid out");
        self.layouts.insert(id, layout);
        true
    }

    /// Height of `record` at the given geometry, laying it out if needed.
    pub fn row_height(&mut self, record: &MessageRecord, width: f32, scale: f32) -> f32 {
        let key = LayoutKey::new(width, scale);
        self.ensure(record, key);
        self.layouts
            .get(&record.id())
            .map_or(0.0, MessageLayout::height)
    }

    /// Lay out exactly rows `[start, end)`. Returns whether any row changed.
    pub fn layout_window(
        &mut self,
        snapshot: &Snapshot,
        start: usize,
        end: usize,
        width: f32,
        scale: f32,
    ) -> bool {
        let key = LayoutKey::new(width, scale);
        let end = end.min(snapshot.len());
        let mut changed = false;
        for index in start.min(end)..end {
            changed |= self.ensure(&snapshot[index], key);
        }
        changed
    }

    /// Lay out the rows visible from a fractional scroll `position`.
    ///
    /// Walks from `floor(position)`, starting at `-height * fract(position)`,
    /// until the running y reaches `viewport_height`.
    pub fn layout_visible(
        &mut self,
        snapshot: &Snapshot,
        position: f64,
        width: f32,
        scale: f32,
        viewport_height: f32,
    ) -> bool {
        if snapshot.is_empty() {
            return false;
        }
        let key = LayoutKey::new(width, scale);
        let position = position.max(0.0);
        let mut index = position.floor() as usize;
        let fraction = (position - position.floor()) as f32;

        let mut changed = false;
        let mut y: Option<f32> = None;
        while index < snapshot.len() {
            let record = &snapshot[index];
            changed |= self.ensure(record, key);
            let height = self.layouts.get(&record.id()).map_or(0.0, MessageLayout::height);
            let top = *y.get_or_insert(-height * fraction);
            let next = top + height;
            y = Some(next);
            if next >= viewport_height {
                break;
            }
            index += 1;
        }
        changed
    }

    /// Rows (fractional) that fit at the bottom of `available_height`.
    ///
    /// Walks bottom-up. Returns `None` when all content fits, meaning the
    /// scrollbar should be hidden.
    pub fn compute_large_change(
        &mut self,
        snapshot: &Snapshot,
        width: f32,
        scale: f32,
        available_height: f32,
    ) -> Option<f64> {
        let key = LayoutKey::new(width, scale);
        let len = snapshot.len();
        let mut remaining = available_height;
        for index in (0..len).rev() {
            let record = &snapshot[index];
            self.ensure(record, key);
            let height = self.layouts.get(&record.id()).map_or(0.0, MessageLayout::height);
            remaining -= height;
            if remaining < 0.0 {
                return Some((len - index) as f64 + f64::from(remaining) / f64::from(height));
            }
        }
        None
    }

    /// Drop layouts whose record is no longer in `snapshot`.
    pub fn prune(&mut self, snapshot: &Snapshot) -> usize {
        let live: HashSet<MessageId> = snapshot.iter().map(|record| record.id()).collect();
        let before = self.layouts.len();
        self.layouts.retain(|id, _| live.contains(id));
        self.expanded.retain(|id| live.contains(id));
        let pruned = before - self.layouts.len();
        if pruned > 0 {
            debug!(pruned, remaining = self.layouts.len(), "pruned layouts");
        }
        pruned
    }

    /// Show a collapsed message in full.
    pub fn expand(&mut self, id: MessageId) {
        if self.expanded.insert(id) {
            self.layouts.remove(&id);
        }
    }

    /// Flip a message between collapsed and expanded.
    pub fn toggle_collapsed(&mut self, id: MessageId) {
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
        self.layouts.remove(&id);
    }
}
