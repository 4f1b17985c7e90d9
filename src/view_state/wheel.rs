//! Distribution of a wheel delta over rows of unequal height.
//!
//! A scroll position is fractional: the integer part is a row index and the
//! fraction is how far into that row the viewport top sits. A wheel delta is
//! a distance in layout units, so moving by it means walking row by row and
//! spending the row's height for each whole row crossed.

use super::layout_engine::LayoutEngine;
use super::measure::TextMeasure;
use super::types::LayoutKey;
use crate::store::Snapshot;

/// Multiplier applied to raw toolkit wheel deltas before the walk.
pub const WHEEL_SCALE: f64 = 1.5;

/// Row heights consulted by [`walk_wheel_delta`].
pub trait RowHeights {
    /// Number of rows.
    fn len(&self) -> usize;

    /// Height of row `index` (`index < len()`).
    fn height(&mut self, index: usize) -> f64;

    /// Whether there are no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RowHeights for [f64] {
    fn len(&self) -> usize {
        <[f64]>::len(self)
    }

    fn height(&mut self, index: usize) -> f64 {
        self[index]
    }
}

impl RowHeights for Vec<f64> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn height(&mut self, index: usize) -> f64 {
        self[index]
    }
}

/// Adapts a snapshot plus the layout engine to [`RowHeights`], laying rows
/// out on demand.
pub struct SnapshotRows<'a, M: TextMeasure> {
    snapshot: &'a Snapshot,
    engine: &'a mut LayoutEngine<M>,
    key: LayoutKey,
}

impl<'a, M: TextMeasure> SnapshotRows<'a, M> {
    /// Wrap `snapshot` with heights computed at `key`.
    pub fn new(snapshot: &'a Snapshot, engine: &'a mut LayoutEngine<M>, key: LayoutKey) -> Self {
        Self {
            snapshot,
            engine,
            key,
        }
    }
}

impl<M: TextMeasure> RowHeights for SnapshotRows<'_, M> {
    fn len(&self) -> usize {
        self.snapshot.len()
    }

    fn height(&mut self, index: usize) -> f64 {
        match self.snapshot.get(index) {
            Some(record) => f64::from(self.engine.row_height(record, self.key.width, self.key.scale)),
            None => 0.0,
        }
    }
}

/// Scale a raw toolkit delta by the wheel factor and user multiplier.
pub fn scaled_wheel_delta(raw: f64, multiplier: f64) -> f64 {
    raw * WHEEL_SCALE * multiplier
}

/// New desired position after scrolling `delta` layout units from `desired`.
///
/// Positive deltas scroll toward older rows, negative toward newer rows.
/// The walk is piecewise linear: each row consumes its own height, so a
/// delta of one row's height moves exactly one row. The result is clamped
/// to `[0, rows.len()]`.
pub fn walk_wheel_delta<R: RowHeights + ?Sized>(rows: &mut R, desired: f64, delta: f64) -> f64 {
    let len = rows.len();
    let max = len as f64;
    let mut desired = if desired.is_finite() {
        desired.clamp(0.0, max)
    } else {
        0.0
    };
    if len == 0 || delta == 0.0 || !delta.is_finite() {
        return desired;
    }

    let mut index = (desired.floor() as usize).min(len);
    let fraction = desired - desired.floor();

    if delta > 0.0 {
        let mut remaining = delta;
        let mut factor = fraction;
        let mut extent = if index < len {
            factor * rows.height(index)
        } else {
            0.0
        };
        loop {
            if remaining < extent {
                desired -= factor * (remaining / extent);
                break;
            }
            remaining -= extent;
            desired -= factor;
            if index == 0 {
                desired = 0.0;
                break;
            }
            index -= 1;
            factor = 1.0;
            extent = rows.height(index);
        }
    } else {
        if index >= len {
            return max;
        }
        let mut remaining = -delta;
        let mut factor = 1.0 - fraction;
        let mut extent = factor * rows.height(index);
        loop {
            if remaining < extent {
                desired += factor * (remaining / extent);
                break;
            }
            remaining -= extent;
            desired += factor;
            if index + 1 >= len {
                desired = max;
                break;
            }
            index += 1;
            factor = 1.0;
            extent = rows.height(index);
        }
    }

    desired.clamp(0.0, max)
}
