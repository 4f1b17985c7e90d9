//! Timed pause of store observation.
//!
//! While paused the view keeps painting its old snapshot and only records
//! what happened at the head of the store. On resume it adopts the newest
//! snapshot and replays the recorded head changes once.

use super::selection::SelectionItem;
use std::time::{Duration, Instant};
use tracing::debug;

/// Pause deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PauseState {
    until: Option<Instant>,
}

impl PauseState {
    /// Pause for `duration` from `now`. An existing later deadline is kept.
    pub fn pause(&mut self, duration: Duration, now: Instant) {
        let deadline = now + duration;
        let until = match self.until {
            Some(existing) if existing > deadline => existing,
            _ => deadline,
        };
        if self.until.is_none() {
            debug!(?duration, "paused");
        }
        self.until = Some(until);
    }

    /// Lift the pause. Returns whether the view was paused.
    pub fn resume(&mut self) -> bool {
        self.until.take().is_some()
    }

    /// Lift the pause if its deadline passed. Returns whether it expired now.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.until {
            Some(until) if until <= now => {
                self.until = None;
                debug!("pause expired");
                true
            }
            _ => false,
        }
    }

    /// Whether store changes are currently deferred.
    pub fn is_paused(&self) -> bool {
        self.until.is_some()
    }

    /// Current deadline.
    pub fn deadline(&self) -> Option<Instant> {
        self.until
    }
}

/// One change at the head of the store, as seen by selection anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadShift {
    /// Rows evicted from the head.
    Evicted(usize),
    /// Rows inserted at the head.
    Inserted {
        /// Number of rows inserted.
        count: usize,
        /// End of the last surviving row when the insertion evicted rows
        /// from the tail.
        tail_limit: Option<SelectionItem>,
    },
}

/// Head changes observed while paused, kept in order.
///
/// Runs of evictions are merged; everything else is recorded as it came,
/// so replaying the steps lands anchors where event-by-event handling
/// would have put them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingShift {
    /// Head changes, oldest first.
    pub steps: Vec<HeadShift>,
    /// The store was cleared; earlier steps no longer apply.
    pub cleared: bool,
    /// Anything changed at all (including tail appends and replacements).
    pub dirty: bool,
}

impl PendingShift {
    /// Record head evictions.
    pub fn evicted(&mut self, count: usize) {
        self.dirty = true;
        if let Some(HeadShift::Evicted(run)) = self.steps.last_mut() {
            *run += count;
        } else {
            self.steps.push(HeadShift::Evicted(count));
        }
    }

    /// Record a head insertion.
    pub fn inserted(&mut self, count: usize, tail_limit: Option<SelectionItem>) {
        self.dirty = true;
        self.steps.push(HeadShift::Inserted { count, tail_limit });
    }

    /// Record a change that does not move rows.
    pub fn touched(&mut self) {
        self.dirty = true;
    }

    /// Record a clear; positions before it are meaningless.
    pub fn clear(&mut self) {
        *self = Self {
            cleared: true,
            dirty: true,
            ..Self::default()
        };
    }

    /// Total rows evicted from the head.
    pub fn evicted_from_head(&self) -> usize {
        self.steps
            .iter()
            .map(|step| match step {
                HeadShift::Evicted(count) => *count,
                HeadShift::Inserted { .. } => 0,
            })
            .sum()
    }

    /// Total rows inserted at the head.
    pub fn inserted_at_head(&self) -> usize {
        self.steps
            .iter()
            .map(|step| match step {
                HeadShift::Inserted { count, .. } => *count,
                HeadShift::Evicted(_) => 0,
            })
            .sum()
    }

    /// Net row shift (positive moves indices down).
    pub fn net(&self) -> f64 {
        self.inserted_at_head() as f64 - self.evicted_from_head() as f64
    }

    /// Take the accumulated shift, leaving an empty one.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod pause_state {
        use super::*;

        #[test]
        fn pause_then_expire_after_deadline() {
            let mut state = PauseState::default();
            let now = Instant::now();
            state.pause(Duration::from_millis(300), now);
            assert!(state.is_paused());
            assert!(!state.expire(now + Duration::from_millis(299)));
            assert!(state.expire(now + Duration::from_millis(300)));
            assert!(!state.is_paused());
        }

        #[test]
        fn shorter_pause_does_not_shorten_deadline() {
            let mut state = PauseState::default();
            let now = Instant::now();
            state.pause(Duration::from_millis(500), now);
            state.pause(Duration::from_millis(200), now);
            assert_eq!(state.deadline(), Some(now + Duration::from_millis(500)));
        }

        #[test]
        fn later_pause_extends_deadline() {
            let mut state = PauseState::default();
            let now = Instant::now();
            state.pause(Duration::from_millis(300), now);
            state.pause(Duration::from_millis(300), now + Duration::from_millis(200));
            assert_eq!(state.deadline(), Some(now + Duration::from_millis(500)));
        }

        #[test]
        fn resume_reports_previous_state() {
            let mut state = PauseState::default();
            assert!(!state.resume());
            state.pause(Duration::from_millis(10), Instant::now());
            assert!(state.resume());
            assert!(!state.is_paused());
        }
    }

    mod pending_shift {
        use super::*;

        #[test]
        fn eviction_runs_merge_and_order_is_kept() {
            let mut shift = PendingShift::default();
            shift.evicted(1);
            shift.evicted(1);
            shift.inserted(3, None);
            shift.evicted(1);
            assert_eq!(
                shift.steps,
                vec![
                    HeadShift::Evicted(2),
                    HeadShift::Inserted {
                        count: 3,
                        tail_limit: None
                    },
                    HeadShift::Evicted(1),
                ]
            );
            assert_eq!(shift.net(), 0.0);
            assert!(shift.dirty);

            let taken = shift.take();
            assert_eq!(taken.evicted_from_head(), 3);
            assert_eq!(taken.inserted_at_head(), 3);
            assert_eq!(shift, PendingShift::default());
        }

        #[test]
        fn clear_discards_earlier_steps() {
            let mut shift = PendingShift::default();
            shift.evicted(4);
            shift.clear();
            shift.inserted(1, None);
            assert!(shift.cleared);
            assert_eq!(shift.evicted_from_head(), 0);
            assert_eq!(shift.inserted_at_head(), 1);
        }
    }
}
