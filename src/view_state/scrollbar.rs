//! Fractional scrollbar model with smooth scrolling.
//!
//! Positions are row-based: the integer part of a value is a row index and
//! the fraction is the offset within that row. `maximum` is the row count,
//! `large_change` the number of (fractional) rows that fit at the bottom of
//! the viewport.

use super::highlights::HighlightMarkers;
use std::time::{Duration, Instant};

/// Length of a smooth-scroll animation.
pub const SMOOTH_SCROLL_DURATION: Duration = Duration::from_millis(250);

/// Rows per keyboard line step.
pub const DEFAULT_SMALL_CHANGE: f64 = 5.0;

const AT_BOTTOM_EPSILON: f64 = 1e-4;

/// `1 - (1 - t)^3`, for `t` in `[0, 1]`.
pub fn ease_out_cubic(t: f64) -> f64 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Animation {
    from: f64,
    to: f64,
    started: Instant,
}

/// Placement of the thumb along a track, in track units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbGeometry {
    /// Offset of the thumb's start from the track's start.
    pub offset: f32,
    /// Thumb length.
    pub length: f32,
}

/// Scroll position, bounds and highlight markers of one view.
///
/// # Invariants
/// - `0 <= current <= maximum` and `0 <= desired <= maximum`
/// - without an animation in flight, `current == desired`
#[derive(Debug, Clone)]
pub struct Scrollbar {
    maximum: f64,
    large_change: f64,
    small_change: f64,
    current: f64,
    desired: f64,
    visible: bool,
    animation: Option<Animation>,
    highlights: HighlightMarkers,
}

impl Default for Scrollbar {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Scrollbar {
    /// Hidden scrollbar at the top, tracking up to `marker_capacity` rows.
    pub fn new(marker_capacity: usize) -> Self {
        Self {
            maximum: 0.0,
            large_change: 0.0,
            small_change: DEFAULT_SMALL_CHANGE,
            current: 0.0,
            desired: 0.0,
            visible: false,
            animation: None,
            highlights: HighlightMarkers::new(marker_capacity),
        }
    }

    /// Row count.
    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    /// Rows that fit at the bottom of the viewport.
    pub fn large_change(&self) -> f64 {
        self.large_change
    }

    /// Rows per keyboard line step.
    pub fn small_change(&self) -> f64 {
        self.small_change
    }

    /// Position currently painted.
    pub fn current_value(&self) -> f64 {
        self.current
    }

    /// Position being scrolled to.
    pub fn desired_value(&self) -> f64 {
        self.desired
    }

    /// Whether the scrollbar is shown (content overflows).
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether a smooth scroll is in flight.
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Highlight markers.
    pub fn highlights(&self) -> &HighlightMarkers {
        &self.highlights
    }

    /// Highlight markers, mutably.
    pub fn highlights_mut(&mut self) -> &mut HighlightMarkers {
        &mut self.highlights
    }

    /// Highest position `set_desired_value` accepts: the last row's bottom
    /// meets the viewport bottom.
    pub fn max_value(&self) -> f64 {
        (self.maximum - self.large_change).max(0.0)
    }

    /// Set the row count; positions are clamped into range.
    pub fn set_maximum(&mut self, maximum: f64) {
        self.maximum = if maximum.is_finite() { maximum.max(0.0) } else { 0.0 };
        self.current = self.current.min(self.maximum);
        self.desired = self.desired.min(self.maximum);
        if let Some(animation) = &mut self.animation {
            animation.to = animation.to.min(self.maximum);
        }
    }

    /// Set the rows that fit at the bottom.
    pub fn set_large_change(&mut self, large_change: f64) {
        self.large_change = if large_change.is_finite() {
            large_change.max(0.0)
        } else {
            0.0
        };
    }

    /// Set the keyboard step.
    pub fn set_small_change(&mut self, small_change: f64) {
        self.small_change = small_change.max(0.0);
    }

    /// Show or hide. Hiding resets the position to the top.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.animation = None;
            self.current = 0.0;
            self.desired = 0.0;
        }
    }

    /// Move to `value`, clamped to `[0, max_value()]`.
    ///
    /// Without `animate` the move is immediate. Otherwise `current` eases
    /// toward the target; retargeting restarts from the present `current`.
    /// Returns whether either position changed.
    pub fn set_desired_value(&mut self, value: f64, animate: bool, now: Instant) -> bool {
        let value = if value.is_finite() { value } else { 0.0 };
        let value = value.clamp(0.0, self.max_value());
        let before = (self.current, self.desired);

        self.desired = value;
        if animate && (value - self.current).abs() > f64::EPSILON {
            self.animation = Some(Animation {
                from: self.current,
                to: value,
                started: now,
            });
        } else {
            self.animation = None;
            self.current = value;
        }
        before != (self.current, self.desired)
    }

    /// Scroll so the newest row is fully visible.
    pub fn scroll_to_bottom(&mut self, animate: bool, now: Instant) -> bool {
        self.set_desired_value(self.max_value(), animate, now)
    }

    /// Scroll by `rows` relative to the desired position.
    pub fn scroll_by_rows(&mut self, rows: f64, animate: bool, now: Instant) -> bool {
        self.set_desired_value(self.desired + rows, animate, now)
    }

    /// Scroll up by one page.
    pub fn page_up(&mut self, animate: bool, now: Instant) -> bool {
        self.scroll_by_rows(-self.large_change.max(1.0), animate, now)
    }

    /// Scroll down by one page.
    pub fn page_down(&mut self, animate: bool, now: Instant) -> bool {
        self.scroll_by_rows(self.large_change.max(1.0), animate, now)
    }

    /// Shift both positions by `rows` so the same content stays on screen
    /// after rows were added or removed at the head.
    pub fn offset(&mut self, rows: f64) {
        let upper = self.max_value();
        self.current = (self.current + rows).clamp(0.0, upper);
        self.desired = (self.desired + rows).clamp(0.0, upper);
        if let Some(animation) = &mut self.animation {
            animation.from = (animation.from + rows).clamp(0.0, upper);
            animation.to = (animation.to + rows).clamp(0.0, upper);
        }
    }

    /// Whether the newest content is in view.
    ///
    /// Judged on the desired position, so an in-flight scroll to the bottom
    /// already counts.
    pub fn is_at_bottom(&self) -> bool {
        self.desired + self.large_change >= self.maximum - AT_BOTTOM_EPSILON
    }

    /// Advance the animation. Returns whether `current` changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(animation) = self.animation else {
            return false;
        };

        let before = self.current;
        let elapsed = now.saturating_duration_since(animation.started);
        if elapsed >= SMOOTH_SCROLL_DURATION {
            self.current = animation.to;
            self.animation = None;
        } else {
            let t = elapsed.as_secs_f64() / SMOOTH_SCROLL_DURATION.as_secs_f64();
            self.current = animation.from + (animation.to - animation.from) * ease_out_cubic(t);
        }
        self.current = self.current.clamp(0.0, self.maximum);
        (self.current - before).abs() > f64::EPSILON
    }

    /// Thumb placement along a track of `track_length` units.
    ///
    /// `None` when hidden or when there is nothing to scroll.
    pub fn thumb(&self, track_length: f32) -> Option<ThumbGeometry> {
        if !self.visible || self.maximum <= 0.0 || track_length <= 0.0 {
            return None;
        }
        let track = f64::from(track_length);
        let length = (track * self.large_change / self.maximum).clamp(1.0_f64.min(track), track);
        let offset = (track * self.current / self.maximum).clamp(0.0, track - length);
        Some(ThumbGeometry {
            offset: offset as f32,
            length: length as f32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scrollbar(maximum: f64, large_change: f64) -> Scrollbar {
        let mut bar = Scrollbar::new(100);
        bar.set_maximum(maximum);
        bar.set_large_change(large_change);
        bar.set_visible(true);
        bar
    }

    mod positioning {
        use super::*;

        #[test]
        fn desired_is_clamped_to_bottom_position() {
            let mut bar = scrollbar(20.0, 4.5);
            let now = Instant::now();
            bar.set_desired_value(100.0, false, now);
            assert_eq!(bar.desired_value(), 15.5);
            bar.set_desired_value(-3.0, false, now);
            assert_eq!(bar.desired_value(), 0.0);
        }

        #[test]
        fn snap_moves_current_immediately() {
            let mut bar = scrollbar(20.0, 5.0);
            assert!(bar.set_desired_value(3.25, false, Instant::now()));
            assert_eq!(bar.current_value(), 3.25);
            assert!(!bar.is_animating());
        }

        #[test]
        fn scroll_to_bottom_reaches_bottom() {
            let mut bar = scrollbar(20.0, 5.0);
            bar.scroll_to_bottom(false, Instant::now());
            assert_eq!(bar.current_value(), 15.0);
            assert!(bar.is_at_bottom());
        }

        #[test]
        fn hiding_resets_to_top() {
            let mut bar = scrollbar(20.0, 5.0);
            bar.set_desired_value(8.0, false, Instant::now());
            bar.set_visible(false);
            assert_eq!(bar.desired_value(), 0.0);
            assert_eq!(bar.current_value(), 0.0);
        }

        #[test]
        fn paging_moves_by_large_change() {
            let mut bar = scrollbar(20.0, 5.0);
            let now = Instant::now();
            bar.set_desired_value(10.0, false, now);
            bar.page_up(false, now);
            assert_eq!(bar.desired_value(), 5.0);
            bar.page_down(false, now);
            bar.page_down(false, now);
            assert_eq!(bar.desired_value(), 15.0);
        }
    }

    mod animation {
        use super::*;

        #[test]
        fn ease_out_cubic_endpoints() {
            assert_eq!(ease_out_cubic(0.0), 0.0);
            assert_eq!(ease_out_cubic(1.0), 1.0);
            assert!(ease_out_cubic(0.5) > 0.5);
        }

        #[test]
        fn animated_scroll_converges_on_tick() {
            let mut bar = scrollbar(20.0, 5.0);
            let start = Instant::now();
            bar.set_desired_value(10.0, true, start);
            assert_eq!(bar.current_value(), 0.0);
            assert!(bar.is_animating());

            assert!(bar.tick(start + Duration::from_millis(100)));
            let mid = bar.current_value();
            assert!(mid > 0.0 && mid < 10.0);

            bar.tick(start + SMOOTH_SCROLL_DURATION);
            assert_eq!(bar.current_value(), 10.0);
            assert!(!bar.is_animating());
            assert!(!bar.tick(start + SMOOTH_SCROLL_DURATION * 2));
        }

        #[test]
        fn retarget_starts_from_present_current() {
            let mut bar = scrollbar(20.0, 5.0);
            let start = Instant::now();
            bar.set_desired_value(10.0, true, start);
            bar.tick(start + Duration::from_millis(100));
            let mid = bar.current_value();

            let retarget = start + Duration::from_millis(100);
            bar.set_desired_value(2.0, true, retarget);
            assert_eq!(bar.current_value(), mid);
            bar.tick(retarget + SMOOTH_SCROLL_DURATION);
            assert_eq!(bar.current_value(), 2.0);
        }

        #[test]
        fn in_flight_scroll_to_bottom_counts_as_at_bottom() {
            let mut bar = scrollbar(20.0, 5.0);
            bar.scroll_to_bottom(true, Instant::now());
            assert!(bar.current_value() < 15.0);
            assert!(bar.is_at_bottom());
        }
    }

    mod offsetting {
        use super::*;

        #[test]
        fn offset_shifts_both_positions() {
            let mut bar = scrollbar(20.0, 5.0);
            bar.set_desired_value(7.5, false, Instant::now());
            bar.offset(-1.0);
            assert_eq!(bar.current_value(), 6.5);
            assert_eq!(bar.desired_value(), 6.5);
        }

        #[test]
        fn offset_clamps_at_zero() {
            let mut bar = scrollbar(20.0, 5.0);
            bar.set_desired_value(0.5, false, Instant::now());
            bar.offset(-3.0);
            assert_eq!(bar.current_value(), 0.0);
            assert_eq!(bar.desired_value(), 0.0);
        }

        #[test]
        fn offset_shifts_animation_target() {
            let mut bar = scrollbar(20.0, 5.0);
            let start = Instant::now();
            bar.set_desired_value(10.0, true, start);
            bar.offset(2.0);
            bar.tick(start + SMOOTH_SCROLL_DURATION);
            assert_eq!(bar.current_value(), 12.0);
        }
    }

    mod thumb {
        use super::*;

        #[test]
        fn thumb_is_proportional() {
            let mut bar = scrollbar(20.0, 5.0);
            bar.set_desired_value(10.0, false, Instant::now());
            let thumb = bar.thumb(40.0).unwrap();
            assert_eq!(thumb.length, 10.0);
            assert_eq!(thumb.offset, 20.0);
        }

        #[test]
        fn hidden_scrollbar_has_no_thumb() {
            let bar = Scrollbar::default();
            assert!(bar.thumb(40.0).is_none());
        }
    }
}
