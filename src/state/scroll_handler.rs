//! Wheel and keyboard scrolling for [`ChannelView`].

use super::channel_view::ChannelView;
use crate::model::KeyAction;
use crate::view_state::wheel::{scaled_wheel_delta, walk_wheel_delta, SnapshotRows};
use crate::view_state::TextMeasure;
use std::time::Instant;
use tracing::trace;

impl<B, M: TextMeasure> ChannelView<B, M> {
    /// Wheel turned by `raw_delta` toolkit units (positive scrolls toward
    /// older messages).
    ///
    /// The delta is scaled, then walked across row heights so that one unit
    /// of movement is one unit of painted height regardless of row sizes.
    /// Ignored while the scrollbar is hidden. Returns whether the desired
    /// position changed.
    pub fn on_wheel(&mut self, raw_delta: f64, now: Instant) -> bool {
        if !self.scrollbar.is_visible() || self.snapshot.is_empty() {
            return false;
        }

        let delta = scaled_wheel_delta(raw_delta, self.settings.wheel_multiplier);
        let key = self.layout_key();
        let start = self.scrollbar.desired_value();
        let desired = {
            let mut rows = SnapshotRows::new(&self.snapshot, &mut self.engine, key);
            walk_wheel_delta(&mut rows, start, delta)
        };
        trace!(raw_delta, delta, start, desired, "wheel");

        let animate = self.settings.smooth_scrolling;
        let changed = self.scrollbar.set_desired_value(desired, animate, now);
        if changed {
            self.layout_messages(now);
            self.request_repaint();
        }
        changed
    }

    /// Scroll by `rows` whole rows from the desired position.
    pub fn scroll_rows(&mut self, rows: f64, now: Instant) -> bool {
        let animate = self.settings.smooth_scrolling;
        let changed = self.scrollbar.scroll_by_rows(rows, animate, now);
        self.after_keyboard_scroll(changed, now)
    }

    /// Jump to the newest message.
    pub fn scroll_to_bottom(&mut self, now: Instant) -> bool {
        let animate = self.settings.smooth_scroll_new_messages;
        let changed = self.scrollbar.scroll_to_bottom(animate, now);
        self.after_keyboard_scroll(changed, now)
    }

    fn after_keyboard_scroll(&mut self, changed: bool, now: Instant) -> bool {
        if changed {
            self.layout_messages(now);
            self.request_repaint();
        }
        changed
    }
}

/// Apply a scroll key to `view`. Non-scroll actions are ignored.
///
/// Returns whether the scroll position changed.
pub fn handle_scroll_action<B, M: TextMeasure>(
    view: &mut ChannelView<B, M>,
    action: KeyAction,
    now: Instant,
) -> bool {
    let animate = view.settings().smooth_scrolling;
    let step = view.scrollbar().small_change();
    match action {
        KeyAction::ScrollUp => view.scroll_rows(-step, now),
        KeyAction::ScrollDown => view.scroll_rows(step, now),
        KeyAction::PageUp => {
            let changed = view.scrollbar.page_up(animate, now);
            view.after_keyboard_scroll(changed, now)
        }
        KeyAction::PageDown => {
            let changed = view.scrollbar.page_down(animate, now);
            view.after_keyboard_scroll(changed, now)
        }
        KeyAction::ScrollToTop => {
            let changed = view.scrollbar.set_desired_value(0.0, animate, now);
            view.after_keyboard_scroll(changed, now)
        }
        KeyAction::ScrollToBottom => view.scroll_to_bottom(now),
        KeyAction::CopySelection
        | KeyAction::ClearSelection
        | KeyAction::Quit => false,
    }
}

#[cfg(test)]
#[path = "scroll_handler_tests.rs"]
mod tests;
