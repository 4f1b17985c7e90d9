//! Pointer handling for [`ChannelView`]: hover, drag-selection and clicks.

use super::channel_view::{ChannelView, CursorShape, HoverState, ViewEvent};
use crate::view_state::{HitTestResult, Point, SelectionItem, TextMeasure};
use std::time::{Duration, Instant};
use tracing::debug;

/// Pause applied while a drag-selection moves.
pub const SELECTION_PAUSE: Duration = Duration::from_millis(500);
/// Pause applied on press when links need a double click.
pub const DOUBLE_CLICK_PAUSE: Duration = Duration::from_millis(200);
/// Press-to-release distance beyond which a release is not a click.
pub const CLICK_DISTANCE_THRESHOLD: f32 = 15.0;

impl<B, M: TextMeasure> ChannelView<B, M> {
    /// Pointer moved to `point` (viewport coordinates).
    pub fn on_pointer_move(&mut self, point: Point, now: Instant) {
        if self.settings.pause_on_hover {
            let duration = self.settings.pause_duration;
            self.pause(duration, now);
        }

        let previous = self.hover.clone();
        self.hover = HoverState {
            position: Some(point),
            ..HoverState::default()
        };

        let HitTestResult::Hit {
            index, relative, ..
        } = self.message_at(point)
        else {
            self.repaint_if_hover_changed(&previous);
            return;
        };

        if self.selecting {
            self.pause(SELECTION_PAUSE, now);
            let char_index = self.selection_index_at(index, relative);
            let start = self.selection.start;
            self.set_selection(start, SelectionItem::new(index, char_index));
        }

        self.update_hover(index, relative);
        self.repaint_if_hover_changed(&previous);
    }

    /// Pointer pressed at `point`.
    pub fn on_pointer_down(&mut self, point: Point, now: Instant) {
        if self.settings.links_double_click_only {
            self.pause(DOUBLE_CLICK_PAUSE, now);
        }

        self.mouse_down = true;
        self.press_position = Some(point);

        match self.message_at(point) {
            HitTestResult::Miss => {
                self.hover.cursor = CursorShape::Arrow;
                let Some(last) = self.snapshot.len().checked_sub(1) else {
                    return;
                };
                // Below the content: anchor at the very end of the newest row.
                let last_char = self.snapshot[last].last_char_index();
                let at = SelectionItem::new(last, last_char);
                self.set_selection(at, at);
                self.selecting = true;
                self.pause(SELECTION_PAUSE, now);
            }
            HitTestResult::Hit {
                index,
                id,
                relative,
            } => {
                if self.layout(id).is_some_and(|layout| layout.is_collapsed()) {
                    return;
                }
                let char_index = self.selection_index_at(index, relative);
                let at = SelectionItem::new(index, char_index);
                self.set_selection(at, at);
                self.selecting = true;
                self.pause(SELECTION_PAUSE, now);
                self.request_repaint();
            }
        }
    }

    /// Pointer released at `point`.
    ///
    /// Ends a drag-selection (and its pause). A release close to the press
    /// is a click: it expands a collapsed row or activates a link.
    pub fn on_pointer_up(&mut self, point: Point, now: Instant) {
        if !self.mouse_down {
            return;
        }

        let was_selecting = self.selecting;
        self.mouse_down = false;
        self.selecting = false;
        if was_selecting {
            self.unpause(now);
        }

        let Some(pressed) = self.press_position.take() else {
            return;
        };
        if pressed.distance(point) > self.click_threshold {
            return;
        }

        let HitTestResult::Hit {
            index,
            id,
            relative,
        } = self.message_at(point)
        else {
            return;
        };

        let Some(layout) = self.engine.get(id) else {
            return;
        };
        if layout.is_collapsed() {
            debug!(%id, "expanding collapsed message");
            self.engine.expand(id);
            self.layout_messages(now);
            self.request_repaint();
            return;
        }

        let link = layout
            .element_at(relative)
            .and_then(|piece| self.snapshot[index].elements().get(piece.element_index()))
            .and_then(|element| element.link().cloned());
        if let Some(link) = link {
            debug!(?link, "link activated");
            self.events.push(ViewEvent::LinkActivated(link));
        }
    }

    /// Pointer left the view: hover feedback is cleared and any pause ends.
    pub fn on_pointer_leave(&mut self, now: Instant) {
        if self.hover != HoverState::default() {
            self.hover = HoverState::default();
            self.request_repaint();
        }
        self.unpause(now);
    }

    fn selection_index_at(&mut self, index: usize, relative: Point) -> usize {
        let record = &self.snapshot[index];
        let key = self.layout_key();
        self.engine.ensure(record, key);
        match self.engine.get(record.id()) {
            Some(layout) => layout.selection_index(relative, record, self.engine.measure()),
            None => 0,
        }
    }

    fn update_hover(&mut self, index: usize, relative: Point) {
        let record = &self.snapshot[index];
        let Some(layout) = self.engine.get(record.id()) else {
            return;
        };

        if layout.is_collapsed() {
            self.hover.cursor = CursorShape::PointingHand;
            return;
        }

        let Some(element) = layout
            .element_at(relative)
            .and_then(|piece| record.elements().get(piece.element_index()))
        else {
            return;
        };

        self.hover.tooltip = element.tooltip().map(str::to_string);
        if element.link().is_some() {
            self.hover.cursor = CursorShape::PointingHand;
        }
    }

    fn repaint_if_hover_changed(&mut self, previous: &HoverState) {
        if self.hover.cursor != previous.cursor || self.hover.tooltip != previous.tooltip {
            self.request_repaint();
        }
    }
}

#[cfg(test)]
#[path = "mouse_handler_tests.rs"]
mod tests;
