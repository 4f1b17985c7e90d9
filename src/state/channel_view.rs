//! Channel view: one scrollable chat pane over a shared message store.
//!
//! Owns the view-side state (snapshot, layouts, scrollbar, paint buffers,
//! selection, pause) and reacts to store events and toolkit input. Pointer
//! handling lives in `mouse_handler`, keyboard and wheel scrolling in
//! `scroll_handler`.

use crate::config::ViewSettings;
use crate::model::{Link, MessageId};
use crate::store::{channel, MessageStore, Snapshot, StoreChange, StoreEvent};
use crate::view_state::{
    CellMeasure, HitTestResult, LayoutEngine, LayoutKey, MessageLayout, PaintBufferCache,
    HeadShift, PauseState, PendingShift, Point, Scrollbar, Selection, SelectionItem, TextMeasure,
    ViewportSize, VisibleRange,
};
use std::mem;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Default scrollbar gutter, in layout units.
pub const DEFAULT_GUTTER_WIDTH: f32 = 1.0;

/// Notification for the host toolkit.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// Something visible changed.
    RepaintRequested,
    /// The selection anchors changed.
    SelectionChanged,
    /// A link was clicked.
    LinkActivated(Link),
    /// A message that may notify arrived.
    MessageNotification(MessageId),
}

/// One row drawn by [`ChannelView::paint`], in top-to-bottom order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintedRow {
    /// Row index within the view's snapshot.
    pub index: usize,
    /// Record identity; also the paint buffer key.
    pub id: MessageId,
    /// Viewport y of the row's top edge (may be negative for the first row).
    pub y: f32,
    /// Row height.
    pub height: f32,
    /// Selected positions in this row, if any.
    pub selection: Option<(usize, usize)>,
    /// Whether the row is shown truncated.
    pub collapsed: bool,
}

/// Cursor the host should show over the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    /// Default pointer.
    #[default]
    Arrow,
    /// Over a link or a collapsed message.
    PointingHand,
}

/// What the pointer is over.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HoverState {
    /// Cursor to display.
    pub cursor: CursorShape,
    /// Tooltip of the element under the pointer.
    pub tooltip: Option<String>,
    /// Last pointer position inside the view.
    pub position: Option<Point>,
}

/// View over a [`MessageStore`].
///
/// `B` is the host's paint buffer type, `M` the glyph metrics.
pub struct ChannelView<B, M: TextMeasure = CellMeasure> {
    pub(super) store: Arc<MessageStore>,
    pub(super) receiver: Receiver<StoreChange>,
    pub(super) snapshot: Snapshot,
    /// Newest version seen while paused; adopted on resume.
    pub(super) deferred_snapshot: Option<Snapshot>,
    pub(super) engine: LayoutEngine<M>,
    pub(super) scrollbar: Scrollbar,
    pub(super) cache: PaintBufferCache<B>,
    pub(super) selection: Selection,
    pub(super) selecting: bool,
    pub(super) mouse_down: bool,
    pub(super) press_position: Option<Point>,
    pub(super) pause: PauseState,
    pub(super) pending: PendingShift,
    pub(super) settings: ViewSettings,
    pub(super) viewport: ViewportSize,
    pub(super) scale: f32,
    pub(super) gutter_width: f32,
    pub(super) click_threshold: f32,
    pub(super) hover: HoverState,
    pub(super) events: Vec<ViewEvent>,
    pub(super) message_was_added: bool,
    pub(super) follow_pending: bool,
    pub(super) enable_scrolling_to_bottom: bool,
}

impl<B, M: TextMeasure> ChannelView<B, M> {
    /// Create a view over `store`, fed by `receiver`.
    ///
    /// Rows already in the store are adopted as-is and changes already
    /// queued for them are discarded.
    pub fn new(
        store: Arc<MessageStore>,
        receiver: Receiver<StoreChange>,
        settings: ViewSettings,
        measure: M,
    ) -> Self {
        let snapshot = store.settled(|snapshot| {
            let stale = channel::drain(&receiver).len();
            if stale > 0 {
                trace!(stale, "adopted store contents at view creation");
            }
            snapshot
        });
        let mut scrollbar = Scrollbar::new(store.capacity());
        scrollbar.highlights_mut().rebuild(&snapshot);
        scrollbar.set_maximum(snapshot.len() as f64);

        Self {
            engine: LayoutEngine::new(measure, settings.collapse_threshold_lines),
            store,
            receiver,
            snapshot,
            deferred_snapshot: None,
            scrollbar,
            cache: PaintBufferCache::new(),
            selection: Selection::default(),
            selecting: false,
            mouse_down: false,
            press_position: None,
            pause: PauseState::default(),
            pending: PendingShift::default(),
            settings,
            viewport: ViewportSize::default(),
            scale: 1.0,
            gutter_width: DEFAULT_GUTTER_WIDTH,
            click_threshold: super::mouse_handler::CLICK_DISTANCE_THRESHOLD,
            hover: HoverState::default(),
            events: Vec::new(),
            message_was_added: false,
            follow_pending: true,
            enable_scrolling_to_bottom: true,
        }
    }

    // ===== Accessors =====

    /// Store this view observes.
    pub fn store(&self) -> &Arc<MessageStore> {
        &self.store
    }

    /// Snapshot currently shown.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Scroll state.
    pub fn scrollbar(&self) -> &Scrollbar {
        &self.scrollbar
    }

    /// Layout side table.
    pub fn layouts(&self) -> &LayoutEngine<M> {
        &self.engine
    }

    /// Layout of `id`, if computed.
    pub fn layout(&self, id: MessageId) -> Option<&MessageLayout> {
        self.engine.get(id)
    }

    /// Paint buffer cache.
    pub fn paint_cache(&self) -> &PaintBufferCache<B> {
        &self.cache
    }

    /// Paint buffer of `id` from the last paint pass.
    pub fn buffer(&self, id: MessageId) -> Option<&B> {
        self.cache.get(id)
    }

    /// Settings in effect.
    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    /// Current selection.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Whether a drag-selection is in progress.
    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    /// Pointer feedback.
    pub fn hover(&self) -> &HoverState {
        &self.hover
    }

    /// Viewport size.
    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    /// Width rows are laid out at (viewport minus scrollbar gutter).
    pub fn layout_width(&self) -> f32 {
        (self.viewport.width - self.gutter_width).max(0.0)
    }

    /// Whether store changes are being deferred.
    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    /// Whether a "more messages below" affordance should be shown.
    pub fn go_to_bottom_visible(&self) -> bool {
        self.enable_scrolling_to_bottom
            && self.scrollbar.is_visible()
            && !self.scrollbar.is_at_bottom()
    }

    // ===== Configuration =====

    /// Replace the settings. Layout-affecting changes relayout lazily.
    pub fn apply_settings(&mut self, settings: ViewSettings, now: Instant) {
        self.engine
            .set_collapse_threshold(settings.collapse_threshold_lines);
        self.settings = settings;
        self.layout_messages(now);
        self.request_repaint();
    }

    /// Enable or disable auto-follow of new messages.
    pub fn set_enable_scrolling_to_bottom(&mut self, enabled: bool) {
        self.enable_scrolling_to_bottom = enabled;
    }

    /// Width reserved for the scrollbar.
    pub fn set_gutter_width(&mut self, width: f32) {
        self.gutter_width = width.max(0.0);
    }

    /// Largest press-to-release distance that still counts as a click.
    pub fn set_click_threshold(&mut self, distance: f32) {
        self.click_threshold = distance.max(0.0);
    }

    /// Rows per keyboard line step.
    pub fn set_small_change(&mut self, rows: f64) {
        self.scrollbar.set_small_change(rows);
    }

    /// Device scale; changing it relayouts every row.
    pub fn set_scale(&mut self, scale: f32, now: Instant) {
        if scale > 0.0 && scale != self.scale {
            self.scale = scale;
            self.layout_messages(now);
            self.request_repaint();
        }
    }

    // ===== Geometry =====

    /// The toolkit resized the view.
    pub fn resize(&mut self, width: f32, height: f32, now: Instant) {
        let size = ViewportSize::new(width, height);
        if size == self.viewport {
            return;
        }
        debug!(width, height, "view resized");
        self.viewport = size;
        self.layout_messages(now);
        self.request_repaint();
    }

    pub(super) fn layout_key(&self) -> LayoutKey {
        LayoutKey::new(self.layout_width(), self.scale)
    }

    /// Recompute visible layouts, scrollbar bounds and auto-follow.
    pub fn layout_messages(&mut self, now: Instant) {
        let showing_latest = mem::take(&mut self.follow_pending)
            || self.scrollbar.is_at_bottom()
            || !self.scrollbar.is_visible();

        if self.snapshot.is_empty() || self.viewport.is_degenerate() {
            self.scrollbar.set_visible(false);
            self.scrollbar.set_maximum(self.snapshot.len() as f64);
            self.follow_pending = showing_latest;
            return;
        }

        let width = self.layout_width();
        let redraw = self.engine.layout_visible(
            &self.snapshot,
            self.scrollbar.current_value(),
            width,
            self.scale,
            self.viewport.height,
        );

        let large_change = self.engine.compute_large_change(
            &self.snapshot,
            width,
            self.scale,
            self.viewport.height,
        );
        let show = large_change.is_some();
        self.scrollbar
            .set_large_change(large_change.unwrap_or(self.snapshot.len() as f64));
        self.scrollbar.set_visible(show);
        self.scrollbar.set_maximum(self.snapshot.len() as f64);

        if self.enable_scrolling_to_bottom && showing_latest && show {
            let animate = self.message_was_added && self.settings.smooth_scroll_new_messages;
            self.scrollbar.scroll_to_bottom(animate, now);
            self.message_was_added = false;
        }

        if redraw {
            self.request_repaint();
        }
    }

    // ===== Store events =====

    /// Drain and apply pending store events. Returns how many were seen.
    ///
    /// The view adopts the version carried by the last drained change, so
    /// the rows on screen are exactly those the applied events describe.
    /// While paused the events only accumulate into a pending shift; the
    /// snapshot on screen stays the same.
    pub fn process_store_events(&mut self, now: Instant) -> usize {
        let changes = channel::drain(&self.receiver);
        let Some(newest) = changes.last().map(|change| change.snapshot.clone()) else {
            return 0;
        };
        let count = changes.len();

        if self.pause.is_paused() {
            for StoreChange { event, snapshot } in changes {
                self.defer_event(event, &snapshot);
            }
            self.deferred_snapshot = Some(newest);
            trace!(count, pending = ?self.pending, "store events deferred");
            return count;
        }

        let was_latest = self.scrollbar.is_at_bottom() || !self.scrollbar.is_visible();
        let mut shift = 0.0;
        self.snapshot = newest;

        for StoreChange { event, snapshot } in changes {
            match event {
                StoreEvent::Appended {
                    id,
                    highlight,
                    notify,
                } => {
                    self.scrollbar.highlights_mut().push_back(highlight);
                    self.message_was_added = true;
                    if notify {
                        self.events.push(ViewEvent::MessageNotification(id));
                    }
                }
                StoreEvent::RemovedFromStart { id } => {
                    self.scrollbar.highlights_mut().pop_front();
                    self.cache.invalidate(id);
                    self.reindex_selection(|s| s.after_head_eviction(1));
                    if !was_latest {
                        shift -= 1.0;
                    }
                }
                StoreEvent::AddedAtStart {
                    count,
                    highlights,
                    evicted_from_tail,
                } => {
                    self.scrollbar.highlights_mut().push_front_batch(&highlights);
                    let step = HeadShift::Inserted {
                        count,
                        tail_limit: tail_limit(evicted_from_tail, &snapshot),
                    };
                    self.reindex_selection(|s| s.after_shift(step));
                    self.message_was_added = true;
                    if !was_latest {
                        shift += count as f64;
                    }
                }
                StoreEvent::Replaced {
                    index, highlight, ..
                } => {
                    self.scrollbar.highlights_mut().replace(index, highlight);
                }
                StoreEvent::Cleared => {
                    self.reset_after_clear(now);
                    shift = 0.0;
                }
            }
        }

        self.scrollbar.set_maximum(self.snapshot.len() as f64);
        if shift != 0.0 {
            self.scrollbar.offset(shift);
        }
        self.engine.prune(&self.snapshot);
        self.follow_pending |= was_latest;
        self.layout_messages(now);
        self.request_repaint();
        count
    }

    fn defer_event(&mut self, event: StoreEvent, snapshot: &Snapshot) {
        match event {
            StoreEvent::Appended { id, notify, .. } => {
                self.pending.touched();
                self.message_was_added = true;
                if notify {
                    self.events.push(ViewEvent::MessageNotification(id));
                }
            }
            StoreEvent::RemovedFromStart { .. } => self.pending.evicted(1),
            StoreEvent::AddedAtStart {
                count,
                evicted_from_tail,
                ..
            } => {
                self.pending
                    .inserted(count, tail_limit(evicted_from_tail, snapshot));
                self.message_was_added = true;
            }
            StoreEvent::Replaced { .. } => self.pending.touched(),
            StoreEvent::Cleared => self.pending.clear(),
        }
    }

    fn reindex_selection(&mut self, shift: impl FnOnce(Selection) -> Selection) {
        if self.selection.is_empty() && !self.selecting {
            return;
        }
        self.selection = shift(self.selection);
    }

    fn reset_after_clear(&mut self, now: Instant) {
        self.scrollbar.highlights_mut().clear();
        self.cache.clear();
        self.engine.invalidate_all();
        self.selecting = false;
        if !self.selection.is_empty() {
            self.selection = Selection::default();
            self.events.push(ViewEvent::SelectionChanged);
        }
        self.scrollbar.set_desired_value(0.0, false, now);
    }

    // ===== Pause =====

    /// Defer store changes for `duration`. A later deadline is kept.
    pub fn pause(&mut self, duration: Duration, now: Instant) {
        self.pause.pause(duration, now);
    }

    /// Lift the pause now and catch up with the store.
    pub fn unpause(&mut self, now: Instant) {
        if self.pause.resume() {
            self.reconcile(now);
        }
    }

    /// Apply everything deferred while paused, in one step.
    ///
    /// The newest deferred version is adopted, selection anchors replay the
    /// recorded head changes in order, the scroll offset moves by their net
    /// shift, markers are rebuilt and a single relayout runs.
    fn reconcile(&mut self, now: Instant) {
        let shift = self.pending.take();
        let deferred = self.deferred_snapshot.take();
        if !shift.dirty {
            return;
        }
        debug!(
            inserted = shift.inserted_at_head(),
            evicted = shift.evicted_from_head(),
            cleared = shift.cleared,
            "catching up after pause"
        );

        let was_latest = self.scrollbar.is_at_bottom() || !self.scrollbar.is_visible();
        if let Some(snapshot) = deferred {
            self.snapshot = snapshot;
        }

        if shift.cleared {
            self.reset_after_clear(now);
        }
        for step in &shift.steps {
            self.reindex_selection(|s| s.after_shift(*step));
        }

        self.scrollbar.set_maximum(self.snapshot.len() as f64);
        if !was_latest && !shift.cleared && shift.net() != 0.0 {
            self.scrollbar.offset(shift.net());
        }
        self.scrollbar.highlights_mut().rebuild(&self.snapshot);
        self.engine.prune(&self.snapshot);
        self.follow_pending |= was_latest;
        self.layout_messages(now);
        self.request_repaint();
    }

    // ===== Animation =====

    /// Advance time: expire the pause and step the scroll animation.
    ///
    /// Returns whether anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if self.pause.expire(now) {
            self.reconcile(now);
            changed = true;
        }
        if self.scrollbar.tick(now) {
            self.layout_messages(now);
            self.request_repaint();
            changed = true;
        }
        changed
    }

    // ===== Painting and hit-testing =====

    /// Rows intersecting the viewport at the current position.
    pub fn visible_range(&mut self) -> VisibleRange {
        let rows = self.walk_rows();
        match (rows.first(), rows.last()) {
            (Some(first), Some(last)) => VisibleRange::new(first.0, last.0 + 1, first.2),
            _ => VisibleRange::default(),
        }
    }

    /// Walk rows from the scrollbar's position until the viewport is full.
    ///
    /// Yields `(index, id, top, height)`.
    fn walk_rows(&mut self) -> Vec<(usize, MessageId, f32, f32)> {
        let mut rows = Vec::new();
        if self.viewport.is_degenerate() {
            return rows;
        }
        let position = self.scrollbar.current_value().max(0.0);
        let start = position.floor() as usize;
        if start >= self.snapshot.len() {
            return rows;
        }

        let width = self.layout_width();
        let fraction = (position - position.floor()) as f32;
        let mut y: Option<f32> = None;
        for index in start..self.snapshot.len() {
            let record = &self.snapshot[index];
            let height = self.engine.row_height(record, width, self.scale);
            let top = *y.get_or_insert(-height * fraction);
            rows.push((index, record.id(), top, height));
            let bottom = top + height;
            y = Some(bottom);
            if bottom >= self.viewport.height {
                break;
            }
        }
        rows
    }

    /// Paint pass: decide the on-screen set, release buffers of rows that
    /// left it, and build buffers for rows that need one.
    ///
    /// `build` receives the record and its layout and is only called for
    /// rows without an up-to-date buffer.
    pub fn paint<F>(&mut self, mut build: F) -> Vec<PaintedRow>
    where
        F: FnMut(&crate::model::MessageRecord, &MessageLayout) -> B,
    {
        let rows = self.walk_rows();
        self.cache.begin_pass(rows.iter().map(|row| row.1));

        let mut painted = Vec::with_capacity(rows.len());
        for (index, id, y, height) in rows {
            let Some(layout) = self.engine.get(id) else {
                continue;
            };
            let record = &self.snapshot[index];
            self.cache
                .get_or_build(id, layout.generation(), || build(record, layout));
            painted.push(PaintedRow {
                index,
                id,
                y,
                height,
                selection: self.selection.range_in_message(index),
                collapsed: layout.is_collapsed(),
            });
        }
        painted
    }

    /// Row under a viewport point.
    pub fn message_at(&mut self, point: Point) -> HitTestResult {
        if point.y < 0.0 || point.x < 0.0 {
            return HitTestResult::miss();
        }
        for (index, id, top, height) in self.walk_rows() {
            if point.y < top + height {
                return HitTestResult::hit(index, id, Point::new(point.x, point.y - top));
            }
        }
        HitTestResult::miss()
    }

    // ===== Selection =====

    /// Replace the selection.
    pub fn set_selection(&mut self, start: SelectionItem, end: SelectionItem) {
        let selection = Selection::new(start, end);
        if selection != self.selection {
            self.selection = selection;
            self.events.push(ViewEvent::SelectionChanged);
            self.request_repaint();
        }
    }

    /// Whether a non-empty selection exists.
    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Drop the selection.
    pub fn clear_selection(&mut self) {
        self.selecting = false;
        if !self.selection.is_empty() {
            self.selection = Selection::default();
            self.events.push(ViewEvent::SelectionChanged);
            self.request_repaint();
        }
    }

    /// Copy text of the selection in the snapshot on screen.
    pub fn selected_text(&self) -> String {
        self.selection.selected_text(&self.snapshot)
    }

    // ===== Events =====

    pub(super) fn request_repaint(&mut self) {
        if self.events.last() != Some(&ViewEvent::RepaintRequested) {
            self.events.push(ViewEvent::RepaintRequested);
        }
    }

    /// Take the queued notifications.
    pub fn drain_events(&mut self) -> Vec<ViewEvent> {
        mem::take(&mut self.events)
    }
}

/// Last valid anchor after a history insertion that evicted from the tail.
fn tail_limit(evicted_from_tail: usize, snapshot: &Snapshot) -> Option<SelectionItem> {
    if evicted_from_tail > 0 {
        SelectionItem::end_of(snapshot)
    } else {
        None
    }
}

impl<B, M: TextMeasure> std::fmt::Debug for ChannelView<B, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelView")
            .field("rows", &self.snapshot.len())
            .field("viewport", &self.viewport)
            .field("scrollbar", &self.scrollbar)
            .field("selection", &self.selection)
            .field("paused", &self.pause.is_paused())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "channel_view_tests.rs"]
mod tests;
