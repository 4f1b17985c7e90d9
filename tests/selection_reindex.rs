//! Selection anchors follow their messages when rows are evicted from or
//! inserted at the head of the store.

use chatview::config::ViewSettings;
use chatview::model::MessageRecord;
use chatview::state::ChannelView;
use chatview::store::{ChannelHandle, MessageStore};
use chatview::view_state::{FixedMeasure, Selection, SelectionItem};
use std::sync::Arc;
use std::time::Instant;

fn view_with_rows(capacity: usize, rows: usize) -> (ChannelView<(), FixedMeasure>, ChannelHandle) {
    let store = Arc::new(MessageStore::new(capacity));
    let (handle, receiver) = ChannelHandle::new(store.clone());
    let settings = ViewSettings {
        smooth_scrolling: false,
        ..ViewSettings::default()
    };
    let mut view = ChannelView::new(store, receiver, settings, FixedMeasure::default());
    let now = Instant::now();
    view.resize(21.0, 5.0, now);
    for i in 0..rows {
        handle.add_message(MessageRecord::plain(&format!("message {i}")));
    }
    view.process_store_events(now);
    (view, handle)
}

#[test]
fn anchor_moves_up_on_head_eviction_and_down_on_insertion() {
    let anchor = SelectionItem::new(5, 3);

    assert_eq!(anchor.after_head_eviction(1), SelectionItem::new(4, 3));
    assert_eq!(anchor.after_head_insertion(2), SelectionItem::new(7, 3));
}

#[test]
fn anchor_on_an_evicted_row_lands_on_the_first_row() {
    assert_eq!(
        SelectionItem::new(1, 4).after_head_eviction(2),
        SelectionItem::new(0, 0)
    );
}

#[test]
fn empty_exactly_when_anchors_match() {
    let at = SelectionItem::new(2, 2);
    assert!(Selection::caret(at).is_empty());
    assert!(Selection::new(at, at).is_empty());
    assert!(!Selection::new(at, SelectionItem::new(2, 3)).is_empty());
    assert!(Selection::default().is_empty());
}

#[test]
fn view_selection_follows_eviction() {
    let (mut view, handle) = view_with_rows(10, 10);
    view.set_selection(SelectionItem::new(5, 3), SelectionItem::new(6, 2));
    let text = view.selected_text();

    handle.add_message(MessageRecord::plain("message 10"));
    view.process_store_events(Instant::now());

    assert_eq!(
        view.selection(),
        Selection::new(SelectionItem::new(4, 3), SelectionItem::new(5, 2))
    );
    assert_eq!(view.selected_text(), text);
}

#[test]
fn view_selection_follows_history_insertion() {
    let (mut view, handle) = view_with_rows(20, 10);
    view.set_selection(SelectionItem::new(5, 3), SelectionItem::new(6, 2));
    let text = view.selected_text();

    handle.add_messages_at_start(vec![
        MessageRecord::plain("older 0"),
        MessageRecord::plain("older 1"),
    ]);
    view.process_store_events(Instant::now());

    assert_eq!(
        view.selection(),
        Selection::new(SelectionItem::new(7, 3), SelectionItem::new(8, 2))
    );
    assert_eq!(view.selected_text(), text);
}

#[test]
fn clearing_always_leaves_no_selection() {
    let (mut view, _handle) = view_with_rows(10, 3);
    view.set_selection(SelectionItem::new(0, 1), SelectionItem::new(2, 4));
    assert!(view.has_selection());

    view.clear_selection();

    assert!(!view.has_selection());
    assert_eq!(view.selected_text(), "");
}
