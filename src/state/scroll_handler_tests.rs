//! Tests for wheel and keyboard scrolling.

use super::*;
use crate::config::ViewSettings;
use crate::model::MessageRecord;
use crate::store::{ChannelHandle, MessageStore};
use crate::view_state::FixedMeasure;
use std::sync::Arc;
use std::time::Duration;

/// 10 one-line rows in a 5-row viewport, scrolled to the bottom.
fn scrolled_view(settings: ViewSettings) -> (ChannelView<(), FixedMeasure>, ChannelHandle, Instant) {
    let store = Arc::new(MessageStore::new(50));
    let (handle, receiver) = ChannelHandle::new(store.clone());
    let mut view = ChannelView::new(store, receiver, settings, FixedMeasure::default());
    let now = Instant::now();
    view.resize(21.0, 5.0, now);
    for i in 0..10 {
        handle.add_message(MessageRecord::plain(&format!("row {i}")));
    }
    view.process_store_events(now);
    (view, handle, now)
}

fn instant_settings() -> ViewSettings {
    ViewSettings {
        smooth_scrolling: false,
        ..ViewSettings::default()
    }
}

// ===== Keyboard =====

#[test]
fn line_keys_move_by_small_change() {
    let (mut view, _h, now) = scrolled_view(instant_settings());
    view.set_small_change(1.0);

    assert!(handle_scroll_action(&mut view, KeyAction::ScrollUp, now));
    assert_eq!(view.scrollbar().desired_value(), 4.0);

    assert!(handle_scroll_action(&mut view, KeyAction::ScrollDown, now));
    assert_eq!(view.scrollbar().desired_value(), 5.0);
}

#[test]
fn custom_small_change_is_used() {
    let (mut view, _h, now) = scrolled_view(instant_settings());
    view.set_small_change(2.0);

    handle_scroll_action(&mut view, KeyAction::ScrollUp, now);

    assert_eq!(view.scrollbar().desired_value(), 3.0);
}

#[test]
fn page_keys_move_by_large_change() {
    let (mut view, _h, now) = scrolled_view(instant_settings());

    handle_scroll_action(&mut view, KeyAction::PageUp, now);
    assert_eq!(view.scrollbar().desired_value(), 0.0);

    handle_scroll_action(&mut view, KeyAction::PageDown, now);
    assert_eq!(view.scrollbar().desired_value(), 5.0);
}

#[test]
fn top_and_bottom_jump_to_bounds() {
    let (mut view, _h, now) = scrolled_view(instant_settings());

    handle_scroll_action(&mut view, KeyAction::ScrollToTop, now);
    assert_eq!(view.scrollbar().current_value(), 0.0);
    assert!(view.go_to_bottom_visible());

    handle_scroll_action(&mut view, KeyAction::ScrollToBottom, now);
    assert!(view.scrollbar().is_at_bottom());
    assert!(!view.go_to_bottom_visible());
}

#[test]
fn scrolling_past_bottom_reports_no_change() {
    let (mut view, _h, now) = scrolled_view(instant_settings());

    assert!(!handle_scroll_action(&mut view, KeyAction::ScrollDown, now));
    assert!(!handle_scroll_action(&mut view, KeyAction::ScrollToBottom, now));
}

#[test]
fn non_scroll_actions_are_ignored() {
    let (mut view, _h, now) = scrolled_view(instant_settings());

    assert!(!handle_scroll_action(&mut view, KeyAction::Quit, now));
    assert!(!handle_scroll_action(&mut view, KeyAction::CopySelection, now));
    assert_eq!(view.scrollbar().desired_value(), 5.0);
}

#[test]
fn smooth_keyboard_scroll_animates_to_target() {
    let (mut view, _h, now) = scrolled_view(ViewSettings::default());

    handle_scroll_action(&mut view, KeyAction::PageUp, now);

    assert_eq!(view.scrollbar().desired_value(), 0.0);
    assert_eq!(view.scrollbar().current_value(), 5.0);
    assert!(view.scrollbar().is_animating());

    assert!(view.tick(now + Duration::from_secs(1)));
    assert_eq!(view.scrollbar().current_value(), 0.0);
    assert!(!view.scrollbar().is_animating());
}

// ===== Wheel =====

#[test]
fn wheel_moves_by_scaled_delta() {
    let (mut view, _h, now) = scrolled_view(instant_settings());

    // One notch of 2.0 raw units scales to three rows.
    assert!(view.on_wheel(2.0, now));

    assert!((view.scrollbar().desired_value() - 2.0).abs() < 1e-9);
}

#[test]
fn wheel_down_at_bottom_is_clamped() {
    let (mut view, _h, now) = scrolled_view(instant_settings());

    assert!(!view.on_wheel(-2.0, now));
    assert_eq!(view.scrollbar().desired_value(), 5.0);
}

#[test]
fn wheel_multiplier_scales_movement() {
    let settings = ViewSettings {
        wheel_multiplier: 2.0,
        ..instant_settings()
    };
    let (mut view, _h, now) = scrolled_view(settings);

    view.on_wheel(1.0, now);

    assert!((view.scrollbar().desired_value() - 2.0).abs() < 1e-9);
}

#[test]
fn wheel_ignored_while_scrollbar_hidden() {
    let store = Arc::new(MessageStore::new(10));
    let (handle, receiver) = ChannelHandle::new(store.clone());
    let mut view: ChannelView<(), FixedMeasure> =
        ChannelView::new(store, receiver, instant_settings(), FixedMeasure::default());
    let now = Instant::now();
    view.resize(21.0, 5.0, now);
    handle.add_message(MessageRecord::plain("only"));
    view.process_store_events(now);

    assert!(!view.on_wheel(2.0, now));
    assert_eq!(view.scrollbar().desired_value(), 0.0);
}

#[test]
fn wheel_up_stops_following() {
    let (mut view, handle, now) = scrolled_view(instant_settings());
    view.on_wheel(2.0, now);

    handle.add_message(MessageRecord::plain("late"));
    view.process_store_events(now);

    assert!(!view.scrollbar().is_at_bottom());
    assert!((view.scrollbar().desired_value() - 2.0).abs() < 1e-9);
}
