//! View state machine (toolkit independent).
//!
//! All transitions take an explicit `Instant` so they are testable without
//! a terminal or a clock.

pub mod channel_view;
pub mod mouse_handler;
pub mod scroll_handler;

// Re-export for convenience
pub use channel_view::{
    ChannelView, CursorShape, HoverState, PaintedRow, ViewEvent, DEFAULT_GUTTER_WIDTH,
};
pub use scroll_handler::handle_scroll_action;
