//! chatview
//!
//! Scrollable chat-log view: a bounded message store shared with a
//! producer, identity-keyed layouts, a fractional scroll model with smooth
//! scrolling, per-message paint buffers, text selection and a timed pause
//! that keeps the view still while the user interacts with it.
//!
//! The core (`store`, `view_state`, `state`) is toolkit independent and
//! fully testable without a terminal. `view` is the ratatui front-end.

pub mod config;
pub mod logging;
pub mod model;
pub mod parser;
pub mod source;
pub mod state;
pub mod store;
pub mod view;
pub mod view_state;
