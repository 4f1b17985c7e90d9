//! Configuration module.

pub mod keybindings;
pub mod loader;

pub use keybindings::KeyBindings;
pub use loader::{
    default_config_path, default_log_path, load_config_with_precedence, resolve, CliOverrides,
    ConfigError, ConfigFile, ResolvedConfig,
};

use std::time::Duration;

/// Settings the channel view reads.
///
/// Read-only inputs to scrolling, pausing and layout; changing them at
/// runtime goes through [`crate::state::ChannelView::apply_settings`].
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSettings {
    /// Maximum number of messages kept in the store.
    pub message_capacity: usize,
    /// Animate the follow-scroll when a new message arrives.
    pub smooth_scroll_new_messages: bool,
    /// Animate wheel and keyboard scrolling.
    pub smooth_scrolling: bool,
    /// User multiplier applied to wheel deltas.
    pub wheel_multiplier: f64,
    /// Pause store observation while the pointer moves over the view.
    pub pause_on_hover: bool,
    /// How long a hover pause lasts.
    pub pause_duration: Duration,
    /// Links open on double click only; a single press pauses briefly.
    pub links_double_click_only: bool,
    /// Lines shown before a long message is collapsed; 0 disables.
    pub collapse_threshold_lines: usize,
    /// Prefix messages with their timestamp.
    pub show_timestamps: bool,
    /// `chrono` format string for timestamps.
    pub timestamp_format: String,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            message_capacity: 1000,
            smooth_scroll_new_messages: false,
            smooth_scrolling: true,
            wheel_multiplier: 1.0,
            pause_on_hover: false,
            pause_duration: Duration::from_millis(300),
            links_double_click_only: false,
            collapse_threshold_lines: 0,
            show_timestamps: true,
            timestamp_format: "%H:%M".to_string(),
        }
    }
}
