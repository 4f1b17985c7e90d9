//! Front-end constants.
//!
//! Centralized location for the terminal-specific values the view core
//! does not know about.

use std::time::Duration;

/// Interval between loop iterations when no input arrives.
///
/// Drives smooth-scroll animation, pause expiry and store draining.
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);

/// Raw wheel delta reported for one terminal wheel notch.
///
/// Scaled by the view's wheel factor (1.5) this is three rows of text.
pub const WHEEL_NOTCH_DELTA: f64 = 2.0;

/// Press-to-release distance, in cells, that still counts as a click.
pub const CLICK_THRESHOLD_CELLS: f32 = 1.0;

/// Rows moved by one line key.
pub const LINE_SCROLL_ROWS: f64 = 1.0;

/// Label of the bar shown when the view is not following new messages.
pub const GO_TO_BOTTOM_LABEL: &str = "More messages below";

/// Drawn after the last line of a collapsed message.
pub const COLLAPSED_SUFFIX: &str = "…";

/// Scrollbar glyphs.
pub const TRACK_SYMBOL: &str = "│";
/// Thumb glyph.
pub const THUMB_SYMBOL: &str = "█";
/// Highlight marker glyph.
pub const MARKER_SYMBOL: &str = "▬";

/// Widest tooltip popup, in cells.
pub const TOOLTIP_MAX_WIDTH: u16 = 60;
