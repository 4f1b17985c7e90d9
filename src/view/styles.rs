//! Styling for chat rows, the scrollbar gutter and overlays.

use crate::model::{ElementRole, HighlightKind, MessageFlags};
use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Determines whether colors should be enabled or disabled based on:
/// - `--no-color` CLI flag
/// - `NO_COLOR` environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from CLI args and environment.
    ///
    /// Priority (first match wins):
    /// 1. `--no-color` flag (disables colors)
    /// 2. `NO_COLOR` env var (any value disables colors)
    /// 3. Default: colors enabled
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var_os("NO_COLOR").is_none();
        Self { enabled }
    }

    /// Explicit setting, ignoring the environment.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== ChatStyles =====

/// Styles used to paint the chat pane.
///
/// With colors disabled every role falls back to modifiers only, so links
/// stay underlined and selections stay visible on monochrome terminals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatStyles {
    body: Style,
    username: Style,
    timestamp: Style,
    link: Style,
    system: Style,
    disabled: Style,
    selection: Style,
    collapsed: Style,
    track: Style,
    thumb: Style,
    mention_marker: Style,
    system_marker: Style,
    go_to_bottom: Style,
    tooltip: Style,
}

impl ChatStyles {
    /// Create styles for the given color configuration.
    pub fn with_color_config(config: ColorConfig) -> Self {
        let plain = Style::default();
        if config.colors_enabled() {
            Self {
                body: plain,
                username: plain.fg(Color::Cyan).add_modifier(Modifier::BOLD),
                timestamp: plain.fg(Color::DarkGray),
                link: plain.fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
                system: plain.fg(Color::Gray).add_modifier(Modifier::ITALIC),
                disabled: plain.fg(Color::DarkGray),
                selection: plain.bg(Color::Blue).fg(Color::White),
                collapsed: plain.fg(Color::Yellow),
                track: plain.fg(Color::DarkGray),
                thumb: plain.fg(Color::Gray),
                mention_marker: plain.fg(Color::Red),
                system_marker: plain.fg(Color::Yellow),
                go_to_bottom: plain.bg(Color::Blue).fg(Color::White),
                tooltip: plain.bg(Color::Black).fg(Color::White),
            }
        } else {
            Self {
                body: plain,
                username: plain.add_modifier(Modifier::BOLD),
                timestamp: plain,
                link: plain.add_modifier(Modifier::UNDERLINED),
                system: plain.add_modifier(Modifier::ITALIC),
                disabled: plain.add_modifier(Modifier::DIM),
                selection: plain.add_modifier(Modifier::REVERSED),
                collapsed: plain.add_modifier(Modifier::BOLD),
                track: plain,
                thumb: plain.add_modifier(Modifier::REVERSED),
                mention_marker: plain.add_modifier(Modifier::BOLD),
                system_marker: plain.add_modifier(Modifier::BOLD),
                go_to_bottom: plain.add_modifier(Modifier::REVERSED),
                tooltip: plain.add_modifier(Modifier::REVERSED),
            }
        }
    }

    /// Style of an element with `role` in a message with `flags`.
    pub fn style_for(&self, role: ElementRole, flags: MessageFlags) -> Style {
        if flags.disabled {
            return self.disabled;
        }
        match role {
            ElementRole::Body if flags.highlighted => {
                self.body.add_modifier(Modifier::BOLD)
            }
            ElementRole::Body => self.body,
            ElementRole::Username => self.username,
            ElementRole::Timestamp => self.timestamp,
            ElementRole::Link => self.link,
            ElementRole::System => self.system,
        }
    }

    /// Patch applied to selected cells.
    pub fn selection(&self) -> Style {
        self.selection
    }

    /// Ellipsis shown after a collapsed message.
    pub fn collapsed(&self) -> Style {
        self.collapsed
    }

    /// Empty scrollbar track.
    pub fn track(&self) -> Style {
        self.track
    }

    /// Scrollbar thumb.
    pub fn thumb(&self) -> Style {
        self.thumb
    }

    /// Gutter marker for a highlight kind, `None` for no marker.
    pub fn marker(&self, kind: HighlightKind) -> Option<Style> {
        match kind {
            HighlightKind::None => None,
            HighlightKind::Mention => Some(self.mention_marker),
            HighlightKind::System => Some(self.system_marker),
        }
    }

    /// "More messages below" bar.
    pub fn go_to_bottom(&self) -> Style {
        self.go_to_bottom
    }

    /// Tooltip popup.
    pub fn tooltip(&self) -> Style {
        self.tooltip
    }
}

impl Default for ChatStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::from_env_and_args(false))
    }
}

// ===== Tests =====
