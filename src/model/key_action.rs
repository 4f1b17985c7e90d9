//! Domain-level keyboard actions independent of key bindings.

/// Domain-level actions that can be mapped to key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// crossterm::event::KeyEvent to KeyAction is handled by KeyBindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Scrolling
    /// Scroll toward older messages by one small change. Default: k/↑
    ScrollUp,
    /// Scroll toward newer messages by one small change. Default: j/↓
    ScrollDown,
    /// Scroll up by one page (the large change). Default: Ctrl+u/Page Up
    PageUp,
    /// Scroll down by one page. Default: Ctrl+d/Page Down
    PageDown,
    /// Jump to the oldest retained message. Default: g/Home
    ScrollToTop,
    /// Jump to the newest message and resume following. Default: G/End
    ScrollToBottom,

    // Selection
    /// Copy the current selection to the clipboard. Default: y
    CopySelection,
    /// Clear the current selection. Default: Esc
    ClearSelection,

    // Application
    /// Quit the application. Default: q/Ctrl+c
    Quit,
}
