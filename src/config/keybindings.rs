//! Keyboard bindings configuration.

use crate::model::key_action::KeyAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Maps keyboard events to domain actions.
///
/// Provides default vim-style bindings alongside the usual navigation keys.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    ///
    /// Only code and modifiers participate in the lookup; event kind and
    /// state are ignored so key repeat behaves like key press.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.bindings
            .get(&KeyEvent::new(key.code, key.modifiers))
            .copied()
    }

    /// Bind a key, replacing any previous binding for it.
    pub fn bind(&mut self, code: KeyCode, modifiers: KeyModifiers, action: KeyAction) {
        self.bindings.insert(KeyEvent::new(code, modifiers), action);
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self {
            bindings: HashMap::new(),
        };

        // Vim-style scrolling
        bindings.bind(KeyCode::Char('k'), KeyModifiers::NONE, KeyAction::ScrollUp);
        bindings.bind(KeyCode::Char('j'), KeyModifiers::NONE, KeyAction::ScrollDown);
        bindings.bind(KeyCode::Char('g'), KeyModifiers::NONE, KeyAction::ScrollToTop);
        bindings.bind(KeyCode::Char('G'), KeyModifiers::SHIFT, KeyAction::ScrollToBottom);

        // Arrow and navigation keys
        bindings.bind(KeyCode::Up, KeyModifiers::NONE, KeyAction::ScrollUp);
        bindings.bind(KeyCode::Down, KeyModifiers::NONE, KeyAction::ScrollDown);
        bindings.bind(KeyCode::Home, KeyModifiers::NONE, KeyAction::ScrollToTop);
        bindings.bind(KeyCode::End, KeyModifiers::NONE, KeyAction::ScrollToBottom);

        // Page navigation
        bindings.bind(KeyCode::PageUp, KeyModifiers::NONE, KeyAction::PageUp);
        bindings.bind(KeyCode::PageDown, KeyModifiers::NONE, KeyAction::PageDown);
        bindings.bind(KeyCode::Char('u'), KeyModifiers::CONTROL, KeyAction::PageUp);
        bindings.bind(KeyCode::Char('d'), KeyModifiers::CONTROL, KeyAction::PageDown);

        // Selection
        bindings.bind(KeyCode::Char('y'), KeyModifiers::NONE, KeyAction::CopySelection);
        bindings.bind(KeyCode::Esc, KeyModifiers::NONE, KeyAction::ClearSelection);

        // Quit
        bindings.bind(KeyCode::Char('q'), KeyModifiers::NONE, KeyAction::Quit);
        bindings.bind(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyAction::Quit);

        bindings
    }
}
