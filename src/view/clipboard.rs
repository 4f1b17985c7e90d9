//! Clipboard used by the copy-selection key.

use super::TuiError;

/// Destination of copied text.
pub trait Clipboard {
    /// Replace the clipboard contents.
    fn set_text(&mut self, text: &str) -> Result<(), TuiError>;
}

/// System clipboard through `arboard`, opened on first use.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    /// Clipboard that connects lazily.
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure(&mut self) -> Result<&mut arboard::Clipboard, TuiError> {
        let clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new()?,
        };
        Ok(self.inner.insert(clipboard))
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), TuiError> {
        self.ensure()?.set_text(text.to_string())?;
        Ok(())
    }
}

impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard")
            .field("connected", &self.inner.is_some())
            .finish()
    }
}

/// In-memory clipboard, for tests and headless runs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryClipboard {
    /// Last text written.
    pub contents: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), TuiError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}
