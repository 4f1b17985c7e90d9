//! Terminal front-end and terminal management (impure shell).
//!
//! Maps crossterm input to the channel view's toolkit operations and paints
//! the view with ratatui. All view semantics live in `state` and
//! `view_state`; this module only translates cells to layout units.

pub mod chat_pane;
pub mod clipboard;
pub mod constants;
mod scrollbar_gutter;
mod styles;

pub use chat_pane::{MessageBuffer, PositionCell};
pub use clipboard::{Clipboard, MemoryClipboard, SystemClipboard};
pub use scrollbar_gutter::render_scrollbar;
pub use styles::{ChatStyles, ColorConfig};

use crate::config::KeyBindings;
use crate::model::error::InputError;
use crate::model::KeyAction;
use crate::state::{handle_scroll_action, ChannelView, ViewEvent};
use crate::view_state::{CellMeasure, Point};
use constants::{CLICK_THRESHOLD_CELLS, LINE_SCROLL_ROWS, TICK_INTERVAL, WHEEL_NOTCH_DELTA};
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Input source error
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Clipboard unavailable or rejected the text
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),
}

/// View type painted by the terminal front-end.
pub type TerminalView = ChannelView<MessageBuffer, CellMeasure>;

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    view: TerminalView,
    key_bindings: KeyBindings,
    styles: ChatStyles,
    clipboard: Box<dyn Clipboard>,
    needs_redraw: bool,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen and mouse capture.
    pub fn new(view: TerminalView, styles: ChatStyles) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(EnableMouseCapture)?;
        stdout.execute(EnableFocusChange)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Self::with_terminal(terminal, view, styles, Box::new(SystemClipboard::new()))
    }

    /// Run the main event loop, restoring the terminal on exit
    ///
    /// Returns when user quits (q or Ctrl+C)
    pub fn run(&mut self) -> Result<(), TuiError> {
        let result = self.event_loop();
        restore_terminal()?;
        result
    }

    fn event_loop(&mut self) -> Result<(), TuiError> {
        self.draw()?;

        loop {
            if event::poll(TICK_INTERVAL)? {
                let now = Instant::now();
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key, now) {
                            return Ok(());
                        }
                    }
                    Event::Mouse(mouse) => self.handle_mouse(mouse, now),
                    Event::Resize(width, height) => self.handle_resize(width, height, now),
                    Event::FocusLost => self.view.on_pointer_leave(now),
                    _ => {}
                }
            }

            if self.step(Instant::now()) {
                self.draw()?;
            }
        }
    }
}

impl<B> TuiApp<B>
where
    B: Backend,
{
    /// Wrap an existing terminal.
    ///
    /// The view is sized to the terminal immediately.
    pub fn with_terminal(
        terminal: Terminal<B>,
        mut view: TerminalView,
        styles: ChatStyles,
        clipboard: Box<dyn Clipboard>,
    ) -> Result<Self, TuiError> {
        let size = terminal.size()?;
        let now = Instant::now();
        view.set_click_threshold(CLICK_THRESHOLD_CELLS);
        view.set_small_change(LINE_SCROLL_ROWS);
        view.resize(f32::from(size.width), f32::from(size.height), now);

        Ok(Self {
            terminal,
            view,
            key_bindings: KeyBindings::default(),
            styles,
            clipboard,
            needs_redraw: true,
        })
    }

    /// The channel view.
    pub fn view(&self) -> &TerminalView {
        &self.view
    }

    /// Mutable access to the channel view.
    pub fn view_mut(&mut self) -> &mut TerminalView {
        &mut self.view
    }

    /// The terminal (for buffer inspection with TestBackend).
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Drain store events, advance animations and pause expiry, and
    /// dispatch view notifications.
    ///
    /// Returns whether a redraw is due.
    pub fn step(&mut self, now: Instant) -> bool {
        self.view.process_store_events(now);
        self.view.tick(now);
        self.dispatch_view_events();
        std::mem::take(&mut self.needs_redraw)
    }

    fn dispatch_view_events(&mut self) {
        for event in self.view.drain_events() {
            match event {
                ViewEvent::RepaintRequested | ViewEvent::SelectionChanged => {
                    self.needs_redraw = true;
                }
                ViewEvent::LinkActivated(link) => {
                    info!(link = link.value(), "link activated");
                }
                ViewEvent::MessageNotification(id) => {
                    trace!(%id, "message notification");
                }
            }
        }
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }
        // Ctrl+C always quits, even if rebound
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        let Some(action) = self.key_bindings.get(key) else {
            return false;
        };

        match action {
            KeyAction::Quit => return true,
            KeyAction::CopySelection => self.copy_selection(),
            KeyAction::ClearSelection => self.view.clear_selection(),
            KeyAction::ScrollUp
            | KeyAction::ScrollDown
            | KeyAction::PageUp
            | KeyAction::PageDown
            | KeyAction::ScrollToTop
            | KeyAction::ScrollToBottom => {
                handle_scroll_action(&mut self.view, action, now);
            }
        }
        self.dispatch_view_events();
        false
    }

    fn copy_selection(&mut self) {
        let text = self.view.selected_text();
        if text.is_empty() {
            return;
        }
        match self.clipboard.set_text(&text) {
            Ok(()) => debug!(chars = text.chars().count(), "selection copied"),
            Err(error) => warn!(%error, "copy failed"),
        }
    }

    /// Handle a single mouse event
    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        // Left edge of the cell, vertical center of the row.
        let point = Point::new(f32::from(mouse.column), f32::from(mouse.row) + 0.5);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.hits_go_to_bottom(mouse.column, mouse.row) {
                    self.view.scroll_to_bottom(now);
                } else {
                    self.view.on_pointer_down(point, now);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                self.view.on_pointer_move(point, now);
            }
            MouseEventKind::Up(MouseButton::Left) => self.view.on_pointer_up(point, now),
            MouseEventKind::ScrollUp => {
                self.view.on_wheel(WHEEL_NOTCH_DELTA, now);
            }
            MouseEventKind::ScrollDown => {
                self.view.on_wheel(-WHEEL_NOTCH_DELTA, now);
            }
            _ => {}
        }
        self.dispatch_view_events();
    }

    fn hits_go_to_bottom(&self, column: u16, row: u16) -> bool {
        if !self.view.go_to_bottom_visible() {
            return false;
        }
        let viewport = self.view.viewport();
        let pane = Rect::new(0, 0, viewport.width as u16, viewport.height as u16);
        chat_pane::go_to_bottom_area(pane)
            .is_some_and(|bar| row == bar.y && column >= bar.x && column < bar.right())
    }

    /// Handle terminal resize
    pub fn handle_resize(&mut self, width: u16, height: u16, now: Instant) {
        debug!(width, height, "terminal resized");
        self.view.resize(f32::from(width), f32::from(height), now);
        self.needs_redraw = true;
        self.dispatch_view_events();
    }

    /// Render the current frame
    pub fn draw(&mut self) -> Result<(), TuiError> {
        let Self {
            terminal,
            view,
            styles,
            ..
        } = self;

        let rows = view.paint(|record, layout| MessageBuffer::build(record, layout, styles));
        let pane_width = view.layout_width() as u16;

        terminal.draw(|frame| {
            let area = frame.area();
            let pane = Rect::new(area.x, area.y, pane_width.min(area.width), area.height);
            let gutter = Rect::new(
                pane.right(),
                area.y,
                area.width.saturating_sub(pane.width),
                area.height,
            );
            let buf = frame.buffer_mut();

            chat_pane::render_rows(buf, pane, &rows, view, styles);
            render_scrollbar(buf, gutter, view.scrollbar(), styles);
            if view.go_to_bottom_visible() {
                chat_pane::render_go_to_bottom(buf, area, styles);
            }
            let hover = view.hover();
            if let (Some(tooltip), Some(position)) = (&hover.tooltip, hover.position) {
                chat_pane::render_tooltip(buf, pane, position, tooltip, styles);
            }
        })?;
        self.needs_redraw = false;
        Ok(())
    }
}

fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(DisableFocusChange)?;
    stdout.execute(DisableMouseCapture)?;
    stdout.execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
#[path = "tui_tests.rs"]
mod tests;
