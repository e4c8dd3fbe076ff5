//! Input dispatch layer for Elm Architecture (TEA) pattern.
//!
//! Maps key and mouse events to messages based on current app mode.
//! Handles key chords (gg, s1-s5) with non-blocking state machine.

use super::app::Tab;
use super::{App, Message};
use crate::data::SortColumn;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use std::time::Instant;

/// State machine for handling key chords (gg, s1-s5).
///
/// Instead of blocking with `event::poll()` inline, we track pending keys
/// and check for timeout in the main event loop.
#[derive(Debug, Default)]
pub struct InputState {
    /// The first key of a potential chord sequence
    pub pending: Option<KeyCode>,
    /// When the pending key was pressed (for timeout detection)
    pub pending_since: Option<Instant>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there's a pending chord that has timed out (500ms).
    pub fn has_timed_out(&self) -> bool {
        if let Some(since) = self.pending_since {
            since.elapsed().as_millis() > 500
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.pending = None;
        self.pending_since = None;
    }

    pub fn set_pending(&mut self, key: KeyCode) {
        self.pending = Some(key);
        self.pending_since = Some(Instant::now());
    }
}

/// Map key events to messages based on current app mode.
pub fn dispatch(app: &App, input: &mut InputState, key: KeyEvent) -> Message {
    // Handle pending chords first
    if let Some(pending) = input.pending.take() {
        input.pending_since = None;
        return handle_chord(pending, key.code);
    }

    if app.state.search_mode {
        dispatch_search_mode(key)
    } else if app.show_alert() {
        dispatch_alert(key)
    } else if app.show_issue_details() {
        dispatch_issue_details(key)
    } else if app.show_help() {
        dispatch_help_modal(key)
    } else if app.show_filter_menu() {
        dispatch_filter_menu(key)
    } else {
        dispatch_normal_mode(app.tab, input, key)
    }
}

/// Map mouse events to messages. Only movement, left clicks and the wheel matter.
pub fn dispatch_mouse(mouse: MouseEvent) -> Message {
    match mouse.kind {
        MouseEventKind::Moved => Message::MouseMoved {
            column: mouse.column,
            row: mouse.row,
        },
        MouseEventKind::Down(MouseButton::Left) => Message::MouseClick {
            column: mouse.column,
            row: mouse.row,
        },
        MouseEventKind::ScrollDown => Message::MoveDown,
        MouseEventKind::ScrollUp => Message::MoveUp,
        _ => Message::None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mode-specific dispatch functions
// ─────────────────────────────────────────────────────────────────────────────

fn dispatch_normal_mode(tab: Tab, input: &mut InputState, key: KeyEvent) -> Message {
    match key.code {
        KeyCode::Char('q') => Message::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Message::Quit,
        KeyCode::Char('r') => Message::Refresh,

        KeyCode::Tab => Message::NextTab,
        KeyCode::BackTab => Message::PrevTab,
        KeyCode::Char(c @ '1'..='4') => {
            let idx = c as usize - '1' as usize;
            Message::SelectTab(Tab::ALL[idx])
        }

        KeyCode::Char('j') | KeyCode::Down => Message::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Message::MoveUp,
        KeyCode::Char('G') | KeyCode::End => Message::GotoBottom,
        KeyCode::Home => Message::GotoTop,
        KeyCode::Char('g') => {
            input.set_pending(KeyCode::Char('g'));
            Message::None
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => Message::PageDown,
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => Message::PageUp,
        KeyCode::PageDown => Message::PageDown,
        KeyCode::PageUp => Message::PageUp,

        KeyCode::Enter => Message::OpenSelected,
        KeyCode::Char('o') => Message::ShowIssueDetails,
        KeyCode::Char('S') => Message::ShowSeoTasks,
        KeyCode::Char('?') => Message::ToggleHelp,

        // Graph controls on the Links tab
        KeyCode::Char('f') if tab == Tab::Links => Message::FitGraph,
        KeyCode::Char('p') if tab == Tab::Links => Message::TogglePhysics,
        KeyCode::Char('b') if tab == Tab::Links => Message::OpenGraphPage,

        // Issue table controls
        KeyCode::Char('/') if tab == Tab::Issues => Message::EnterSearch,
        KeyCode::Char('f') if tab == Tab::Issues => Message::ToggleFilterMenu,
        KeyCode::Char('c') if tab == Tab::Issues => Message::ClearFilters,
        KeyCode::Char('s') if tab == Tab::Issues => {
            input.set_pending(KeyCode::Char('s'));
            Message::None
        }
        _ => Message::None,
    }
}

fn dispatch_search_mode(key: KeyEvent) -> Message {
    match key.code {
        KeyCode::Esc => Message::ExitSearch,
        KeyCode::Enter => Message::ConfirmSearch,
        KeyCode::Backspace => Message::SearchBackspace,
        KeyCode::Char(c) => Message::SearchInput(c),
        _ => Message::None,
    }
}

fn dispatch_alert(key: KeyEvent) -> Message {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char(' ') => {
            Message::CloseModal
        }
        _ => Message::None,
    }
}

fn dispatch_issue_details(key: KeyEvent) -> Message {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('o') => Message::CloseModal,
        KeyCode::Enter => Message::OpenSelected,
        KeyCode::Char('j') | KeyCode::Down => Message::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Message::MoveUp,
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => Message::PageDown,
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => Message::PageUp,
        _ => Message::None,
    }
}

fn dispatch_help_modal(key: KeyEvent) -> Message {
    match key.code {
        KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => Message::CloseModal,
        _ => Message::None,
    }
}

fn dispatch_filter_menu(key: KeyEvent) -> Message {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('f') | KeyCode::Char('q') => {
            Message::CloseModal
        }
        KeyCode::Char('j') | KeyCode::Down => Message::FilterMenuDown,
        KeyCode::Char('k') | KeyCode::Up => Message::FilterMenuUp,
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Char(' ') => {
            Message::CycleFilter { forward: true }
        }
        KeyCode::Char('h') | KeyCode::Left => Message::CycleFilter { forward: false },
        KeyCode::Char('c') => Message::ClearFilters,
        _ => Message::None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Chord handling
// ─────────────────────────────────────────────────────────────────────────────

fn handle_chord(first: KeyCode, second: KeyCode) -> Message {
    match (first, second) {
        (KeyCode::Char('g'), KeyCode::Char('g')) => Message::GotoTop,

        // s1-s5 -> sort by the nth sortable column
        (KeyCode::Char('s'), KeyCode::Char(c @ '1'..='5')) => {
            let idx = c as usize - '1' as usize;
            SortColumn::ALL
                .get(idx)
                .map_or(Message::None, |column| Message::SortBy(*column))
        }

        _ => Message::None,
    }
}
