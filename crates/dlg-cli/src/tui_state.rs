use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::input::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UiKey {
    Explorer(Key),
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    ToggleHelp,
    ForceQuit,
}

pub(crate) fn map_key_event(key: KeyEvent) -> UiKey {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return UiKey::ForceQuit;
    }
    match key.code {
        KeyCode::Char(ch @ '0'..='9') => UiKey::Explorer(Key::Digit(ch as u8 - b'0')),
        KeyCode::Enter => UiKey::Explorer(Key::Enter),
        KeyCode::Backspace | KeyCode::Char('-') => UiKey::Explorer(Key::Backspace),
        KeyCode::Char(' ') => UiKey::Explorer(Key::Space),
        KeyCode::Esc | KeyCode::Char('q') => UiKey::Explorer(Key::Escape),
        KeyCode::Up => UiKey::ScrollUp,
        KeyCode::Down => UiKey::ScrollDown,
        KeyCode::PageUp => UiKey::PageUp,
        KeyCode::PageDown => UiKey::PageDown,
        KeyCode::Char('h') => UiKey::ToggleHelp,
        _ => UiKey::Explorer(Key::Other),
    }
}

#[derive(Debug, Default)]
pub(crate) struct TuiUiState {
    pub(crate) scroll_offset: usize,
    pub(crate) help_visible: bool,
    pub(crate) status: String,
}

impl TuiUiState {
    pub(crate) fn reset_scroll(&mut self) {
        self.scroll_offset = 0;
    }

    pub(crate) fn scroll_by(&mut self, delta: isize, content_rows: usize, visible_rows: usize) {
        let max_offset = content_rows.saturating_sub(visible_rows);
        let next = if delta.is_negative() {
            self.scroll_offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.scroll_offset.saturating_add(delta.unsigned_abs())
        };
        self.scroll_offset = next.min(max_offset);
    }
}
