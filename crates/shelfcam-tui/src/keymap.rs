use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub(crate) fn is_back(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Esc)
}

pub(crate) fn is_confirm(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Enter)
}

pub(crate) fn is_up(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Up | KeyCode::Char('k'))
}

pub(crate) fn is_down(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Down | KeyCode::Char('j'))
}

pub(crate) fn is_toggle(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char(' '))
}

pub(crate) fn is_filter_focus(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Tab | KeyCode::Char('/'))
}

pub(crate) fn is_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q'))
}

/// Ctrl+C, which leaves shelfcam from any screen without confirmation.
pub(crate) fn is_interrupt(key: KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

pub(crate) fn is_refresh(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('r'))
}

pub(crate) fn is_capture(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('c'))
}

pub(crate) fn is_import(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('i'))
}

pub(crate) fn is_delete(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('d') | KeyCode::Delete)
}

pub(crate) fn is_upload(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('u'))
}
