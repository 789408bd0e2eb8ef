use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::models::NavMode;

/// Key codes as reported by browsers (`event.which`).
pub const KEY_LEFT: u32 = 37;
pub const KEY_RIGHT: u32 = 39;
pub const KEY_ENTER: u32 = 13;

/// A navigation-relevant key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Left,
    Right,
    Enter,
    Home,
    End,
    Escape,
    Char(char),
    Other,
}

impl NavKey {
    pub fn from_code(code: u32) -> Self {
        match code {
            KEY_LEFT => NavKey::Left,
            KEY_RIGHT => NavKey::Right,
            KEY_ENTER => NavKey::Enter,
            _ => NavKey::Other,
        }
    }
}

impl From<KeyEvent> for NavKey {
    fn from(key: KeyEvent) -> Self {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return NavKey::Other;
        }
        match key.code {
            KeyCode::Left => NavKey::Left,
            KeyCode::Right => NavKey::Right,
            KeyCode::Enter => NavKey::Enter,
            KeyCode::Home => NavKey::Home,
            KeyCode::End => NavKey::End,
            KeyCode::Esc => NavKey::Escape,
            KeyCode::Char(c) => NavKey::Char(c),
            _ => NavKey::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    PagePrev,
    PageNext,
    PageFirst,
    PageLast,
    Refresh,
    ToggleDateless,
    SelectPrev,
    SelectNext,
    OpenZoom,
    ZoomPrev,
    ZoomNext,
    ExitZoom,
    EditNotes,
    CopyOriginalLink,
    GoToPagePrompt,
    SearchPrompt,
    TimeNav,
    Help,
    Quit,
}

/// Map a key press to an action for the given mode.
///
/// Arrow keys page through the gallery only in gallery mode; in zoom mode
/// they move between items instead and never reach the page controller.
pub fn route_key(mode: NavMode, key: NavKey) -> Option<KeyAction> {
    match mode {
        NavMode::Gallery => match key {
            NavKey::Left => Some(KeyAction::PagePrev),
            NavKey::Right => Some(KeyAction::PageNext),
            NavKey::Home => Some(KeyAction::PageFirst),
            NavKey::End => Some(KeyAction::PageLast),
            NavKey::Enter => Some(KeyAction::OpenZoom),
            NavKey::Char('h') => Some(KeyAction::PagePrev),
            NavKey::Char('l') => Some(KeyAction::PageNext),
            NavKey::Char('g') => Some(KeyAction::PageFirst),
            NavKey::Char('G') => Some(KeyAction::PageLast),
            NavKey::Char('k') => Some(KeyAction::SelectPrev),
            NavKey::Char('j') => Some(KeyAction::SelectNext),
            NavKey::Char('r') => Some(KeyAction::Refresh),
            NavKey::Char('d') => Some(KeyAction::ToggleDateless),
            NavKey::Char(':') => Some(KeyAction::GoToPagePrompt),
            NavKey::Char('/') => Some(KeyAction::SearchPrompt),
            NavKey::Char('t') => Some(KeyAction::TimeNav),
            NavKey::Char('?') => Some(KeyAction::Help),
            NavKey::Char('q') => Some(KeyAction::Quit),
            _ => None,
        },
        NavMode::Zoom => match key {
            NavKey::Left => Some(KeyAction::ZoomPrev),
            NavKey::Right => Some(KeyAction::ZoomNext),
            NavKey::Escape | NavKey::Char('q') => Some(KeyAction::ExitZoom),
            NavKey::Char('n') => Some(KeyAction::EditNotes),
            NavKey::Char('y') => Some(KeyAction::CopyOriginalLink),
            NavKey::Char('?') => Some(KeyAction::Help),
            _ => None,
        },
    }
}
