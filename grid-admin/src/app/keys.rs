//! Key bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use grid_engine::PageNav;

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    SwitchTab,
    CursorUp,
    CursorDown,
    Page(PageNav),
    /// Toggle sort on the column at this index.
    Sort(usize),
    /// Step through the page size options.
    PageSize(isize),
    StartFilter,
    /// Pick up the row under the cursor, or drop the picked row there.
    PickOrDrop,
    Cancel,
    Reload,
}

/// Map a key in normal (non-filter) mode.
pub fn action(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        };
    }
    let action = match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Tab | KeyCode::BackTab => Action::SwitchTab,
        KeyCode::Up | KeyCode::Char('k') => Action::CursorUp,
        KeyCode::Down | KeyCode::Char('j') => Action::CursorDown,
        KeyCode::Left | KeyCode::Char('h') => Action::Page(PageNav::Previous),
        KeyCode::Right | KeyCode::Char('l') => Action::Page(PageNav::Next),
        KeyCode::Home | KeyCode::Char('g') => Action::Page(PageNav::First),
        KeyCode::End | KeyCode::Char('G') => Action::Page(PageNav::Last),
        KeyCode::Char(c @ '1'..='9') => Action::Sort(c as usize - '1' as usize),
        KeyCode::Char('+') | KeyCode::Char('=') => Action::PageSize(1),
        KeyCode::Char('-') => Action::PageSize(-1),
        KeyCode::Char('/') => Action::StartFilter,
        KeyCode::Char(' ') | KeyCode::Enter => Action::PickOrDrop,
        KeyCode::Esc => Action::Cancel,
        KeyCode::Char('r') => Action::Reload,
        _ => return None,
    };
    Some(action)
}

/// Help line shown under the grid.
pub const HELP: &str =
    "tab screen  ↑↓ row  ←→ page  1-9 sort  +/- size  / filter  space pick/drop  esc cancel  r reload  q quit";
