//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::query::SortKey;

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Search
    StartSearch,
    StopSearch,
    SearchChar(char),
    SearchBackspace,

    // View state
    ToggleSort(SortKey),
    CyclePageSize,
    NextPage,
    PrevPage,
    GoToPage(usize),

    // Table rows
    SelectNext,
    SelectPrev,
    OpenDetail,

    // Forms
    OpenCreate,
    CloseForm,
    SubmitForm,
    NextField,
    PrevField,
    FormChar(char),
    FormBackspace,
    FormCursorLeft,
    FormCursorRight,
    CycleCategory { forward: bool },

    // Workflows
    ExportCsv,
    Reload,

    // Popups
    ToggleHelp,
    CloseHelp,
    DismissNotice,

    // System
    Quit,
}

/// What currently owns the keyboard
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Table,
    Search,
    Form,
}

/// Convert a key event to a UiEvent based on current UI context
///
/// `category_focused` tells whether the open form's category selector has
/// focus, where left/right step the selection instead of the cursor.
pub fn key_to_ui_event(
    key: KeyEvent,
    input_mode: InputMode,
    show_help: bool,
    show_notice: bool,
    category_focused: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return Some(UiEvent::Quit),
            KeyCode::Char('s') if input_mode == InputMode::Form && !show_notice => {
                return Some(UiEvent::SubmitForm)
            }
            _ => {}
        }
    }

    // Notifications block until acknowledged
    if show_notice {
        return Some(UiEvent::DismissNotice);
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match input_mode {
        InputMode::Table => table_keys(key),
        InputMode::Search => match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(UiEvent::StopSearch),
            KeyCode::Backspace => Some(UiEvent::SearchBackspace),
            KeyCode::Char(c) => Some(UiEvent::SearchChar(c)),
            _ => None,
        },
        InputMode::Form => form_keys(key, category_focused),
    }
}

fn table_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('/') => Some(UiEvent::StartSearch),
        KeyCode::Char('t') => Some(UiEvent::ToggleSort(SortKey::Title)),
        KeyCode::Char('p') => Some(UiEvent::ToggleSort(SortKey::Price)),
        KeyCode::Char('z') => Some(UiEvent::CyclePageSize),
        KeyCode::Char('n') => Some(UiEvent::OpenCreate),
        KeyCode::Char('x') => Some(UiEvent::ExportCsv),
        KeyCode::Char('r') => Some(UiEvent::Reload),
        KeyCode::Char(c @ '1'..='9') => c.to_digit(10).map(|d| UiEvent::GoToPage(d as usize)),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => Some(UiEvent::NextPage),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => Some(UiEvent::PrevPage),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::SelectNext),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::SelectPrev),
        KeyCode::Enter => Some(UiEvent::OpenDetail),
        _ => None,
    }
}

fn form_keys(key: KeyEvent, category_focused: bool) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::CloseForm),
        KeyCode::Enter => Some(UiEvent::SubmitForm),
        KeyCode::Tab | KeyCode::Down => Some(UiEvent::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(UiEvent::PrevField),
        KeyCode::Left if category_focused => Some(UiEvent::CycleCategory { forward: false }),
        KeyCode::Right if category_focused => Some(UiEvent::CycleCategory { forward: true }),
        KeyCode::Char(' ') if category_focused => Some(UiEvent::CycleCategory { forward: true }),
        KeyCode::Left => Some(UiEvent::FormCursorLeft),
        KeyCode::Right => Some(UiEvent::FormCursorRight),
        KeyCode::Backspace => Some(UiEvent::FormBackspace),
        KeyCode::Char(c) => Some(UiEvent::FormChar(c)),
        _ => None,
    }
}
