//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::state::{Dialog, Screen};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiEvent {
    // Form editing
    NextField,
    PrevField,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,
    Submit,

    // Auth screen
    SwitchAuthTab,

    // Library
    StartSearch,
    StopSearch,
    CycleFilter { forward: bool },
    CycleSort,
    SelectNext,
    SelectPrev,
    Reload,
    AddBook,
    EditBook,
    DeleteBook,
    ChangePassword,
    SignOut,

    // Popups
    CloseDialog,
    ToggleHelp,

    // System
    Quit,
}

/// Input mode of the library screen
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into the search box
    Editing,
}

/// What the UI currently shows, needed for context-aware key mapping
#[derive(Clone, Copy, Debug)]
pub struct KeyContext {
    pub screen: Screen,
    pub dialog: Dialog,
    pub input_mode: InputMode,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(key: KeyEvent, ctx: KeyContext) -> Option<UiEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(UiEvent::Quit),
            KeyCode::Char('t') if ctx.screen == Screen::Auth => Some(UiEvent::SwitchAuthTab),
            _ => None,
        };
    }

    match ctx.screen {
        Screen::Starting => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(UiEvent::Quit),
            _ => None,
        },
        Screen::Auth => form_keys(key),
        Screen::Library => match ctx.dialog {
            Dialog::Help => Some(UiEvent::ToggleHelp),
            Dialog::ConfirmDelete => match key.code {
                KeyCode::Enter | KeyCode::Char('y') => Some(UiEvent::Submit),
                KeyCode::Esc | KeyCode::Char('n') => Some(UiEvent::CloseDialog),
                _ => None,
            },
            Dialog::Book | Dialog::ChangePassword => match key.code {
                KeyCode::Esc => Some(UiEvent::CloseDialog),
                _ => form_keys(key),
            },
            Dialog::None => library_keys(key, ctx.input_mode),
        },
    }
}

/// Keys inside a form: typing edits the focused field
fn form_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Tab | KeyCode::Down => Some(UiEvent::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(UiEvent::PrevField),
        KeyCode::Left => Some(UiEvent::CursorLeft),
        KeyCode::Right => Some(UiEvent::CursorRight),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Enter => Some(UiEvent::Submit),
        KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
        _ => None,
    }
}

fn library_keys(key: KeyEvent, input_mode: InputMode) -> Option<UiEvent> {
    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Char('/') => Some(UiEvent::StartSearch),
            KeyCode::Char('f') => Some(UiEvent::CycleFilter { forward: true }),
            KeyCode::Char('F') => Some(UiEvent::CycleFilter { forward: false }),
            KeyCode::Char('o') => Some(UiEvent::CycleSort),
            KeyCode::Char('a') => Some(UiEvent::AddBook),
            KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::EditBook),
            KeyCode::Char('d') => Some(UiEvent::DeleteBook),
            KeyCode::Char('p') => Some(UiEvent::ChangePassword),
            KeyCode::Char('x') => Some(UiEvent::SignOut),
            KeyCode::Char('r') => Some(UiEvent::Reload),
            KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::SelectPrev),
            KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::SelectNext),
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(UiEvent::StopSearch),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctx(screen: Screen, dialog: Dialog, input_mode: InputMode) -> KeyContext {
        KeyContext {
            screen,
            dialog,
            input_mode,
        }
    }

    #[rstest]
    #[case(KeyCode::Char('q'), Some(UiEvent::CharInput('q')))]
    #[case(KeyCode::Enter, Some(UiEvent::Submit))]
    #[case(KeyCode::Tab, Some(UiEvent::NextField))]
    #[case(KeyCode::BackTab, Some(UiEvent::PrevField))]
    fn test_auth_screen_types_into_form(#[case] code: KeyCode, #[case] expected: Option<UiEvent>) {
        let ctx = ctx(Screen::Auth, Dialog::None, InputMode::Normal);
        assert_eq!(key_to_ui_event(press(code), ctx), expected);
    }

    #[rstest]
    #[case(KeyCode::Char('q'), Some(UiEvent::Quit))]
    #[case(KeyCode::Char('a'), Some(UiEvent::AddBook))]
    #[case(KeyCode::Char('d'), Some(UiEvent::DeleteBook))]
    #[case(KeyCode::Char('F'), Some(UiEvent::CycleFilter { forward: false }))]
    #[case(KeyCode::Char('/'), Some(UiEvent::StartSearch))]
    fn test_library_normal_mode(#[case] code: KeyCode, #[case] expected: Option<UiEvent>) {
        let ctx = ctx(Screen::Library, Dialog::None, InputMode::Normal);
        assert_eq!(key_to_ui_event(press(code), ctx), expected);
    }

    #[test]
    fn test_search_mode_captures_letters() {
        let ctx = ctx(Screen::Library, Dialog::None, InputMode::Editing);
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('q')), ctx),
            Some(UiEvent::CharInput('q'))
        );
        assert_eq!(key_to_ui_event(press(KeyCode::Esc), ctx), Some(UiEvent::StopSearch));
    }

    #[test]
    fn test_confirm_dialog_accepts_or_cancels() {
        let ctx = ctx(Screen::Library, Dialog::ConfirmDelete, InputMode::Normal);
        assert_eq!(key_to_ui_event(press(KeyCode::Char('y')), ctx), Some(UiEvent::Submit));
        assert_eq!(key_to_ui_event(press(KeyCode::Esc), ctx), Some(UiEvent::CloseDialog));
        assert_eq!(key_to_ui_event(press(KeyCode::Char('a')), ctx), None);
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for screen in [Screen::Starting, Screen::Auth, Screen::Library] {
            let ctx = ctx(screen, Dialog::Book, InputMode::Normal);
            assert_eq!(key_to_ui_event(key, ctx), Some(UiEvent::Quit));
        }
    }
}
