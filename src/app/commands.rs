//! Command handlers - business logic for processing UI events and responses

use chrono::Datelike;

use crate::app::notice::NoticeSlot;
use crate::app::state::{AppState, AuthTab, Dialog, Screen};
use crate::constants::{
    BOOK_ADDED, BOOK_DELETED, BOOK_UPDATED, CHANGE_PASSWORD_FALLBACK, LIBRARY_FALLBACK,
    PASSWORD_CHANGED, SIGNED_OUT_PASSWORD, SIGN_IN_FALLBACK, SIGN_UP_FALLBACK, SIGN_UP_SUCCESS,
};
use crate::messages::ui_events::InputMode;
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::User;
use crate::network::RemoteError;
use crate::schema::BookInput;

impl AppState {
    // ========================
    // Session
    // ========================

    /// Startup: ask the auth service whether a session is active
    pub fn start(&mut self) -> NetworkCommand {
        let id = self.next_id();
        self.screen = Screen::Starting;
        self.pending_session = Some(id);
        NetworkCommand::FetchUser { id }
    }

    pub fn sign_out(&mut self) -> Option<NetworkCommand> {
        if self.screen != Screen::Library || self.pending_session.is_some() {
            return None;
        }
        let id = self.next_id();
        self.pending_session = Some(id);
        Some(NetworkCommand::SignOut { id })
    }

    fn enter_library(&mut self, user: User) -> NetworkCommand {
        tracing::info!(user_id = %user.id, "Entering library");
        self.user = Some(user);
        self.screen = Screen::Library;
        self.dialog = Dialog::None;
        self.input_mode = InputMode::Normal;
        self.load_books()
    }

    fn leave_library(&mut self) {
        tracing::info!("Back to sign in");
        self.user = None;
        self.screen = Screen::Auth;
        self.dialog = Dialog::None;
        self.input_mode = InputMode::Normal;
        self.editing_book = None;
        self.library = Default::default();
        self.book_form = Default::default();
        self.change_password = Default::default();
        for slot in [
            NoticeSlot::LibrarySuccess,
            NoticeSlot::LibraryError,
            NoticeSlot::BookFormError,
            NoticeSlot::ChangePasswordError,
        ] {
            self.clear_notice(slot);
        }
    }

    // ========================
    // Auth screen
    // ========================

    pub fn switch_auth_tab(&mut self) {
        self.auth_tab = match self.auth_tab {
            AuthTab::SignIn => AuthTab::SignUp,
            AuthTab::SignUp => AuthTab::SignIn,
        };
    }

    // ========================
    // Form editing
    // ========================

    pub fn next_field(&mut self) {
        if let Some(form) = self.active_form() {
            form.next_field();
        }
    }

    pub fn prev_field(&mut self) {
        if let Some(form) = self.active_form() {
            form.prev_field();
        }
    }

    pub fn enter_char(&mut self, c: char) {
        if self.input_mode == InputMode::Editing {
            self.library.search_char(c);
        } else if let Some(form) = self.active_form() {
            form.insert_char(c);
        }
    }

    pub fn delete_char(&mut self) {
        if self.input_mode == InputMode::Editing {
            self.library.search_backspace();
        } else if let Some(form) = self.active_form() {
            form.backspace();
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.input_mode == InputMode::Editing {
            self.library.search_cursor_left();
        } else if let Some(form) = self.active_form() {
            form.cursor_left();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.input_mode == InputMode::Editing {
            self.library.search_cursor_right();
        } else if let Some(form) = self.active_form() {
            form.cursor_right();
        }
    }

    /// Submit whichever form or confirmation currently has focus
    pub fn submit(&mut self) -> Option<NetworkCommand> {
        match (self.screen, self.dialog) {
            (Screen::Auth, _) => match self.auth_tab {
                AuthTab::SignIn => self.submit_sign_in(),
                AuthTab::SignUp => self.submit_sign_up(),
            },
            (Screen::Library, Dialog::Book) => self.submit_book(),
            (Screen::Library, Dialog::ChangePassword) => self.submit_change_password(),
            (Screen::Library, Dialog::ConfirmDelete) => self.confirm_delete(),
            _ => None,
        }
    }

    fn submit_sign_in(&mut self) -> Option<NetworkCommand> {
        let id = self.next_id();
        let data = self.sign_in.submit(id)?;
        self.clear_notice(NoticeSlot::SignInError);
        Some(NetworkCommand::SignIn {
            id,
            email: data.email,
            password: data.password,
        })
    }

    fn submit_sign_up(&mut self) -> Option<NetworkCommand> {
        let id = self.next_id();
        let data = self.sign_up.submit(id)?;
        self.clear_notice(NoticeSlot::SignUpError);
        self.clear_notice(NoticeSlot::SignUpSuccess);
        Some(NetworkCommand::SignUp {
            id,
            email: data.email,
            password: data.password,
        })
    }

    fn submit_change_password(&mut self) -> Option<NetworkCommand> {
        let id = self.next_id();
        let data = self.change_password.submit(id)?;
        self.clear_notice(NoticeSlot::ChangePasswordError);
        Some(NetworkCommand::ChangePassword {
            id,
            new_password: data.new_password,
        })
    }

    fn submit_book(&mut self) -> Option<NetworkCommand> {
        let id = self.next_id();
        let book = self.book_form.submit(id)?;
        self.clear_notice(NoticeSlot::BookFormError);
        Some(match self.editing_book.clone() {
            Some(book_id) => NetworkCommand::UpdateBook { id, book_id, book },
            None => NetworkCommand::AddBook { id, book },
        })
    }

    // ========================
    // Library
    // ========================

    pub fn load_books(&mut self) -> NetworkCommand {
        let id = self.next_id();
        self.library.loading = true;
        self.library.pending_load = Some(id);
        NetworkCommand::LoadBooks { id }
    }

    pub fn reload(&mut self) -> Option<NetworkCommand> {
        (self.screen == Screen::Library && self.library.pending_load.is_none())
            .then(|| self.load_books())
    }

    pub fn start_search(&mut self) {
        if self.screen == Screen::Library && self.dialog == Dialog::None {
            self.input_mode = InputMode::Editing;
            self.library.search_cursor = self.library.search.len();
        }
    }

    pub fn stop_search(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn cycle_filter(&mut self, forward: bool) {
        self.library.cycle_filter(forward);
    }

    pub fn cycle_sort(&mut self) {
        self.library.cycle_sort();
    }

    pub fn select_next(&mut self) {
        self.library.select_next();
    }

    pub fn select_prev(&mut self) {
        self.library.select_prev();
    }

    // ========================
    // Dialogs
    // ========================

    pub fn open_add_book(&mut self) {
        if self.screen != Screen::Library || self.book_form.is_submitting() {
            return;
        }
        self.editing_book = None;
        self.book_form.load(BookInput {
            year: chrono::Local::now().year().to_string(),
            ..Default::default()
        });
        self.dialog = Dialog::Book;
    }

    pub fn open_edit_book(&mut self) {
        if self.screen != Screen::Library || self.book_form.is_submitting() {
            return;
        }
        let Some(record) = self.library.selected_book() else {
            return;
        };
        let id = record.id.clone();
        let input = BookInput::from(&record.to_book());
        self.editing_book = Some(id);
        self.book_form.load(input);
        self.dialog = Dialog::Book;
    }

    pub fn open_change_password(&mut self) {
        if self.screen != Screen::Library {
            return;
        }
        if !self.change_password.is_submitting() {
            self.change_password.load(Default::default());
        }
        self.dialog = Dialog::ChangePassword;
    }

    /// Ask before deleting the selected book
    pub fn request_delete(&mut self) {
        if self.screen != Screen::Library || self.library.pending_mutation.is_some() {
            return;
        }
        if let Some(record) = self.library.selected_book() {
            self.library.pending_delete = Some(record.id.clone());
            self.dialog = Dialog::ConfirmDelete;
        }
    }

    fn confirm_delete(&mut self) -> Option<NetworkCommand> {
        let book_id = self.library.pending_delete.take()?;
        let id = self.next_id();
        self.library.pending_mutation = Some(id);
        self.dialog = Dialog::None;
        Some(NetworkCommand::DeleteBook { id, book_id })
    }

    pub fn toggle_help(&mut self) {
        self.dialog = match self.dialog {
            Dialog::Help => Dialog::None,
            Dialog::None if self.screen == Screen::Library => Dialog::Help,
            other => other,
        };
    }

    /// Dismiss the open dialog without acting on it
    pub fn close_dialog(&mut self) {
        match self.dialog {
            Dialog::Book => {
                self.book_form.errors.clear();
                self.clear_notice(NoticeSlot::BookFormError);
            }
            Dialog::ChangePassword => {
                self.change_password.errors.clear();
                self.clear_notice(NoticeSlot::ChangePasswordError);
            }
            Dialog::ConfirmDelete => self.library.pending_delete = None,
            Dialog::Help | Dialog::None => {}
        }
        self.dialog = Dialog::None;
    }

    // ========================
    // Response handling
    // ========================

    /// Apply a network response; may ask for a follow-up (list reload)
    pub fn handle_response(&mut self, response: NetworkResponse) -> Option<NetworkCommand> {
        match response {
            NetworkResponse::UserFetched { id, result } => {
                if self.pending_session != Some(id) {
                    return None;
                }
                self.pending_session = None;
                match result {
                    Ok(user) => return Some(self.enter_library(user)),
                    Err(err) => {
                        tracing::info!(error = %err, "No active session");
                        self.screen = Screen::Auth;
                    }
                }
            }
            NetworkResponse::SignedIn { id, result } => {
                if !self.sign_in.is_pending(id) {
                    return None;
                }
                match result {
                    Ok(user) => {
                        self.sign_in.succeed();
                        return Some(self.enter_library(user));
                    }
                    Err(err) => {
                        self.sign_in.fail();
                        self.post_notice(NoticeSlot::SignInError, err.user_message(SIGN_IN_FALLBACK));
                    }
                }
            }
            NetworkResponse::SignedUp { id, result } => {
                if !self.sign_up.is_pending(id) {
                    return None;
                }
                match result {
                    Ok(()) => {
                        self.sign_up.succeed();
                        self.post_notice(NoticeSlot::SignUpSuccess, SIGN_UP_SUCCESS);
                    }
                    Err(err) => {
                        self.sign_up.fail();
                        self.post_notice(NoticeSlot::SignUpError, err.user_message(SIGN_UP_FALLBACK));
                    }
                }
            }
            NetworkResponse::SignedOut { id, result } => {
                if self.pending_session != Some(id) {
                    return None;
                }
                self.pending_session = None;
                match result {
                    Ok(()) => self.leave_library(),
                    Err(err) => self.library_error(&err),
                }
            }
            NetworkResponse::PasswordChanged { id, result } => {
                if !self.change_password.is_pending(id) {
                    return None;
                }
                match result {
                    Ok(()) => {
                        self.change_password.succeed();
                        if self.dialog == Dialog::ChangePassword {
                            self.dialog = Dialog::None;
                        }
                        self.post_notice(NoticeSlot::LibrarySuccess, PASSWORD_CHANGED);
                    }
                    Err(err) => {
                        self.change_password.fail();
                        let message = match err {
                            RemoteError::NotAuthenticated => SIGNED_OUT_PASSWORD.to_string(),
                            other => other.user_message(CHANGE_PASSWORD_FALLBACK),
                        };
                        if self.dialog == Dialog::ChangePassword {
                            self.post_notice(NoticeSlot::ChangePasswordError, message);
                        } else {
                            self.post_notice(NoticeSlot::LibraryError, message);
                        }
                    }
                }
            }
            NetworkResponse::BooksLoaded { id, result } => {
                if self.library.pending_load != Some(id) {
                    return None;
                }
                match result {
                    Ok(books) => self.library.replace(books),
                    Err(err) => {
                        self.library.loading = false;
                        self.library.pending_load = None;
                        self.library_error(&err);
                    }
                }
            }
            NetworkResponse::BookAdded { id, result } => {
                return self.finish_book_form(id, result, BOOK_ADDED);
            }
            NetworkResponse::BookUpdated { id, result } => {
                return self.finish_book_form(id, result, BOOK_UPDATED);
            }
            NetworkResponse::BookDeleted { id, result } => {
                if self.library.pending_mutation != Some(id) {
                    return None;
                }
                self.library.pending_mutation = None;
                match result {
                    Ok(()) => {
                        self.post_notice(NoticeSlot::LibrarySuccess, BOOK_DELETED);
                        return Some(self.load_books());
                    }
                    Err(err) => self.library_error(&err),
                }
            }
        }
        None
    }

    fn finish_book_form(
        &mut self,
        id: u64,
        result: Result<(), RemoteError>,
        success: &str,
    ) -> Option<NetworkCommand> {
        if !self.book_form.is_pending(id) {
            return None;
        }
        match result {
            Ok(()) => {
                self.book_form.succeed();
                self.editing_book = None;
                if self.dialog == Dialog::Book {
                    self.dialog = Dialog::None;
                }
                self.post_notice(NoticeSlot::LibrarySuccess, success);
                Some(self.load_books())
            }
            Err(err) => {
                self.book_form.fail();
                if self.dialog == Dialog::Book {
                    self.post_notice(NoticeSlot::BookFormError, err.user_message(LIBRARY_FALLBACK));
                } else {
                    self.library_error(&err);
                }
                None
            }
        }
    }

    fn library_error(&mut self, err: &RemoteError) {
        self.post_notice(NoticeSlot::LibraryError, err.user_message(LIBRARY_FALLBACK));
    }
}
