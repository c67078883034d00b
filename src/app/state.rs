//! App state - pure data structure with no I/O logic

use crate::app::form::{FormEditor, FormFields, FormState};
use crate::app::library::Library;
use crate::app::notice::{Notice, NoticeSlot, TimerRequest};
use crate::messages::render::{FieldView, FormView, LibraryView};
use crate::messages::ui_events::InputMode;
use crate::messages::RenderState;
use crate::models::{ChangePasswordData, SignInData, SignUpData, User};
use crate::schema::{BookInput, Field};

/// Top-level screen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    /// Waiting for the startup session check
    #[default]
    Starting,
    Auth,
    Library,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthTab {
    #[default]
    SignIn,
    SignUp,
}

/// Modal drawn over the library screen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Dialog {
    #[default]
    None,
    Book,
    ChangePassword,
    ConfirmDelete,
    Help,
}

/// Main application state - pure data, no I/O
#[derive(Default)]
pub struct AppState {
    pub screen: Screen,
    pub auth_tab: AuthTab,
    pub dialog: Dialog,
    pub input_mode: InputMode,

    // Forms
    pub sign_in: FormState<SignInData>,
    pub sign_up: FormState<SignUpData>,
    pub change_password: FormState<ChangePasswordData>,
    pub book_form: FormState<BookInput>,
    /// Id of the record the book dialog edits; `None` when adding
    pub editing_book: Option<String>,

    pub library: Library,
    pub user: Option<User>,
    /// Request id of the startup check or sign-out in flight
    pub pending_session: Option<u64>,

    next_request_id: u64,
    timer_requests: Vec<TimerRequest>,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            next_request_id: 1,
            ..Default::default()
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn notice_mut(&mut self, slot: NoticeSlot) -> &mut Notice {
        match slot {
            NoticeSlot::SignInError => &mut self.sign_in.general_error,
            NoticeSlot::SignUpError => &mut self.sign_up.general_error,
            NoticeSlot::SignUpSuccess => &mut self.sign_up.success,
            NoticeSlot::ChangePasswordError => &mut self.change_password.general_error,
            NoticeSlot::BookFormError => &mut self.book_form.general_error,
            NoticeSlot::LibrarySuccess => &mut self.library.success,
            NoticeSlot::LibraryError => &mut self.library.error,
        }
    }

    /// Show a message and ask for its dismissal timer
    pub fn post_notice(&mut self, slot: NoticeSlot, message: impl Into<String>) {
        let generation = self.notice_mut(slot).set(message);
        self.timer_requests
            .push(TimerRequest::Schedule { slot, generation });
    }

    pub fn clear_notice(&mut self, slot: NoticeSlot) {
        self.notice_mut(slot).clear();
        self.timer_requests.push(TimerRequest::Cancel(slot));
    }

    /// A dismissal timer fired; returns whether anything was cleared
    pub fn expire_notice(&mut self, slot: NoticeSlot, generation: u64) -> bool {
        self.notice_mut(slot).expire(generation)
    }

    /// Timer work accumulated since the last call
    pub fn take_timer_requests(&mut self) -> Vec<TimerRequest> {
        std::mem::take(&mut self.timer_requests)
    }

    /// The form receiving keystrokes, if any
    pub fn active_form(&mut self) -> Option<&mut dyn FormEditor> {
        match (self.screen, self.dialog) {
            (Screen::Auth, _) => match self.auth_tab {
                AuthTab::SignIn => Some(&mut self.sign_in),
                AuthTab::SignUp => Some(&mut self.sign_up),
            },
            (Screen::Library, Dialog::Book) => Some(&mut self.book_form),
            (Screen::Library, Dialog::ChangePassword) => Some(&mut self.change_password),
            _ => None,
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        let auth_form = match self.auth_tab {
            AuthTab::SignIn => form_view(&self.sign_in, "Sign In", "Signing in..."),
            AuthTab::SignUp => form_view(&self.sign_up, "Sign Up", "Creating account..."),
        };

        let dialog_form = match self.dialog {
            Dialog::Book => {
                let (title, submit) = match self.editing_book {
                    Some(_) => ("Edit Book", "Update"),
                    None => ("Add New Book", "Add Book"),
                };
                Some(FormView {
                    title: title.to_string(),
                    ..form_view(&self.book_form, submit, "Saving...")
                })
            }
            Dialog::ChangePassword => Some(FormView {
                title: "Change your password".to_string(),
                ..form_view(&self.change_password, "Change Password", "...")
            }),
            _ => None,
        };

        let visible = self.library.visible();
        let library = LibraryView {
            total: self.library.books.len(),
            books: visible.into_iter().cloned().collect(),
            selected: self.library.selected,
            loading: self.library.loading,
            search: self.library.search.clone(),
            search_cursor: self.library.search_cursor,
            filter_label: self.library.filter.label().to_string(),
            sort_label: self.library.sort.label().to_string(),
            empty_message: self.library.empty_message(),
            success: self.library.success.message().map(str::to_string),
            error: self.library.error.message().map(str::to_string),
        };

        RenderState {
            screen: self.screen,
            auth_tab: self.auth_tab,
            dialog: self.dialog,
            input_mode: self.input_mode,
            user_email: self.user.as_ref().and_then(|u| u.email.clone()),
            auth_form,
            sign_up_success: self.sign_up.success.message().map(str::to_string),
            dialog_form,
            library,
        }
    }
}

fn form_view<F: FormFields>(form: &FormState<F>, submit: &str, submitting: &str) -> FormView {
    let focus = form.focused();
    let fields = F::FIELDS
        .iter()
        .map(|&field| FieldView {
            label: field.label().to_string(),
            value: form.fields.display(field),
            error: form.errors.get(field).map(str::to_string),
            secret: field.is_secret(),
            choice: field == Field::Category,
            focused: field == focus,
        })
        .collect();

    FormView {
        title: String::new(),
        fields,
        cursor: form.cursor,
        general_error: form.general_error.message().map(str::to_string),
        submit_label: (if form.is_submitting() { submitting } else { submit }).to_string(),
        submitting: form.is_submitting(),
    }
}
