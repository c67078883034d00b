//! Render state - data structure sent from App layer to UI for rendering

use crate::app::state::{AuthTab, Dialog, Screen};
use crate::messages::ui_events::InputMode;
use crate::models::BookRecord;

/// One labelled input of a form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldView {
    pub label: String,
    pub value: String,
    pub error: Option<String>,
    /// Rendered masked
    pub secret: bool,
    /// Picked with the arrow keys rather than typed
    pub choice: bool,
    pub focused: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormView {
    pub title: String,
    pub fields: Vec<FieldView>,
    /// Byte offset into the focused field
    pub cursor: usize,
    pub general_error: Option<String>,
    pub submit_label: String,
    pub submitting: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibraryView {
    /// Filtered and ordered records
    pub books: Vec<BookRecord>,
    /// Size of the whole fetched collection
    pub total: usize,
    pub selected: usize,
    pub loading: bool,
    pub search: String,
    pub search_cursor: usize,
    pub filter_label: String,
    pub sort_label: String,
    pub empty_message: Option<&'static str>,
    pub success: Option<String>,
    pub error: Option<String>,
}

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub screen: Screen,
    pub auth_tab: AuthTab,
    pub dialog: Dialog,
    pub input_mode: InputMode,
    pub user_email: Option<String>,

    // Auth screen
    pub auth_form: FormView,
    pub sign_up_success: Option<String>,

    // Library screen
    pub dialog_form: Option<FormView>,
    pub library: LibraryView,
}
