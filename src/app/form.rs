//! Form lifecycle shared by the credential and book dialogs

use crate::app::notice::Notice;
use crate::models::{Category, ChangePasswordData, SignInData, SignUpData};
use crate::schema::{BookInput, Field, FieldErrors, Schema};

/// Raw contents of one form, validated by its schema on submit
pub trait FormFields: Schema + Default + Clone {
    /// Fields in focus order
    const FIELDS: &'static [Field];

    /// Editable text behind `field`; `None` for choice fields
    fn text_mut(&mut self, field: Field) -> Option<&mut String>;

    /// What the field currently shows
    fn display(&self, field: Field) -> String;

    /// Step a choice field through its options
    fn cycle(&mut self, _field: Field, _forward: bool) {}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting {
        request_id: u64,
    },
}

/// Form contents plus validation errors, focus and submission phase
#[derive(Clone, Debug, Default)]
pub struct FormState<F: FormFields> {
    pub fields: F,
    pub errors: FieldErrors,
    pub phase: FormPhase,
    pub focus: usize,
    pub cursor: usize,
    pub general_error: Notice,
    pub success: Notice,
}

impl<F: FormFields> FormState<F> {
    /// Replace the contents, e.g. to pre-fill an edit dialog
    pub fn load(&mut self, fields: F) {
        self.fields = fields;
        self.errors.clear();
        self.focus = 0;
        self.cursor = self.focused_len();
    }

    pub fn focused(&self) -> Field {
        F::FIELDS[self.focus.min(F::FIELDS.len() - 1)]
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, FormPhase::Submitting { .. })
    }

    /// Whether `request_id` is the call this form is waiting on
    pub fn is_pending(&self, request_id: u64) -> bool {
        self.phase == FormPhase::Submitting { request_id }
    }

    /// Validate and, if the contents pass, move to submitting.
    ///
    /// Returns `None` while a previous submission is in flight or when any
    /// field fails; in the latter case the errors are kept for display.
    pub fn submit(&mut self, request_id: u64) -> Option<F::Output> {
        if self.is_submitting() {
            return None;
        }
        match self.fields.validate() {
            Ok(payload) => {
                self.errors.clear();
                self.phase = FormPhase::Submitting { request_id };
                Some(payload)
            }
            Err(errors) => {
                tracing::debug!(fields = errors.len(), "Form rejected by validation");
                self.errors = errors;
                None
            }
        }
    }

    /// The remote call succeeded: clear the transient contents
    pub fn succeed(&mut self) {
        self.fields = F::default();
        self.errors.clear();
        self.phase = FormPhase::Idle;
        self.focus = 0;
        self.cursor = 0;
    }

    /// The remote call failed: back to idle, contents kept for resubmission
    pub fn fail(&mut self) {
        self.phase = FormPhase::Idle;
    }

    fn focused_len(&mut self) -> usize {
        let field = self.focused();
        self.fields.text_mut(field).map(|t| t.len()).unwrap_or(0)
    }
}

/// Editing operations the App layer routes to whichever form has focus
pub trait FormEditor {
    fn next_field(&mut self);
    fn prev_field(&mut self);
    fn insert_char(&mut self, c: char);
    fn backspace(&mut self);
    fn cursor_left(&mut self);
    fn cursor_right(&mut self);
}

impl<F: FormFields> FormEditor for FormState<F> {
    fn next_field(&mut self) {
        self.focus = (self.focus + 1) % F::FIELDS.len();
        self.cursor = self.focused_len();
    }

    fn prev_field(&mut self) {
        self.focus = self.focus.checked_sub(1).unwrap_or(F::FIELDS.len() - 1);
        self.cursor = self.focused_len();
    }

    fn insert_char(&mut self, c: char) {
        let field = self.focused();
        if let Some(text) = self.fields.text_mut(field) {
            insert_at(text, &mut self.cursor, c);
        }
    }

    fn backspace(&mut self) {
        let field = self.focused();
        if let Some(text) = self.fields.text_mut(field) {
            remove_before(text, &mut self.cursor);
        }
    }

    fn cursor_left(&mut self) {
        let field = self.focused();
        match self.fields.text_mut(field) {
            Some(text) => self.cursor = prev_boundary(text, self.cursor),
            None => self.fields.cycle(field, false),
        }
    }

    fn cursor_right(&mut self) {
        let field = self.focused();
        match self.fields.text_mut(field) {
            Some(text) => self.cursor = next_boundary(text, self.cursor),
            None => self.fields.cycle(field, true),
        }
    }
}

// Cursor positions are byte offsets kept on char boundaries

pub(crate) fn prev_boundary(text: &str, cursor: usize) -> usize {
    text[..cursor.min(text.len())]
        .char_indices()
        .last()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

pub(crate) fn next_boundary(text: &str, cursor: usize) -> usize {
    if cursor >= text.len() {
        return text.len();
    }
    text[cursor..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| cursor + i)
        .unwrap_or(text.len())
}

pub(crate) fn insert_at(text: &mut String, cursor: &mut usize, c: char) {
    let pos = (*cursor).min(text.len());
    text.insert(pos, c);
    *cursor = pos + c.len_utf8();
}

pub(crate) fn remove_before(text: &mut String, cursor: &mut usize) {
    if *cursor == 0 {
        return;
    }
    let prev = prev_boundary(text, *cursor);
    text.remove(prev);
    *cursor = prev;
}

impl FormFields for SignInData {
    const FIELDS: &'static [Field] = &[Field::Email, Field::Password];

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Email => Some(&mut self.email),
            Field::Password => Some(&mut self.password),
            _ => None,
        }
    }

    fn display(&self, field: Field) -> String {
        match field {
            Field::Email => self.email.clone(),
            Field::Password => self.password.clone(),
            _ => String::new(),
        }
    }
}

impl FormFields for SignUpData {
    const FIELDS: &'static [Field] = &[Field::Email, Field::Password, Field::ConfirmPassword];

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Email => Some(&mut self.email),
            Field::Password => Some(&mut self.password),
            Field::ConfirmPassword => Some(&mut self.confirm_password),
            _ => None,
        }
    }

    fn display(&self, field: Field) -> String {
        match field {
            Field::Email => self.email.clone(),
            Field::Password => self.password.clone(),
            Field::ConfirmPassword => self.confirm_password.clone(),
            _ => String::new(),
        }
    }
}

impl FormFields for ChangePasswordData {
    const FIELDS: &'static [Field] = &[Field::NewPassword, Field::ConfirmNewPassword];

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::NewPassword => Some(&mut self.new_password),
            Field::ConfirmNewPassword => Some(&mut self.confirm_new_password),
            _ => None,
        }
    }

    fn display(&self, field: Field) -> String {
        match field {
            Field::NewPassword => self.new_password.clone(),
            Field::ConfirmNewPassword => self.confirm_new_password.clone(),
            _ => String::new(),
        }
    }
}

impl FormFields for BookInput {
    const FIELDS: &'static [Field] = &[Field::Title, Field::Author, Field::Year, Field::Category];

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Title => Some(&mut self.title),
            Field::Author => Some(&mut self.author),
            Field::Year => Some(&mut self.year),
            _ => None,
        }
    }

    fn display(&self, field: Field) -> String {
        match field {
            Field::Title => self.title.clone(),
            Field::Author => self.author.clone(),
            Field::Year => self.year.clone(),
            Field::Category => self
                .category
                .map(|c| c.as_str().to_string())
                .unwrap_or_else(|| "Select a category".to_string()),
            _ => String::new(),
        }
    }

    fn cycle(&mut self, field: Field, forward: bool) {
        if field != Field::Category {
            return;
        }
        self.category = Some(match (self.category, forward) {
            (Some(c), true) => c.next(),
            (Some(c), false) => c.prev(),
            (None, true) => Category::ALL[0],
            (None, false) => Category::ALL[Category::ALL.len() - 1],
        });
    }
}
