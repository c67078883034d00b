//! Validation schemas - declarative field constraints checked before any write
//!
//! A schema either accepts a candidate record, producing the typed payload,
//! or rejects it with one message per offending field.

pub mod auth;
pub mod book;

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

pub use book::BookInput;

/// Every field that can carry a validation error
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Email,
    Password,
    ConfirmPassword,
    NewPassword,
    ConfirmNewPassword,
    Title,
    Author,
    Year,
    Category,
}

impl Field {
    /// Key used by the remote API and in error maps
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Email => "email",
            Field::Password => "password",
            Field::ConfirmPassword => "confirmPassword",
            Field::NewPassword => "newPassword",
            Field::ConfirmNewPassword => "confirmNewPassword",
            Field::Title => "title",
            Field::Author => "author",
            Field::Year => "year",
            Field::Category => "category",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Email => "Email",
            Field::Password | Field::NewPassword => "Password",
            Field::ConfirmPassword | Field::ConfirmNewPassword => "Confirm Password",
            Field::Title => "Title",
            Field::Author => "Author",
            Field::Year => "Year",
            Field::Category => "Category",
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(
            self,
            Field::Password | Field::ConfirmPassword | Field::NewPassword | Field::ConfirmNewPassword
        )
    }
}

/// Field name to human-readable message, at most one per field
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message unless the field already failed an earlier rule
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn keys(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// `Ok(value)` when nothing was recorded
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

/// A candidate record that can be checked against its constraints
pub trait Schema {
    type Output;

    fn validate(&self) -> Result<Self::Output, FieldErrors>;
}

/// Record `message` when `value` is empty; true when it is present
pub(crate) fn required(
    errors: &mut FieldErrors,
    field: Field,
    value: &str,
    message: &str,
) -> bool {
    if value.is_empty() {
        errors.insert(field, message);
        false
    } else {
        true
    }
}

pub(crate) fn min_len(
    errors: &mut FieldErrors,
    field: Field,
    value: &str,
    min: usize,
    message: &str,
) {
    if value.chars().count() < min {
        errors.insert(field, message);
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@([a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$")
            .expect("email pattern must compile")
    })
}

/// Email shape check; the regex crate has no lookahead so the leading-dot and
/// double-dot rules are checked by hand.
pub fn is_valid_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && email_regex().is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("reader@example.com", true)]
    #[case("first.last+books@mail.example.org", true)]
    #[case("o'neil@example.io", true)]
    #[case("no-at-sign.example.com", false)]
    #[case("trailing@dot.", false)]
    #[case(".leading@example.com", false)]
    #[case("double..dot@example.com", false)]
    #[case("name@example.c", false)]
    #[case("name.@example.com", false)]
    #[case("", false)]
    fn email_shape(#[case] email: &str, #[case] valid: bool) {
        assert_eq!(is_valid_email(email), valid, "{email}");
    }

    #[test]
    fn first_violation_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.insert(Field::Email, "Email is required");
        errors.insert(Field::Email, "Invalid email");
        assert_eq!(errors.get(Field::Email), Some("Email is required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn field_keys_match_wire_names() {
        assert_eq!(Field::ConfirmNewPassword.as_str(), "confirmNewPassword");
        assert!(Field::NewPassword.is_secret());
        assert!(!Field::Title.is_secret());
    }
}
