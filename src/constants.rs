//! Application constants
//!
//! Centralized location for user-facing strings and configuration defaults.

use std::time::Duration;

/// Application name
pub const APP_NAME: &str = "Book Manager";

/// How long a general error or success notice stays on screen
pub const NOTICE_TIMEOUT: Duration = Duration::from_secs(3);

/// Default remote table holding book rows
pub const DEFAULT_BOOKS_TABLE: &str = "books";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Minimum password length accepted by every credentials form
pub const MIN_PASSWORD_LEN: usize = 6;

// Fallbacks used when a failure carries no readable message
pub const SIGN_IN_FALLBACK: &str = "An error occurred during sign in.";
pub const SIGN_UP_FALLBACK: &str = "An error occurred during sign up.";
pub const CHANGE_PASSWORD_FALLBACK: &str = "An unexpected error occurred.";
pub const LIBRARY_FALLBACK: &str = "An unexpected error occurred. Please try again.";

pub const SIGN_UP_SUCCESS: &str =
    "Account created successfully! Please check your email for confirmation.";
pub const BOOK_ADDED: &str = "Book added successfully";
pub const BOOK_UPDATED: &str = "Book updated successfully";
pub const BOOK_DELETED: &str = "Book deleted successfully";
pub const PASSWORD_CHANGED: &str = "Password changed successfully";

pub const EMPTY_COLLECTION: &str = "No books in your collection yet.";
pub const NO_MATCHES: &str = "No books match your search.";
pub const CONFIRM_DELETE: &str = "Are you sure you want to delete this book?";
pub const SIGNED_OUT_PASSWORD: &str = "You must be signed in to change your password.";
