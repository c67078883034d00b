//! Remote-access seam: one method per auth or book-store operation

use async_trait::async_trait;

use crate::models::{Book, BookRecord, NewBook, Session, User};
use crate::network::error::RemoteError;

/// The hosted service the client delegates to.
///
/// Each method performs exactly one remote call and either returns the
/// requested data or fails with a descriptive [`RemoteError`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<(), RemoteError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, RemoteError>;

    async fn sign_out(&self) -> Result<(), RemoteError>;

    /// Fails with [`RemoteError::NotAuthenticated`] when there is no session
    async fn current_user(&self) -> Result<User, RemoteError>;

    async fn change_password(&self, new_password: &str) -> Result<(), RemoteError>;

    /// Every row visible to the caller; no pagination
    async fn list_books(&self) -> Result<Vec<BookRecord>, RemoteError>;

    /// Returns the inserted rows
    async fn add_book(&self, book: &NewBook) -> Result<Vec<BookRecord>, RemoteError>;

    /// Returns the updated rows
    async fn update_book(&self, id: &str, book: &Book) -> Result<Vec<BookRecord>, RemoteError>;

    /// Returns the removed rows
    async fn delete_book(&self, id: &str) -> Result<Vec<BookRecord>, RemoteError>;
}
