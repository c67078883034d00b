//! Network messages - communication between App and Network layers

use crate::models::{Book, BookRecord, User};
use crate::network::RemoteError;

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkCommand {
    SignUp {
        id: u64,
        email: String,
        password: String,
    },
    SignIn {
        id: u64,
        email: String,
        password: String,
    },
    SignOut {
        id: u64,
    },
    /// Ask the auth service who is signed in (startup check)
    FetchUser {
        id: u64,
    },
    /// Resolve the current user, then change their password
    ChangePassword {
        id: u64,
        new_password: String,
    },
    LoadBooks {
        id: u64,
    },
    /// Resolve the current user, then insert the book owned by them
    AddBook {
        id: u64,
        book: Book,
    },
    UpdateBook {
        id: u64,
        book_id: String,
        book: Book,
    },
    DeleteBook {
        id: u64,
        book_id: String,
    },

    /// Shutdown the network actor
    Shutdown,
}

impl NetworkCommand {
    /// Operation name for logs
    pub fn operation(&self) -> &'static str {
        match self {
            NetworkCommand::SignUp { .. } => "sign_up",
            NetworkCommand::SignIn { .. } => "sign_in",
            NetworkCommand::SignOut { .. } => "sign_out",
            NetworkCommand::FetchUser { .. } => "current_user",
            NetworkCommand::ChangePassword { .. } => "change_password",
            NetworkCommand::LoadBooks { .. } => "list_books",
            NetworkCommand::AddBook { .. } => "add_book",
            NetworkCommand::UpdateBook { .. } => "update_book",
            NetworkCommand::DeleteBook { .. } => "delete_book",
            NetworkCommand::Shutdown => "shutdown",
        }
    }
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkResponse {
    SignedUp {
        id: u64,
        result: Result<(), RemoteError>,
    },
    SignedIn {
        id: u64,
        result: Result<User, RemoteError>,
    },
    SignedOut {
        id: u64,
        result: Result<(), RemoteError>,
    },
    UserFetched {
        id: u64,
        result: Result<User, RemoteError>,
    },
    PasswordChanged {
        id: u64,
        result: Result<(), RemoteError>,
    },
    BooksLoaded {
        id: u64,
        result: Result<Vec<BookRecord>, RemoteError>,
    },
    BookAdded {
        id: u64,
        result: Result<(), RemoteError>,
    },
    BookUpdated {
        id: u64,
        result: Result<(), RemoteError>,
    },
    BookDeleted {
        id: u64,
        result: Result<(), RemoteError>,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::SignedUp { id, .. } => *id,
            NetworkResponse::SignedIn { id, .. } => *id,
            NetworkResponse::SignedOut { id, .. } => *id,
            NetworkResponse::UserFetched { id, .. } => *id,
            NetworkResponse::PasswordChanged { id, .. } => *id,
            NetworkResponse::BooksLoaded { id, .. } => *id,
            NetworkResponse::BookAdded { id, .. } => *id,
            NetworkResponse::BookUpdated { id, .. } => *id,
            NetworkResponse::BookDeleted { id, .. } => *id,
        }
    }

    /// The failure carried by this response, if any
    pub fn error(&self) -> Option<&RemoteError> {
        match self {
            NetworkResponse::SignedUp { result, .. }
            | NetworkResponse::SignedOut { result, .. }
            | NetworkResponse::PasswordChanged { result, .. }
            | NetworkResponse::BookAdded { result, .. }
            | NetworkResponse::BookUpdated { result, .. }
            | NetworkResponse::BookDeleted { result, .. } => result.as_ref().err(),
            NetworkResponse::SignedIn { result, .. } | NetworkResponse::UserFetched { result, .. } => {
                result.as_ref().err()
            }
            NetworkResponse::BooksLoaded { result, .. } => result.as_ref().err(),
        }
    }
}
