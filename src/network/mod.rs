//! Network layer - remote auth and book-store calls
//!
//! The Network actor receives commands from the App layer, runs them against
//! a [`Backend`] and sends back responses.

pub mod actor;
pub mod backend;
pub mod client;
pub mod error;

pub use actor::NetworkActor;
pub use backend::Backend;
pub use client::SupabaseClient;
pub use error::RemoteError;
