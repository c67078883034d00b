//! # Book Manager TUI
//!
//! A terminal client for a personal book collection stored in a hosted
//! backend (Supabase-compatible auth and table APIs).
//!
//! ## Features
//! - Sign up, sign in, sign out and password change
//! - Add, edit and delete books with inline validation
//! - Search by title or author, filter by category, order by title, author or year
//! - Self-dismissing error and success notices
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod app;
pub mod config;
pub mod constants;
pub mod messages;
pub mod models;
pub mod network;
pub mod schema;
pub mod ui;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use config::Settings;
pub use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use models::{Book, BookRecord, Category, User};
pub use network::{Backend, NetworkActor, RemoteError, SupabaseClient};
pub use schema::{FieldErrors, Schema};
