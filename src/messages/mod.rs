//! Messages passed between the UI, App and Network actors.
//!
//! Key presses become [`UiEvent`]s, remote calls travel as
//! [`NetworkCommand`]/[`NetworkResponse`] pairs tagged with a request id, and
//! the App actor publishes a fresh [`RenderState`] after every change.

pub mod network;
pub mod render;
pub mod ui_events;

pub use network::{NetworkCommand, NetworkResponse};
pub use render::RenderState;
pub use ui_events::UiEvent;
