//! Remote failure taxonomy
//!
//! Every remote-access call reports failure as a [`RemoteError`] whose
//! display text is what the user sees as the general error.

use reqwest::StatusCode;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RemoteError {
    /// The service rejected the call and said why
    #[error("{message}")]
    Backend { status: u16, message: String },

    /// An operation that needs a session found none
    #[error("User not authenticated")]
    NotAuthenticated,

    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    /// Failure response without any readable message
    #[error("Request failed with status {status}")]
    Unrecognized { status: u16 },
}

impl RemoteError {
    /// Text for the general error slot: the backend's message verbatim, or the
    /// caller's fallback when the failure carried nothing readable.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            RemoteError::Unrecognized { .. } => fallback.to_string(),
            RemoteError::Backend { message, .. } if message.trim().is_empty() => {
                fallback.to_string()
            }
            other => other.to_string(),
        }
    }

    /// Map a non-success response body onto an error.
    ///
    /// The auth API reports `msg` or `error_description`, the table API
    /// reports `message`; older deployments only send `error`.
    pub fn from_response(status: StatusCode, body: &[u8]) -> RemoteError {
        let message = serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|value| extract_message(&value));

        match message {
            Some(message) => RemoteError::Backend {
                status: status.as_u16(),
                message,
            },
            None => RemoteError::Unrecognized {
                status: status.as_u16(),
            },
        }
    }

    /// HTTP status of a failure the service answered
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Backend { status, .. } | RemoteError::Unrecognized { status } => {
                Some(*status)
            }
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, RemoteError::NotAuthenticated) || matches!(self.status(), Some(401 | 403))
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RemoteError::Timeout
        } else if e.is_decode() {
            RemoteError::Decode(e.to_string())
        } else {
            RemoteError::Transport(e.to_string())
        }
    }
}

fn extract_message(value: &Value) -> Option<String> {
    ["msg", "message", "error_description", "error"]
        .iter()
        .filter_map(|key| value.get(*key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::auth_msg(r#"{"code":400,"msg":"Invalid login credentials"}"#, "Invalid login credentials")]
    #[case::table_message(r#"{"code":"42501","message":"permission denied for table books"}"#, "permission denied for table books")]
    #[case::oauth_style(r#"{"error":"invalid_grant","error_description":"Email not confirmed"}"#, "Email not confirmed")]
    #[case::bare_error(r#"{"error":"rate limited"}"#, "rate limited")]
    fn backend_message_is_taken_verbatim(#[case] body: &str, #[case] expected: &str) {
        let error = RemoteError::from_response(StatusCode::BAD_REQUEST, body.as_bytes());
        assert_eq!(error.user_message("fallback"), expected);
    }

    #[rstest]
    #[case::html(b"<html>bad gateway</html>".as_slice())]
    #[case::empty(b"".as_slice())]
    #[case::no_known_key(br#"{"detail": 5}"#.as_slice())]
    #[case::blank_message(br#"{"message": "   "}"#.as_slice())]
    fn unreadable_failures_use_fallback(#[case] body: &[u8]) {
        let error = RemoteError::from_response(StatusCode::BAD_GATEWAY, body);
        assert_eq!(error, RemoteError::Unrecognized { status: 502 });
        assert_eq!(error.user_message("Try again"), "Try again");
    }

    #[test]
    fn not_authenticated_has_fixed_text() {
        assert_eq!(
            RemoteError::NotAuthenticated.user_message("ignored"),
            "User not authenticated"
        );
        assert!(RemoteError::NotAuthenticated.is_unauthorized());
    }

    #[rstest]
    #[case::expired_jwt(RemoteError::Backend { status: 401, message: "JWT expired".into() }, true)]
    #[case::forbidden_without_body(RemoteError::Unrecognized { status: 403 }, true)]
    #[case::bad_request(RemoteError::Backend { status: 400, message: "nope".into() }, false)]
    #[case::transport(RemoteError::Transport("reset".into()), false)]
    fn unauthorized_covers_401_and_403(#[case] error: RemoteError, #[case] expected: bool) {
        assert_eq!(error.is_unauthorized(), expected);
    }
}
