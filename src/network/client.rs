//! HTTP client wrapper - talks to the hosted auth and table APIs
//!
//! Auth calls go to `/auth/v1`, book rows to `/rest/v1/<table>`. The session
//! lives only in memory for the lifetime of the client and is renewed with its
//! refresh token when the service stops accepting the access token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::sync::{Mutex, RwLock};

use crate::config::Settings;
use crate::models::{Book, BookRecord, NewBook, Session, User};
use crate::network::backend::Backend;
use crate::network::error::RemoteError;

/// Reqwest-backed implementation of [`Backend`]
pub struct SupabaseClient {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    table: String,
    session: RwLock<Option<Session>>,
    /// Serialises token refreshes; refresh tokens are single use
    refresh_lock: Mutex<()>,
}

impl SupabaseClient {
    pub fn new(settings: &Settings) -> Self {
        SupabaseClient {
            client: create_client(Duration::from_secs(settings.request_timeout_secs)),
            base_url: settings.url.trim_end_matches('/').to_string(),
            anon_key: settings.anon_key.clone(),
            table: settings.books_table.clone(),
            session: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    async fn access_token(&self) -> Option<String> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    /// Every call carries the project key; the bearer is the user's token when
    /// signed in and the project key otherwise.
    fn build_request(&self, method: Method, url: &str, token: Option<&str>) -> RequestBuilder {
        let bearer = token.unwrap_or(&self.anon_key);
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", bearer))
            .header(reqwest::header::ACCEPT, "application/json")
    }

    fn table_request(&self, method: Method, token: Option<&str>) -> RequestBuilder {
        self.build_request(method, &self.table_url(), token)
            .header("Prefer", "return=representation")
    }

    /// Send with the session's token. A 401/403 on a signed-in call triggers
    /// one session refresh and one retry with the new token.
    async fn send_authed<F>(&self, build: F) -> Result<Vec<u8>, RemoteError>
    where
        F: Fn(Option<&str>) -> RequestBuilder,
    {
        let token = self.access_token().await;
        let result = send(build(token.as_deref())).await;
        match result {
            Err(err) if err.is_unauthorized() => {
                let Some(stale) = token else {
                    return Err(err);
                };
                match self.refresh_session(&stale).await {
                    Some(fresh) => send(build(Some(&fresh))).await,
                    None => Err(err),
                }
            }
            other => other,
        }
    }

    /// Trade the refresh token for a new session. Returns the access token to
    /// retry with, or `None` when the session cannot be renewed.
    async fn refresh_session(&self, stale: &str) -> Option<String> {
        let _guard = self.refresh_lock.lock().await;
        let current = self.session.read().await.clone()?;
        if current.access_token != stale {
            // Another call already refreshed it
            return Some(current.access_token);
        }
        let refresh_token = current.refresh_token?;

        let req = self
            .build_request(Method::POST, &self.auth_url("token"), None)
            .query(&[("grant_type", "refresh_token")])
            .json(&json!({ "refresh_token": refresh_token }));
        match send_json::<Session>(req).await {
            Ok(session) => {
                tracing::info!(user_id = %session.user.id, "Session refreshed");
                let token = session.access_token.clone();
                *self.session.write().await = Some(session);
                Some(token)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Session refresh failed");
                if err.status().is_some() {
                    *self.session.write().await = None;
                }
                None
            }
        }
    }
}

#[async_trait]
impl Backend for SupabaseClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<(), RemoteError> {
        let req = self
            .build_request(Method::POST, &self.auth_url("signup"), None)
            .json(&json!({ "email": email, "password": password }));
        send_empty(req).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, RemoteError> {
        let req = self
            .build_request(Method::POST, &self.auth_url("token"), None)
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));
        let session: Session = send_json(req).await?;
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    /// A token the service no longer recognises counts as already signed out
    async fn sign_out(&self) -> Result<(), RemoteError> {
        let Some(token) = self.access_token().await else {
            return Ok(());
        };
        let req = self.build_request(Method::POST, &self.auth_url("logout"), Some(&token));
        match send_empty(req).await {
            Ok(()) => {}
            Err(err) if err.is_unauthorized() || err.status() == Some(404) => {
                tracing::info!(error = %err, "Session already ended on the server");
            }
            Err(err) => return Err(err),
        }
        *self.session.write().await = None;
        Ok(())
    }

    async fn current_user(&self) -> Result<User, RemoteError> {
        if self.access_token().await.is_none() {
            return Err(RemoteError::NotAuthenticated);
        }
        let url = self.auth_url("user");
        let body = self
            .send_authed(|token| self.build_request(Method::GET, &url, token))
            .await
            .map_err(|e| {
                if e.is_unauthorized() {
                    RemoteError::NotAuthenticated
                } else {
                    e
                }
            })?;
        decode(&body)
    }

    async fn change_password(&self, new_password: &str) -> Result<(), RemoteError> {
        if self.access_token().await.is_none() {
            return Err(RemoteError::NotAuthenticated);
        }
        let url = self.auth_url("user");
        let body = json!({ "password": new_password });
        self.send_authed(|token| self.build_request(Method::PUT, &url, token).json(&body))
            .await
            .map(|_| ())
    }

    async fn list_books(&self) -> Result<Vec<BookRecord>, RemoteError> {
        let body = self
            .send_authed(|token| self.table_request(Method::GET, token).query(&[("select", "*")]))
            .await?;
        decode(&body)
    }

    async fn add_book(&self, book: &NewBook) -> Result<Vec<BookRecord>, RemoteError> {
        let body = self
            .send_authed(|token| self.table_request(Method::POST, token).json(&[book]))
            .await?;
        decode(&body)
    }

    async fn update_book(&self, id: &str, book: &Book) -> Result<Vec<BookRecord>, RemoteError> {
        let filter = [("id", format!("eq.{}", id))];
        let body = self
            .send_authed(|token| {
                self.table_request(Method::PATCH, token)
                    .query(&filter)
                    .json(book)
            })
            .await?;
        decode(&body)
    }

    async fn delete_book(&self, id: &str) -> Result<Vec<BookRecord>, RemoteError> {
        let filter = [("id", format!("eq.{}", id))];
        let body = self
            .send_authed(|token| self.table_request(Method::DELETE, token).query(&filter))
            .await?;
        decode(&body)
    }
}

/// Send and return the raw body of a successful response
async fn send(req: RequestBuilder) -> Result<Vec<u8>, RemoteError> {
    let resp = req.send().await?;
    let status = resp.status();
    let body = resp.bytes().await?;
    if !status.is_success() {
        return Err(RemoteError::from_response(status, &body));
    }
    Ok(body.to_vec())
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, RemoteError> {
    serde_json::from_slice(body).map_err(|e| RemoteError::Decode(e.to_string()))
}

async fn send_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, RemoteError> {
    decode(&send(req).await?)
}

async fn send_empty(req: RequestBuilder) -> Result<(), RemoteError> {
    send(req).await.map(|_| ())
}

/// Create an HTTP client with the configured timeout
pub fn create_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(url: &str) -> Settings {
        Settings {
            url: url.to_string(),
            anon_key: "anon".to_string(),
            books_table: "books".to_string(),
            request_timeout_secs: 5,
        }
    }

    #[test]
    fn test_urls_ignore_trailing_slash() {
        let client = SupabaseClient::new(&settings("https://demo.supabase.co/"));
        assert_eq!(client.auth_url("user"), "https://demo.supabase.co/auth/v1/user");
        assert_eq!(client.table_url(), "https://demo.supabase.co/rest/v1/books");
    }

    #[tokio::test]
    async fn test_session_required_for_user_calls() {
        let client = SupabaseClient::new(&settings("http://127.0.0.1:9"));
        assert_eq!(
            client.current_user().await,
            Err(RemoteError::NotAuthenticated)
        );
        assert_eq!(
            client.change_password("secret1").await,
            Err(RemoteError::NotAuthenticated)
        );
    }

    #[tokio::test]
    async fn test_sign_out_without_session_is_a_no_op() {
        let client = SupabaseClient::new(&settings("http://127.0.0.1:9"));
        assert_eq!(client.sign_out().await, Ok(()));
    }
}
