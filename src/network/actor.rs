//! Network actor - runs remote calls in the Tokio runtime

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::NewBook;
use crate::network::backend::Backend;

/// Network actor that turns commands into backend calls
pub struct NetworkActor {
    backend: Arc<dyn Backend>,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(
        backend: Arc<dyn Backend>,
        response_tx: mpsc::UnboundedSender<NetworkResponse>,
    ) -> Self {
        NetworkActor {
            backend,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Shutdown) | None => {
                            self.active_requests.abort_all();
                            break;
                        }
                        Some(cmd) => {
                            let backend = Arc::clone(&self.backend);
                            let response_tx = self.response_tx.clone();
                            self.active_requests.spawn(async move {
                                let op = cmd.operation();
                                let Some(response) = execute(backend.as_ref(), cmd).await else {
                                    return;
                                };
                                let id = response.id();
                                match response.error() {
                                    Some(err) => tracing::warn!(id, op, error = %err, "Remote call failed"),
                                    None => tracing::info!(id, op, "Remote call completed"),
                                }
                                let _ = response_tx.send(response);
                            });
                        }
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }
}

/// Perform the backend call(s) for one command
pub async fn execute(backend: &dyn Backend, cmd: NetworkCommand) -> Option<NetworkResponse> {
    let response = match cmd {
        NetworkCommand::SignUp { id, email, password } => NetworkResponse::SignedUp {
            id,
            result: backend.sign_up(&email, &password).await,
        },
        NetworkCommand::SignIn { id, email, password } => NetworkResponse::SignedIn {
            id,
            result: backend.sign_in(&email, &password).await.map(|s| s.user),
        },
        NetworkCommand::SignOut { id } => NetworkResponse::SignedOut {
            id,
            result: backend.sign_out().await,
        },
        NetworkCommand::FetchUser { id } => NetworkResponse::UserFetched {
            id,
            result: backend.current_user().await,
        },
        NetworkCommand::ChangePassword { id, new_password } => {
            let result = match backend.current_user().await {
                Ok(_) => backend.change_password(&new_password).await,
                Err(e) => Err(e),
            };
            NetworkResponse::PasswordChanged { id, result }
        }
        NetworkCommand::LoadBooks { id } => NetworkResponse::BooksLoaded {
            id,
            result: backend.list_books().await,
        },
        NetworkCommand::AddBook { id, book } => {
            let result = match backend.current_user().await {
                Ok(user) => backend
                    .add_book(&NewBook {
                        book,
                        user_id: user.id,
                    })
                    .await
                    .map(|_| ()),
                Err(e) => Err(e),
            };
            NetworkResponse::BookAdded { id, result }
        }
        NetworkCommand::UpdateBook { id, book_id, book } => NetworkResponse::BookUpdated {
            id,
            result: backend.update_book(&book_id, &book).await.map(|_| ()),
        },
        NetworkCommand::DeleteBook { id, book_id } => NetworkResponse::BookDeleted {
            id,
            result: backend.delete_book(&book_id).await.map(|_| ()),
        },
        NetworkCommand::Shutdown => return None,
    };
    Some(response)
}
