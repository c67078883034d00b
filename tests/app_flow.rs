//! End-to-end flows through the App and Network actors against an in-memory
//! backend

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use bookshelf_tui::app::state::{Dialog, Screen};
use bookshelf_tui::constants::{BOOK_ADDED, BOOK_DELETED, EMPTY_COLLECTION, NOTICE_TIMEOUT};
use bookshelf_tui::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use bookshelf_tui::models::{Book, BookRecord, Category, NewBook, Session, User};
use bookshelf_tui::network::{Backend, NetworkActor, RemoteError};
use bookshelf_tui::AppActor;

const PASSWORD: &str = "secret1";

#[derive(Default)]
struct Store {
    user: Option<User>,
    books: Vec<BookRecord>,
    next_id: u32,
    calls: Vec<&'static str>,
}

/// Single-user stand-in for the hosted auth service and book table
#[derive(Default)]
struct FakeBackend {
    store: Mutex<Store>,
}

impl FakeBackend {
    fn with_books(books: Vec<BookRecord>) -> Self {
        let backend = FakeBackend::default();
        backend.store.lock().unwrap().books = books;
        backend
    }

    fn record(&self, call: &'static str) {
        self.store.lock().unwrap().calls.push(call);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.store.lock().unwrap().calls.clone()
    }
}

fn reader() -> User {
    User {
        id: "u1".into(),
        email: Some("reader@example.com".into()),
    }
}

fn record(id: &str, title: &str, author: &str, year: i32, category: Category) -> BookRecord {
    BookRecord {
        id: id.into(),
        title: title.into(),
        author: author.into(),
        year,
        category,
        user_id: "u1".into(),
        created_at: "2024-01-01T00:00:00Z".into(),
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn sign_up(&self, _email: &str, _password: &str) -> Result<(), RemoteError> {
        self.record("sign_up");
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, RemoteError> {
        self.record("sign_in");
        if email != "reader@example.com" || password != PASSWORD {
            return Err(RemoteError::Backend {
                status: 400,
                message: "Invalid login credentials".into(),
            });
        }
        self.store.lock().unwrap().user = Some(reader());
        Ok(Session {
            access_token: "token".into(),
            refresh_token: None,
            user: reader(),
        })
    }

    async fn sign_out(&self) -> Result<(), RemoteError> {
        self.record("sign_out");
        self.store.lock().unwrap().user = None;
        Ok(())
    }

    async fn current_user(&self) -> Result<User, RemoteError> {
        self.record("current_user");
        self.store
            .lock()
            .unwrap()
            .user
            .clone()
            .ok_or(RemoteError::NotAuthenticated)
    }

    async fn change_password(&self, _new_password: &str) -> Result<(), RemoteError> {
        self.record("change_password");
        Ok(())
    }

    async fn list_books(&self) -> Result<Vec<BookRecord>, RemoteError> {
        self.record("list_books");
        Ok(self.store.lock().unwrap().books.clone())
    }

    async fn add_book(&self, book: &NewBook) -> Result<Vec<BookRecord>, RemoteError> {
        self.record("add_book");
        let mut store = self.store.lock().unwrap();
        store.next_id += 1;
        let row = BookRecord {
            id: format!("new-{}", store.next_id),
            title: book.book.title.clone(),
            author: book.book.author.clone(),
            year: book.book.year,
            category: book.book.category,
            user_id: book.user_id.clone(),
            created_at: String::new(),
        };
        store.books.push(row.clone());
        Ok(vec![row])
    }

    async fn update_book(&self, id: &str, book: &Book) -> Result<Vec<BookRecord>, RemoteError> {
        self.record("update_book");
        let mut store = self.store.lock().unwrap();
        let mut updated = Vec::new();
        for row in store.books.iter_mut().filter(|row| row.id == id) {
            row.title = book.title.clone();
            row.author = book.author.clone();
            row.year = book.year;
            row.category = book.category;
            updated.push(row.clone());
        }
        Ok(updated)
    }

    async fn delete_book(&self, id: &str) -> Result<Vec<BookRecord>, RemoteError> {
        self.record("delete_book");
        let mut store = self.store.lock().unwrap();
        let (removed, kept) = store.books.drain(..).partition(|row| row.id == id);
        store.books = kept;
        Ok(removed)
    }
}

struct Harness {
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: mpsc::UnboundedReceiver<RenderState>,
    backend: Arc<FakeBackend>,
    app: JoinHandle<()>,
    network: JoinHandle<()>,
}

impl Harness {
    fn start(backend: FakeBackend) -> Self {
        let backend = Arc::new(backend);
        let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
        let (render_tx, render_rx) = mpsc::unbounded_channel::<RenderState>();

        let network = tokio::spawn(NetworkActor::new(backend.clone(), resp_tx).run(cmd_rx));
        let app = tokio::spawn(AppActor::new(cmd_tx, render_tx).run(ui_rx, resp_rx));

        Harness {
            ui_tx,
            render_rx,
            backend,
            app,
            network,
        }
    }

    fn send(&self, event: UiEvent) {
        self.ui_tx.send(event).unwrap();
    }

    fn type_text(&self, text: &str) {
        for c in text.chars() {
            self.send(UiEvent::CharInput(c));
        }
    }

    /// Next published state satisfying `pred`
    async fn wait_for(&mut self, pred: impl Fn(&RenderState) -> bool) -> RenderState {
        tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                let state = self.render_rx.recv().await.expect("app actor stopped");
                if pred(&state) {
                    return state;
                }
            }
        })
        .await
        .expect("timed out waiting for render state")
    }

    async fn sign_in(&mut self, password: &str) -> RenderState {
        self.wait_for(|s| s.screen == Screen::Auth).await;
        self.type_text("reader@example.com");
        self.send(UiEvent::NextField);
        self.type_text(password);
        self.send(UiEvent::Submit);
        self.wait_for(|s| s.screen == Screen::Library && !s.library.loading)
            .await
    }
}

#[tokio::test]
async fn test_sign_in_loads_collection() {
    let mut harness = Harness::start(FakeBackend::with_books(vec![
        record("1", "Dune", "Herbert", 1965, Category::ScienceFiction),
        record("2", "Emma", "Austen", 1815, Category::Fiction),
    ]));

    let state = harness.sign_in(PASSWORD).await;
    let titles: Vec<_> = state.library.books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["Dune", "Emma"]);
    assert_eq!(state.user_email.as_deref(), Some("reader@example.com"));
    assert_eq!(
        harness.backend.calls(),
        ["current_user", "sign_in", "list_books"]
    );
}

#[tokio::test]
async fn test_invalid_sign_in_never_reaches_backend() {
    let mut harness = Harness::start(FakeBackend::default());
    harness.wait_for(|s| s.screen == Screen::Auth).await;

    harness.type_text("not an email");
    harness.send(UiEvent::Submit);
    let state = harness
        .wait_for(|s| s.auth_form.fields.iter().any(|f| f.error.is_some()))
        .await;

    let errors: Vec<_> = state
        .auth_form
        .fields
        .iter()
        .filter_map(|f| f.error.as_deref())
        .collect();
    assert_eq!(errors, ["Invalid email", "Password is required"]);
    assert_eq!(harness.backend.calls(), ["current_user"]);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_sign_in_message_clears_after_timeout() {
    let mut harness = Harness::start(FakeBackend::default());
    harness.wait_for(|s| s.screen == Screen::Auth).await;
    harness.type_text("reader@example.com");
    harness.send(UiEvent::NextField);
    harness.type_text("wrong-password");
    harness.send(UiEvent::Submit);

    let shown = harness
        .wait_for(|s| s.auth_form.general_error.is_some())
        .await;
    let shown_at = tokio::time::Instant::now();
    assert_eq!(
        shown.auth_form.general_error.as_deref(),
        Some("Invalid login credentials")
    );
    assert_eq!(shown.auth_form.submit_label, "Sign In");

    harness
        .wait_for(|s| s.auth_form.general_error.is_none())
        .await;
    assert!(shown_at.elapsed() >= NOTICE_TIMEOUT);
}

#[tokio::test]
async fn test_add_book_then_list_reloads() {
    let mut harness = Harness::start(FakeBackend::default());
    let state = harness.sign_in(PASSWORD).await;
    assert_eq!(state.library.empty_message, Some(EMPTY_COLLECTION));

    harness.send(UiEvent::AddBook);
    harness.wait_for(|s| s.dialog == Dialog::Book).await;
    harness.type_text("Dune");
    harness.send(UiEvent::NextField);
    harness.type_text("Frank Herbert");
    harness.send(UiEvent::NextField);
    for _ in 0..4 {
        harness.send(UiEvent::Backspace);
    }
    harness.type_text("1965");
    harness.send(UiEvent::NextField);
    harness.send(UiEvent::CursorRight);
    harness.send(UiEvent::Submit);

    let state = harness
        .wait_for(|s| !s.library.books.is_empty() && !s.library.loading)
        .await;
    assert_eq!(state.dialog, Dialog::None);
    assert_eq!(state.library.success.as_deref(), Some(BOOK_ADDED));
    assert_eq!(state.library.books[0].title, "Dune");
    assert_eq!(state.library.books[0].category, Category::Fiction);

    let calls = harness.backend.calls();
    assert_eq!(&calls[calls.len() - 3..], ["current_user", "add_book", "list_books"]);
}

#[tokio::test]
async fn test_delete_needs_confirmation() {
    let mut harness = Harness::start(FakeBackend::with_books(vec![record(
        "1",
        "Dune",
        "Herbert",
        1965,
        Category::ScienceFiction,
    )]));
    harness.sign_in(PASSWORD).await;

    harness.send(UiEvent::DeleteBook);
    harness.wait_for(|s| s.dialog == Dialog::ConfirmDelete).await;
    harness.send(UiEvent::CloseDialog);
    harness.wait_for(|s| s.dialog == Dialog::None).await;
    assert!(!harness.backend.calls().contains(&"delete_book"));

    harness.send(UiEvent::DeleteBook);
    harness.wait_for(|s| s.dialog == Dialog::ConfirmDelete).await;
    harness.send(UiEvent::Submit);

    let state = harness
        .wait_for(|s| s.library.success.as_deref() == Some(BOOK_DELETED) && !s.library.loading)
        .await;
    assert!(state.library.books.is_empty());
    assert_eq!(state.library.empty_message, Some(EMPTY_COLLECTION));
}

#[tokio::test]
async fn test_sign_out_returns_to_auth_and_quit_stops_actors() {
    let mut harness = Harness::start(FakeBackend::default());
    harness.sign_in(PASSWORD).await;

    harness.send(UiEvent::SignOut);
    let state = harness.wait_for(|s| s.screen == Screen::Auth).await;
    assert_eq!(state.user_email, None);

    harness.send(UiEvent::Quit);
    let Harness { app, network, .. } = harness;
    app.await.unwrap();
    network.await.unwrap();
}
