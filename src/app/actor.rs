//! App actor - message loop processing UI events, network responses and
//! notice expiries

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::app::timers::{NoticeExpired, Timers};
use crate::constants::NOTICE_TIMEOUT;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// App actor that owns the state and the notice timers
pub struct AppActor {
    state: AppState,
    timers: Timers,
    expired_rx: mpsc::UnboundedReceiver<NoticeExpired>,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        let (expired_tx, expired_rx) = mpsc::unbounded_channel();
        AppActor {
            state: AppState::new(),
            timers: Timers::new(NOTICE_TIMEOUT, expired_tx),
            expired_rx,
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        let startup = self.state.start();
        self.send(Some(startup));
        self.publish();

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    self.publish();
                }
                Some(response) = net_rx.recv() => {
                    let follow_up = self.state.handle_response(response);
                    self.send(follow_up);
                    self.publish();
                }
                Some(expired) = self.expired_rx.recv() => {
                    if self.state.expire_notice(expired.slot, expired.generation) {
                        self.publish();
                    }
                }
                else => break,
            }
        }
        // Dropping `timers` here aborts every pending dismissal
    }

    fn send(&self, cmd: Option<NetworkCommand>) {
        if let Some(cmd) = cmd {
            tracing::debug!(op = cmd.operation(), "Dispatching command");
            let _ = self.network_tx.send(cmd);
        }
    }

    /// Apply queued timer work, then hand the UI a new snapshot
    fn publish(&mut self) {
        for request in self.state.take_timer_requests() {
            self.timers.apply(request);
        }
        let _ = self.render_tx.send(self.state.to_render_state());
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        let cmd = match event {
            // Form editing
            UiEvent::NextField => {
                self.state.next_field();
                None
            }
            UiEvent::PrevField => {
                self.state.prev_field();
                None
            }
            UiEvent::CharInput(c) => {
                self.state.enter_char(c);
                None
            }
            UiEvent::Backspace => {
                self.state.delete_char();
                None
            }
            UiEvent::CursorLeft => {
                self.state.move_cursor_left();
                None
            }
            UiEvent::CursorRight => {
                self.state.move_cursor_right();
                None
            }
            UiEvent::Submit => self.state.submit(),

            UiEvent::SwitchAuthTab => {
                self.state.switch_auth_tab();
                None
            }

            // Library
            UiEvent::StartSearch => {
                self.state.start_search();
                None
            }
            UiEvent::StopSearch => {
                self.state.stop_search();
                None
            }
            UiEvent::CycleFilter { forward } => {
                self.state.cycle_filter(forward);
                None
            }
            UiEvent::CycleSort => {
                self.state.cycle_sort();
                None
            }
            UiEvent::SelectNext => {
                self.state.select_next();
                None
            }
            UiEvent::SelectPrev => {
                self.state.select_prev();
                None
            }
            UiEvent::Reload => self.state.reload(),
            UiEvent::AddBook => {
                self.state.open_add_book();
                None
            }
            UiEvent::EditBook => {
                self.state.open_edit_book();
                None
            }
            UiEvent::DeleteBook => {
                self.state.request_delete();
                None
            }
            UiEvent::ChangePassword => {
                self.state.open_change_password();
                None
            }
            UiEvent::SignOut => self.state.sign_out(),

            // Popups
            UiEvent::CloseDialog => {
                self.state.close_dialog();
                None
            }
            UiEvent::ToggleHelp => {
                self.state.toggle_help();
                None
            }

            UiEvent::Quit => return true,
        };

        self.send(cmd);
        false
    }
}
