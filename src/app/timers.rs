//! Notice dismissal timers owned by the App actor

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::app::notice::{NoticeSlot, TimerRequest};

/// Sent back to the App actor when a notice's delay has elapsed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoticeExpired {
    pub slot: NoticeSlot,
    pub generation: u64,
}

/// One pending dismissal per slot. Rescheduling a slot aborts its previous
/// timer, and dropping `Timers` aborts everything still pending.
pub struct Timers {
    delay: Duration,
    expired_tx: mpsc::UnboundedSender<NoticeExpired>,
    handles: HashMap<NoticeSlot, JoinHandle<()>>,
}

impl Timers {
    pub fn new(delay: Duration, expired_tx: mpsc::UnboundedSender<NoticeExpired>) -> Self {
        Timers {
            delay,
            expired_tx,
            handles: HashMap::new(),
        }
    }

    pub fn apply(&mut self, request: TimerRequest) {
        match request {
            TimerRequest::Schedule { slot, generation } => self.schedule(slot, generation),
            TimerRequest::Cancel(slot) => self.cancel(slot),
        }
    }

    pub fn schedule(&mut self, slot: NoticeSlot, generation: u64) {
        self.cancel(slot);
        let tx = self.expired_tx.clone();
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(NoticeExpired { slot, generation });
        });
        self.handles.insert(slot, handle);
    }

    pub fn cancel(&mut self, slot: NoticeSlot) {
        if let Some(handle) = self.handles.remove(&slot) {
            handle.abort();
        }
    }

    pub fn pending(&self) -> usize {
        self.handles.values().filter(|h| !h.is_finished()).count()
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NOTICE_TIMEOUT;

    #[tokio::test(start_paused = true)]
    async fn fires_after_delay_and_not_before() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = Timers::new(NOTICE_TIMEOUT, tx);
        timers.schedule(NoticeSlot::LibrarySuccess, 1);

        tokio::time::sleep(NOTICE_TIMEOUT - Duration::from_millis(1)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(
            rx.try_recv().unwrap(),
            NoticeExpired {
                slot: NoticeSlot::LibrarySuccess,
                generation: 1
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_replaces_previous_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = Timers::new(NOTICE_TIMEOUT, tx);
        timers.schedule(NoticeSlot::SignInError, 1);
        tokio::time::sleep(Duration::from_secs(2)).await;
        timers.schedule(NoticeSlot::SignInError, 2);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(rx.try_recv().is_err(), "first timer must be aborted");

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(rx.try_recv().unwrap().generation, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_timers_cancels_pending_dismissals() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = Timers::new(NOTICE_TIMEOUT, tx.clone());
        timers.schedule(NoticeSlot::LibraryError, 1);
        assert_eq!(timers.pending(), 1);
        drop(timers);

        tokio::time::sleep(NOTICE_TIMEOUT * 2).await;
        assert!(rx.try_recv().is_err());
        drop(tx);
    }
}
