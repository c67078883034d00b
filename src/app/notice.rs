//! Self-clearing message slots (general errors and success banners)

/// Every place a timed message can appear
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoticeSlot {
    SignInError,
    SignUpError,
    SignUpSuccess,
    ChangePasswordError,
    BookFormError,
    LibrarySuccess,
    LibraryError,
}

/// A message that expires after [`crate::constants::NOTICE_TIMEOUT`].
///
/// The generation counter ties a scheduled dismissal to the message it was
/// scheduled for; a newer message (or an explicit clear) invalidates it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Notice {
    message: Option<String>,
    generation: u64,
}

impl Notice {
    /// Show a message, returning the generation to schedule its expiry with
    pub fn set(&mut self, message: impl Into<String>) -> u64 {
        self.generation += 1;
        self.message = Some(message.into());
        self.generation
    }

    pub fn clear(&mut self) {
        self.generation += 1;
        self.message = None;
    }

    /// Clear only if `generation` still names the current message
    pub fn expire(&mut self, generation: u64) -> bool {
        if self.generation == generation && self.message.is_some() {
            self.message = None;
            true
        } else {
            false
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Timer bookkeeping requested by state changes, drained by the App actor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerRequest {
    Schedule { slot: NoticeSlot, generation: u64 },
    Cancel(NoticeSlot),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_expiry_does_not_clear_newer_message() {
        let mut notice = Notice::default();
        let first = notice.set("Book added successfully");
        let second = notice.set("Book deleted successfully");

        assert!(!notice.expire(first));
        assert_eq!(notice.message(), Some("Book deleted successfully"));
        assert!(notice.expire(second));
        assert_eq!(notice.message(), None);
    }

    #[test]
    fn clear_invalidates_pending_expiry() {
        let mut notice = Notice::default();
        let generation = notice.set("boom");
        notice.clear();
        notice.set("again");
        assert!(!notice.expire(generation));
        assert_eq!(notice.message(), Some("again"));
    }
}
