//! Notification capability used by the post manager.

use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub description: String,
}

impl Notice {
    pub fn success(message: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
            description: description.into(),
        }
    }

    pub fn error(message: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
            description: description.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn report(&self, notice: Notice);
}

/// Buffers notices until the next response drains them.
#[derive(Debug, Default)]
pub struct NoticeOutbox {
    pending: Mutex<Vec<Notice>>,
}

impl NoticeOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notice> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl Notifier for NoticeOutbox {
    fn report(&self, notice: Notice) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outbox_drains_in_report_order() {
        let outbox = NoticeOutbox::new();
        outbox.report(Notice::success("one", ""));
        outbox.report(Notice::error("two", ""));

        let drained = outbox.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].message, "one");
        assert_eq!(drained[1].kind, NoticeKind::Error);
        assert!(outbox.is_empty());
    }
}
