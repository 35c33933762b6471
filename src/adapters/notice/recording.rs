//! A notice sink that keeps every notice, for tests and UI polling.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::ports::{Notice, NoticeLevel, NoticeSink};

#[derive(Debug, Clone, Default)]
pub struct RecordingNoticeSink {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNoticeSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<Notice>> {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.guard().clone()
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.guard())
    }

    pub fn count(&self, level: NoticeLevel) -> usize {
        self.guard().iter().filter(|n| n.level == level).count()
    }

    /// Notices whose message contains `needle`.
    pub fn matching(&self, needle: &str) -> Vec<Notice> {
        self.guard()
            .iter()
            .filter(|n| n.message.contains(needle))
            .cloned()
            .collect()
    }
}

impl NoticeSink for RecordingNoticeSink {
    fn notify(&self, notice: Notice) {
        self.guard().push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order_and_drains() {
        let sink = RecordingNoticeSink::new();
        sink.notify(Notice::info("first"));
        sink.notify(Notice::success("second"));

        assert_eq!(sink.count(NoticeLevel::Info), 1);
        assert_eq!(sink.matching("sec").len(), 1);

        let drained = sink.drain();
        assert_eq!(drained[0].message, "first");
        assert_eq!(drained[1].level, NoticeLevel::Success);
        assert!(sink.notices().is_empty());
    }

    #[test]
    fn clones_share_history() {
        let sink = RecordingNoticeSink::new();
        let clone = sink.clone();
        clone.notify(Notice::warning("shared"));
        assert_eq!(sink.notices().len(), 1);
    }
}
