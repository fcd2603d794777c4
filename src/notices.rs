//! Notices
//!
//! User-facing messages surfaced on the next rendered storefront page.

use smallvec::SmallVec;

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Operation failed.
    Error,

    /// Operation succeeded.
    Success,

    /// Informational.
    Notice,
}

/// A single user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub kind: NoticeKind,

    /// Message text
    pub message: String,
}

/// Host notice channel.
pub trait Notices {
    /// Queue a notice for display.
    fn add_notice(&mut self, notice: Notice);

    /// Queue an error notice for display.
    fn add_error_notice(&mut self, message: &str) {
        self.add_notice(Notice {
            kind: NoticeKind::Error,
            message: message.to_string(),
        });
    }
}

/// Notice queue kept in memory until the host renders it.
#[derive(Debug, Clone, Default)]
pub struct NoticeLog {
    notices: SmallVec<[Notice; 4]>,
}

impl NoticeLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All queued notices in insertion order.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Messages of queued error notices.
    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.notices
            .iter()
            .filter(|notice| notice.kind == NoticeKind::Error)
            .map(|notice| notice.message.as_str())
    }

    /// Remove and return every queued notice.
    pub fn take(&mut self) -> SmallVec<[Notice; 4]> {
        std::mem::take(&mut self.notices)
    }

    /// Number of queued notices.
    pub fn len(&self) -> usize {
        self.notices.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

impl Notices for NoticeLog {
    fn add_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_notice_is_queued_as_error() {
        let mut log = NoticeLog::new();

        log.add_error_notice("nope");

        assert_eq!(log.errors().collect::<Vec<_>>(), ["nope"]);
    }

    #[test]
    fn errors_skip_other_kinds() {
        let mut log = NoticeLog::new();

        log.add_notice(Notice {
            kind: NoticeKind::Success,
            message: "added".to_string(),
        });
        log.add_error_notice("failed");

        assert_eq!(log.len(), 2);
        assert_eq!(log.errors().count(), 1);
    }

    #[test]
    fn take_drains_the_log() {
        let mut log = NoticeLog::new();
        log.add_error_notice("once");

        let taken = log.take();

        assert_eq!(taken.len(), 1);
        assert!(log.is_empty());
    }
}
