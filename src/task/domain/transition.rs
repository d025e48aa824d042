//! Status transition inspection.

use super::TaskStatus;

/// A status change produced by a full-field update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    from: TaskStatus,
    to: TaskStatus,
}

impl StatusTransition {
    /// Creates a transition from the stored status to the submitted one.
    #[must_use]
    pub const fn new(from: TaskStatus, to: TaskStatus) -> Self {
        Self { from, to }
    }

    /// Returns the status before the update.
    #[must_use]
    pub const fn from(self) -> TaskStatus {
        self.from
    }

    /// Returns the status after the update.
    #[must_use]
    pub const fn to(self) -> TaskStatus {
        self.to
    }

    /// Returns `true` when this update moves a task into `completed` from a
    /// non-completed status.
    ///
    /// `completed -> completed` and `completed -> anything` are not flagged;
    /// only a genuine completion counts.
    #[must_use]
    pub const fn completes_task(self) -> bool {
        matches!(self.to, TaskStatus::Completed) && !matches!(self.from, TaskStatus::Completed)
    }
}
