//! Repository port for task persistence, listing, and aggregate counts.

use crate::task::domain::{Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Default page size for task listings.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// A one-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    number: u32,
    per_page: u32,
}

impl PageRequest {
    /// Creates a request for the given one-based page number with the
    /// default page size. Zero is clamped to the first page.
    #[must_use]
    pub const fn page(number: u32) -> Self {
        Self {
            number: if number == 0 { 1 } else { number },
            per_page: DEFAULT_PAGE_SIZE,
        }
    }

    /// Returns the one-based page number.
    #[must_use]
    pub const fn number(self) -> u32 {
        self.number
    }

    /// Returns the page size.
    #[must_use]
    pub const fn per_page(self) -> u32 {
        self.per_page
    }

    /// Returns the number of records to skip.
    #[must_use]
    pub const fn offset(self) -> u64 {
        (self.number as u64 - 1) * self.per_page as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::page(1)
    }
}

/// One page of tasks ordered by `created_at` descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPage {
    /// Tasks on this page, newest first.
    pub tasks: Vec<Task>,
    /// Total number of tasks across all pages.
    pub total: u64,
    /// The request that produced this page.
    pub request: PageRequest,
}

impl TaskPage {
    /// Returns the number of pages needed for the total, at least 1.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        let per_page = self.request.per_page() as u64;
        let pages = self.total.div_ceil(per_page);
        if pages == 0 { 1 } else { pages }
    }

    /// Returns `true` when a later page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        (self.request.number() as u64) < self.total_pages()
    }

    /// Returns `true` when an earlier page exists.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.request.number() > 1
    }
}

/// Aggregate task counts for the stats endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    /// All tasks.
    pub total: u64,
    /// Tasks with status `completed`.
    pub completed: u64,
    /// Tasks with status `pending`.
    pub pending: u64,
    /// Tasks with priority `high`.
    pub high_priority: u64,
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists a full-field replacement of an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Hard-deletes a task. The record is irrecoverable afterwards; there is
    /// no tombstone.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Returns one page of tasks ordered by `created_at` descending.
    async fn list_page(&self, request: PageRequest) -> TaskRepositoryResult<TaskPage>;

    /// Returns aggregate counts over all tasks.
    async fn stats(&self) -> TaskRepositoryResult<TaskStats>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
