//! Task CRUD orchestration: validate, persist, emit metrics, log.

use crate::metrics::{MetricsSink, TagSet};
use crate::task::{
    domain::{StatusTransition, Task, TaskDraft, TaskId, TaskInput, ValidationErrors},
    ports::{PageRequest, TaskPage, TaskRepository, TaskRepositoryError, TaskStats},
};
use mockable::Clock;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

const METRIC_INDEX_VIEWS: &str = "tasks.index.views";
const METRIC_PAGE_LOAD_TIME: &str = "tasks.page.load_time";
const METRIC_TOTAL_COUNT: &str = "tasks.total.count";
const METRIC_CREATED: &str = "tasks.created";
const METRIC_UPDATED: &str = "tasks.updated";
const METRIC_COMPLETED: &str = "tasks.completed";
const METRIC_DELETED: &str = "tasks.deleted";
const METRIC_ERRORS: &str = "tasks.errors";

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Service-level errors for task operations.
#[derive(Debug, Clone, Error)]
pub enum TaskServiceError {
    /// Input validation failed; every failing field is enumerated.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// No task exists with the given identifier.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The store failed during the operation.
    #[error(transparent)]
    Store(TaskRepositoryError),
}

impl TaskServiceError {
    fn from_repository(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}

/// Task orchestration service.
///
/// The repository, clock, and metrics sink are injected capabilities; the
/// service never reaches for ambient globals.
#[derive(Clone)]
pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
    sink: Arc<dyn MetricsSink>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl TaskService {
    /// Creates a new task service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn TaskRepository>,
        sink: Arc<dyn MetricsSink>,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        Self {
            repository,
            sink,
            clock,
        }
    }

    /// Returns one page of tasks, newest first, and emits the list-page
    /// metrics: a view counter, a load-time histogram, and a total-count
    /// gauge.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Store`] when the page fetch fails.
    pub async fn list(&self, page_number: u32) -> TaskServiceResult<TaskPage> {
        let started = Instant::now();
        self.sink
            .increment(METRIC_INDEX_VIEWS, 1, TagSet::new().with("page", "index"));

        let page = self
            .repository
            .list_page(PageRequest::page(page_number))
            .await
            .map_err(TaskServiceError::from_repository)?;

        self.sink.histogram(
            METRIC_PAGE_LOAD_TIME,
            started.elapsed().as_secs_f64(),
            TagSet::new(),
        );
        // Gauge carries the total across all pages, not the page length.
        self.sink
            .gauge(METRIC_TOTAL_COUNT, page.total as f64, TagSet::new());

        tracing::info!(
            total = page.total,
            page = page.request.number(),
            "tasks index fetched"
        );
        Ok(page)
    }

    /// Validates input and stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] when input is invalid, or
    /// [`TaskServiceError::Store`] when persistence fails (counted once
    /// under `tasks.errors`).
    pub async fn create(&self, input: &TaskInput) -> TaskServiceResult<Task> {
        let draft = TaskDraft::validate(input)?;
        let task = Task::new(draft, self.clock.as_ref());

        if let Err(err) = self.repository.insert(&task).await {
            self.record_failure("create", None, &err);
            return Err(TaskServiceError::from_repository(err));
        }

        self.sink.increment(
            METRIC_CREATED,
            1,
            TagSet::new()
                .with("priority", task.priority().as_str())
                .with("status", task.status().as_str()),
        );
        tracing::info!(
            task_id = %task.id(),
            title = task.title(),
            priority = task.priority().as_str(),
            "task created"
        );
        Ok(task)
    }

    /// Fetches a single task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when no task has the given
    /// identifier.
    pub async fn fetch(&self, id: TaskId) -> TaskServiceResult<Task> {
        let task = self
            .repository
            .find_by_id(id)
            .await
            .map_err(TaskServiceError::from_repository)?
            .ok_or(TaskServiceError::NotFound(id))?;

        tracing::info!(task_id = %task.id(), "task viewed");
        Ok(task)
    }

    /// Validates input and replaces every mutable field of an existing task.
    ///
    /// Emits `tasks.updated` on success, plus `tasks.completed` when the
    /// status change is a genuine completion.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] for invalid input,
    /// [`TaskServiceError::NotFound`] for an unknown id, or
    /// [`TaskServiceError::Store`] when persistence fails (counted once
    /// under `tasks.errors`).
    pub async fn update(&self, id: TaskId, input: &TaskInput) -> TaskServiceResult<Task> {
        let draft = TaskDraft::validate(input)?;

        let mut task = self
            .repository
            .find_by_id(id)
            .await
            .map_err(TaskServiceError::from_repository)?
            .ok_or(TaskServiceError::NotFound(id))?;

        let transition = StatusTransition::new(task.status(), draft.status);
        task.apply(draft, self.clock.as_ref());

        if let Err(err) = self.repository.update(&task).await {
            self.record_failure("update", Some(id), &err);
            return Err(TaskServiceError::from_repository(err));
        }

        self.sink.increment(
            METRIC_UPDATED,
            1,
            TagSet::new()
                .with("old_status", transition.from().as_str())
                .with("new_status", transition.to().as_str())
                .with("priority", task.priority().as_str()),
        );
        if transition.completes_task() {
            self.sink.increment(
                METRIC_COMPLETED,
                1,
                TagSet::new()
                    .with("priority", task.priority().as_str())
                    .with("previous_status", transition.from().as_str()),
            );
        }

        tracing::info!(
            task_id = %task.id(),
            old_status = transition.from().as_str(),
            new_status = transition.to().as_str(),
            "task updated"
        );
        Ok(task)
    }

    /// Hard-deletes a task, tagging the deletion metric with the status and
    /// priority captured before the delete.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] for an unknown id, or
    /// [`TaskServiceError::Store`] when persistence fails (counted once
    /// under `tasks.errors`).
    pub async fn delete(&self, id: TaskId) -> TaskServiceResult<()> {
        let task = self
            .repository
            .find_by_id(id)
            .await
            .map_err(TaskServiceError::from_repository)?
            .ok_or(TaskServiceError::NotFound(id))?;

        let status = task.status();
        let priority = task.priority();

        if let Err(err) = self.repository.delete(id).await {
            // A concurrent delete surfacing NotFound here is not a store
            // failure.
            if !matches!(err, TaskRepositoryError::NotFound(_)) {
                self.record_failure("delete", Some(id), &err);
            }
            return Err(TaskServiceError::from_repository(err));
        }

        self.sink.increment(
            METRIC_DELETED,
            1,
            TagSet::new()
                .with("status", status.as_str())
                .with("priority", priority.as_str()),
        );
        tracing::info!(task_id = %id, "task deleted");
        Ok(())
    }

    /// Returns aggregate counts for the stats endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Store`] when the counts cannot be read.
    pub async fn stats(&self) -> TaskServiceResult<TaskStats> {
        let stats = self
            .repository
            .stats()
            .await
            .map_err(TaskServiceError::from_repository)?;

        tracing::info!(
            total = stats.total,
            completed = stats.completed,
            pending = stats.pending,
            high_priority = stats.high_priority,
            "task stats requested"
        );
        Ok(stats)
    }

    fn record_failure(&self, operation: &'static str, id: Option<TaskId>, err: &TaskRepositoryError) {
        self.sink.increment(
            METRIC_ERRORS,
            1,
            TagSet::new().with("operation", operation),
        );
        match id {
            Some(id) => {
                tracing::error!(operation, task_id = %id, error = %err, "task store operation failed");
            }
            None => tracing::error!(operation, error = %err, "task store operation failed"),
        }
    }
}
