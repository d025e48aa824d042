//! Thread-safe in-memory task repository.
//!
//! Backs the test suite and serves as the zero-configuration store when no
//! `DATABASE_URL` is present.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Task, TaskId, TaskPriority, TaskStatus},
    ports::{
        PageRequest, TaskPage, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
        TaskStats,
    },
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl ToString) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Newest first; identifier breaks ties so same-instant rows order stably.
fn sort_newest_first(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| b.id().into_inner().cmp(&a.id().into_inner()))
    });
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if !state.contains_key(&task.id()) {
            return Err(TaskRepositoryError::NotFound(task.id()));
        }
        state.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.get(&id).cloned())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskRepositoryError::NotFound(id))
    }

    async fn list_page(&self, request: PageRequest) -> TaskRepositoryResult<TaskPage> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let total = state.len() as u64;

        let mut tasks: Vec<Task> = state.values().cloned().collect();
        sort_newest_first(&mut tasks);

        let tasks = tasks
            .into_iter()
            .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
            .take(request.per_page() as usize)
            .collect();

        Ok(TaskPage {
            tasks,
            total,
            request,
        })
    }

    async fn stats(&self) -> TaskRepositoryResult<TaskStats> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut stats = TaskStats {
            total: state.len() as u64,
            ..TaskStats::default()
        };

        for task in state.values() {
            match task.status() {
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::InProgress => {}
            }
            if task.priority() == TaskPriority::High {
                stats.high_priority += 1;
            }
        }

        Ok(stats)
    }
}
