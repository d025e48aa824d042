//! Port contracts for task persistence.

mod repository;

pub use repository::{
    PageRequest, TaskPage, TaskRepository, TaskRepositoryError, TaskRepositoryResult, TaskStats,
};
