//! Orchestration services for task operations.

mod crud;
mod seed;

pub use crud::{TaskService, TaskServiceError, TaskServiceResult};
pub use seed::seed_demo_tasks;
