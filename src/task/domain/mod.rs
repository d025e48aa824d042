//! Domain types for the task aggregate.

mod draft;
mod error;
mod ids;
mod task;
mod transition;

pub use draft::{TaskDraft, TaskInput};
pub use error::{
    ParseTaskPriorityError, ParseTaskStatusError, ValidationError, ValidationErrors,
};
pub use ids::TaskId;
pub use task::{PersistedTaskData, Task, TaskPriority, TaskStatus};
pub use transition::StatusTransition;
