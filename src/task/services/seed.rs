//! Demo data for local development.

use crate::task::{
    domain::{Task, TaskDraft, TaskPriority, TaskStatus},
    ports::{TaskRepository, TaskRepositoryResult},
};
use chrono::Duration;
use mockable::Clock;

struct DemoTask {
    title: &'static str,
    description: &'static str,
    status: TaskStatus,
    priority: TaskPriority,
    due_in_days: i64,
}

const DEMO_TASKS: [DemoTask; 5] = [
    DemoTask {
        title: "Set up Datadog monitoring dashboard",
        description: "Configure custom metrics and alerts for application performance monitoring.",
        status: TaskStatus::Completed,
        priority: TaskPriority::High,
        due_in_days: -1,
    },
    DemoTask {
        title: "Implement user authentication system",
        description: "Add login, registration, and password reset functionality.",
        status: TaskStatus::InProgress,
        priority: TaskPriority::High,
        due_in_days: 5,
    },
    DemoTask {
        title: "Write API documentation",
        description: "Document all API endpoints with examples and response formats.",
        status: TaskStatus::Pending,
        priority: TaskPriority::Medium,
        due_in_days: 10,
    },
    DemoTask {
        title: "Optimize database queries",
        description: "Review and optimize slow database queries identified by monitoring tools.",
        status: TaskStatus::Pending,
        priority: TaskPriority::Medium,
        due_in_days: 7,
    },
    DemoTask {
        title: "Deploy to production environment",
        description: "Configure production deployment pipeline and deploy the application.",
        status: TaskStatus::Pending,
        priority: TaskPriority::High,
        due_in_days: 3,
    },
];

/// Inserts a fixed set of demo tasks.
///
/// Intended for local development against an empty store; duplicate titles
/// across repeated runs are harmless because every task gets a fresh id.
///
/// # Errors
///
/// Returns the first repository error encountered.
pub async fn seed_demo_tasks<C>(
    repository: &dyn TaskRepository,
    clock: &C,
) -> TaskRepositoryResult<usize>
where
    C: Clock + ?Sized,
{
    let now = clock.utc();
    for demo in &DEMO_TASKS {
        let task = Task::new(
            TaskDraft {
                title: demo.title.to_owned(),
                description: Some(demo.description.to_owned()),
                status: demo.status,
                priority: demo.priority,
                due_date: Some(now + Duration::days(demo.due_in_days)),
            },
            clock,
        );
        repository.insert(&task).await?;
    }

    tracing::info!(count = DEMO_TASKS.len(), "seeded demo tasks");
    Ok(DEMO_TASKS.len())
}
