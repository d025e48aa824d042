//! In-memory repository tests: ordering, pagination, and error mapping.

use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{PersistedTaskData, Task, TaskId, TaskPriority, TaskStatus},
    ports::{PageRequest, TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use rstest::{fixture, rstest};

#[fixture]
fn repository() -> InMemoryTaskRepository {
    InMemoryTaskRepository::new()
}

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
}

/// Builds a task with an explicit creation time so ordering is deterministic.
fn task_created_at(title: &str, created_at: DateTime<Utc>) -> Task {
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        title: title.to_owned(),
        description: None,
        status: TaskStatus::Pending,
        priority: TaskPriority::Medium,
        due_date: None,
        created_at,
        updated_at: created_at,
    })
}

fn task_with(status: TaskStatus, priority: TaskPriority) -> Task {
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        title: "Fixture task".to_owned(),
        description: None,
        status,
        priority,
        due_date: None,
        created_at: epoch(),
        updated_at: epoch(),
    })
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_orders_newest_first(repository: InMemoryTaskRepository) {
    for (title, age_days) in [("oldest", 3), ("middle", 2), ("newest", 1)] {
        let task = task_created_at(title, epoch() - Duration::days(age_days));
        repository.insert(&task).await.expect("insert");
    }

    let page = repository
        .list_page(PageRequest::page(1))
        .await
        .expect("list");

    let titles: Vec<&str> = page.tasks.iter().map(Task::title).collect();
    assert_eq!(titles, ["newest", "middle", "oldest"]);
    assert_eq!(page.total, 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pagination_splits_across_pages(repository: InMemoryTaskRepository) {
    for offset in 0..12 {
        let task = task_created_at(&format!("task {offset}"), epoch() + Duration::hours(offset));
        repository.insert(&task).await.expect("insert");
    }

    let first = repository
        .list_page(PageRequest::page(1))
        .await
        .expect("first page");
    assert_eq!(first.tasks.len(), 10);
    assert_eq!(first.total, 12);
    assert_eq!(first.total_pages(), 2);
    assert!(first.has_next());
    assert!(!first.has_prev());

    let second = repository
        .list_page(PageRequest::page(2))
        .await
        .expect("second page");
    assert_eq!(second.tasks.len(), 2);
    assert!(!second.has_next());
    assert!(second.has_prev());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn page_past_the_end_is_empty(repository: InMemoryTaskRepository) {
    let task = task_created_at("only", epoch());
    repository.insert(&task).await.expect("insert");

    let page = repository
        .list_page(PageRequest::page(5))
        .await
        .expect("list");
    assert!(page.tasks.is_empty());
    assert_eq!(page.total, 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn insert_rejects_duplicate_identifier(repository: InMemoryTaskRepository) {
    let task = task_created_at("original", epoch());
    repository.insert(&task).await.expect("insert");

    let result = repository.insert(&task).await;
    assert!(matches!(
        result,
        Err(TaskRepositoryError::DuplicateTask(id)) if id == task.id()
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_of_unknown_task_is_not_found(repository: InMemoryTaskRepository) {
    let task = task_created_at("ghost", epoch());
    let result = repository.update(&task).await;
    assert!(matches!(
        result,
        Err(TaskRepositoryError::NotFound(id)) if id == task.id()
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_of_unknown_task_is_not_found(repository: InMemoryTaskRepository) {
    let id = TaskId::new();
    let result = repository.delete(id).await;
    assert!(matches!(
        result,
        Err(TaskRepositoryError::NotFound(missing)) if missing == id
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_the_record(repository: InMemoryTaskRepository) {
    let task = task_created_at("to delete", epoch());
    repository.insert(&task).await.expect("insert");

    repository.delete(task.id()).await.expect("delete");
    let found = repository.find_by_id(task.id()).await.expect("find");
    assert_eq!(found, None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stats_counts_by_status_and_priority(repository: InMemoryTaskRepository) {
    let fixtures = [
        task_with(TaskStatus::Pending, TaskPriority::High),
        task_with(TaskStatus::Pending, TaskPriority::Low),
        task_with(TaskStatus::InProgress, TaskPriority::High),
        task_with(TaskStatus::Completed, TaskPriority::Medium),
        task_with(TaskStatus::Completed, TaskPriority::High),
    ];
    for task in &fixtures {
        repository.insert(task).await.expect("insert");
    }

    let stats = repository.stats().await.expect("stats");
    assert_eq!(stats.total, 5);
    assert_eq!(stats.pending, 2);
    assert_eq!(stats.completed, 2);
    assert_eq!(stats.high_priority, 3);
}
