//! End-to-end tests over the HTTP surface, driving the full service with
//! in-memory adapters.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use mockable::DefaultClock;
use std::sync::Arc;
use taskboard::http::{AppState, build_app};
use taskboard::metrics::RecordingSink;
use taskboard::task::adapters::memory::InMemoryTaskRepository;
use taskboard::task::domain::{Task, TaskId};
use taskboard::task::ports::{
    PageRequest, TaskPage, TaskRepository, TaskRepositoryError, TaskRepositoryResult, TaskStats,
};
use taskboard::task::services::TaskService;
use taskboard::web::ViewEngine;
use tower::ServiceExt;
use tower::util::BoxCloneService;

struct TestApp {
    app: BoxCloneService<Request<Body>, Response<Body>, std::convert::Infallible>,
    sink: RecordingSink,
    repository: Arc<InMemoryTaskRepository>,
}

fn build_test_service(
    repository: Arc<dyn TaskRepository>,
    sink: &RecordingSink,
) -> BoxCloneService<Request<Body>, Response<Body>, std::convert::Infallible> {
    let clock: Arc<dyn mockable::Clock + Send + Sync> = Arc::new(DefaultClock);
    let state = AppState {
        tasks: TaskService::new(repository, Arc::new(sink.clone()), Arc::clone(&clock)),
        sink: Arc::new(sink.clone()),
        views: Arc::new(ViewEngine::new().expect("templates compile")),
        clock,
    };
    build_app(state, false)
}

fn test_app() -> TestApp {
    let sink = RecordingSink::new();
    let repository = Arc::new(InMemoryTaskRepository::new());

    TestApp {
        app: build_test_service(repository.clone(), &sink),
        sink,
        repository,
    }
}

/// Store stub whose every operation fails, for exercising failure flashes.
struct UnavailableStore;

fn store_offline() -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other("store offline"))
}

#[async_trait]
impl TaskRepository for UnavailableStore {
    async fn insert(&self, _task: &Task) -> TaskRepositoryResult<()> {
        Err(store_offline())
    }

    async fn update(&self, _task: &Task) -> TaskRepositoryResult<()> {
        Err(store_offline())
    }

    async fn find_by_id(&self, _id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        Err(store_offline())
    }

    async fn delete(&self, _id: TaskId) -> TaskRepositoryResult<()> {
        Err(store_offline())
    }

    async fn list_page(&self, _request: PageRequest) -> TaskRepositoryResult<TaskPage> {
        Err(store_offline())
    }

    async fn stats(&self) -> TaskRepositoryResult<TaskStats> {
        Err(store_offline())
    }
}

impl TestApp {
    async fn request(&mut self, request: Request<Body>) -> Response<Body> {
        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("infallible")
    }

    async fn get(&mut self, uri: &str) -> Response<Body> {
        self.request(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
    }

    async fn post_form(&mut self, uri: &str, body: &str) -> Response<Body> {
        self.request(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_owned()))
                .expect("request"),
        )
        .await
    }

    async fn first_task(&self) -> Task {
        let page = self
            .repository
            .list_page(PageRequest::page(1))
            .await
            .expect("list");
        page.tasks.first().cloned().expect("at least one task")
    }
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("location header")
}

#[tokio::test(flavor = "multi_thread")]
async fn root_redirects_to_task_list() {
    let mut app = test_app();
    let response = app.get("/").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/tasks");
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_task_list_renders_call_to_action() {
    let mut app = test_app();
    let response = app.get("/tasks").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Task Management Dashboard"));
    assert!(body.contains("No tasks found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn create_redirects_with_flash_and_emits_metrics() {
    let mut app = test_app();
    let response = app
        .post_form(
            "/tasks",
            "title=Ship+release&description=&status=pending&priority=high&due_date=",
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/tasks");
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("flash cookie");
    assert!(cookie.contains("taskboard_flash=created"));

    let task = app.first_task().await;
    assert_eq!(task.title(), "Ship release");

    let created = app.sink.events_named("tasks.created");
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].tags.get("priority"), Some("high"));

    let requests = app.sink.events_named("http.requests");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].tags.get("route"), Some("/tasks"));
    assert_eq!(requests[0].tags.get("method"), Some("POST"));
    assert_eq!(requests[0].tags.get("status_code"), Some("303"));
    assert_eq!(app.sink.count_named("http.request.duration"), 1);
    assert_eq!(app.sink.count_named("http.errors"), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn flash_banner_shows_once_after_redirect() {
    let mut app = test_app();
    let response = app
        .request(
            Request::builder()
                .uri("/tasks")
                .header(header::COOKIE, "taskboard_flash=created")
                .body(Body::empty())
                .expect("request"),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let clearing = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("clearing cookie");
    assert!(clearing.contains("Max-Age=0"));

    let body = body_text(response).await;
    assert!(body.contains("Task created successfully!"));
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_create_rerenders_form_with_every_field_error() {
    let mut app = test_app();
    let response = app
        .post_form("/tasks", "title=&status=bogus&priority=medium&due_date=")
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_text(response).await;
    assert!(body.contains("title must not be empty"));
    assert!(body.contains("unknown status: bogus"));

    let errors = app.sink.events_named("http.errors");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].tags.get("route"), Some("/tasks"));
    assert_eq!(errors[0].tags.get("status_code"), Some("422"));
    assert_eq!(app.sink.count_named("tasks.created"), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn method_override_routes_form_post_to_update() {
    let mut app = test_app();
    app.post_form(
        "/tasks",
        "title=Original&status=pending&priority=low&due_date=",
    )
    .await;
    let task = app.first_task().await;

    let response = app
        .post_form(
            &format!("/tasks/{}", task.id()),
            "_method=PUT&title=Renamed&status=completed&priority=low&due_date=",
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/tasks");

    let updated = app.first_task().await;
    assert_eq!(updated.title(), "Renamed");

    let requests = app.sink.events_named("http.requests");
    let put = requests
        .iter()
        .find(|event| event.tags.get("method") == Some("PUT"))
        .expect("PUT request tracked");
    assert_eq!(put.tags.get("route"), Some("/tasks/{id}"));
    assert_eq!(app.sink.count_named("tasks.completed"), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn method_override_routes_form_post_to_delete() {
    let mut app = test_app();
    app.post_form(
        "/tasks",
        "title=Remove+me&status=pending&priority=medium&due_date=",
    )
    .await;
    let task = app.first_task().await;

    let response = app
        .post_form(&format!("/tasks/{}", task.id()), "_method=DELETE")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/tasks");

    let gone = app.get(&format!("/tasks/{}", task.id())).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.sink.count_named("tasks.deleted"), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn stats_endpoint_returns_aggregate_json() {
    let mut app = test_app();
    app.post_form("/tasks", "title=One&status=pending&priority=high&due_date=")
        .await;
    app.post_form(
        "/tasks",
        "title=Two&status=completed&priority=low&due_date=",
    )
    .await;

    let response = app.get("/api/tasks/stats").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    let json: serde_json::Value = serde_json::from_str(&body).expect("valid JSON");
    assert_eq!(json["total_tasks"], 2);
    assert_eq!(json["completed_tasks"], 1);
    assert_eq!(json["pending_tasks"], 1);
    assert_eq!(json["high_priority_tasks"], 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn unmatched_route_renders_not_found_and_tags_unknown() {
    let mut app = test_app();
    let response = app.get("/no/such/page").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_text(response).await;
    assert!(body.contains("404"));

    let requests = app.sink.events_named("http.requests");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].tags.get("route"), Some("unknown"));
    assert_eq!(app.sink.count_named("http.errors"), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn create_store_failure_redirects_to_list_with_error_flash() {
    let sink = RecordingSink::new();
    let mut app = build_test_service(Arc::new(UnavailableStore), &sink);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tasks")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(
                    "title=Doomed&status=pending&priority=low&due_date=",
                ))
                .expect("request"),
        )
        .await
        .expect("infallible");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/tasks");
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("flash cookie");
    assert!(cookie.contains("taskboard_flash=create_failed"));

    let errors = sink.events_named("tasks.errors");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].tags.get("operation"), Some("create"));
}

#[tokio::test(flavor = "multi_thread")]
async fn failure_flash_banner_shows_and_clears_on_the_list() {
    let mut app = test_app();
    let response = app
        .request(
            Request::builder()
                .uri("/tasks")
                .header(header::COOKIE, "taskboard_flash=create_failed")
                .body(Body::empty())
                .expect("request"),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let clearing = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("clearing cookie");
    assert!(clearing.contains("Max-Age=0"));

    let body = body_text(response).await;
    assert!(body.contains("Failed to create task."));
    assert!(body.contains("alert-danger"));
}

#[tokio::test(flavor = "multi_thread")]
async fn create_accepts_a_long_description() {
    let mut app = test_app();
    let body = format!(
        "title=Long+notes&description={}&status=pending&priority=low&due_date=",
        "a".repeat(100_000)
    );

    let response = app.post_form("/tasks", &body).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/tasks");

    let task = app.first_task().await;
    assert_eq!(task.description().map(str::len), Some(100_000));
}

#[tokio::test(flavor = "multi_thread")]
async fn show_page_renders_task_details() {
    let mut app = test_app();
    app.post_form(
        "/tasks",
        "title=Inspect+me&description=Details+here&status=in_progress&priority=high&due_date=",
    )
    .await;
    let task = app.first_task().await;

    let response = app.get(&format!("/tasks/{}", task.id())).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Inspect me"));
    assert!(body.contains("Details here"));
    assert!(body.contains("In Progress"));
    assert!(body.contains("Mark as Completed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn edit_form_is_prefilled_from_the_stored_task() {
    let mut app = test_app();
    app.post_form(
        "/tasks",
        "title=Edit+me&status=pending&priority=medium&due_date=2026-12-01",
    )
    .await;
    let task = app.first_task().await;

    let response = app.get(&format!("/tasks/{}/edit", task.id())).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Edit me"));
    assert!(body.contains("2026-12-01"));
    assert!(body.contains("_method"));
}
