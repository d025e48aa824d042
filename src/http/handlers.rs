//! Request handlers for the task pages and the stats API.

use super::AppState;
use super::flash::{Flash, FlashCode, clear_flash, redirect_with_flash};
use crate::task::domain::{TaskId, TaskInput};
use crate::task::services::TaskServiceError;
use crate::web::{FormView, IndexView, ShowView, TaskView, ViewError};
use axum::Form;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Redirect, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub(super) struct PageQuery {
    #[serde(default)]
    page: Option<u32>,
}

#[derive(Debug, Serialize)]
struct StatsResponse {
    total_tasks: u64,
    completed_tasks: u64,
    pending_tasks: u64,
    high_priority_tasks: u64,
}

pub(super) async fn redirect_root() -> Redirect {
    Redirect::to("/tasks")
}

pub(super) async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    Flash(flash): Flash,
) -> Response {
    let page = match state.tasks.list(query.page.unwrap_or(1)).await {
        Ok(page) => page,
        Err(err) => return internal_error(&err),
    };

    let view = IndexView::from_page(&page, state.clock.utc(), flash.map(FlashCode::view));
    let response = render(state.views.render_index(&view), StatusCode::OK);
    consume_flash(response, flash.is_some())
}

pub(super) async fn show_create_form(State(state): State<AppState>) -> Response {
    render(
        state.views.render_create(&FormView::blank()),
        StatusCode::OK,
    )
}

pub(super) async fn create_task(
    State(state): State<AppState>,
    Form(input): Form<TaskInput>,
) -> Response {
    match state.tasks.create(&input).await {
        Ok(_) => redirect_with_flash("/tasks", FlashCode::Created),
        Err(TaskServiceError::Validation(errors)) => render(
            state
                .views
                .render_create(&FormView::rejected(&input, &errors, None)),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        // The list page renders and clears the flash; the form pages do not.
        Err(_) => redirect_with_flash("/tasks", FlashCode::CreateFailed),
    }
}

pub(super) async fn show_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Flash(flash): Flash,
) -> Response {
    let task = match state.tasks.fetch(TaskId::from_uuid(id)).await {
        Ok(task) => task,
        Err(TaskServiceError::NotFound(_)) => return not_found_page(&state),
        Err(err) => return internal_error(&err),
    };

    let view = ShowView {
        task: TaskView::from_task(&task, state.clock.utc()),
        flash: flash.map(FlashCode::view),
    };
    let response = render(state.views.render_show(&view), StatusCode::OK);
    consume_flash(response, flash.is_some())
}

pub(super) async fn show_edit_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.tasks.fetch(TaskId::from_uuid(id)).await {
        Ok(task) => render(
            state.views.render_edit(&FormView::for_task(&task)),
            StatusCode::OK,
        ),
        Err(TaskServiceError::NotFound(_)) => not_found_page(&state),
        Err(err) => internal_error(&err),
    }
}

pub(super) async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(input): Form<TaskInput>,
) -> Response {
    let task_id = TaskId::from_uuid(id);
    match state.tasks.update(task_id, &input).await {
        Ok(_) => redirect_with_flash("/tasks", FlashCode::Updated),
        Err(TaskServiceError::Validation(errors)) => render(
            state
                .views
                .render_edit(&FormView::rejected(&input, &errors, Some(task_id.to_string()))),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        Err(TaskServiceError::NotFound(_)) => not_found_page(&state),
        Err(_) => redirect_with_flash("/tasks", FlashCode::UpdateFailed),
    }
}

pub(super) async fn delete_task(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.tasks.delete(TaskId::from_uuid(id)).await {
        Ok(()) => redirect_with_flash("/tasks", FlashCode::Deleted),
        Err(TaskServiceError::NotFound(_)) => not_found_page(&state),
        Err(_) => redirect_with_flash("/tasks", FlashCode::DeleteFailed),
    }
}

pub(super) async fn task_stats(State(state): State<AppState>) -> Response {
    match state.tasks.stats().await {
        Ok(stats) => Json(StatsResponse {
            total_tasks: stats.total,
            completed_tasks: stats.completed,
            pending_tasks: stats.pending,
            high_priority_tasks: stats.high_priority,
        })
        .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "stats request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "failed to load task stats" })),
            )
                .into_response()
        }
    }
}

pub(super) async fn not_found(State(state): State<AppState>) -> Response {
    not_found_page(&state)
}

fn not_found_page(state: &AppState) -> Response {
    render(state.views.render_not_found(), StatusCode::NOT_FOUND)
}

fn render(result: Result<String, ViewError>, status: StatusCode) -> Response {
    match result {
        Ok(body) => (status, Html(body)).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "template rendering failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn internal_error(err: &TaskServiceError) -> Response {
    tracing::error!(error = %err, "request failed");
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

fn consume_flash(response: Response, had_flash: bool) -> Response {
    if had_flash {
        clear_flash(response)
    } else {
        response
    }
}
