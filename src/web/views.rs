//! Template engine and view models.

use crate::task::domain::{Task, TaskInput, ValidationErrors};
use crate::task::ports::TaskPage;
use chrono::{DateTime, Utc};
use minijinja::{Environment, context};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

const DATE_FORMAT: &str = "%b %d, %Y";
const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Errors raised while rendering a view.
#[derive(Debug, Error)]
pub enum ViewError {
    /// A template failed to compile or render.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Display model for a single task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    /// Task identifier as text.
    pub id: String,
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Status machine value (`pending`, `in_progress`, `completed`).
    pub status: String,
    /// Status display label.
    pub status_label: String,
    /// Bootstrap badge class for the status.
    pub status_badge: String,
    /// Priority machine value.
    pub priority: String,
    /// Priority display label.
    pub priority_label: String,
    /// Bootstrap badge class for the priority.
    pub priority_badge: String,
    /// Due date formatted for display.
    pub due_date: Option<String>,
    /// Due date formatted for an HTML date input.
    pub due_date_input: Option<String>,
    /// Whether the task is past due and not completed.
    pub overdue: bool,
    /// Creation timestamp formatted for display.
    pub created_at: String,
    /// Last-update timestamp formatted for display.
    pub updated_at: String,
}

impl TaskView {
    /// Builds a display model from a task, deriving overdue against `now`.
    #[must_use]
    pub fn from_task(task: &Task, now: DateTime<Utc>) -> Self {
        Self {
            id: task.id().to_string(),
            title: task.title().to_owned(),
            description: task.description().map(ToOwned::to_owned),
            status: task.status().as_str().to_owned(),
            status_label: task.status().label().to_owned(),
            status_badge: task.status().badge_class().to_owned(),
            priority: task.priority().as_str().to_owned(),
            priority_label: task.priority().label().to_owned(),
            priority_badge: task.priority().badge_class().to_owned(),
            due_date: task.due_date().map(|due| due.format(DATE_FORMAT).to_string()),
            due_date_input: task
                .due_date()
                .map(|due| due.format(DATE_INPUT_FORMAT).to_string()),
            overdue: task.is_overdue(now),
            created_at: task.created_at().format(DATE_FORMAT).to_string(),
            updated_at: task.updated_at().format(DATE_FORMAT).to_string(),
        }
    }
}

/// Pagination controls for the index page.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    /// Current page number (1-based).
    pub number: u32,
    /// Total number of pages (at least 1).
    pub total_pages: u64,
    /// Whether a next page exists.
    pub has_next: bool,
    /// Whether a previous page exists.
    pub has_prev: bool,
    /// Total tasks across all pages.
    pub total: u64,
}

/// One-shot status banner shown after a redirect.
#[derive(Debug, Clone, Serialize)]
pub struct FlashView {
    /// Bootstrap alert level (`success` or `danger`).
    pub level: String,
    /// Message text.
    pub message: String,
}

/// Index page model.
#[derive(Debug, Clone, Serialize)]
pub struct IndexView {
    /// Tasks on this page, newest first.
    pub tasks: Vec<TaskView>,
    /// Pagination controls.
    pub page: PageView,
    /// Optional flash banner.
    pub flash: Option<FlashView>,
}

impl IndexView {
    /// Builds the index model from a repository page.
    #[must_use]
    pub fn from_page(page: &TaskPage, now: DateTime<Utc>, flash: Option<FlashView>) -> Self {
        Self {
            tasks: page
                .tasks
                .iter()
                .map(|task| TaskView::from_task(task, now))
                .collect(),
            page: PageView {
                number: page.request.number(),
                total_pages: page.total_pages(),
                has_next: page.has_next(),
                has_prev: page.has_prev(),
                total: page.total,
            },
            flash,
        }
    }
}

/// Detail page model.
#[derive(Debug, Clone, Serialize)]
pub struct ShowView {
    /// The task being shown.
    pub task: TaskView,
    /// Optional flash banner.
    pub flash: Option<FlashView>,
}

/// Previously submitted values echoed back into a form.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormValues {
    /// Title field value.
    pub title: String,
    /// Description field value.
    pub description: String,
    /// Selected status value.
    pub status: String,
    /// Selected priority value.
    pub priority: String,
    /// Due date field value.
    pub due_date: String,
}

impl FormValues {
    /// Echoes raw form input back, preserving what the user typed.
    #[must_use]
    pub fn from_input(input: &TaskInput) -> Self {
        Self {
            title: input.title.clone(),
            description: input.description.clone().unwrap_or_default(),
            status: input.status.clone(),
            priority: input.priority.clone(),
            due_date: input.due_date.clone().unwrap_or_default(),
        }
    }

    /// Pre-fills the edit form from a stored task.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title().to_owned(),
            description: task.description().unwrap_or_default().to_owned(),
            status: task.status().as_str().to_owned(),
            priority: task.priority().as_str().to_owned(),
            due_date: task
                .due_date()
                .map(|due| due.format(DATE_INPUT_FORMAT).to_string())
                .unwrap_or_default(),
        }
    }
}

/// Not-found page model.
///
/// The layout reads `view.flash` on every page, so even the 404 page must
/// supply a view object.
#[derive(Debug, Clone, Serialize)]
pub struct NotFoundView {
    /// Optional flash banner; always absent today.
    pub flash: Option<FlashView>,
}

/// Create/edit form model.
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    /// Field values to render.
    pub values: FormValues,
    /// Validation messages grouped by field name.
    pub errors: BTreeMap<String, Vec<String>>,
    /// Task id, present only on the edit form.
    pub task_id: Option<String>,
}

impl FormView {
    /// An empty create form with defaults selected.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            values: FormValues {
                status: "pending".to_owned(),
                priority: "medium".to_owned(),
                ..FormValues::default()
            },
            errors: BTreeMap::new(),
            task_id: None,
        }
    }

    /// A form echoing rejected input alongside its validation messages.
    #[must_use]
    pub fn rejected(input: &TaskInput, errors: &ValidationErrors, task_id: Option<String>) -> Self {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for error in errors.errors() {
            grouped
                .entry(error.field().to_owned())
                .or_default()
                .push(error.to_string());
        }
        Self {
            values: FormValues::from_input(input),
            errors: grouped,
            task_id,
        }
    }

    /// The edit form pre-filled from a stored task.
    #[must_use]
    pub fn for_task(task: &Task) -> Self {
        Self {
            values: FormValues::from_task(task),
            errors: BTreeMap::new(),
            task_id: Some(task.id().to_string()),
        }
    }
}

/// Compiled template set.
///
/// Templates are embedded at compile time; construction fails only on a
/// template syntax error, which is a build-time defect.
pub struct ViewEngine {
    env: Environment<'static>,
}

impl ViewEngine {
    /// Compiles the embedded templates.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] when a template fails to compile.
    pub fn new() -> Result<Self, ViewError> {
        let mut env = Environment::new();
        env.add_template("layout.html", include_str!("../../templates/layout.html"))?;
        env.add_template(
            "tasks_index.html",
            include_str!("../../templates/tasks_index.html"),
        )?;
        env.add_template(
            "tasks_show.html",
            include_str!("../../templates/tasks_show.html"),
        )?;
        env.add_template(
            "tasks_create.html",
            include_str!("../../templates/tasks_create.html"),
        )?;
        env.add_template(
            "tasks_edit.html",
            include_str!("../../templates/tasks_edit.html"),
        )?;
        env.add_template(
            "not_found.html",
            include_str!("../../templates/not_found.html"),
        )?;
        Ok(Self { env })
    }

    /// Renders the task list page.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] when rendering fails.
    pub fn render_index(&self, view: &IndexView) -> Result<String, ViewError> {
        Ok(self
            .env
            .get_template("tasks_index.html")?
            .render(context! { view })?)
    }

    /// Renders the task detail page.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] when rendering fails.
    pub fn render_show(&self, view: &ShowView) -> Result<String, ViewError> {
        Ok(self
            .env
            .get_template("tasks_show.html")?
            .render(context! { view })?)
    }

    /// Renders the create form.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] when rendering fails.
    pub fn render_create(&self, view: &FormView) -> Result<String, ViewError> {
        Ok(self
            .env
            .get_template("tasks_create.html")?
            .render(context! { view })?)
    }

    /// Renders the edit form.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] when rendering fails.
    pub fn render_edit(&self, view: &FormView) -> Result<String, ViewError> {
        Ok(self
            .env
            .get_template("tasks_edit.html")?
            .render(context! { view })?)
    }

    /// Renders the not-found page.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] when rendering fails.
    pub fn render_not_found(&self) -> Result<String, ViewError> {
        let view = NotFoundView { flash: None };
        Ok(self
            .env
            .get_template("not_found.html")?
            .render(context! { view })?)
    }
}

impl std::fmt::Debug for ViewEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewEngine").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::ports::{PageRequest, TaskPage};

    #[test]
    fn page_view_keeps_the_full_page_count() {
        let page = TaskPage {
            tasks: Vec::new(),
            total: 50_000_000_000,
            request: PageRequest::page(1),
        };

        let view = IndexView::from_page(&page, Utc::now(), None);
        assert_eq!(view.page.total_pages, 5_000_000_000);
        assert!(view.page.has_next);
    }

    #[test]
    fn not_found_page_renders_under_the_shared_layout() {
        let engine = ViewEngine::new().expect("templates compile");

        let html = engine.render_not_found().expect("not-found page renders");
        assert!(html.contains("404"));
        assert!(html.contains("Back to Tasks"));
    }
}
