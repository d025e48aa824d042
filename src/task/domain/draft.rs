//! Validated full-field task input.

use super::{TaskPriority, TaskStatus, ValidationError, ValidationErrors};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

/// Maximum title length in characters, matching the persisted column width.
pub const MAX_TITLE_LENGTH: usize = 255;

/// Raw form input for creating or updating a task.
///
/// Every field arrives as submitted text; [`TaskDraft::validate`] turns it
/// into typed values or enumerates the failing fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskInput {
    /// Submitted title.
    #[serde(default)]
    pub title: String,
    /// Submitted description; empty submissions count as absent.
    #[serde(default)]
    pub description: Option<String>,
    /// Submitted status value.
    #[serde(default)]
    pub status: String,
    /// Submitted priority value.
    #[serde(default)]
    pub priority: String,
    /// Submitted due date; empty submissions count as absent.
    #[serde(default)]
    pub due_date: Option<String>,
}

/// A complete, validated set of mutable task fields.
///
/// A draft carries every mutable field at once: creation consumes it whole
/// and update replaces the full record with it, so partial-patch semantics
/// cannot arise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Validated title.
    pub title: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Priority.
    pub priority: TaskPriority,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskDraft {
    /// Validates raw form input into a complete draft.
    ///
    /// Constraints are independent and checked field by field; the error
    /// collects every failing field rather than stopping at the first.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] naming each invalid field.
    pub fn validate(input: &TaskInput) -> Result<Self, ValidationErrors> {
        let mut errors = Vec::new();

        let title = validate_title(&input.title, &mut errors);
        let status = validate_status(&input.status, &mut errors);
        let priority = validate_priority(&input.priority, &mut errors);
        let due_date = validate_due_date(input.due_date.as_deref(), &mut errors);

        if !errors.is_empty() {
            return Err(ValidationErrors(errors));
        }

        match (status, priority) {
            (Some(status), Some(priority)) => Ok(Self {
                title,
                description: normalize_optional(input.description.as_deref()),
                status,
                priority,
                due_date,
            }),
            // Unreachable in practice: a missing enum value always pushed an
            // error above. Report it as a validation failure rather than
            // panicking on external input.
            _ => Err(ValidationErrors(vec![ValidationError::UnknownStatus(
                input.status.clone(),
            )])),
        }
    }
}

fn validate_title(raw: &str, errors: &mut Vec<ValidationError>) -> String {
    let title = raw.trim();
    if title.is_empty() {
        errors.push(ValidationError::EmptyTitle);
        return String::new();
    }

    let length = title.chars().count();
    if length > MAX_TITLE_LENGTH {
        errors.push(ValidationError::TitleTooLong {
            max: MAX_TITLE_LENGTH,
            actual: length,
        });
    }
    title.to_owned()
}

fn validate_status(raw: &str, errors: &mut Vec<ValidationError>) -> Option<TaskStatus> {
    match TaskStatus::try_from(raw) {
        Ok(status) => Some(status),
        Err(err) => {
            errors.push(ValidationError::UnknownStatus(err.0));
            None
        }
    }
}

fn validate_priority(raw: &str, errors: &mut Vec<ValidationError>) -> Option<TaskPriority> {
    match TaskPriority::try_from(raw) {
        Ok(priority) => Some(priority),
        Err(err) => {
            errors.push(ValidationError::UnknownPriority(err.0));
            None
        }
    }
}

fn validate_due_date(
    raw: Option<&str>,
    errors: &mut Vec<ValidationError>,
) -> Option<DateTime<Utc>> {
    let trimmed = raw.map(str::trim).filter(|value| !value.is_empty())?;

    match parse_due_date(trimmed) {
        Some(due) => Some(due),
        None => {
            errors.push(ValidationError::InvalidDueDate(trimmed.to_owned()));
            None
        }
    }
}

/// Accepts the formats HTML date inputs submit: `YYYY-MM-DD` and
/// `YYYY-MM-DDTHH:MM`.
fn parse_due_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M") {
        return Some(datetime.and_utc());
    }
    None
}

fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}
