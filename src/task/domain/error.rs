//! Error types for task domain validation and parsing.

use thiserror::Error;

/// A single field-level validation failure.
///
/// Constraints are independent; each variant names exactly one field so a
/// caller can re-display failures next to the offending form input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The title is empty after trimming.
    #[error("title must not be empty")]
    EmptyTitle,

    /// The title exceeds the persisted column width.
    #[error("title must be at most {max} characters, got {actual}")]
    TitleTooLong {
        /// Maximum permitted length in characters.
        max: usize,
        /// Submitted length in characters.
        actual: usize,
    },

    /// The status value is not one of the closed enum values.
    #[error("unknown status: {0}")]
    UnknownStatus(String),

    /// The priority value is not one of the closed enum values.
    #[error("unknown priority: {0}")]
    UnknownPriority(String),

    /// The due date could not be parsed as a calendar date.
    #[error("invalid due date: {0}")]
    InvalidDueDate(String),
}

impl ValidationError {
    /// Returns the name of the field this failure belongs to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::UnknownStatus(_) => "status",
            Self::UnknownPriority(_) => "priority",
            Self::InvalidDueDate(_) => "due_date",
        }
    }
}

/// Accumulated validation failures across every invalid field.
///
/// Validation never stops at the first failing field; the collection holds
/// one entry per failed constraint.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("validation failed: {}", format_errors(.0))]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    /// Returns the individual field failures.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Returns `true` when the named field has at least one failure.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|error| error.field() == field)
    }
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);
