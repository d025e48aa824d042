//! Tests for status transition completion semantics.

use crate::task::domain::{StatusTransition, TaskStatus};
use rstest::rstest;

#[rstest]
#[case(TaskStatus::Pending, TaskStatus::Completed, true)]
#[case(TaskStatus::InProgress, TaskStatus::Completed, true)]
#[case(TaskStatus::Completed, TaskStatus::Completed, false)]
#[case(TaskStatus::Completed, TaskStatus::Pending, false)]
#[case(TaskStatus::Pending, TaskStatus::InProgress, false)]
fn completion_requires_entering_completed_from_elsewhere(
    #[case] from: TaskStatus,
    #[case] to: TaskStatus,
    #[case] completes: bool,
) {
    let transition = StatusTransition::new(from, to);
    assert_eq!(transition.completes_task(), completes);
    assert_eq!(transition.from(), from);
    assert_eq!(transition.to(), to);
}
