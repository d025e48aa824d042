//! Tests for the task domain, repositories, and services.

mod repository_tests;
mod transition_tests;
