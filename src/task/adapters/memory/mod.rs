//! In-memory adapter.

mod task;

pub use task::InMemoryTaskRepository;
