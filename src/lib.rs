//! Taskboard: server-rendered task management with request metrics.
//!
//! A small CRUD web application for tasks with pagination, a JSON stats
//! endpoint, and fire-and-forget DogStatsD metrics for every request and
//! every domain operation.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, metrics agent)
//!
//! # Modules
//!
//! - [`task`]: Task domain, persistence ports/adapters, and orchestration
//! - [`metrics`]: Metrics sink capability and its transports
//! - [`http`]: Router, handlers, and request instrumentation middleware
//! - [`web`]: View engine and view models
//! - [`config`]: Environment-driven configuration

pub mod config;
pub mod http;
pub mod metrics;
pub mod task;
pub mod web;
