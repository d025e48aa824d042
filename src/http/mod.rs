//! HTTP surface: routing, handlers, and instrumentation middleware.

mod flash;
mod handlers;
mod middleware;

use crate::metrics::MetricsSink;
use crate::task::services::TaskService;
use crate::web::ViewEngine;
use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::routing::get;
use mockable::Clock;
use std::convert::Infallible;
use std::sync::Arc;
use tower::Layer as _;
use tower::util::BoxCloneService;
use tower_http::trace::TraceLayer;

pub use flash::FlashCode;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Task orchestration service.
    pub tasks: TaskService,
    /// Metrics sink for request instrumentation.
    pub sink: Arc<dyn MetricsSink>,
    /// Compiled template set.
    pub views: Arc<ViewEngine>,
    /// Clock for presentation-time derivations.
    pub clock: Arc<dyn Clock + Send + Sync>,
}

/// Builds the application router.
///
/// The request-metrics layer is applied per route so the matched route
/// template is available to it; the method-override rewrite happens in
/// [`build_app`], before routing.
pub fn build_router(state: AppState, trace_enabled: bool) -> Router {
    let router = Router::new()
        .route("/", get(handlers::redirect_root))
        .route(
            "/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route("/tasks/create", get(handlers::show_create_form))
        .route(
            "/tasks/{id}",
            get(handlers::show_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/tasks/{id}/edit", get(handlers::show_edit_form))
        .route("/api/tasks/stats", get(handlers::task_stats))
        .fallback(handlers::not_found)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::track_requests,
        ))
        .with_state(state);

    if trace_enabled {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Builds the complete application service.
///
/// HTML forms can only submit `GET` and `POST`, so the method-override
/// middleware must rewrite `_method` fields before the router matches a
/// route. It therefore wraps the router as a whole instead of being a
/// router layer. The service is boxed so callers can name the type.
pub fn build_app(
    state: AppState,
    trace_enabled: bool,
) -> BoxCloneService<Request<Body>, Response, Infallible> {
    BoxCloneService::new(
        axum::middleware::from_fn(middleware::rewrite_method_override)
            .layer(build_router(state, trace_enabled)),
    )
}
