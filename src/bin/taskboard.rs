//! Task management web server.

use axum::ServiceExt as _;
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use taskboard::config::AppConfig;
use taskboard::http::{AppState, build_app};
use taskboard::metrics::{DogstatsdSink, MetricsSink, NullSink};
use taskboard::task::adapters::memory::InMemoryTaskRepository;
use taskboard::task::adapters::postgres::PostgresTaskRepository;
use taskboard::task::ports::TaskRepository;
use taskboard::task::services::{TaskService, seed_demo_tasks};
use taskboard::web::ViewEngine;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::Instrument as _;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskboard=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(%error, "configuration error");
            std::process::exit(1);
        }
    };

    let sink = build_sink(&config);
    let clock: Arc<dyn Clock + Send + Sync> = Arc::new(DefaultClock);
    let repository = build_repository(&config);

    if config.seed_demo_data {
        if let Err(error) = seed_demo_tasks(repository.as_ref(), clock.as_ref()).await {
            tracing::error!(%error, "failed to seed demo tasks");
            std::process::exit(1);
        }
    }

    let views = match ViewEngine::new() {
        Ok(views) => Arc::new(views),
        Err(error) => {
            tracing::error!(%error, "failed to compile templates");
            std::process::exit(1);
        }
    };

    let state = AppState {
        tasks: TaskService::new(repository, Arc::clone(&sink), Arc::clone(&clock)),
        sink,
        views,
        clock,
    };
    let app = build_app(state, config.trace_enabled);

    let listener = match TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(%error, address = %config.bind_addr, "failed to bind server address");
            std::process::exit(1);
        }
    };
    tracing::info!(address = %config.bind_addr, "server listening");

    let span = if config.logs_injection {
        tracing::info_span!(
            "app",
            service = %config.metrics.service,
            env = %config.metrics.env,
            version = %config.metrics.version,
        )
    } else {
        tracing::Span::none()
    };

    let serve = async {
        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await
    };
    if let Err(error) = serve.instrument(span).await {
        tracing::error!(%error, "server error");
        std::process::exit(1);
    }

    tracing::info!("server shutdown complete");
}

fn build_sink(config: &AppConfig) -> Arc<dyn MetricsSink> {
    if !config.metrics.enabled {
        tracing::info!("metrics disabled, emissions will be dropped");
        return Arc::new(NullSink);
    }
    match DogstatsdSink::from_config(&config.metrics) {
        Ok(sink) => {
            tracing::info!(
                host = %config.metrics.host,
                port = config.metrics.port,
                "metrics agent configured"
            );
            Arc::new(sink)
        }
        Err(error) => {
            tracing::warn!(%error, "metrics agent unavailable, emissions will be dropped");
            Arc::new(NullSink)
        }
    }
}

fn build_repository(config: &AppConfig) -> Arc<dyn TaskRepository> {
    match &config.database_url {
        Some(url) => {
            let manager = ConnectionManager::<PgConnection>::new(url);
            match Pool::builder().build(manager) {
                Ok(pool) => {
                    tracing::info!("using PostgreSQL task store");
                    Arc::new(PostgresTaskRepository::new(pool))
                }
                Err(error) => {
                    tracing::error!(%error, "failed to create database pool");
                    std::process::exit(1);
                }
            }
        }
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory task store");
            Arc::new(InMemoryTaskRepository::new())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!(%error, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => tracing::error!(%error, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
