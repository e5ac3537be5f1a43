use std::future::IntoFuture;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use axum::http::StatusCode;
use sample::SampleModule;
use sea_orm::{ConnectOptions, Database};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::signals;

/// Build the sample module on the configured storage.
///
/// With `mock` the module keeps its rows in memory and no database is touched.
///
/// # Errors
/// Fails if the database is unreachable, migrations fail or the module
/// configuration is invalid.
pub async fn build_module(config: &AppConfig, mock: bool) -> anyhow::Result<SampleModule> {
    if mock {
        info!("Mock mode enabled: using in-memory sample storage");
        return Ok(SampleModule::in_memory(&config.sample)?);
    }

    let mut options = ConnectOptions::new(config.database.url());
    options
        .max_connections(config.database.max_connections)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .context("failed to connect to the database")?;
    info!(max_connections = config.database.max_connections, "Connected to database");

    SampleModule::with_database(db, &config.sample, config.database.run_migrations).await
}

#[must_use]
pub fn app(module: &SampleModule, request_timeout: Duration) -> Router {
    module
        .router()
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
}

/// Serve until a shutdown signal, then drain.
///
/// # Errors
/// Fails on invalid configuration, storage setup errors or bind failures.
pub async fn run(config: &AppConfig, mock: bool) -> anyhow::Result<()> {
    let addr = config.server.bind_addr()?;
    let module = build_module(config, mock).await?;
    let router = app(
        &module,
        Duration::from_secs(config.server.request_timeout_secs),
    );

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "HTTP server bound");

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if let Err(e) = signals::wait_for_shutdown().await {
                tracing::error!(error = %e, "Signal handling failed; shutting down");
            }
            cancel.cancel();
        }
    });

    serve(
        listener,
        router,
        cancel,
        Duration::from_secs(config.server.shutdown_timeout_secs),
    )
    .await
}

/// Serve `router` until `cancel` fires; open connections then get `drain`
/// to finish before they are dropped.
///
/// # Errors
/// Fails if the server stops with an I/O error.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    cancel: CancellationToken,
    drain: Duration,
) -> anyhow::Result<()> {
    let shutdown = {
        let cancel = cancel.clone();
        async move {
            cancel.cancelled().await;
            info!("HTTP server shutting down gracefully");
        }
    };

    let server = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .into_future();

    let deadline = async move {
        cancel.cancelled().await;
        tokio::time::sleep(drain).await;
    };

    tokio::select! {
        result = server => {
            result.context("HTTP server failed")?;
            info!("HTTP server stopped");
        }
        () = deadline => {
            warn!(drain_secs = drain.as_secs(), "Drain window elapsed; dropping open connections");
        }
    }
    Ok(())
}
