//! HTTP server initialization, runtime setup and orderly shutdown.
//!
//! Handles the store connection, worker spawning, and the Axum server lifecycle.

use crate::application::services::LinkService;
use crate::config::Config;
use crate::domain::access_worker::run_access_worker;
use crate::infrastructure::persistence::{SqliteMappingRepository, connect};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::RandomCodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Startup order:
/// - Open the SQLite store and apply migrations (fatal on failure)
/// - Bind the listener
/// - Start the background access worker
/// - Serve until Ctrl-C or SIGTERM
///
/// Shutdown releases resources in reverse: in-flight requests finish, the
/// router (and with it the access queue sender) is dropped, the worker drains
/// the remaining events, then the pool is closed.
///
/// # Errors
///
/// Returns an error if:
/// - The store cannot be opened or migrated
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = Arc::new(connect(&config.database_url, &config.pool_settings()).await?);
    tracing::info!("Connected to database");

    let listener = match bind(&config.listen_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            pool.close().await;
            return Err(e);
        }
    };

    let repository = Arc::new(SqliteMappingRepository::new(pool.clone()));
    let generator = Arc::new(RandomCodeGenerator::new(config.code_length));
    let link_service = Arc::new(LinkService::new(
        repository.clone(),
        generator,
        config.link_settings(),
    ));

    let (access_tx, access_rx) = mpsc::channel(config.access_queue_capacity);
    let worker = tokio::spawn(run_access_worker(
        access_rx,
        repository,
        config.access_worker_concurrency,
    ));
    tracing::info!("Access worker started");

    let state = AppState::new(link_service, access_tx, config.max_batch_size);
    let app = app_router(state);

    let served = axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    tracing::info!("Server stopped, draining access queue");
    if let Err(e) = worker.await {
        tracing::error!("Access worker terminated abnormally: {}", e);
    }

    pool.close().await;
    tracing::info!("Database closed");

    served.context("Server error")
}

async fn bind(listen_addr: &str) -> Result<TcpListener> {
    let addr: SocketAddr = listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{listen_addr}'"))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");
    Ok(listener)
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
