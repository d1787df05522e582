//! HTTP server bootstrap and runtime wiring.

use std::future::Future;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use crate::app::{build_app, AppState};
use crate::config::AppConfig;

/// Bind `config.bind_addr` and serve until `shutdown` resolves.
///
/// When `shutdown` resolves the drain flag is raised first, so requests that
/// race the shutdown get a 503 instead of a dropped connection.
pub async fn run<F>(config: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    serve(listener, config, shutdown).await
}

/// Serve on an already bound listener (tests bind to port 0).
pub async fn serve<F>(listener: TcpListener, config: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local_addr = listener
        .local_addr()
        .context("failed to read socket address")?;
    let tenant_id = config.tenant_id;

    let (drain_tx, drain_rx) = watch::channel(false);
    let state = AppState::new(config, drain_rx).context("failed to register metrics")?;
    let app = build_app(state);

    info!(%local_addr, %tenant_id, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            info!("shutdown signal received, draining");
            let _ = drain_tx.send(true);
        })
        .await
        .context("server terminated with error")?;

    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sigterm) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
