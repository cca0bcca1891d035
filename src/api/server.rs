//! Explorer API server lifecycle — binds the listener, mounts
//! `explorer_router()` and runs the axum server until shutdown.
//!
//! Two entry points:
//! - [`serve`] runs in the foreground until Ctrl-C (the binary's path).
//! - [`start_explorer_server_on`] spawns the server in a background task and
//!   returns a handle with a shutdown channel.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::api::router::explorer_router;
use crate::config::ExplorerConfig;

/// Handle to a running explorer server.
pub struct ExplorerServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ExplorerServer {
    /// Shut down the server gracefully.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Explorer server shutdown signal sent");
        }
    }
}

/// Bind `addr` (port 0 picks an ephemeral port) and spawn the server in a
/// background tokio task.
pub async fn start_explorer_server_on(
    config: ExplorerConfig,
    addr: SocketAddr,
) -> std::io::Result<ExplorerServer> {
    let listener = TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;
    let app = explorer_router(config);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Explorer server received shutdown signal");
        };

        tracing::info!(%addr, "Explorer server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Explorer server error: {e}");
        }

        tracing::info!("Explorer server stopped");
    });

    Ok(ExplorerServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}

/// Serve on the configured address until Ctrl-C.
pub async fn serve(config: ExplorerConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.bind_addr).await?;
    let addr = listener.local_addr()?;

    tracing::info!(
        %addr,
        database = %config.database_path.display(),
        documents = %config.documents_path.display(),
        "Explorer server listening"
    );

    axum::serve(listener, explorer_router(config))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Cannot listen for Ctrl-C: {e}");
                std::future::pending::<()>().await;
            }
            tracing::info!("Explorer server shutting down");
        })
        .await
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
