//! HTTP server lifecycle.
//!
//! bind → spawn background task → return handle with shutdown channel.
//! `serve` wraps the same steps for the binary and blocks until Ctrl-C.

use std::net::SocketAddr;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::oneshot;

use crate::api::router::api_router;
use crate::core_state::CoreState;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where a running server listens and since when.
#[derive(Debug, Clone, Serialize)]
pub struct ServerSession {
    pub server_addr: String,
    pub port: u16,
    pub started_at: String,
}

/// Handle to a running server.
pub struct ApiServer {
    pub session: ServerSession,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl ApiServer {
    /// Signal graceful shutdown. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }

    /// Signal shutdown and wait for in-flight requests to drain.
    pub async fn stop(mut self) {
        self.shutdown();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

/// Start the API on `addr` in a background task. Port 0 picks a free port.
pub async fn start_api_server_on(
    core: Arc<CoreState>,
    addr: SocketAddr,
) -> Result<ApiServer, ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    let addr = listener.local_addr()?;

    let app = api_router(core);

    let session = ServerSession {
        server_addr: addr.to_string(),
        port: addr.port(),
        started_at: chrono::Utc::now().to_rfc3339(),
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        session,
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}

/// Run until Ctrl-C, then drain and return.
pub async fn serve(core: Arc<CoreState>, addr: SocketAddr) -> Result<(), ServerError> {
    let server = start_api_server_on(core, addr).await?;
    tracing::info!(addr = %server.session.server_addr, "Listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {e}");
    }
    server.stop().await;
    Ok(())
}
