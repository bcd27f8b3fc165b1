//! Server lifecycle: bind, spawn, shut down.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::detector::Detector;
use crate::router::analysis_router;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("Failed to read bound address: {0}")]
    LocalAddr(std::io::Error),
}

/// Handle to a running analysis server.
pub struct AnalysisServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl AnalysisServer {
    /// Address actually bound (port resolved when configured as 0).
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Signal shutdown and wait for in-flight requests to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Analysis server shutdown signal sent");
        }
        if let Err(e) = self.task.await {
            tracing::error!("Analysis server task failed: {e}");
        }
    }
}

/// Bind the configured address and serve the analysis router in the background.
pub async fn start_server(
    config: &ServerConfig,
    detector: Arc<dyn Detector>,
) -> Result<AnalysisServer, ServerError> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind_addr,
            source,
        })?;
    let addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

    let app = analysis_router(detector);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Analysis server received shutdown signal");
        };

        tracing::info!(%addr, "Analysis server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Analysis server error: {e}");
        }

        tracing::info!("Analysis server stopped");
    });

    Ok(AnalysisServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}
