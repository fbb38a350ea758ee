use actix_web::dev::ServerHandle;
use sqlx::{Pool, Postgres};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Handles graceful shutdown of the application
///
/// Orchestration order:
/// 1. Listen for shutdown signals (SIGTERM, SIGINT/CTRL+C)
/// 2. Stop the HTTP server (stops accepting new requests)
/// 3. Close database connections
pub struct ShutdownCoordinator {
    server_handle: ServerHandle,
    server_task: JoinHandle<Result<(), std::io::Error>>,
    pool: Pool<Postgres>,
}

impl ShutdownCoordinator {
    pub fn new(
        server_handle: ServerHandle,
        server_task: JoinHandle<Result<(), std::io::Error>>,
        pool: Pool<Postgres>,
    ) -> Self {
        Self {
            server_handle,
            server_task,
            pool,
        }
    }

    /// Block until CTRL+C or SIGTERM arrives, then shut down in order.
    /// In-flight requests are allowed to complete before the server stops.
    pub async fn wait_for_shutdown(self) -> Result<(), std::io::Error> {
        let ctrl_c = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install CTRL+C signal handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received CTRL+C signal, initiating graceful shutdown...");
            }
            _ = terminate => {
                info!("Received SIGTERM signal, initiating graceful shutdown...");
            }
        }

        self.shutdown().await
    }

    async fn shutdown(self) -> Result<(), std::io::Error> {
        info!("Stopping HTTP server (no longer accepting new requests)...");
        self.server_handle.stop(true).await;

        match self.server_task.await {
            Ok(Ok(_)) => info!("HTTP server shut down successfully"),
            Ok(Err(e)) => error!("HTTP server encountered error during shutdown: {:?}", e),
            Err(e) => error!("HTTP server task panicked: {:?}", e),
        }

        info!("Closing database connection pool...");
        self.pool.close().await;

        info!("Graceful shutdown completed");
        Ok(())
    }
}
