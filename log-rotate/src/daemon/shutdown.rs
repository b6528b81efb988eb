//! Stop handling for scheduled mode (SIGTERM and SIGINT).

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Shutdown coordinator
pub struct ShutdownCoordinator {
    token: CancellationToken,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Token cancelled once shutdown starts
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Wait for SIGINT or SIGTERM (or an earlier cancel), then cancel the token.
    ///
    /// The token is cancelled even when a signal handler cannot be installed.
    pub async fn wait_for_signal(&self) -> std::io::Result<()> {
        let result = self.wait().await;
        self.token.cancel();
        result
    }

    async fn wait(&self) -> std::io::Result<()> {
        #[cfg(unix)]
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;

        #[cfg(unix)]
        let terminate = terminate.recv();

        #[cfg(not(unix))]
        let terminate = std::future::pending::<Option<()>>();

        tokio::select! {
            res = signal::ctrl_c() => {
                res?;
                info!("Received SIGINT, stopping scheduler");
            }
            _ = terminate => {
                info!("Received SIGTERM, stopping scheduler");
            }
            _ = self.token.cancelled() => {}
        }

        Ok(())
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
