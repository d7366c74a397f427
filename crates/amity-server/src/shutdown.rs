//! Turns an OS shutdown signal into the process-wide stop flag.

use std::future::Future;
use std::io;

use tokio::sync::watch;
use tracing::{info, warn};

/// Wait for `signal`, then flip `shutdown` to `true`.
///
/// If the signal handler cannot be installed the flag is never set and this
/// future never completes, so the servers keep running until killed.
pub async fn forward_shutdown_signal<F>(signal: F, shutdown: watch::Sender<bool>)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            info!("Received shutdown signal");
            let _ = shutdown.send(true);
        }
        Err(e) => {
            warn!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
