//! Periodic purge of expired revocation entries.

use std::sync::Arc;
use std::time::Duration;

use amity_core::auth::RevocationGate;
use amity_core::db::unix_timestamp;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Spawn a task that calls [`RevocationGate::purge_expired`] every
/// `interval` until `shutdown` changes.
pub fn spawn_revocation_sweep(
    gate: Arc<dyn RevocationGate>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        timer.tick().await; // Skip first immediate tick

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    let removed = gate.purge_expired(unix_timestamp());
                    if removed > 0 {
                        info!(removed, "Expired revocations purged");
                    } else {
                        debug!("Revocation sweep found nothing to purge");
                    }
                }
                _ = shutdown.changed() => {
                    debug!("Revocation sweep shutting down");
                    return;
                }
            }
        }
    })
}
