//! Shared tracing/logging initialization.
//!
//! The server binary and the integration harnesses set up
//! `tracing_subscriber` the same way: an env-filter plus either a
//! human-readable or a JSON formatting layer.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str =
    "amity_server=info,amity_social=info,amity_notify=info,amity_core=info";

/// Install the global tracing subscriber.
///
/// * `default_filter` -- used when the `RUST_LOG` env-var is not set.
/// * `log_json` -- emit structured JSON log lines instead of the
///   human-readable format.
///
/// Fails if a global subscriber has already been installed.
pub fn init_tracing(default_filter: &str, log_json: bool) -> Result<(), TryInitError> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(env_filter);
    if log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    }
}
