//! Amity Server
//!
//! Runs the relationship API and the notification API on two listeners,
//! joined by an in-process event broker.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use amity_core::tracing_init::{DEFAULT_FILTER, init_tracing};
use amity_notify::NotificationDatabase;
use amity_server::{
    ServerConfig, Services, build_services, forward_shutdown_signal, spawn_revocation_sweep,
};
use amity_social::SocialDatabase;

#[derive(Parser, Debug)]
#[command(name = "amity-server")]
#[command(version, about = "Amity server - friendships and notifications")]
struct Args {
    /// Address of the relationship API.
    #[arg(long, env = "USER_SERVICE_ADDR", default_value = "0.0.0.0:8081")]
    users_addr: SocketAddr,

    /// Address of the notification API.
    #[arg(long, env = "NOTIFICATION_SERVICE_ADDR", default_value = "0.0.0.0:8082")]
    notifications_addr: SocketAddr,

    /// SQLite file for accounts and friendships [default: ~/.amity/users.db].
    #[arg(long, env = "AMITY_USERS_DB")]
    users_db_path: Option<PathBuf>,

    /// SQLite file for notifications [default: ~/.amity/notifications.db].
    #[arg(long, env = "AMITY_NOTIFICATIONS_DB")]
    notifications_db_path: Option<PathBuf>,

    /// JWT signing and verification secret.
    #[arg(long, env = "AMITY_JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// Access token TTL in seconds.
    #[arg(long, env = "AMITY_ACCESS_TTL", default_value_t = 259_200)]
    access_ttl: i64,

    /// Messages buffered per broker topic.
    #[arg(long, default_value_t = 1024)]
    broker_capacity: usize,

    /// Seconds between purges of expired token revocations.
    #[arg(long, default_value_t = 3600)]
    revocation_sweep_interval: u64,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(DEFAULT_FILTER, args.log_json)?;

    anyhow::ensure!(!args.jwt_secret.is_empty(), "JWT secret must not be empty");
    anyhow::ensure!(args.access_ttl > 0, "Access token TTL must be positive");

    info!(
        version = env!("CARGO_PKG_VERSION"),
        users_addr = %args.users_addr,
        notifications_addr = %args.notifications_addr,
        "Starting amity-server"
    );

    let users_db_path = resolve_db_path(args.users_db_path.clone(), "users.db")?;
    let notifications_db_path =
        resolve_db_path(args.notifications_db_path.clone(), "notifications.db")?;
    let users_db = SocialDatabase::open(&users_db_path).await?;
    let notifications_db = NotificationDatabase::open(&notifications_db_path).await?;

    let config = ServerConfig {
        jwt_secret: args.jwt_secret.clone(),
        access_ttl: args.access_ttl,
        broker_capacity: args.broker_capacity,
    };
    let Services {
        social_router,
        notify_router,
        auth,
        broker: _broker,
        consumer,
    } = build_services(&config, users_db, notifications_db);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweep = spawn_revocation_sweep(
        auth.gate().clone(),
        Duration::from_secs(args.revocation_sweep_interval.max(1)),
        shutdown_rx.clone(),
    );

    let users_listener = TcpListener::bind(args.users_addr)
        .await
        .with_context(|| format!("Failed to bind {}", args.users_addr))?;
    let notifications_listener = TcpListener::bind(args.notifications_addr)
        .await
        .with_context(|| format!("Failed to bind {}", args.notifications_addr))?;
    info!(addr = %args.users_addr, "Relationship API listening");
    info!(addr = %args.notifications_addr, "Notification API listening");

    tokio::spawn(forward_shutdown_signal(tokio::signal::ctrl_c(), shutdown_tx));

    let users_server = axum::serve(users_listener, social_router)
        .with_graceful_shutdown(wait_for_shutdown(shutdown_rx.clone()));
    let notifications_server = axum::serve(notifications_listener, notify_router)
        .with_graceful_shutdown(wait_for_shutdown(shutdown_rx));

    let served = tokio::try_join!(
        async { users_server.await },
        async { notifications_server.await },
    );

    // Stop background work even if a listener failed.
    let stats = consumer.stop().await;
    sweep.abort();
    info!(
        processed = stats.processed,
        skipped = stats.skipped,
        failed = stats.failed,
        "Amity server stopped"
    );

    served?;
    Ok(())
}

async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}

fn resolve_db_path(explicit: Option<PathBuf>, file: &str) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home.join(".amity").join(file))
}
