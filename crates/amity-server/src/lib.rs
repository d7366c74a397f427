//! Amity server wiring.
//!
//! Builds both HTTP services around one shared [`Authenticator`] and one
//! in-process broker, and owns the background tasks that outlive any
//! single request.

mod shutdown;
mod sweep;

use std::sync::Arc;

use amity_core::Authenticator;
use amity_core::auth::{InMemoryRevocationGate, JwtManager};
use amity_core::bus::{BrokerPublisher, InMemoryBroker};
use amity_notify::{ConsumerHandle, NotificationConsumer, NotificationDatabase, NotifyState};
use amity_social::{AccountService, FriendshipService, SocialDatabase, SocialState};
use axum::Router;

pub use shutdown::forward_shutdown_signal;
pub use sweep::spawn_revocation_sweep;

/// Settings fixed at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub jwt_secret: String,
    /// Lifetime of issued access tokens, in seconds.
    pub access_ttl: i64,
    /// Per-topic broker buffer.
    pub broker_capacity: usize,
}

/// Everything `main` needs to run and later shut down.
pub struct Services {
    pub social_router: Router,
    pub notify_router: Router,
    pub auth: Authenticator,
    pub broker: Arc<InMemoryBroker>,
    pub consumer: ConsumerHandle,
}

/// Wire both services together and start the notification consumer.
///
/// Must be called from within a Tokio runtime.
pub fn build_services(
    config: &ServerConfig,
    users_db: SocialDatabase,
    notifications_db: NotificationDatabase,
) -> Services {
    let jwt = Arc::new(JwtManager::new(config.jwt_secret.as_bytes(), config.access_ttl));
    let auth = Authenticator::new(jwt.clone(), Arc::new(InMemoryRevocationGate::new()));
    let broker = Arc::new(InMemoryBroker::with_capacity(config.broker_capacity));

    // Subscribe before any request can publish.
    let consumer = NotificationConsumer::start(&broker, notifications_db.clone());

    let publisher = Arc::new(BrokerPublisher::new(broker.clone()));
    let social_router = amity_social::build_router(SocialState {
        accounts: Arc::new(AccountService::new(users_db.clone(), jwt, auth.clone())),
        friendships: Arc::new(FriendshipService::new(users_db, publisher)),
        auth: auth.clone(),
    });
    let notify_router = amity_notify::build_router(NotifyState {
        db: notifications_db,
        auth: auth.clone(),
    });

    Services {
        social_router,
        notify_router,
        auth,
        broker,
        consumer,
    }
}
