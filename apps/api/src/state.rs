use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::subscriptions::{PgSubscriptionRepository, SubscriptionRepository};
use crate::users::{PgUserRepository, UserRepository};
use crate::visits::{PgVisitRepository, VisitRepository};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub visits: Arc<dyn VisitRepository>,
    pub config: Config,
}

impl AppState {
    /// Wires every repository to the same PostgreSQL pool.
    pub fn postgres(pool: PgPool, config: Config) -> Self {
        AppState {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            subscriptions: Arc::new(PgSubscriptionRepository::new(pool.clone())),
            visits: Arc::new(PgVisitRepository::new(pool)),
            config,
        }
    }
}
