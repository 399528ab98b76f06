// Membership periods. Each subscription belongs to one user and owns its visits.

pub mod handlers;
pub mod repository;
pub mod validation;

pub use repository::{PgSubscriptionRepository, SubscriptionRepository};
