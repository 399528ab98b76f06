// Gym visits, each recorded against a subscription.

pub mod handlers;
pub mod repository;
pub mod validation;

pub use repository::{PgVisitRepository, VisitRepository};
