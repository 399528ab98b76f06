// Gym members: registration, lookup, name changes and removal.

pub mod handlers;
pub mod repository;
pub mod validation;

pub use repository::{PgUserRepository, UserRepository};
