pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::subscriptions::handlers as subscriptions;
use crate::users::handlers as users;
use crate::visits::handlers as visits;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Users
        .route("/users", get(users::handle_list_users))
        .route("/users/register", post(users::handle_register))
        .route(
            "/users/:id",
            get(users::handle_get_user)
                .put(users::handle_update_user)
                .delete(users::handle_delete_user),
        )
        // Subscriptions
        .route(
            "/subscriptions",
            get(subscriptions::handle_list_subscriptions)
                .post(subscriptions::handle_create_subscription),
        )
        .route(
            "/subscriptions/:id",
            get(subscriptions::handle_get_subscription)
                .put(subscriptions::handle_update_subscription)
                .delete(subscriptions::handle_delete_subscription),
        )
        .route(
            "/subscriptions/:id/visits",
            get(visits::handle_list_subscription_visits),
        )
        // Visits
        .route(
            "/visits",
            get(visits::handle_list_visits).post(visits::handle_create_visit),
        )
        .route(
            "/visits/:id",
            get(visits::handle_get_visit)
                .put(visits::handle_update_visit)
                .delete(visits::handle_delete_visit),
        )
        .with_state(state)
}
