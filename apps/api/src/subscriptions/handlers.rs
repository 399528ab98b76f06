use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::extract::{AppJson, AppPath};
use crate::models::subscription::{Subscription, SubscriptionRequest};
use crate::state::AppState;
use crate::subscriptions::validation::{
    unknown_user, validate_new_subscription, validate_subscription_update,
};

pub fn subscription_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Subscription {id} not found"))
}

async fn ensure_user_exists(state: &AppState, user_id: i64) -> Result<(), AppError> {
    match state.users.find(user_id).await? {
        Some(_) => Ok(()),
        None => Err(unknown_user(user_id).into()),
    }
}

/// GET /subscriptions
pub async fn handle_list_subscriptions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Subscription>>, AppError> {
    Ok(Json(state.subscriptions.list().await?))
}

/// POST /subscriptions
pub async fn handle_create_subscription(
    State(state): State<AppState>,
    AppJson(req): AppJson<SubscriptionRequest>,
) -> Result<(StatusCode, Json<Subscription>), AppError> {
    let new_subscription = validate_new_subscription(req)?;
    ensure_user_exists(&state, new_subscription.user_id).await?;

    let subscription = state.subscriptions.insert(new_subscription).await?;
    info!(
        "Created subscription {} for user {}",
        subscription.id, subscription.user_id
    );
    Ok((StatusCode::CREATED, Json(subscription)))
}

/// GET /subscriptions/:id
pub async fn handle_get_subscription(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Subscription>, AppError> {
    let subscription = state
        .subscriptions
        .find(id)
        .await?
        .ok_or_else(|| subscription_not_found(id))?;
    Ok(Json(subscription))
}

/// PUT /subscriptions/:id
pub async fn handle_update_subscription(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<SubscriptionRequest>,
) -> Result<Json<Subscription>, AppError> {
    let existing = state
        .subscriptions
        .find(id)
        .await?
        .ok_or_else(|| subscription_not_found(id))?;

    let merged = validate_subscription_update(&existing, req)?;
    if merged.user_id != existing.user_id {
        ensure_user_exists(&state, merged.user_id).await?;
    }

    let subscription = state
        .subscriptions
        .update(&merged)
        .await?
        .ok_or_else(|| subscription_not_found(id))?;

    info!("Updated subscription {id}");
    Ok(Json(subscription))
}

/// DELETE /subscriptions/:id
pub async fn handle_delete_subscription(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    if !state.subscriptions.delete(id).await? {
        return Err(subscription_not_found(id));
    }
    info!("Deleted subscription {id} and its visits");
    Ok(StatusCode::NO_CONTENT)
}
