use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::extract::{AppJson, AppPath};
use crate::models::visit::{CreateVisitRequest, UpdateVisitRequest, Visit};
use crate::state::AppState;
use crate::subscriptions::handlers::subscription_not_found;
use crate::visits::validation::{apply_visit_update, unknown_subscription, validate_new_visit};

fn visit_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Visit {id} not found"))
}

/// GET /visits
pub async fn handle_list_visits(State(state): State<AppState>) -> Result<Json<Vec<Visit>>, AppError> {
    Ok(Json(state.visits.list().await?))
}

/// GET /subscriptions/:id/visits
pub async fn handle_list_subscription_visits(
    State(state): State<AppState>,
    AppPath(subscription_id): AppPath<i64>,
) -> Result<Json<Vec<Visit>>, AppError> {
    if state.subscriptions.find(subscription_id).await?.is_none() {
        return Err(subscription_not_found(subscription_id));
    }
    let visits = state.visits.list_for_subscription(subscription_id).await?;
    Ok(Json(visits))
}

/// POST /visits
pub async fn handle_create_visit(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateVisitRequest>,
) -> Result<(StatusCode, Json<Visit>), AppError> {
    let new_visit = validate_new_visit(req)?;
    if state
        .subscriptions
        .find(new_visit.subscription_id)
        .await?
        .is_none()
    {
        return Err(unknown_subscription(new_visit.subscription_id).into());
    }

    let visit = state.visits.insert(new_visit).await?;
    info!(
        "Recorded visit {} on subscription {}",
        visit.id, visit.subscription_id
    );
    Ok((StatusCode::CREATED, Json(visit)))
}

/// GET /visits/:id
pub async fn handle_get_visit(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Visit>, AppError> {
    let visit = state.visits.find(id).await?.ok_or_else(|| visit_not_found(id))?;
    Ok(Json(visit))
}

/// PUT /visits/:id
pub async fn handle_update_visit(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<UpdateVisitRequest>,
) -> Result<Json<Visit>, AppError> {
    let mut visit = state.visits.find(id).await?.ok_or_else(|| visit_not_found(id))?;
    apply_visit_update(&mut visit, req);

    let visit = state
        .visits
        .update(&visit)
        .await?
        .ok_or_else(|| visit_not_found(id))?;

    info!("Updated visit {id}");
    Ok(Json(visit))
}

/// DELETE /visits/:id
pub async fn handle_delete_visit(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    if !state.visits.delete(id).await? {
        return Err(visit_not_found(id));
    }
    info!("Deleted visit {id}");
    Ok(StatusCode::NO_CONTENT)
}
