use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::extract::{AppJson, AppPath};
use crate::models::user::{NewUser, RegisterUserRequest, UpdateUserRequest, User};
use crate::password::hash_password;
use crate::state::AppState;
use crate::users::validation::{validate_registration, validate_user_update, EMAIL_TAKEN};
use crate::validation::FieldErrors;

pub fn user_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("User {id} not found"))
}

/// POST /users/register
pub async fn handle_register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let registration = validate_registration(req)?;

    if state.users.find_by_email(&registration.email).await?.is_some() {
        return Err(FieldErrors::single("email", EMAIL_TAKEN).into());
    }

    let password_hash = hash_password(registration.password, state.config.bcrypt_cost).await?;
    let user = state
        .users
        .insert(NewUser {
            first_name: registration.first_name,
            last_name: registration.last_name,
            email: registration.email,
            password_hash,
        })
        .await?;

    info!("Registered user {}", user.id);
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /users
pub async fn handle_list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.users.list().await?))
}

/// GET /users/:id
pub async fn handle_get_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<User>, AppError> {
    let user = state.users.find(id).await?.ok_or_else(|| user_not_found(id))?;
    Ok(Json(user))
}

/// PUT /users/:id
pub async fn handle_update_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    let mut user = state.users.find(id).await?.ok_or_else(|| user_not_found(id))?;
    validate_user_update(req)?.apply(&mut user);

    let user = state
        .users
        .update(&user)
        .await?
        .ok_or_else(|| user_not_found(id))?;

    info!("Updated user {id}");
    Ok(Json(user))
}

/// DELETE /users/:id
pub async fn handle_delete_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    if !state.users.delete(id).await? {
        return Err(user_not_found(id));
    }
    info!("Deleted user {id} and their subscriptions");
    Ok(StatusCode::NO_CONTENT)
}
