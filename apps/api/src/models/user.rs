use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A gym member. The password hash is write-only and never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Body of `POST /users/register`.
/// Every field is optional at this layer so that missing fields are
/// reported by validation together with any other problem.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body of `PUT /users/:id`. Only the name fields can change here;
/// email and password keys are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// A validated member ready to be stored.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}
