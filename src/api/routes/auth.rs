use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::Permissions;
use crate::storage::read_users;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// User view returned to the client; never echoes the stored password.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub is_admin: bool,
    pub permissions: Permissions,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserView,
}

/// Plaintext credential check against the stored user list.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let users = read_users(&state.storage)?;

    let user = users
        .iter()
        .find(|u| u.username == req.username && u.verify_password(&req.password))
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    Ok(Json(LoginResponse {
        user: UserView {
            id: user.id,
            username: user.username.clone(),
            is_admin: user.is_admin,
            permissions: user.permissions,
        },
    }))
}
