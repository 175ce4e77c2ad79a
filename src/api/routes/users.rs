use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::routes::auth::UserView;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Permissions, User};
use crate::storage::{read_users, write_users};

fn view(user: &User) -> UserView {
    UserView {
        id: user.id,
        username: user.username.clone(),
        is_admin: user.is_admin,
        permissions: user.permissions,
    }
}

/// All accounts, without passwords.
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserView>>, ApiError> {
    let users = read_users(&state.storage)?;
    Ok(Json(users.iter().map(view).collect()))
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,

    #[serde(default)]
    pub is_admin: bool,
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<UserView>, ApiError> {
    if req.username.trim().is_empty() {
        return Err(ApiError::BadRequest("Username must not be empty".to_string()));
    }

    let mut users = read_users(&state.storage)?;
    if users.iter().any(|u| u.username == req.username) {
        return Err(ApiError::BadRequest(format!(
            "Username {} is already taken",
            req.username
        )));
    }

    let user = if req.is_admin {
        User::new_admin(req.username, req.password)
    } else {
        User::new(req.username, req.password)
    };
    users.push(user.clone());
    write_users(&state.storage, &users)?;

    Ok(Json(view(&user)))
}

/// Partial account update; absent fields are left alone.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub password: Option<String>,
    pub is_admin: Option<bool>,
    pub permissions: Option<Permissions>,
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserView>, ApiError> {
    let mut users = read_users(&state.storage)?;

    let user = users
        .iter_mut()
        .find(|u| u.id == id)
        .ok_or_else(|| ApiError::NotFound(format!("user {}", id)))?;

    if let Some(password) = req.password {
        user.password = password;
    }
    if let Some(is_admin) = req.is_admin {
        user.is_admin = is_admin;
    }
    if let Some(permissions) = req.permissions {
        user.permissions = permissions;
    }
    let updated = view(user);

    write_users(&state.storage, &users)?;
    Ok(Json(updated))
}

/// Delete an account. The user's location config is left in place; an
/// administrator re-creating the user gets a fresh ID and starts clean.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut users = read_users(&state.storage)?;
    let before = users.len();
    users.retain(|u| u.id != id);

    if users.len() == before {
        return Err(ApiError::NotFound(format!("user {}", id)));
    }

    write_users(&state.storage, &users)?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}
