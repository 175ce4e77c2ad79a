use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{VacationRequest, VacationStatus};
use crate::storage::{read_users, read_vacations, write_vacations};

#[derive(Debug, Deserialize)]
pub struct ListVacationsParams {
    pub status: Option<VacationStatus>,
    pub user: Option<String>,
}

pub async fn list_vacations(
    State(state): State<AppState>,
    Query(params): Query<ListVacationsParams>,
) -> Result<Json<Vec<VacationRequest>>, ApiError> {
    let mut requests = read_vacations(&state.storage)?;

    if let Some(status) = params.status {
        requests.retain(|r| r.status == status);
    }
    if let Some(user) = &params.user {
        requests.retain(|r| &r.user_name == user);
    }

    // Newest first
    requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(requests))
}

#[derive(Debug, Deserialize)]
pub struct CreateVacationRequest {
    pub username: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    #[serde(default)]
    pub reason: String,
}

pub async fn create_vacation(
    State(state): State<AppState>,
    Json(req): Json<CreateVacationRequest>,
) -> Result<Json<VacationRequest>, ApiError> {
    if req.end_date < req.start_date {
        return Err(ApiError::BadRequest(
            "end_date must not be before start_date".to_string(),
        ));
    }

    let users = read_users(&state.storage)?;
    let user = users
        .iter()
        .find(|u| u.username == req.username)
        .ok_or_else(|| ApiError::NotFound(format!("user {}", req.username)))?;

    let request = VacationRequest::new(
        user.id,
        user.username.clone(),
        req.start_date,
        req.end_date,
        req.reason,
    );

    let mut requests = read_vacations(&state.storage)?;
    requests.push(request.clone());
    write_vacations(&state.storage, &requests)?;

    Ok(Json(request))
}

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub approve: bool,
    pub decided_by: String,
}

/// Approve or reject a pending request. A decided request stays decided;
/// a second decision is rejected rather than overwritten.
pub async fn decide_vacation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<DecisionRequest>,
) -> Result<Json<VacationRequest>, ApiError> {
    let mut requests = read_vacations(&state.storage)?;

    let request = requests
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| ApiError::NotFound(format!("vacation request {}", id)))?;

    if !request.decide(req.approve, req.decided_by) {
        return Err(ApiError::BadRequest(
            "Request has already been decided".to_string(),
        ));
    }
    let decided = request.clone();

    write_vacations(&state.storage, &requests)?;
    Ok(Json(decided))
}
