use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::geo::Coordinate;
use crate::models::{BranchLocation, UserLocationConfig};
use crate::resolve::resolve_and_parse;

#[derive(Debug, Serialize)]
pub struct BranchesResponse {
    pub user_id: Uuid,
    pub branches: Vec<BranchLocation>,

    /// How long the client should wait for a position fix before giving up
    pub position_timeout_seconds: u64,
}

/// The branch list registered for one user; empty if none was saved.
///
/// Carries the position timeout so the client uses the server-configured
/// bound when it asks the device for a fix.
pub async fn get_branches(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<BranchesResponse>, ApiError> {
    let config = state
        .branches
        .config_for(user_id)?
        .unwrap_or_else(|| UserLocationConfig::new(user_id));

    Ok(Json(BranchesResponse {
        user_id,
        branches: config.branches,
        position_timeout_seconds: state.geofence.position_timeout_seconds,
    }))
}

/// A branch as submitted by the admin UI. An omitted id means a new entry.
#[derive(Debug, Deserialize)]
pub struct BranchInput {
    pub id: Option<String>,
    pub name: String,

    #[serde(default)]
    pub address: String,

    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
pub struct PutBranchesRequest {
    pub branches: Vec<BranchInput>,
}

/// Replace one user's branch list wholesale.
///
/// The submitted list is the new truth: entries omitted from it are gone.
pub async fn put_branches(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<PutBranchesRequest>,
) -> Result<Json<BranchesResponse>, ApiError> {
    let mut config = UserLocationConfig::new(user_id);
    for input in req.branches {
        if !input.latitude.is_finite() || !input.longitude.is_finite() {
            return Err(ApiError::BadRequest(format!(
                "Branch {} has a non-finite coordinate",
                input.name
            )));
        }
        let mut branch = BranchLocation::new(
            input.name,
            input.address,
            Coordinate::new(input.latitude, input.longitude),
        );
        if let Some(id) = input.id {
            branch.id = id;
        }
        config.branches.push(branch);
    }

    state.branches.save_config(config.clone())?;

    Ok(Json(BranchesResponse {
        user_id,
        branches: config.branches,
        position_timeout_seconds: state.geofence.position_timeout_seconds,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ResolveLocationRequest {
    /// Raw coordinate pair, full map link, or short link
    pub input: String,
}

#[derive(Debug, Serialize)]
pub struct ResolveLocationResponse {
    pub latitude: f64,
    pub longitude: f64,
}

/// Turn admin-pasted location input into a coordinate, expanding short
/// links through the configured resolver.
pub async fn resolve_location(
    State(state): State<AppState>,
    Json(req): Json<ResolveLocationRequest>,
) -> Result<Json<ResolveLocationResponse>, ApiError> {
    let coord = resolve_and_parse(state.resolver.as_ref(), &req.input)
        .await
        .map_err(|e| ApiError::BadRequest(format!("Could not resolve location: {}", e)))?;

    Ok(Json(ResolveLocationResponse {
        latitude: coord.latitude,
        longitude: coord.longitude,
    }))
}
