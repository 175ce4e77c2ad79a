use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::checkin::{
    CheckInDirection, CheckInError, CheckInService, PositionFailure, ReportedPosition,
};
use crate::models::AttendanceRecord;
use crate::storage::read_users;

#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    pub username: String,
    pub branch_id: String,
    pub direction: CheckInDirection,

    /// Present when the device produced a fix
    pub position: Option<ReportedPosition>,

    /// Present when position acquisition failed on the client
    pub position_error: Option<PositionFailure>,
}

#[derive(Debug, Serialize)]
pub struct CheckInResponse {
    pub accepted: bool,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<AttendanceRecord>,
}

/// Run one geofenced check-in attempt.
///
/// Business rejections (out of range, no position) come back as 200 with
/// `accepted: false` so the client can show the reason; only an unknown
/// user or branch is a 404, and only storage trouble is a 500.
pub async fn check_in(
    State(state): State<AppState>,
    Json(req): Json<CheckInRequest>,
) -> Result<Json<CheckInResponse>, ApiError> {
    let users = read_users(&state.storage)?;
    let user = users
        .iter()
        .find(|u| u.username == req.username)
        .ok_or_else(|| ApiError::NotFound(format!("user {}", req.username)))?;

    let position = match (req.position, req.position_error) {
        (Some(p), _) => Ok(p),
        (None, Some(e)) => Err(e),
        (None, None) => {
            return Err(ApiError::BadRequest(
                "Either position or position_error is required".to_string(),
            ))
        }
    };

    let service = CheckInService::new(
        state.records.as_ref().clone(),
        state.branches.as_ref().clone(),
        state.geofence.max_distance_meters,
    );

    match service.check_in(user, &req.branch_id, position, req.direction) {
        Ok(outcome) => Ok(Json(CheckInResponse {
            accepted: true,
            message: format!("Recorded at {}", outcome.record.branch_name.as_deref().unwrap_or("")),
            distance_meters: Some(outcome.check.distance_meters),
            record: Some(outcome.record),
        })),
        Err(CheckInError::UnknownBranch(id)) => {
            Err(ApiError::NotFound(format!("branch {}", id)))
        }
        Err(CheckInError::Storage(e)) => Err(ApiError::Internal(e.to_string())),
        Err(err @ CheckInError::OutOfRange {
            distance_meters, ..
        }) => Ok(Json(CheckInResponse {
            accepted: false,
            message: err.to_string(),
            distance_meters: Some(distance_meters),
            record: None,
        })),
        Err(err) => Ok(Json(CheckInResponse {
            accepted: false,
            message: err.to_string(),
            distance_meters: None,
            record: None,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::build_router;
    use crate::api::routes::test_support::{post_json, setup_test_state};
    use crate::geo::Coordinate;
    use crate::models::{BranchLocation, User, UserLocationConfig};
    use crate::storage::write_users;
    use axum::http::StatusCode;
    use tempfile::TempDir;

    fn seed_user_with_branch(state: &crate::api::state::AppState) -> (User, BranchLocation) {
        let user = User::new("samir".to_string(), "pw".to_string());
        write_users(&state.storage, &[user.clone()]).unwrap();

        let branch = BranchLocation::new(
            "Downtown".to_string(),
            "12 Nile St".to_string(),
            Coordinate::new(30.0, 31.0),
        );
        let mut config = UserLocationConfig::new(user.id);
        config.branches.push(branch.clone());
        state.branches.save_config(config).unwrap();

        (user, branch)
    }

    #[tokio::test]
    async fn test_check_in_within_range() {
        let dir = TempDir::new().unwrap();
        let state = setup_test_state(dir.path());
        let (_, branch) = seed_user_with_branch(&state);
        let records = state.records.clone();

        let (status, json) = post_json(
            build_router(state),
            "/api/checkin",
            serde_json::json!({
                "username": "samir",
                "branch_id": branch.id,
                "direction": "arrival",
                "position": { "latitude": 30.001, "longitude": 31.0, "accuracy": 12.0 }
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["accepted"], true);
        assert_eq!(json["record"]["type"], "loc_attendance");
        assert!(json["distance_meters"].as_f64().unwrap() < 200.0);
        assert_eq!(records.read_all().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_check_in_out_of_range_rejected_without_record() {
        let dir = TempDir::new().unwrap();
        let state = setup_test_state(dir.path());
        let (_, branch) = seed_user_with_branch(&state);
        let records = state.records.clone();

        let (status, json) = post_json(
            build_router(state),
            "/api/checkin",
            serde_json::json!({
                "username": "samir",
                "branch_id": branch.id,
                "direction": "arrival",
                "position": { "latitude": 30.03, "longitude": 31.0, "accuracy": 12.0 }
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["accepted"], false);
        assert!(json["distance_meters"].as_f64().unwrap() > 2000.0);
        assert!(json["message"].as_str().unwrap().contains("Downtown"));
        assert!(records.read_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_check_in_position_failure() {
        let dir = TempDir::new().unwrap();
        let state = setup_test_state(dir.path());
        let (_, branch) = seed_user_with_branch(&state);

        let (status, json) = post_json(
            build_router(state),
            "/api/checkin",
            serde_json::json!({
                "username": "samir",
                "branch_id": branch.id,
                "direction": "arrival",
                "position_error": "permission_denied"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["accepted"], false);
        assert!(json["message"]
            .as_str()
            .unwrap()
            .contains("Location permission"));
    }

    #[tokio::test]
    async fn test_check_in_unknown_branch_is_404() {
        let dir = TempDir::new().unwrap();
        let state = setup_test_state(dir.path());
        seed_user_with_branch(&state);

        let (status, _) = post_json(
            build_router(state),
            "/api/checkin",
            serde_json::json!({
                "username": "samir",
                "branch_id": "missing",
                "direction": "departure",
                "position": { "latitude": 30.0, "longitude": 31.0, "accuracy": 5.0 }
            }),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_check_in_unknown_user_is_404() {
        let dir = TempDir::new().unwrap();
        let state = setup_test_state(dir.path());

        let (status, _) = post_json(
            build_router(state),
            "/api/checkin",
            serde_json::json!({
                "username": "ghost",
                "branch_id": "x",
                "direction": "arrival",
                "position": { "latitude": 30.0, "longitude": 31.0, "accuracy": 5.0 }
            }),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_check_in_missing_position_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let state = setup_test_state(dir.path());
        let (_, branch) = seed_user_with_branch(&state);

        let (status, _) = post_json(
            build_router(state),
            "/api/checkin",
            serde_json::json!({
                "username": "samir",
                "branch_id": branch.id,
                "direction": "arrival"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
