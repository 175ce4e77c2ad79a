use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{group_by_period, AttendanceRecord, RecordType};

#[derive(Debug, Deserialize)]
pub struct ListRecordsParams {
    /// Restrict to one user's records
    pub user: Option<String>,

    /// Include records marked private (admin views)
    #[serde(default)]
    pub include_private: bool,
}

#[derive(Debug, Serialize)]
pub struct PeriodGroup {
    pub label: String,
    pub start: String,
    pub end: String,
    pub records: Vec<AttendanceRecord>,
}

#[derive(Debug, Serialize)]
pub struct RecordsResponse {
    pub periods: Vec<PeriodGroup>,
    pub total: usize,
}

/// List records bucketed by pay period, newest first.
pub async fn list_records(
    State(state): State<AppState>,
    Query(params): Query<ListRecordsParams>,
) -> Result<Json<RecordsResponse>, ApiError> {
    let mut records = state.records.read_all()?;

    if let Some(user) = &params.user {
        records.retain(|r| &r.user_name == user);
    }
    if !params.include_private {
        records.retain(|r| !r.is_private);
    }

    // Descending date before grouping, so buckets come out newest-first
    records.sort_by(|a, b| b.date.cmp(&a.date));
    let total = records.len();

    let periods = group_by_period(records, |r| r.calendar_date())
        .into_iter()
        .map(|(period, records)| PeriodGroup {
            label: period.label(),
            start: period.start.to_string(),
            end: period.end.to_string(),
            records,
        })
        .collect();

    Ok(Json(RecordsResponse { periods, total }))
}

#[derive(Debug, Deserialize)]
pub struct CreateRecordRequest {
    pub user_name: String,

    #[serde(rename = "type")]
    pub record_type: RecordType,

    #[serde(default)]
    pub is_private: bool,
}

/// Create a plain attendance/vacation/mission record.
///
/// Location-verified types only exist through the check-in flow.
pub async fn create_record(
    State(state): State<AppState>,
    Json(req): Json<CreateRecordRequest>,
) -> Result<Json<AttendanceRecord>, ApiError> {
    if req.record_type.is_location_verified() {
        return Err(ApiError::BadRequest(
            "Location-verified records must go through the check-in endpoint".to_string(),
        ));
    }

    let record = AttendanceRecord::new(req.user_name, Utc::now(), req.record_type)
        .with_private(req.is_private);

    use crate::checkin::RecordStore;
    state.records.append(&record)?;

    Ok(Json(record))
}

#[derive(Debug, Deserialize)]
pub struct CorrectRecordRequest {
    #[serde(rename = "type")]
    pub record_type: RecordType,
}

/// Administrative type correction; the only mutation a stored record allows.
pub async fn correct_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CorrectRecordRequest>,
) -> Result<Json<AttendanceRecord>, ApiError> {
    let mut records = state.records.read_all()?;

    let record = records
        .iter_mut()
        .find(|r| r.id.as_str() == id)
        .ok_or_else(|| ApiError::NotFound(format!("record {}", id)))?;
    record.record_type = req.record_type;
    let corrected = record.clone();

    state.records.write_all(&records)?;
    Ok(Json(corrected))
}

/// Administrative record deletion.
pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut records = state.records.read_all()?;
    let before = records.len();
    records.retain(|r| r.id.as_str() != id);

    if records.len() == before {
        return Err(ApiError::NotFound(format!("record {}", id)));
    }

    state.records.write_all(&records)?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}
