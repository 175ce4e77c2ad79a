//! Geofenced check-in orchestration.
//!
//! One attempt is stateless and all-or-nothing: the branch list is read as a
//! snapshot, the geofence is verified, and only a fully verified attempt
//! appends a record. Every failure is classified and reported to the user;
//! nothing here retries on its own and nothing crashes the caller.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::geo::{verify_within_geofence, Coordinate, GeofenceCheck};
use crate::models::{AttendanceRecord, BranchLocation, RecordType, User};
use crate::storage::StorageError;

/// Why the device could not produce a position.
///
/// Reported by the client; each reason maps to its own user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionFailure {
    PermissionDenied,
    Unavailable,
    Timeout,
}

impl PositionFailure {
    /// Message shown to the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            PositionFailure::PermissionDenied => {
                "Location permission is blocked; enable location access in your browser settings"
            }
            PositionFailure::Unavailable => {
                "Could not get a real position fix; try again in an open area"
            }
            PositionFailure::Timeout => "The position request timed out; try again",
        }
    }
}

/// A device position as reported by the client.
///
/// Acquired with high-accuracy mode, a bounded wait, and no cached fix.
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct ReportedPosition {
    pub latitude: f64,
    pub longitude: f64,

    /// Device-reported GPS accuracy in meters
    pub accuracy: f64,
}

impl ReportedPosition {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Whether the user is arriving or leaving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInDirection {
    Arrival,
    Departure,
}

impl CheckInDirection {
    pub fn record_type(&self) -> RecordType {
        match self {
            CheckInDirection::Arrival => RecordType::LocAttendance,
            CheckInDirection::Departure => RecordType::LocDeparture,
        }
    }
}

/// Errors ending a check-in attempt. None of these crash the application;
/// all are surfaced to the user and a fresh attempt requires a new explicit
/// action.
#[derive(Debug, Error)]
pub enum CheckInError {
    #[error("{}", .0.user_message())]
    Position(PositionFailure),

    #[error("No branches registered for this user; contact an administrator")]
    NoBranches,

    #[error("Unknown branch: {0}")]
    UnknownBranch(String),

    /// A legitimate business rejection, not a system error. Carries the
    /// measured distance so the user sees how far out they were.
    #[error("Outside the allowed zone: {distance_meters:.0} m from {branch_name} (limit {max_meters:.0} m)")]
    OutOfRange {
        branch_name: String,
        distance_meters: f64,
        max_meters: f64,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Append-only sink for verified attendance records.
pub trait RecordStore: Send + Sync {
    fn append(&self, record: &AttendanceRecord) -> Result<(), StorageError>;
}

/// Read-only view of a user's registered branches.
pub trait BranchStore: Send + Sync {
    fn branches_for(&self, user_id: Uuid) -> Result<Vec<BranchLocation>, StorageError>;
}

/// A successful check-in: the stored record plus the geofence measurement.
#[derive(Debug, Clone)]
pub struct CheckInOutcome {
    pub record: AttendanceRecord,
    pub check: GeofenceCheck,
}

/// The check-in flow with its stores injected.
pub struct CheckInService<R, B> {
    records: R,
    branches: B,
    max_distance_meters: f64,
}

impl<R: RecordStore, B: BranchStore> CheckInService<R, B> {
    pub fn new(records: R, branches: B, max_distance_meters: f64) -> Self {
        Self {
            records,
            branches,
            max_distance_meters,
        }
    }

    /// Run one check-in attempt at the current time.
    pub fn check_in(
        &self,
        user: &User,
        branch_id: &str,
        position: Result<ReportedPosition, PositionFailure>,
        direction: CheckInDirection,
    ) -> Result<CheckInOutcome, CheckInError> {
        self.check_in_at(user, branch_id, position, direction, Utc::now())
    }

    /// Run one check-in attempt with an explicit timestamp.
    pub fn check_in_at(
        &self,
        user: &User,
        branch_id: &str,
        position: Result<ReportedPosition, PositionFailure>,
        direction: CheckInDirection,
        now: DateTime<Utc>,
    ) -> Result<CheckInOutcome, CheckInError> {
        // Snapshot of the branch list for the duration of this attempt
        let branches = self.branches.branches_for(user.id)?;
        if branches.is_empty() {
            return Err(CheckInError::NoBranches);
        }
        let branch = branches
            .iter()
            .find(|b| b.id == branch_id)
            .ok_or_else(|| CheckInError::UnknownBranch(branch_id.to_string()))?;

        let position = position.map_err(CheckInError::Position)?;

        let check = verify_within_geofence(
            position.coordinate(),
            branch.coordinate(),
            self.max_distance_meters,
        );

        if !check.within_range {
            warn!(
                user = %user.username,
                branch = %branch.name,
                distance_m = check.distance_meters,
                "Check-in rejected: outside geofence"
            );
            return Err(CheckInError::OutOfRange {
                branch_name: branch.name.clone(),
                distance_meters: check.distance_meters,
                max_meters: self.max_distance_meters,
            });
        }

        let location_link = format!(
            "https://www.google.com/maps?q={},{}",
            position.latitude, position.longitude
        );
        let record = AttendanceRecord::new(user.username.clone(), now, direction.record_type())
            .with_location(branch.name.clone(), location_link, position.accuracy);

        // Single atomic append; partial attempts never reach this point
        self.records.append(&record)?;

        info!(
            user = %user.username,
            branch = %branch.name,
            distance_m = check.distance_meters,
            kind = record.record_type.as_str(),
            "Check-in recorded"
        );

        Ok(CheckInOutcome { record, check })
    }
}
