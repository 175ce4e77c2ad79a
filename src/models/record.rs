//! Attendance record model.

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use super::{EntityId, RecordId};

/// Kind of attendance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    /// Plain attendance mark
    Attendance,
    /// Annual vacation day
    Vacation,
    /// Off-site work assignment
    Mission,
    /// Location-verified arrival
    LocAttendance,
    /// Location-verified departure
    LocDeparture,
}

impl RecordType {
    /// Stable string form used for ID generation and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Attendance => "attendance",
            RecordType::Vacation => "vacation",
            RecordType::Mission => "mission",
            RecordType::LocAttendance => "loc_attendance",
            RecordType::LocDeparture => "loc_departure",
        }
    }

    /// Whether this type is only created through the geofenced check-in flow.
    pub fn is_location_verified(&self) -> bool {
        matches!(self, RecordType::LocAttendance | RecordType::LocDeparture)
    }
}

/// A single attendance entry.
///
/// Immutable once written, except for administrative type correction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Unique identifier (derived from user + timestamp + type)
    pub id: RecordId,

    /// Username the record belongs to
    pub user_name: String,

    /// When the record was created
    pub date: DateTime<Utc>,

    /// Weekday name, captured at creation time for display/export
    pub day_name: String,

    /// Kind of record
    #[serde(rename = "type")]
    pub record_type: RecordType,

    /// Hidden from non-admin history views
    #[serde(default)]
    pub is_private: bool,

    /// Branch the user checked in against (location-verified records only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,

    /// Map link constructed from the reported position (not an input)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_link: Option<String>,

    /// Device-reported GPS accuracy in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl AttendanceRecord {
    /// Create a new record with auto-generated ID.
    pub fn new(user_name: String, date: DateTime<Utc>, record_type: RecordType) -> Self {
        let id = EntityId::generate(&[&user_name, &date.to_rfc3339(), record_type.as_str()]);
        let day_name = weekday_name(date.weekday()).to_string();

        Self {
            id,
            user_name,
            date,
            day_name,
            record_type,
            is_private: false,
            branch_name: None,
            location_link: None,
            accuracy: None,
        }
    }

    /// Builder method to attach location-verification details.
    pub fn with_location(
        mut self,
        branch_name: String,
        location_link: String,
        accuracy: f64,
    ) -> Self {
        self.branch_name = Some(branch_name);
        self.location_link = Some(location_link);
        self.accuracy = Some(accuracy);
        self
    }

    /// Builder method to mark the record private.
    pub fn with_private(mut self, is_private: bool) -> Self {
        self.is_private = is_private;
        self
    }

    /// Calendar date of the record, used for pay-period grouping.
    pub fn calendar_date(&self) -> NaiveDate {
        self.date.date_naive()
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
