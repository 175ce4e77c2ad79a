//! Vacation requests and their approval lifecycle.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a vacation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VacationStatus {
    Pending,
    Approved,
    Rejected,
}

/// A vacation request awaiting (or past) an administrator decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacationRequest {
    pub id: Uuid,

    /// Requesting user
    pub user_id: Uuid,
    pub user_name: String,

    /// First requested day off
    pub start_date: NaiveDate,

    /// Last requested day off, inclusive
    pub end_date: NaiveDate,

    /// Free-form justification shown to the approver
    #[serde(default)]
    pub reason: String,

    pub status: VacationStatus,

    pub created_at: DateTime<Utc>,

    /// Username of the deciding administrator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
}

impl VacationRequest {
    /// Create a pending request.
    pub fn new(
        user_id: Uuid,
        user_name: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            user_name,
            start_date,
            end_date,
            reason,
            status: VacationStatus::Pending,
            created_at: Utc::now(),
            decided_by: None,
            decided_at: None,
        }
    }

    /// Record an administrator decision. Only pending requests can be decided.
    pub fn decide(&mut self, approve: bool, decided_by: String) -> bool {
        if self.status != VacationStatus::Pending {
            return false;
        }
        self.status = if approve {
            VacationStatus::Approved
        } else {
            VacationStatus::Rejected
        };
        self.decided_by = Some(decided_by);
        self.decided_at = Some(Utc::now());
        true
    }

    /// Number of requested days, inclusive of both ends.
    pub fn day_count(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> VacationRequest {
        VacationRequest::new(
            Uuid::new_v4(),
            "samir".to_string(),
            NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 7, 5).unwrap(),
            "family trip".to_string(),
        )
    }

    #[test]
    fn test_new_request_is_pending() {
        let req = request();
        assert_eq!(req.status, VacationStatus::Pending);
        assert!(req.decided_by.is_none());
        assert!(req.decided_at.is_none());
    }

    #[test]
    fn test_approve() {
        let mut req = request();
        assert!(req.decide(true, "admin".to_string()));
        assert_eq!(req.status, VacationStatus::Approved);
        assert_eq!(req.decided_by.as_deref(), Some("admin"));
        assert!(req.decided_at.is_some());
    }

    #[test]
    fn test_reject() {
        let mut req = request();
        assert!(req.decide(false, "admin".to_string()));
        assert_eq!(req.status, VacationStatus::Rejected);
    }

    #[test]
    fn test_cannot_decide_twice() {
        let mut req = request();
        assert!(req.decide(true, "admin".to_string()));
        assert!(!req.decide(false, "other".to_string()));
        // First decision stands
        assert_eq!(req.status, VacationStatus::Approved);
        assert_eq!(req.decided_by.as_deref(), Some("admin"));
    }

    #[test]
    fn test_day_count_inclusive() {
        let req = request();
        assert_eq!(req.day_count(), 5);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let req = request();
        let json = serde_json::to_string(&req).unwrap();
        let parsed: VacationRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req.id, parsed.id);
        assert_eq!(parsed.status, VacationStatus::Pending);
    }
}
