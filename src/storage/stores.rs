//! JSONL-backed implementations of the store seams.
//!
//! Attendance records are append-only; users, vacation requests and
//! location configs are replaced wholesale on save, which matches how the
//! admin flows edit them (a branch is deleted by omission from the saved
//! list, never by tombstone).

use uuid::Uuid;

use crate::checkin::{BranchStore, RecordStore};
use crate::models::{AttendanceRecord, BranchLocation, User, UserLocationConfig, VacationRequest};

use super::{EntityType, JsonlReader, JsonlWriter, StorageConfig, StorageError};

/// Append-only attendance record store.
#[derive(Debug, Clone)]
pub struct JsonlRecordStore {
    config: StorageConfig,
}

impl JsonlRecordStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Read every stored record.
    pub fn read_all(&self) -> Result<Vec<AttendanceRecord>, StorageError> {
        JsonlReader::for_entity(&self.config, EntityType::Record).read_all()
    }

    /// Replace the whole record file. Used only by administrative
    /// correction and deletion; the check-in flow never rewrites.
    pub fn write_all(&self, records: &[AttendanceRecord]) -> Result<usize, StorageError> {
        JsonlWriter::for_entity(&self.config, EntityType::Record).write_all(records)
    }
}

impl RecordStore for JsonlRecordStore {
    fn append(&self, record: &AttendanceRecord) -> Result<(), StorageError> {
        JsonlWriter::for_entity(&self.config, EntityType::Record).append(record)
    }
}

/// Per-user branch configuration store.
#[derive(Debug, Clone)]
pub struct JsonlBranchStore {
    config: StorageConfig,
}

impl JsonlBranchStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    fn read_configs(&self) -> Result<Vec<UserLocationConfig>, StorageError> {
        JsonlReader::for_entity(&self.config, EntityType::LocationConfig).read_all()
    }

    /// The stored config for one user, if any.
    pub fn config_for(&self, user_id: Uuid) -> Result<Option<UserLocationConfig>, StorageError> {
        Ok(self
            .read_configs()?
            .into_iter()
            .find(|c| c.user_id == user_id))
    }

    /// Replace one user's branch list wholesale, keeping every other
    /// user's config untouched.
    pub fn save_config(&self, config: UserLocationConfig) -> Result<(), StorageError> {
        let mut configs = self.read_configs()?;
        configs.retain(|c| c.user_id != config.user_id);
        configs.push(config);
        JsonlWriter::for_entity(&self.config, EntityType::LocationConfig).write_all(&configs)?;
        Ok(())
    }
}

impl BranchStore for JsonlBranchStore {
    fn branches_for(&self, user_id: Uuid) -> Result<Vec<BranchLocation>, StorageError> {
        Ok(self
            .config_for(user_id)?
            .map(|c| c.branches)
            .unwrap_or_default())
    }
}

/// Read all users.
pub fn read_users(config: &StorageConfig) -> Result<Vec<User>, StorageError> {
    JsonlReader::for_entity(config, EntityType::User).read_all()
}

/// Write the full user list.
pub fn write_users(config: &StorageConfig, users: &[User]) -> Result<usize, StorageError> {
    JsonlWriter::for_entity(config, EntityType::User).write_all(users)
}

/// Read all vacation requests.
pub fn read_vacations(config: &StorageConfig) -> Result<Vec<VacationRequest>, StorageError> {
    JsonlReader::for_entity(config, EntityType::VacationRequest).read_all()
}

/// Write the full vacation request list.
pub fn write_vacations(
    config: &StorageConfig,
    requests: &[VacationRequest],
) -> Result<usize, StorageError> {
    JsonlWriter::for_entity(config, EntityType::VacationRequest).write_all(requests)
}
