//! Filesystem persistence.
//!
//! One JSONL file per entity type under the data directory. JSONL is the
//! source of truth; attendance records are append-only, the other files are
//! replaced wholesale on save.

mod jsonl;
mod stores;

pub use jsonl::*;
pub use stores::*;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(EntityType::User.filename())
    }

    pub fn records_path(&self) -> PathBuf {
        self.data_dir.join(EntityType::Record.filename())
    }

    pub fn vacations_path(&self) -> PathBuf {
        self.data_dir.join(EntityType::VacationRequest.filename())
    }

    pub fn locations_path(&self) -> PathBuf {
        self.data_dir.join(EntityType::LocationConfig.filename())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
