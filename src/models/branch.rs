//! Branch locations and per-user location configuration.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::Coordinate;

/// A registered branch with its geographic position.
///
/// Branches are never mutated in place: an administrator replaces the owning
/// user's whole branch list on save, and a branch is deleted by omitting it
/// from the saved list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchLocation {
    /// Opaque identifier, assigned when the branch is first entered
    pub id: String,

    /// Display name ("Downtown", "Airport Road", ...)
    pub name: String,

    /// Street address, informational only
    pub address: String,

    /// Registered latitude in degrees
    pub latitude: f64,

    /// Registered longitude in degrees
    pub longitude: f64,
}

impl BranchLocation {
    /// Create a branch with a fresh opaque ID.
    pub fn new(name: String, address: String, coordinate: Coordinate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            address,
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
        }
    }

    /// The branch position as a coordinate pair.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// The ordered branch list an administrator registered for one user.
///
/// Order reflects UI insertion order and is preserved but carries no other
/// meaning. Configs are not cleaned up when the owning user is deleted;
/// orphans persist until an administrator saves over them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLocationConfig {
    /// ID of the user this config belongs to
    pub user_id: Uuid,

    /// Branches the user may check in against, in insertion order
    #[serde(default)]
    pub branches: Vec<BranchLocation>,
}

impl UserLocationConfig {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            branches: Vec::new(),
        }
    }

    /// Find a branch by its opaque ID.
    pub fn branch(&self, branch_id: &str) -> Option<&BranchLocation> {
        self.branches.iter().find(|b| b.id == branch_id)
    }
}
