//! User accounts and capability flags.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Explicit capability flags.
///
/// A fixed struct rather than an open-ended string map, so every call site
/// handles every flag. Records stored before the flags existed deserialize to
/// the legacy baseline via `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    /// View the full attendance history of all users
    #[serde(default = "default_true")]
    pub view_history: bool,

    /// Create, update and delete user accounts
    #[serde(default)]
    pub manage_users: bool,

    /// Edit per-user branch lists
    #[serde(default)]
    pub manage_branches: bool,

    /// Approve or reject vacation requests
    #[serde(default)]
    pub approve_vacations: bool,

    /// Export period reports as CSV
    #[serde(default = "default_true")]
    pub export_reports: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Permissions {
    /// Baseline legacy permissions: read and export, no administration.
    fn default() -> Self {
        Self {
            view_history: true,
            manage_users: false,
            manage_branches: false,
            approve_vacations: false,
            export_reports: true,
        }
    }
}

impl Permissions {
    /// Everything enabled; applied to admin accounts.
    pub fn all() -> Self {
        Self {
            view_history: true,
            manage_users: true,
            manage_branches: true,
            approve_vacations: true,
            export_reports: true,
        }
    }
}

/// A user account.
///
/// Passwords are compared in plaintext against the stored value. A known
/// weakness of the system being tracked here, kept as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,

    /// Login name, unique across users
    pub username: String,

    /// Stored plaintext password
    pub password: String,

    /// Administrator flag
    #[serde(default)]
    pub is_admin: bool,

    /// Capability flags; absent in old records, so defaulted
    #[serde(default)]
    pub permissions: Permissions,
}

impl User {
    /// Create a regular user with baseline permissions.
    pub fn new(username: String, password: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password,
            is_admin: false,
            permissions: Permissions::default(),
        }
    }

    /// Create an administrator with all capabilities.
    pub fn new_admin(username: String, password: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password,
            is_admin: true,
            permissions: Permissions::all(),
        }
    }

    /// Plaintext credential check.
    pub fn verify_password(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_has_baseline_permissions() {
        let user = User::new("samir".to_string(), "secret".to_string());

        assert!(!user.is_admin);
        assert!(user.permissions.view_history);
        assert!(user.permissions.export_reports);
        assert!(!user.permissions.manage_users);
        assert!(!user.permissions.approve_vacations);
    }

    #[test]
    fn test_admin_has_all_permissions() {
        let admin = User::new_admin("admin".to_string(), "admin".to_string());

        assert!(admin.is_admin);
        assert_eq!(admin.permissions, Permissions::all());
    }

    #[test]
    fn test_password_verification() {
        let user = User::new("samir".to_string(), "secret".to_string());

        assert!(user.verify_password("secret"));
        assert!(!user.verify_password("wrong"));
        assert!(!user.verify_password(""));
    }

    #[test]
    fn test_missing_permissions_defaults_to_baseline() {
        // A record stored before capability flags existed
        let json = r#"{
            "id": "7f0a1a86-6f4e-4a39-9a3e-2d1a35b2a111",
            "username": "legacy",
            "password": "pw"
        }"#;

        let user: User = serde_json::from_str(json).unwrap();

        assert_eq!(user.permissions, Permissions::default());
        assert!(!user.is_admin);
    }

    #[test]
    fn test_partial_permissions_fill_defaults() {
        let json = r#"{
            "id": "7f0a1a86-6f4e-4a39-9a3e-2d1a35b2a111",
            "username": "partial",
            "password": "pw",
            "permissions": { "manage_branches": true }
        }"#;

        let user: User = serde_json::from_str(json).unwrap();

        assert!(user.permissions.manage_branches);
        // Unspecified flags take the legacy baseline values
        assert!(user.permissions.view_history);
        assert!(!user.permissions.manage_users);
    }

    #[test]
    fn test_user_serialization_roundtrip() {
        let user = User::new_admin("admin".to_string(), "admin".to_string());
        let json = serde_json::to_string(&user).unwrap();
        let parsed: User = serde_json::from_str(&json).unwrap();

        assert_eq!(user.id, parsed.id);
        assert_eq!(user.permissions, parsed.permissions);
    }
}
