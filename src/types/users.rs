//! User directory records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access role of a console user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Manager,
    Technician,
    Viewer,
}

impl UserRole {
    pub fn display_name(&self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::Manager => "Manager",
            UserRole::Technician => "Technician",
            UserRole::Viewer => "Viewer",
        }
    }

    pub fn all() -> &'static [UserRole] {
        &[
            UserRole::Admin,
            UserRole::Manager,
            UserRole::Technician,
            UserRole::Viewer,
        ]
    }
}

/// A user in the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    pub name: String,

    #[serde(default)]
    pub email: Option<String>,

    pub role: UserRole,

    /// Deactivated users stay listed for audit history but cannot sign in.
    #[serde(default = "default_active")]
    pub active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_defaults_to_active() {
        let json = r#"{
            "id": 1,
            "name": "A. Render",
            "role": "viewer",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.active);
        assert_eq!(user.role, UserRole::Viewer);
    }
}
