//! Maintenance journals: audits and repairs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Outcome state of a scheduled audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Scheduled,
    Passed,
    Failed,
}

impl AuditStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            AuditStatus::Scheduled => "Scheduled",
            AuditStatus::Passed => "Passed",
            AuditStatus::Failed => "Failed",
        }
    }

    pub fn all() -> &'static [AuditStatus] {
        &[
            AuditStatus::Scheduled,
            AuditStatus::Passed,
            AuditStatus::Failed,
        ]
    }
}

/// A scheduled or completed audit of one asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Audit {
    pub id: i64,

    pub asset_id: i64,

    /// Asset name as joined by the server; listings show this, not the id.
    pub asset_name: String,

    #[serde(default)]
    pub auditor: Option<String>,

    pub status: AuditStatus,

    #[serde(default)]
    pub scheduled_for: Option<NaiveDate>,

    #[serde(default)]
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Progress state of a repair ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStatus {
    Open,
    InProgress,
    Resolved,
    Cancelled,
}

impl RepairStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            RepairStatus::Open => "Open",
            RepairStatus::InProgress => "In progress",
            RepairStatus::Resolved => "Resolved",
            RepairStatus::Cancelled => "Cancelled",
        }
    }

    pub fn all() -> &'static [RepairStatus] {
        &[
            RepairStatus::Open,
            RepairStatus::InProgress,
            RepairStatus::Resolved,
            RepairStatus::Cancelled,
        ]
    }
}

/// A repair ticket opened against one asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repair {
    pub id: i64,

    pub asset_id: i64,

    #[serde(default)]
    pub asset_name: Option<String>,

    /// Short problem summary shown in listings.
    pub title: String,

    pub status: RepairStatus,

    /// Repair cost in the server's currency, once known.
    #[serde(default)]
    pub cost: Option<f64>,

    #[serde(default)]
    pub opened_on: Option<NaiveDate>,

    #[serde(default)]
    pub closed_on: Option<NaiveDate>,

    #[serde(default)]
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_parses_row() {
        let json = r#"{
            "id": 5,
            "asset_id": 3,
            "asset_name": "LT-0042",
            "auditor": "M. Vane",
            "status": "scheduled",
            "scheduled_for": "2024-06-01",
            "created_at": "2024-05-01T12:00:00Z",
            "updated_at": "2024-05-01T12:00:00Z"
        }"#;
        let audit: Audit = serde_json::from_str(json).unwrap();
        assert_eq!(audit.status, AuditStatus::Scheduled);
        assert_eq!(audit.asset_name, "LT-0042");
    }

    #[test]
    fn test_repair_status_round_trips() {
        for status in RepairStatus::all() {
            let json = serde_json::to_string(status).unwrap();
            let back: RepairStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, *status);
        }
    }
}
