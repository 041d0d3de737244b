//! Physical asset records and their lifecycle status.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a physical asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    InUse,
    InStorage,
    UnderRepair,
    Retired,
    Lost,
}

impl AssetStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            AssetStatus::InUse => "In use",
            AssetStatus::InStorage => "In storage",
            AssetStatus::UnderRepair => "Under repair",
            AssetStatus::Retired => "Retired",
            AssetStatus::Lost => "Lost",
        }
    }

    /// All statuses in the order offered by the status picker.
    pub fn all() -> &'static [AssetStatus] {
        &[
            AssetStatus::InUse,
            AssetStatus::InStorage,
            AssetStatus::UnderRepair,
            AssetStatus::Retired,
            AssetStatus::Lost,
        ]
    }
}

/// A physical unit tracked by inventory, tied to a catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: i64,

    /// Asset tag or hostname shown in listings.
    pub name: String,

    #[serde(default)]
    pub serial_number: Option<String>,

    pub status: AssetStatus,

    #[serde(default)]
    pub product_id: Option<i64>,

    #[serde(default)]
    pub product_name: Option<String>,

    /// Name of the user currently holding the asset.
    #[serde(default)]
    pub assigned_to: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub purchase_date: Option<NaiveDate>,

    #[serde(default)]
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
