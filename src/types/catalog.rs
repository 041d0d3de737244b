//! Catalog records: products, components, and the directories they link to.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A product model in the catalog (e.g. a laptop model, not a physical unit).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,

    /// Catalog name; clone names derive from this on duplication.
    pub name: String,

    #[serde(default)]
    pub category_id: Option<i64>,

    /// Category name as joined by the server, for display only.
    #[serde(default)]
    pub category_name: Option<String>,

    #[serde(default)]
    pub supplier_id: Option<i64>,

    #[serde(default)]
    pub supplier_name: Option<String>,

    /// Unit price in the server's currency.
    #[serde(default)]
    pub price: Option<f64>,

    #[serde(default)]
    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A component kept in stock and fitted into assets (RAM stick, PSU, disk).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub id: i64,

    pub name: String,

    /// Vendor serial of this specific unit. Never copied on duplication.
    #[serde(default)]
    pub serial_number: Option<String>,

    /// Product this component belongs to, if tied to one model.
    #[serde(default)]
    pub product_id: Option<i64>,

    #[serde(default)]
    pub product_name: Option<String>,

    #[serde(default)]
    pub quantity: Option<u32>,

    #[serde(default)]
    pub price: Option<f64>,

    #[serde(default)]
    pub purchase_date: Option<NaiveDate>,

    #[serde(default)]
    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A supplier in the purchasing directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub id: i64,

    pub name: String,

    #[serde(default)]
    pub contact_name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub website: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A category grouping products and assets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
