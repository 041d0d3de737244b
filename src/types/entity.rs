//! Entity kinds and kind-indexed record collections.
//!
//! Every browsable table in the console is one [`EntityKind`]. The kind
//! carries its REST path and display labels, and [`Records`] holds one
//! fetched page of whichever kind the user is looking at.

use serde::{Deserialize, Serialize};

use super::{Asset, Audit, Category, Component, Product, Repair, Supplier, User};

/// The record tables exposed by the inventory backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    #[default]
    Assets,
    Products,
    Components,
    Audits,
    Repairs,
    Suppliers,
    Categories,
    Users,
}

impl EntityKind {
    /// All kinds in navigation order.
    pub fn all() -> &'static [EntityKind] {
        &[
            EntityKind::Assets,
            EntityKind::Products,
            EntityKind::Components,
            EntityKind::Audits,
            EntityKind::Repairs,
            EntityKind::Suppliers,
            EntityKind::Categories,
            EntityKind::Users,
        ]
    }

    /// Heading used in the navbar and section titles.
    pub fn display_name(&self) -> &'static str {
        match self {
            EntityKind::Assets => "Assets",
            EntityKind::Products => "Products",
            EntityKind::Components => "Components",
            EntityKind::Audits => "Audits",
            EntityKind::Repairs => "Repairs",
            EntityKind::Suppliers => "Suppliers",
            EntityKind::Categories => "Categories",
            EntityKind::Users => "Users",
        }
    }

    /// Singular label for messages ("asset deleted", "new product").
    pub fn singular(&self) -> &'static str {
        match self {
            EntityKind::Assets => "asset",
            EntityKind::Products => "product",
            EntityKind::Components => "component",
            EntityKind::Audits => "audit",
            EntityKind::Repairs => "repair",
            EntityKind::Suppliers => "supplier",
            EntityKind::Categories => "category",
            EntityKind::Users => "user",
        }
    }

    /// Path segment under the API base URL.
    pub fn api_path(&self) -> &'static str {
        match self {
            EntityKind::Assets => "assets",
            EntityKind::Products => "products",
            EntityKind::Components => "components",
            EntityKind::Audits => "audits",
            EntityKind::Repairs => "repairs",
            EntityKind::Suppliers => "suppliers",
            EntityKind::Categories => "categories",
            EntityKind::Users => "users",
        }
    }

    /// Whether records of this kind can be duplicated with a clone name.
    /// Only catalog entries are clonable; assets carry unique serials and
    /// the remaining kinds are journals or directories.
    pub fn supports_duplicate(&self) -> bool {
        matches!(self, EntityKind::Products | EntityKind::Components)
    }
}

/// Per-kind record count for the overview panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub kind: EntityKind,
    pub total: u64,
}

/// One fetched page of records, tagged by kind.
///
/// The console shows one table at a time, so a single enum value replaces
/// eight parallel `Vec` fields and keeps selection logic in one place.
#[derive(Debug, Clone)]
pub enum Records {
    Assets(Vec<Asset>),
    Products(Vec<Product>),
    Components(Vec<Component>),
    Audits(Vec<Audit>),
    Repairs(Vec<Repair>),
    Suppliers(Vec<Supplier>),
    Categories(Vec<Category>),
    Users(Vec<User>),
}

impl Records {
    /// An empty page of the given kind.
    pub fn empty(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Assets => Records::Assets(Vec::new()),
            EntityKind::Products => Records::Products(Vec::new()),
            EntityKind::Components => Records::Components(Vec::new()),
            EntityKind::Audits => Records::Audits(Vec::new()),
            EntityKind::Repairs => Records::Repairs(Vec::new()),
            EntityKind::Suppliers => Records::Suppliers(Vec::new()),
            EntityKind::Categories => Records::Categories(Vec::new()),
            EntityKind::Users => Records::Users(Vec::new()),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Records::Assets(_) => EntityKind::Assets,
            Records::Products(_) => EntityKind::Products,
            Records::Components(_) => EntityKind::Components,
            Records::Audits(_) => EntityKind::Audits,
            Records::Repairs(_) => EntityKind::Repairs,
            Records::Suppliers(_) => EntityKind::Suppliers,
            Records::Categories(_) => EntityKind::Categories,
            Records::Users(_) => EntityKind::Users,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Records::Assets(v) => v.len(),
            Records::Products(v) => v.len(),
            Records::Components(v) => v.len(),
            Records::Audits(v) => v.len(),
            Records::Repairs(v) => v.len(),
            Records::Suppliers(v) => v.len(),
            Records::Categories(v) => v.len(),
            Records::Users(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Server id of the record at `index`, if in range.
    pub fn id_at(&self, index: usize) -> Option<i64> {
        match self {
            Records::Assets(v) => v.get(index).map(|r| r.id),
            Records::Products(v) => v.get(index).map(|r| r.id),
            Records::Components(v) => v.get(index).map(|r| r.id),
            Records::Audits(v) => v.get(index).map(|r| r.id),
            Records::Repairs(v) => v.get(index).map(|r| r.id),
            Records::Suppliers(v) => v.get(index).map(|r| r.id),
            Records::Categories(v) => v.get(index).map(|r| r.id),
            Records::Users(v) => v.get(index).map(|r| r.id),
        }
    }

    /// The record at `index` as a JSON object, for form prefill.
    pub fn json_at(&self, index: usize) -> Option<serde_json::Value> {
        match self {
            Records::Assets(v) => v.get(index).and_then(|r| serde_json::to_value(r).ok()),
            Records::Products(v) => v.get(index).and_then(|r| serde_json::to_value(r).ok()),
            Records::Components(v) => v.get(index).and_then(|r| serde_json::to_value(r).ok()),
            Records::Audits(v) => v.get(index).and_then(|r| serde_json::to_value(r).ok()),
            Records::Repairs(v) => v.get(index).and_then(|r| serde_json::to_value(r).ok()),
            Records::Suppliers(v) => v.get(index).and_then(|r| serde_json::to_value(r).ok()),
            Records::Categories(v) => v.get(index).and_then(|r| serde_json::to_value(r).ok()),
            Records::Users(v) => v.get(index).and_then(|r| serde_json::to_value(r).ok()),
        }
    }

    /// Display name of the record at `index`, if in range.
    pub fn name_at(&self, index: usize) -> Option<&str> {
        match self {
            Records::Assets(v) => v.get(index).map(|r| r.name.as_str()),
            Records::Products(v) => v.get(index).map(|r| r.name.as_str()),
            Records::Components(v) => v.get(index).map(|r| r.name.as_str()),
            Records::Audits(v) => v.get(index).map(|r| r.asset_name.as_str()),
            Records::Repairs(v) => v.get(index).map(|r| r.title.as_str()),
            Records::Suppliers(v) => v.get(index).map(|r| r.name.as_str()),
            Records::Categories(v) => v.get(index).map(|r| r.name.as_str()),
            Records::Users(v) => v.get(index).map(|r| r.name.as_str()),
        }
    }
}
