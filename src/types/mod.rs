//! Record types for the inventory backend.
//!
//! These mirror the JSON shapes served by the REST API. Field names are
//! snake_case on both sides and optional columns deserialize with defaults,
//! so older servers that omit a column still parse.

mod assets;
mod catalog;
mod entity;
mod maintenance;
mod users;

pub use assets::{Asset, AssetStatus};
pub use catalog::{Category, Component, Product, Supplier};
pub use entity::{EntityKind, EntitySummary, Records};
pub use maintenance::{Audit, AuditStatus, Repair, RepairStatus};
pub use users::{User, UserRole};
