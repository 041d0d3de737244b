//! Field schemas for the per-kind registration forms.
//!
//! Each entity kind declares its editable fields once. The form widget
//! renders from these schemas and [`super::build_payload`] turns the
//! entered strings back into typed JSON, so adding a column to a form is
//! one line here.

use serde::Serialize;

use crate::types::{AssetStatus, AuditStatus, EntityKind, RepairStatus, UserRole};

/// Input widget backing a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line text
    Text,
    /// Multi-line text
    LongText,
    /// Whole number (ids, quantities)
    Number,
    /// Decimal amount in the server's currency
    Money,
    /// Calendar date, entered as YYYY-MM-DD
    Date,
    /// One of a fixed option set
    Select,
    /// Yes/no toggle
    Flag,
}

/// One choice of a [`FieldKind::Select`] field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Value sent to the server.
    pub value: String,
    /// Label shown in the form.
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Declaration of a single form field.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    /// JSON field name on the wire.
    pub key: String,
    /// Label shown next to the input.
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub placeholder: Option<String>,
    pub max_length: Option<usize>,
    /// Choices for select fields, empty otherwise.
    pub options: Vec<SelectOption>,
}

impl FieldSchema {
    fn new(key: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind,
            required: false,
            placeholder: None,
            max_length: None,
            options: Vec::new(),
        }
    }

    pub fn text(key: &str, label: &str) -> Self {
        Self::new(key, label, FieldKind::Text)
    }

    pub fn long_text(key: &str, label: &str) -> Self {
        Self::new(key, label, FieldKind::LongText)
    }

    pub fn number(key: &str, label: &str) -> Self {
        Self::new(key, label, FieldKind::Number)
    }

    pub fn money(key: &str, label: &str) -> Self {
        Self::new(key, label, FieldKind::Money)
    }

    pub fn date(key: &str, label: &str) -> Self {
        Self::new(key, label, FieldKind::Date)
    }

    pub fn select(key: &str, label: &str, options: Vec<SelectOption>) -> Self {
        let mut schema = Self::new(key, label, FieldKind::Select);
        schema.options = options;
        schema
    }

    pub fn flag(key: &str, label: &str) -> Self {
        Self::new(key, label, FieldKind::Flag)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_placeholder(mut self, text: &str) -> Self {
        self.placeholder = Some(text.to_string());
        self
    }

    pub fn with_max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }
}

/// The form fields for registering or editing one record of `kind`,
/// in display order.
pub fn fields_for(kind: EntityKind) -> Vec<FieldSchema> {
    match kind {
        EntityKind::Assets => vec![
            FieldSchema::text("name", "Asset tag")
                .required()
                .with_placeholder("e.g. LT-0042")
                .with_max_length(64),
            FieldSchema::text("serial_number", "Serial number"),
            FieldSchema::select("status", "Status", status_options(AssetStatus::all())),
            FieldSchema::number("product_id", "Product id"),
            FieldSchema::text("assigned_to", "Assigned to"),
            FieldSchema::text("location", "Location"),
            FieldSchema::date("purchase_date", "Purchase date"),
            FieldSchema::long_text("notes", "Notes"),
        ],
        EntityKind::Products => vec![
            FieldSchema::text("name", "Name")
                .required()
                .with_placeholder("e.g. ThinkPad T14")
                .with_max_length(128),
            FieldSchema::number("category_id", "Category id"),
            FieldSchema::number("supplier_id", "Supplier id"),
            FieldSchema::money("price", "Unit price"),
            FieldSchema::long_text("description", "Description"),
        ],
        EntityKind::Components => vec![
            FieldSchema::text("name", "Name")
                .required()
                .with_placeholder("e.g. 32GB DDR5")
                .with_max_length(128),
            FieldSchema::text("serial_number", "Serial number"),
            FieldSchema::number("product_id", "Product id"),
            FieldSchema::number("quantity", "Quantity"),
            FieldSchema::money("price", "Unit price"),
            FieldSchema::date("purchase_date", "Purchase date"),
            FieldSchema::long_text("description", "Description"),
        ],
        EntityKind::Audits => vec![
            FieldSchema::number("asset_id", "Asset id").required(),
            FieldSchema::text("auditor", "Auditor"),
            FieldSchema::select("status", "Status", status_options(AuditStatus::all())),
            FieldSchema::date("scheduled_for", "Scheduled for"),
            FieldSchema::long_text("notes", "Notes"),
        ],
        EntityKind::Repairs => vec![
            FieldSchema::number("asset_id", "Asset id").required(),
            FieldSchema::text("title", "Title")
                .required()
                .with_placeholder("e.g. Broken hinge")
                .with_max_length(128),
            FieldSchema::select("status", "Status", status_options(RepairStatus::all())),
            FieldSchema::money("cost", "Cost"),
            FieldSchema::date("opened_on", "Opened on"),
            FieldSchema::date("closed_on", "Closed on"),
            FieldSchema::long_text("notes", "Notes"),
        ],
        EntityKind::Suppliers => vec![
            FieldSchema::text("name", "Name").required().with_max_length(128),
            FieldSchema::text("contact_name", "Contact"),
            FieldSchema::text("email", "Email"),
            FieldSchema::text("phone", "Phone"),
            FieldSchema::text("address", "Address"),
            FieldSchema::text("website", "Website"),
            FieldSchema::long_text("notes", "Notes"),
        ],
        EntityKind::Categories => vec![
            FieldSchema::text("name", "Name").required().with_max_length(64),
            FieldSchema::long_text("description", "Description"),
        ],
        EntityKind::Users => vec![
            FieldSchema::text("name", "Name").required().with_max_length(64),
            FieldSchema::text("email", "Email"),
            FieldSchema::select("role", "Role", status_options(UserRole::all())),
            FieldSchema::flag("active", "Active"),
        ],
    }
}

/// Wire value of a serde string enum, e.g. `AssetStatus::InUse` -> "in_use".
fn wire_name<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::new(),
    }
}

fn status_options<T: Serialize + HasDisplayName>(items: &[T]) -> Vec<SelectOption> {
    items
        .iter()
        .map(|item| SelectOption::new(wire_name(item), item.display_name()))
        .collect()
}

/// Shared accessor so select options can be built from any status enum.
trait HasDisplayName {
    fn display_name(&self) -> &'static str;
}

impl HasDisplayName for AssetStatus {
    fn display_name(&self) -> &'static str {
        AssetStatus::display_name(self)
    }
}

impl HasDisplayName for AuditStatus {
    fn display_name(&self) -> &'static str {
        AuditStatus::display_name(self)
    }
}

impl HasDisplayName for RepairStatus {
    fn display_name(&self) -> &'static str {
        RepairStatus::display_name(self)
    }
}

impl HasDisplayName for UserRole {
    fn display_name(&self) -> &'static str {
        UserRole::display_name(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_fields() {
        for kind in EntityKind::all() {
            let fields = fields_for(*kind);
            assert!(!fields.is_empty(), "{kind:?} has no form fields");
            assert!(
                fields.iter().any(|f| f.required),
                "{kind:?} has no required field"
            );
        }
    }

    #[test]
    fn test_select_fields_carry_options() {
        for kind in EntityKind::all() {
            for field in fields_for(*kind) {
                if field.kind == FieldKind::Select {
                    assert!(!field.options.is_empty(), "{}: empty select", field.key);
                }
            }
        }
    }

    #[test]
    fn test_wire_names_match_serde() {
        assert_eq!(wire_name(&AssetStatus::InUse), "in_use");
        assert_eq!(wire_name(&RepairStatus::InProgress), "in_progress");
        assert_eq!(wire_name(&UserRole::Admin), "admin");
    }

    #[test]
    fn test_clonable_kinds_name_field_is_first_and_required() {
        for kind in [EntityKind::Products, EntityKind::Components] {
            let fields = fields_for(kind);
            assert_eq!(fields[0].key, "name");
            assert!(fields[0].required);
        }
    }
}
