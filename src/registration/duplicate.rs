//! Duplicating catalog records under a derived clone name.
//!
//! Duplication fetches the source record, asks the backend which clone
//! relatives already exist, derives the next free name, and creates the
//! copy. Only products and components are clonable; assets carry unique
//! serials and the remaining kinds are journals or directories.

use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use tracing::info;

use crate::api::{ApiClient, ApiError, NameLookup};
use crate::naming::{clone_search_fragment, next_clone_name};
use crate::registration::{fields_for, values_from_record};
use crate::types::{Component, EntityKind, Product};

/// Result of a successful duplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateOutcome {
    /// Id the server assigned to the copy.
    pub new_id: i64,
    /// Name the copy was created under.
    pub clone_name: String,
}

#[derive(Error, Debug)]
pub enum DuplicateError {
    #[error("{0} records cannot be duplicated")]
    Unsupported(&'static str),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Duplicate the record `id` of `kind`, returning the new id and name.
pub async fn duplicate_record(
    client: &ApiClient,
    kind: EntityKind,
    id: i64,
) -> Result<DuplicateOutcome, DuplicateError> {
    match kind {
        EntityKind::Products => duplicate_product(client, id).await,
        EntityKind::Components => duplicate_component(client, id).await,
        other => Err(DuplicateError::Unsupported(other.display_name())),
    }
}

async fn duplicate_product(
    client: &ApiClient,
    id: i64,
) -> Result<DuplicateOutcome, DuplicateError> {
    let product = client.fetch_product(id).await?;
    let clone_name = resolve_clone_name(client, EntityKind::Products, &product.name).await?;

    let payload = product_draft(&product, &clone_name);
    let new_id = client.create(EntityKind::Products, &payload).await?;

    info!(source = id, new_id, name = %clone_name, "Duplicated product");
    Ok(DuplicateOutcome { new_id, clone_name })
}

async fn duplicate_component(
    client: &ApiClient,
    id: i64,
) -> Result<DuplicateOutcome, DuplicateError> {
    let component = client.fetch_component(id).await?;
    let clone_name = resolve_clone_name(client, EntityKind::Components, &component.name).await?;

    let payload = component_draft(&component, &clone_name);
    let new_id = client.create(EntityKind::Components, &payload).await?;

    info!(source = id, new_id, name = %clone_name, "Duplicated component");
    Ok(DuplicateOutcome { new_id, clone_name })
}

/// Derive the clone name for `base` from what the backend already holds.
///
/// The lookup is narrowed server-side to names containing the bare clone
/// form; [`next_clone_name`] then applies exact matching to the result.
pub async fn resolve_clone_name(
    lookup: &dyn NameLookup,
    kind: EntityKind,
    base: &str,
) -> Result<String, ApiError> {
    let existing = lookup
        .names_matching(kind, &clone_search_fragment(base))
        .await?;
    Ok(next_clone_name(base, &existing))
}

/// Prefill values for a duplicate registration form: the source record's
/// fields with the clone name substituted and the serial number left
/// empty for the new unit. The form is shown for review; nothing is
/// created until the user submits it.
pub async fn duplicate_values(
    lookup: &dyn NameLookup,
    kind: EntityKind,
    source: &Value,
) -> Result<HashMap<String, String>, DuplicateError> {
    if !kind.supports_duplicate() {
        return Err(DuplicateError::Unsupported(kind.display_name()));
    }

    let base = source.get("name").and_then(Value::as_str).unwrap_or_default();
    let clone_name = resolve_clone_name(lookup, kind, base).await?;

    let mut values = values_from_record(&fields_for(kind), source);
    values.insert("name".to_string(), clone_name);
    values.remove("serial_number");
    Ok(values)
}

/// Create payload for a product copy. Ids and timestamps belong to the
/// server; everything else carries over.
pub fn product_draft(product: &Product, clone_name: &str) -> Value {
    serde_json::json!({
        "name": clone_name,
        "category_id": product.category_id,
        "supplier_id": product.supplier_id,
        "price": product.price,
        "description": product.description,
    })
}

/// Create payload for a component copy. The serial number stays behind:
/// it identifies the physical unit, not the catalog entry.
pub fn component_draft(component: &Component, clone_name: &str) -> Value {
    serde_json::json!({
        "name": clone_name,
        "product_id": component.product_id,
        "quantity": component.quantity,
        "price": component.price,
        "purchase_date": component.purchase_date,
        "description": component.description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone, Utc};

    struct FixedNames(Vec<String>);

    #[async_trait]
    impl NameLookup for FixedNames {
        async fn names_matching(
            &self,
            _kind: EntityKind,
            _fragment: &str,
        ) -> Result<Vec<String>, ApiError> {
            Ok(self.0.clone())
        }
    }

    struct FailingLookup;

    #[async_trait]
    impl NameLookup for FailingLookup {
        async fn names_matching(
            &self,
            _kind: EntityKind,
            _fragment: &str,
        ) -> Result<Vec<String>, ApiError> {
            Err(ApiError::network("connection refused"))
        }
    }

    fn sample_component() -> Component {
        let stamp = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        Component {
            id: 12,
            name: "32GB DDR5".to_string(),
            serial_number: Some("SN-998877".to_string()),
            product_id: Some(7),
            product_name: Some("ThinkPad T14".to_string()),
            quantity: Some(4),
            price: Some(119.5),
            purchase_date: NaiveDate::from_ymd_opt(2024, 2, 14),
            description: Some("Spare memory".to_string()),
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[tokio::test]
    async fn test_resolve_clone_name_counts_existing() {
        let lookup = FixedNames(vec![
            "Laptop (clone)".to_string(),
            "Laptop (clone) (3)".to_string(),
        ]);
        let name = resolve_clone_name(&lookup, EntityKind::Products, "Laptop")
            .await
            .unwrap();
        assert_eq!(name, "Laptop (clone) (4)");
    }

    #[tokio::test]
    async fn test_resolve_clone_name_first_copy() {
        let lookup = FixedNames(Vec::new());
        let name = resolve_clone_name(&lookup, EntityKind::Components, "PSU")
            .await
            .unwrap();
        assert_eq!(name, "PSU (clone)");
    }

    #[tokio::test]
    async fn test_resolve_clone_name_propagates_lookup_failure() {
        let err = resolve_clone_name(&FailingLookup, EntityKind::Products, "Laptop")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Network { .. }));
    }

    #[test]
    fn test_component_draft_drops_serial_and_ids() {
        let component = sample_component();
        let draft = component_draft(&component, "32GB DDR5 (clone)");
        let object = draft.as_object().unwrap();

        assert_eq!(draft["name"], "32GB DDR5 (clone)");
        assert!(!object.contains_key("serial_number"));
        assert!(!object.contains_key("id"));
        assert!(!object.contains_key("created_at"));
        assert_eq!(draft["quantity"], 4);
        assert_eq!(draft["purchase_date"], "2024-02-14");
    }

    #[test]
    fn test_product_draft_keeps_catalog_fields() {
        let stamp = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let product = Product {
            id: 7,
            name: "ThinkPad T14".to_string(),
            category_id: Some(3),
            category_name: Some("Laptops".to_string()),
            supplier_id: None,
            supplier_name: None,
            price: Some(1249.99),
            description: None,
            created_at: stamp,
            updated_at: stamp,
        };

        let draft = product_draft(&product, "ThinkPad T14 (clone)");
        assert_eq!(draft["name"], "ThinkPad T14 (clone)");
        assert_eq!(draft["category_id"], 3);
        assert_eq!(draft["price"], 1249.99);
        assert_eq!(draft["supplier_id"], serde_json::Value::Null);
        assert!(!draft.as_object().unwrap().contains_key("id"));
    }

    #[tokio::test]
    async fn test_duplicate_values_prefill_for_review() {
        let lookup = FixedNames(vec!["32GB DDR5 (clone)".to_string()]);
        let source = serde_json::json!({
            "id": 12,
            "name": "32GB DDR5",
            "serial_number": "SN-998877",
            "product_id": 7,
            "quantity": 4,
            "price": 119.5,
            "created_at": "2024-03-01T09:00:00Z",
            "updated_at": "2024-03-01T09:00:00Z"
        });

        let values = duplicate_values(&lookup, EntityKind::Components, &source)
            .await
            .unwrap();

        assert_eq!(
            values.get("name").map(String::as_str),
            Some("32GB DDR5 (clone) (1)")
        );
        assert!(!values.contains_key("serial_number"));
        assert_eq!(values.get("quantity").map(String::as_str), Some("4"));
        assert_eq!(values.get("price").map(String::as_str), Some("119.5"));
    }

    #[tokio::test]
    async fn test_duplicate_values_rejects_unsupported_kind() {
        let lookup = FixedNames(Vec::new());
        let source = serde_json::json!({"id": 1, "name": "R. Waters"});
        let err = duplicate_values(&lookup, EntityKind::Users, &source)
            .await
            .unwrap_err();
        assert!(matches!(err, DuplicateError::Unsupported("Users")));
    }
}
