//! Registration: turning form input into records.
//!
//! The form widget only deals in strings. This module declares what each
//! kind's form contains ([`schema`]), converts entered strings into the
//! typed JSON the backend expects ([`build_payload`]), and derives drafts
//! for record duplication ([`duplicate`]).

use std::collections::HashMap;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use thiserror::Error;

pub mod duplicate;
pub mod schema;

pub use duplicate::{duplicate_record, duplicate_values, DuplicateError, DuplicateOutcome};
pub use schema::{fields_for, FieldKind, FieldSchema, SelectOption};

/// A field value the server would reject, caught before submission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("{0} is required")]
    MissingRequired(String),

    #[error("{0} must be a whole number")]
    InvalidNumber(String),

    #[error("{0} must be an amount like 249.99")]
    InvalidMoney(String),

    #[error("{0} must be a date like 2024-06-01")]
    InvalidDate(String),

    #[error("{field} has no option '{value}'")]
    InvalidOption { field: String, value: String },
}

/// Convert form values into the JSON payload for create/update.
///
/// Values are matched to `schemas` by key. Empty optional fields are left
/// out of the payload entirely; empty required fields fail. The first
/// invalid field aborts, in schema order, so the form can focus it.
pub fn build_payload(
    schemas: &[FieldSchema],
    values: &HashMap<String, String>,
) -> Result<Value, RegistrationError> {
    let mut payload = Map::new();

    for schema in schemas {
        let raw = values.get(&schema.key).map(String::as_str).unwrap_or("");
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            if schema.required {
                return Err(RegistrationError::MissingRequired(schema.label.clone()));
            }
            continue;
        }

        let value = convert_field(schema, trimmed)?;
        payload.insert(schema.key.clone(), value);
    }

    Ok(Value::Object(payload))
}

fn convert_field(schema: &FieldSchema, text: &str) -> Result<Value, RegistrationError> {
    match schema.kind {
        FieldKind::Text | FieldKind::LongText => Ok(Value::String(text.to_string())),
        FieldKind::Number => text
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| RegistrationError::InvalidNumber(schema.label.clone())),
        FieldKind::Money => {
            let amount: f64 = text
                .parse()
                .map_err(|_| RegistrationError::InvalidMoney(schema.label.clone()))?;
            serde_json::Number::from_f64(amount)
                .map(Value::Number)
                .ok_or_else(|| RegistrationError::InvalidMoney(schema.label.clone()))
        }
        FieldKind::Date => {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map_err(|_| RegistrationError::InvalidDate(schema.label.clone()))?;
            Ok(Value::String(text.to_string()))
        }
        FieldKind::Select => {
            if schema.options.iter().any(|o| o.value == text) {
                Ok(Value::String(text.to_string()))
            } else {
                Err(RegistrationError::InvalidOption {
                    field: schema.label.clone(),
                    value: text.to_string(),
                })
            }
        }
        FieldKind::Flag => Ok(Value::Bool(text == "true" || text == "yes")),
    }
}

/// Stringify a fetched record's fields for form prefill, the inverse of
/// [`build_payload`]. Fields the record lacks, and nulls, stay absent so
/// the form shows its placeholders instead.
pub fn values_from_record(schemas: &[FieldSchema], record: &Value) -> HashMap<String, String> {
    let mut values = HashMap::new();

    for schema in schemas {
        let Some(field) = record.get(&schema.key) else {
            continue;
        };
        let text = match field {
            Value::Null => continue,
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        values.insert(schema.key.clone(), text);
    }

    values
}
