//! Request payload parsing for catalog records
//!
//! Bodies arrive as JSON objects. Only the entity's known columns are
//! read; unknown keys are ignored.

use serde_json::{Map, Value};

use super::{CatalogEntity, ValidationError};

/// Validated insert for a catalog record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub name: String,
    /// Every attribute of the entity, absent ones as `None`
    pub attributes: Vec<(&'static str, Option<String>)>,
}

impl NewRecord {
    /// Build an insert from a request body.
    ///
    /// Fails when `name` is missing, null, empty or not a string.
    pub fn from_payload<E: CatalogEntity>(body: &Map<String, Value>) -> Result<Self, ValidationError> {
        let name = required_name(body.get("name"))?;

        let attributes = E::ATTRIBUTES
            .iter()
            .map(|&field| {
                let value = match body.get(field) {
                    Some(value) => text_value(field, value)?,
                    None => None,
                };
                Ok((field, value))
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        Ok(Self { name, attributes })
    }
}

/// Partial update for a catalog record
///
/// Holds only the fields present in the request. A present attribute set
/// to `None` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub name: Option<String>,
    pub attributes: Vec<(&'static str, Option<String>)>,
}

impl RecordPatch {
    /// Build a patch from a request body.
    ///
    /// A present `name` must still be non-empty.
    pub fn from_payload<E: CatalogEntity>(body: &Map<String, Value>) -> Result<Self, ValidationError> {
        let name = match body.get("name") {
            Some(value) => Some(required_name(Some(value))?),
            None => None,
        };

        let mut attributes = Vec::new();
        for &field in E::ATTRIBUTES {
            if let Some(value) = body.get(field) {
                attributes.push((field, text_value(field, value)?));
            }
        }

        Ok(Self { name, attributes })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.attributes.is_empty()
    }
}

/// Names are strings only; `0` or `false` are not names.
fn required_name(value: Option<&Value>) -> Result<String, ValidationError> {
    match value {
        Some(Value::String(name)) if !name.is_empty() => Ok(name.clone()),
        Some(Value::String(_)) | Some(Value::Null) | None => {
            Err(ValidationError::Required { field: "name" })
        }
        Some(_) => Err(ValidationError::InvalidFormat {
            field: "name",
            reason: "expected a string",
        }),
    }
}

/// Free-text columns accept strings, numbers and booleans.
fn text_value(field: &'static str, value: &Value) -> Result<Option<String>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) | Value::Object(_) => Err(ValidationError::InvalidFormat {
            field,
            reason: "expected text",
        }),
    }
}
