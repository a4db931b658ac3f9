//! Document structure produced and consumed by the mapping engine.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{MapperError, Result};

/// An ordered tree of field values.
///
/// Field order is insertion order. Values are JSON values: scalars, null,
/// nested objects and sequences.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: Map<String, Value>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Document { fields: Map::new() }
    }

    /// Add a field value, replacing any previous value of the field.
    pub fn add_field<S: Into<String>, V: Into<Value>>(&mut self, name: S, value: V) {
        self.fields.insert(name.into(), value.into());
    }

    /// Get a field value from the document.
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Get a string field value.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Check if the document has a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Remove a field from the document.
    pub fn remove_field(&mut self, name: &str) -> Option<Value> {
        self.fields.shift_remove(name)
    }

    /// Get all field names, in order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(|s| s.as_str()).collect()
    }

    /// Get all field values.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Wrap a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Document { fields }),
            other => Err(MapperError::value(format!(
                "a document must be a JSON object, found {other}"
            ))),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<Map<String, Value>> for Document {
    fn from(fields: Map<String, Value>) -> Self {
        Document { fields }
    }
}
