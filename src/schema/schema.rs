//! Schema documents.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::Result;
use crate::schema::field::FieldMapping;

/// An ordered `properties` map of field definitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    fields: Vec<(String, FieldMapping)>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field unless one with the same name exists.
    ///
    /// Returns false when the name was taken.
    pub fn insert<S: Into<String>>(&mut self, name: S, field: FieldMapping) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.fields.push((name, field));
        true
    }

    pub fn get(&self, name: &str) -> Option<&FieldMapping> {
        self.fields
            .iter()
            .find(|(field_name, _)| field_name == name)
            .map(|(_, field)| field)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Field names in definition order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldMapping)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, field) in &self.fields {
            map.serialize_entry(name, field)?;
        }
        map.end()
    }
}

/// The structural schema of a registered type.
///
/// Serializes as `{"<name>": {"properties": {...}}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    name: String,
    properties: Properties,
}

struct SchemaBody<'a> {
    properties: &'a Properties,
}

impl Serialize for SchemaBody<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("properties", self.properties)?;
        map.end()
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(
            &self.name,
            &SchemaBody {
                properties: &self.properties,
            },
        )?;
        map.end()
    }
}

impl Schema {
    pub fn new<S: Into<String>>(name: S, properties: Properties) -> Self {
        Schema {
            name: name.into(),
            properties,
        }
    }

    /// The type name the schema is declared under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn field(&self, name: &str) -> Option<&FieldMapping> {
        self.properties.get(name)
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
