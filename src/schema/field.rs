//! Schema field definitions.

use serde::{Deserialize, Serialize};

use crate::descriptor::{IndexMode, PayloadOptions, SchemaOptions, TermVector};
use crate::schema::schema::Properties;
use crate::signature::ScalarKind;

/// Stored flag as written in schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stored {
    Yes,
    No,
}

impl From<bool> for Stored {
    fn from(stored: bool) -> Self {
        if stored { Stored::Yes } else { Stored::No }
    }
}

/// A scalar field definition.
///
/// Only declared options are emitted; every other option is left for the
/// backend to derive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafField {
    #[serde(rename = "type")]
    pub field_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<Stored>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<IndexMode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_vector: Option<TermVector>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub omit_norms: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub omit_term_freq_and_positions: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_analyzer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_analyzer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_in_all: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision_step: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub null_value: Option<String>,
}

impl LeafField {
    /// A field of the given kind with no option declared.
    pub fn new(kind: ScalarKind) -> Self {
        LeafField {
            field_type: kind.schema_type().to_string(),
            store: None,
            index: None,
            term_vector: None,
            boost: None,
            omit_norms: None,
            omit_term_freq_and_positions: None,
            analyzer: None,
            index_analyzer: None,
            search_analyzer: None,
            include_in_all: None,
            precision_step: None,
            null_value: None,
        }
    }

    /// The reserved discriminator field.
    pub fn discriminator() -> Self {
        LeafField {
            include_in_all: Some(false),
            ..Self::new(ScalarKind::String)
        }
    }

    /// Build a field from the declared options of a property.
    ///
    /// Options that do not apply to `kind` are dropped:
    ///
    /// - booleans accept boost, index, store, term vector and omit tf
    /// - numbers and dates accept boost, include in all, precision step and store
    /// - strings and URIs accept everything but precision step
    pub fn from_options(
        kind: ScalarKind,
        schema: Option<&SchemaOptions>,
        payload: Option<&PayloadOptions>,
    ) -> Self {
        let mut field = Self::new(kind);
        field.null_value = payload
            .and_then(PayloadOptions::null_placeholder)
            .map(str::to_string);

        let Some(options) = schema else {
            return field;
        };

        field.store = options.stored().map(Stored::from);
        field.boost = options.boost_value();

        match kind {
            ScalarKind::Boolean => {
                field.index = options.index_mode();
                field.term_vector = options.term_vector_mode();
                field.omit_term_freq_and_positions = options.omits_tf();
            }
            kind if kind.is_textual() => {
                field.index = options.index_mode();
                field.term_vector = options.term_vector_mode();
                field.omit_norms = options.omits_norms();
                field.omit_term_freq_and_positions = options.omits_tf();
                field.include_in_all = options.included_in_all();
                match options.analyzer_pair() {
                    (Some(index), Some(search)) if index == search => {
                        field.analyzer = Some(index.to_string());
                    }
                    (index, search) => {
                        field.index_analyzer = index.map(str::to_string);
                        field.search_analyzer = search.map(str::to_string);
                    }
                }
            }
            _ => {
                field.include_in_all = options.included_in_all();
                field.precision_step = options.precision_step_value();
            }
        }

        field
    }
}

/// A nested object field definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectField {
    #[serde(rename = "type")]
    field_type: &'static str,
    pub properties: Properties,
}

impl ObjectField {
    pub fn new(properties: Properties) -> Self {
        ObjectField {
            field_type: "object",
            properties,
        }
    }
}

/// A field definition inside a `properties` map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldMapping {
    Leaf(LeafField),
    Object(ObjectField),
}

impl FieldMapping {
    pub fn as_leaf(&self) -> Option<&LeafField> {
        match self {
            FieldMapping::Leaf(leaf) => Some(leaf),
            FieldMapping::Object(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectField> {
        match self {
            FieldMapping::Object(object) => Some(object),
            FieldMapping::Leaf(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discriminator_field() {
        let json = serde_json::to_value(LeafField::discriminator()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "string", "include_in_all": false})
        );
    }

    #[test]
    fn test_string_options() {
        let options = SchemaOptions::new()
            .index(IndexMode::NotAnalyzed)
            .analyzer("french")
            .store(true)
            .precision_step(4);
        let field = LeafField::from_options(ScalarKind::String, Some(&options), None);
        let json = serde_json::to_value(&field).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "type": "string",
                "store": "yes",
                "index": "not_analyzed",
                "analyzer": "french"
            })
        );
    }

    #[test]
    fn test_split_analyzers() {
        let options = SchemaOptions::new()
            .analyzer("standard")
            .search_analyzer("simple");
        let field = LeafField::from_options(ScalarKind::Uri, Some(&options), None);

        assert_eq!(field.field_type, "string");
        assert_eq!(field.analyzer, None);
        assert_eq!(field.index_analyzer.as_deref(), Some("standard"));
        assert_eq!(field.search_analyzer.as_deref(), Some("simple"));
    }

    #[test]
    fn test_numeric_options() {
        let options = SchemaOptions::new()
            .precision_step(8)
            .analyzer("ignored")
            .index(IndexMode::No)
            .boost(1.5);
        let field = LeafField::from_options(ScalarKind::Long, Some(&options), None);

        assert_eq!(field.precision_step, Some(8));
        assert_eq!(field.boost, Some(1.5));
        assert_eq!(field.analyzer, None);
        assert_eq!(field.index, None);
    }

    #[test]
    fn test_boolean_options() {
        let options = SchemaOptions::new()
            .index(IndexMode::No)
            .omit_tf(true)
            .include_in_all(true);
        let field = LeafField::from_options(ScalarKind::Boolean, Some(&options), None);

        assert_eq!(field.index, Some(IndexMode::No));
        assert_eq!(field.omit_term_freq_and_positions, Some(true));
        assert_eq!(field.include_in_all, None);
    }

    #[test]
    fn test_null_value_from_payload() {
        let payload = PayloadOptions::new().null_value("n/a");
        let field = LeafField::from_options(ScalarKind::String, None, Some(&payload));
        assert_eq!(field.null_value.as_deref(), Some("n/a"));
    }
}
