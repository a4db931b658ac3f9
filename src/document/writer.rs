//! Object to document serialization.

use serde_json::Value;

use crate::attribute::ResolvedProperty;
use crate::descriptor::{ClassRef, Entity, PayloadOptions};
use crate::document::codec;
use crate::document::document::Document;
use crate::error::{MapperError, Result};
use crate::registry::TypeRegistry;
use crate::signature::TypeSignature;
use crate::value::FieldRef;

/// Writes mapped objects into documents.
#[derive(Debug, Clone, Copy)]
pub struct DocumentWriter<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> DocumentWriter<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        DocumentWriter { registry }
    }

    /// Write `object` into a new document.
    ///
    /// Payload-visible properties are written in declaration order, then the
    /// discriminator field with the exact runtime type of `object`. A null
    /// identifier is left out so that the store can assign one.
    pub fn write(&self, object: &dyn Entity) -> Result<Document> {
        let class = object.class();
        self.registry.check(class)?;

        let attributes = self.registry.attributes().properties(class);
        let config = self.registry.config();
        let mut document = Document::new();

        for property in attributes.payload_properties() {
            let value = property
                .descriptor()
                .read(object.as_any())
                .map_err(|e| property_error(class, property, e))?;

            if value.is_null() && property.display_name() == config.identifier_field {
                continue;
            }

            let encoded = self
                .write_property(class, property, value)
                .map_err(|e| property_error(class, property, e))?;
            document.add_field(property.display_name(), encoded);
        }

        document.add_field(
            config.discriminator_field.as_str(),
            Value::String(class.type_path().to_string()),
        );
        Ok(document)
    }

    fn write_property(
        &self,
        class: ClassRef,
        property: &ResolvedProperty,
        value: FieldRef<'_>,
    ) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        let signature = self
            .registry
            .signatures()
            .property(class, property.descriptor())?;
        let date_format = property
            .policy()
            .payload()
            .and_then(PayloadOptions::date_format)
            .or(self.registry.config().date_format.as_deref());
        self.write_value(&signature, value, date_format)
    }

    fn write_value(
        &self,
        signature: &TypeSignature,
        value: FieldRef<'_>,
        date_format: Option<&str>,
    ) -> Result<Value> {
        match (signature, value) {
            (_, FieldRef::Null) => Ok(Value::Null),
            (TypeSignature::Scalar(_), value) => codec::encode_scalar(&value, date_format),
            (
                TypeSignature::Array(element) | TypeSignature::Collection { element, .. },
                FieldRef::Sequence(items),
            ) => items
                .into_iter()
                .map(|item| self.write_value(element, item, date_format))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            (TypeSignature::Object(_), FieldRef::Object(entity)) => {
                self.write(entity).map(Document::into_value)
            }
            (signature, value) => Err(MapperError::value(format!(
                "a {} does not match the signature {}",
                value.kind_name(),
                signature
            ))),
        }
    }
}

// Errors of nested objects already name their own type.
fn property_error(class: ClassRef, property: &ResolvedProperty, error: MapperError) -> MapperError {
    match error {
        MapperError::Serialization { .. } | MapperError::UnregisteredType(_) => error,
        other => MapperError::serialization(
            class.type_path(),
            format!("property '{}': {}", property.name(), other),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Describe, SchemaOptions, TypeDescriptor};
    use serde_json::json;

    #[derive(Debug, Default)]
    struct Account {
        id: Option<String>,
        owner: String,
        balance: f64,
        tags: Vec<String>,
    }

    impl Describe for Account {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::builder::<Self>()
                .root_entity()
                .field("id", |a| &a.id, |a| &mut a.id)
                .schema(SchemaOptions::new().name("_id"))
                .field("owner", |a| &a.owner, |a| &mut a.owner)
                .field("balance", |a| &a.balance, |a| &mut a.balance)
                .field("tags", |a| &a.tags, |a| &mut a.tags)
                .build()
        }
    }

    fn registry() -> TypeRegistry {
        let registry = TypeRegistry::new();
        registry.register(ClassRef::of::<Account>()).unwrap();
        registry
    }

    #[test]
    fn test_write_document() -> Result<()> {
        let registry = registry();
        let account = Account {
            id: Some("42".to_string()),
            owner: "bob".to_string(),
            balance: 12.5,
            tags: vec!["a".to_string(), "b".to_string()],
        };

        let document = DocumentWriter::new(&registry).write(&account)?;
        assert_eq!(
            document.field_names(),
            vec!["_id", "owner", "balance", "tags", "_class"]
        );
        assert_eq!(document.get_field("_id"), Some(&json!("42")));
        assert_eq!(document.get_field("tags"), Some(&json!(["a", "b"])));
        assert_eq!(
            document.get_str("_class"),
            Some(ClassRef::of::<Account>().type_path())
        );
        Ok(())
    }

    #[test]
    fn test_null_identifier_is_omitted() -> Result<()> {
        let registry = registry();
        let document = DocumentWriter::new(&registry).write(&Account::default())?;

        assert!(!document.has_field("_id"));
        assert_eq!(document.get_field("owner"), Some(&json!("")));
        Ok(())
    }

    #[test]
    fn test_accessor_failure_is_wrapped() {
        let registry = registry();
        let account = Account {
            balance: f64::INFINITY,
            ..Account::default()
        };

        match DocumentWriter::new(&registry).write(&account) {
            Err(MapperError::Serialization { type_path, reason }) => {
                assert_eq!(type_path, ClassRef::of::<Account>().type_path());
                assert!(reason.contains("balance"));
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_unregistered_type() {
        let registry = TypeRegistry::new();
        let result = DocumentWriter::new(&registry).write(&Account::default());
        assert!(matches!(result, Err(MapperError::UnregisteredType(_))));
    }
}
