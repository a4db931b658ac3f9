//! Document to object deserialization.

use std::fmt;

use log::warn;
use serde_json::{Map, Value};

use crate::attribute::ResolvedProperty;
use crate::descriptor::{ClassRef, Describe, Entity, PayloadOptions};
use crate::document::codec;
use crate::document::document::Document;
use crate::error::{MapperError, Result};
use crate::registry::TypeRegistry;
use crate::signature::TypeSignature;
use crate::value::FieldValue;

/// Reads mapped objects back from documents.
#[derive(Debug, Clone, Copy)]
pub struct DocumentReader<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> DocumentReader<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        DocumentReader { registry }
    }

    /// Read an object from `document`.
    ///
    /// The discriminator field, when present, names the concrete type to
    /// instantiate and overrides `declared`. Fields without a matching
    /// property are skipped.
    pub fn read(&self, document: &Document, declared: ClassRef) -> Result<Box<dyn Entity>> {
        self.registry.check(declared)?;
        self.read_object(document.fields(), declared)
    }

    /// Read an object of the concrete type `T`.
    pub fn read_as<T>(&self, document: &Document) -> Result<T>
    where
        T: Describe + fmt::Debug + Send + Sync,
    {
        let declared = ClassRef::of::<T>();
        let entity = self.read(document, declared)?;
        let found = entity.class();
        entity
            .into_any()
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| {
                MapperError::deserialization(
                    declared.type_path(),
                    format!("the document holds an object of type [{found}]"),
                )
            })
    }

    fn concrete_class(&self, fields: &Map<String, Value>, declared: ClassRef) -> Result<ClassRef> {
        let config = self.registry.config();
        match fields.get(&config.discriminator_field) {
            None | Some(Value::Null) => Ok(declared),
            Some(Value::String(name)) => match self.registry.class_by_name(name) {
                Some(class) => Ok(class),
                None if config.strict_discriminator => {
                    Err(MapperError::unregistered_type(name.as_str()))
                }
                None => {
                    warn!(
                        "Unknown type [{}] in document, reading it as [{}]",
                        name, declared
                    );
                    Ok(declared)
                }
            },
            Some(other) => Err(MapperError::deserialization(
                declared.type_path(),
                format!("the discriminator field holds {other} instead of a type name"),
            )),
        }
    }

    fn read_object(
        &self,
        fields: &Map<String, Value>,
        declared: ClassRef,
    ) -> Result<Box<dyn Entity>> {
        let class = self.concrete_class(fields, declared)?;
        let attributes = self.registry.attributes().properties(class);
        let factory = attributes.factory().ok_or_else(|| {
            MapperError::deserialization(
                class.type_path(),
                "an abstract type cannot be instantiated without a concrete type name",
            )
        })?;

        let discriminator = self.registry.config().discriminator_field.as_str();
        let mut object = factory();

        for (name, value) in fields {
            if name == discriminator {
                continue;
            }
            let Some(property) = attributes.property(name) else {
                continue;
            };

            let decoded = self
                .read_property(class, property, value)
                .map_err(|e| property_error(class, property, e))?;
            property
                .descriptor()
                .write(object.as_any_mut(), decoded)
                .map_err(|e| property_error(class, property, e))?;
        }

        Ok(object)
    }

    fn read_property(
        &self,
        class: ClassRef,
        property: &ResolvedProperty,
        value: &Value,
    ) -> Result<FieldValue> {
        let signature = self
            .registry
            .signatures()
            .property(class, property.descriptor())?;
        let date_format = property
            .policy()
            .payload()
            .and_then(PayloadOptions::date_format)
            .or(self.registry.config().date_format.as_deref());
        self.read_value(&signature, value, date_format)
    }

    fn read_value(
        &self,
        signature: &TypeSignature,
        value: &Value,
        date_format: Option<&str>,
    ) -> Result<FieldValue> {
        match (signature, value) {
            (_, Value::Null) => Ok(FieldValue::Null),
            (TypeSignature::Scalar(kind), value) => codec::decode_scalar(*kind, value, date_format),
            (
                TypeSignature::Array(element) | TypeSignature::Collection { element, .. },
                Value::Array(items),
            ) => items
                .iter()
                .map(|item| self.read_value(element, item, date_format))
                .collect::<Result<Vec<_>>>()
                .map(FieldValue::Sequence),
            // A single value stands for a sequence of one.
            (TypeSignature::Array(element) | TypeSignature::Collection { element, .. }, value) => {
                Ok(FieldValue::Sequence(vec![
                    self.read_value(element, value, date_format)?,
                ]))
            }
            (TypeSignature::Object(nested), Value::Object(fields)) => {
                self.read_object(fields, *nested).map(FieldValue::Object)
            }
            (TypeSignature::Object(nested), other) => Err(MapperError::value(format!(
                "expected an object of type [{nested}], found {other}"
            ))),
        }
    }
}

// Errors of nested objects already name their own type.
fn property_error(class: ClassRef, property: &ResolvedProperty, error: MapperError) -> MapperError {
    match error {
        MapperError::Deserialization { .. } | MapperError::UnregisteredType(_) => error,
        other => MapperError::deserialization(
            class.type_path(),
            format!("property '{}': {}", property.name(), other),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{SchemaOptions, TypeDescriptor};
    use crate::document::writer::DocumentWriter;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq)]
    struct Sensor {
        name: String,
        readings: Vec<f64>,
        location: Option<Box<Location>>,
        status: Option<String>,
    }

    #[derive(Debug, Default, PartialEq)]
    struct Location {
        lat: f64,
        lon: f64,
    }

    impl Describe for Sensor {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::builder::<Self>()
                .root_entity()
                .field("name", |s| &s.name, |s| &mut s.name)
                .schema(SchemaOptions::new().name("sensor_name"))
                .field("readings", |s| &s.readings, |s| &mut s.readings)
                .field("location", |s| &s.location, |s| &mut s.location)
                .field("status", |s| &s.status, |s| &mut s.status)
                .payload(PayloadOptions::new().null_value("unknown"))
                .build()
        }
    }

    impl Describe for Location {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::builder::<Self>()
                .root_entity()
                .field("lat", |l| &l.lat, |l| &mut l.lat)
                .field("lon", |l| &l.lon, |l| &mut l.lon)
                .build()
        }
    }

    fn registry() -> TypeRegistry {
        let registry = TypeRegistry::new();
        registry.register(ClassRef::of::<Sensor>()).unwrap();
        registry
    }

    #[test]
    fn test_round_trip() -> Result<()> {
        let registry = registry();
        let sensor = Sensor {
            name: "s1".to_string(),
            readings: vec![1.5, 2.0],
            location: Some(Box::new(Location { lat: 48.8, lon: 2.3 })),
            status: Some("ok".to_string()),
        };

        let document = DocumentWriter::new(&registry).write(&sensor)?;
        let read: Sensor = DocumentReader::new(&registry).read_as(&document)?;
        assert_eq!(read, sensor);
        Ok(())
    }

    #[test]
    fn test_lenient_fields() -> Result<()> {
        let registry = registry();
        let document = Document::from_value(json!({
            "sensor_name": "s2",
            "readings": "3.5",
            "status": null,
            "firmware": "1.0.2"
        }))?;

        let read: Sensor = DocumentReader::new(&registry).read_as(&document)?;
        assert_eq!(read.name, "s2");
        assert_eq!(read.readings, vec![3.5]);
        assert_eq!(read.status, None);
        assert_eq!(read.location, None);
        Ok(())
    }

    #[test]
    fn test_null_value_is_schema_only() -> Result<()> {
        let registry = registry();
        let sensor = Sensor {
            name: "s4".to_string(),
            ..Sensor::default()
        };

        let document = DocumentWriter::new(&registry).write(&sensor)?;
        assert_eq!(document.get_field("status"), Some(&Value::Null));

        let read: Sensor = DocumentReader::new(&registry).read_as(&document)?;
        assert_eq!(read, sensor);
        Ok(())
    }

    #[test]
    fn test_unknown_discriminator() {
        let registry = registry();
        let document = Document::from_value(json!({"_class": "app::Missing"})).unwrap();

        let result = DocumentReader::new(&registry).read(&document, ClassRef::of::<Sensor>());
        assert!(matches!(result, Err(MapperError::UnregisteredType(_))));
    }

    #[test]
    fn test_lenient_discriminator() -> Result<()> {
        let registry = TypeRegistry::with_config(
            crate::config::MapperConfig::new().with_strict_discriminator(false),
        );
        registry.register(ClassRef::of::<Sensor>())?;
        let document = Document::from_value(json!({
            "_class": "app::Missing",
            "sensor_name": "s3"
        }))?;

        let read: Sensor = DocumentReader::new(&registry).read_as(&document)?;
        assert_eq!(read.name, "s3");
        Ok(())
    }

    #[test]
    fn test_decoding_failure_is_wrapped() {
        let registry = registry();
        let document = Document::from_value(json!({"readings": ["high"]})).unwrap();

        match DocumentReader::new(&registry).read(&document, ClassRef::of::<Sensor>()) {
            Err(MapperError::Deserialization { type_path, reason }) => {
                assert_eq!(type_path, ClassRef::of::<Sensor>().type_path());
                assert!(reason.contains("readings"));
            }
            other => panic!("unexpected result {other:?}"),
        }
    }
}
