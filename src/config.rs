//! Configuration for the mapping engine.

use serde::{Deserialize, Serialize};

use crate::error::{MapperError, Result};

/// Configuration shared by every component of an
/// [`ObjectContext`](crate::context::ObjectContext).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Reserved field carrying the runtime type of an object.
    pub discriminator_field: String,

    /// Reserved field carrying the identifier of an object.
    pub identifier_field: String,

    /// `chrono` format string used for dates.
    /// If None, dates are written as RFC 3339 with the precision they carry.
    pub date_format: Option<String>,

    /// Whether an unknown discriminator is an error.
    /// If false, the declared type is used and a warning is logged.
    pub strict_discriminator: bool,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            discriminator_field: "_class".to_string(),
            identifier_field: "_id".to_string(),
            date_format: None,
            strict_discriminator: true,
        }
    }
}

impl MapperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_discriminator_field<S: Into<String>>(mut self, field: S) -> Self {
        self.discriminator_field = field.into();
        self
    }

    pub fn with_identifier_field<S: Into<String>>(mut self, field: S) -> Self {
        self.identifier_field = field.into();
        self
    }

    pub fn with_date_format<S: Into<String>>(mut self, format: S) -> Self {
        self.date_format = Some(format.into());
        self
    }

    pub fn with_strict_discriminator(mut self, strict: bool) -> Self {
        self.strict_discriminator = strict;
        self
    }

    /// Check that the reserved field names are usable.
    pub fn validate(&self) -> Result<()> {
        if self.discriminator_field.is_empty() {
            return Err(MapperError::invalid_config(
                "discriminator field name must not be empty",
            ));
        }
        if self.identifier_field.is_empty() {
            return Err(MapperError::invalid_config(
                "identifier field name must not be empty",
            ));
        }
        if self.discriminator_field == self.identifier_field {
            return Err(MapperError::invalid_config(format!(
                "discriminator and identifier fields are both named '{}'",
                self.identifier_field
            )));
        }
        if self.date_format.as_deref().is_some_and(str::is_empty) {
            return Err(MapperError::invalid_config("date format must not be empty"));
        }
        Ok(())
    }
}
