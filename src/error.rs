//! Error types for the docmapper library.
//!
//! Every fallible operation returns a [`MapperError`]. Non-fatal problems
//! (ignored properties, conflicting declarations) are never raised as errors;
//! they are reported as [`Diagnostic`](crate::diagnostic::Diagnostic)s instead.
//!
//! # Examples
//!
//! ```
//! use docmapper::error::{MapperError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(MapperError::unregistered_type("app::Tweet"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::fmt::Display;

use thiserror::Error;

/// The main error type for mapping operations.
///
/// Errors are never retried internally; retrying is up to the caller.
#[derive(Error, Debug)]
pub enum MapperError {
    /// An operation was requested on a type that was never registered.
    #[error("Type is not registered: {0}")]
    UnregisteredType(String),

    /// A declared property type cannot be resolved to a signature.
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// A cyclic nested-object graph was found while building a schema.
    #[error("Recursive schema: {0}")]
    RecursiveSchema(String),

    /// Writing an object into a document failed.
    #[error("Unable to serialize object of type [{type_path}]: {reason}")]
    Serialization { type_path: String, reason: String },

    /// Reading an object from a document failed.
    #[error("Unable to deserialize object of type [{type_path}]: {reason}")]
    Deserialization { type_path: String, reason: String },

    /// An identifier was required but the object does not carry one.
    #[error("Identifier was not found on object of type [{0}]")]
    MissingIdentifier(String),

    /// A value could not be converted to or from a property type.
    #[error("Value error: {0}")]
    Value(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Errors raised by a storage collaborator.
    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with MapperError.
pub type Result<T> = std::result::Result<T, MapperError>;

impl MapperError {
    /// Create a new unregistered type error.
    pub fn unregistered_type<S: Into<String>>(type_path: S) -> Self {
        MapperError::UnregisteredType(type_path.into())
    }

    /// Create a new unsupported type error.
    pub fn unsupported_type<S: Into<String>>(msg: S) -> Self {
        MapperError::UnsupportedType(msg.into())
    }

    /// Create a new recursive schema error from the expansion path that closed the cycle.
    pub fn recursive_schema<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cycle = path
            .into_iter()
            .map(|segment| segment.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join(" -> ");
        MapperError::RecursiveSchema(cycle)
    }

    /// Create a new serialization error for an object of the given type.
    pub fn serialization<S: Into<String>, R: Display>(type_path: S, reason: R) -> Self {
        MapperError::Serialization {
            type_path: type_path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a new deserialization error for an object of the given type.
    pub fn deserialization<S: Into<String>, R: Display>(type_path: S, reason: R) -> Self {
        MapperError::Deserialization {
            type_path: type_path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a new missing identifier error.
    pub fn missing_identifier<S: Into<String>>(type_path: S) -> Self {
        MapperError::MissingIdentifier(type_path.into())
    }

    /// Create a new value conversion error.
    pub fn value<S: Into<String>>(msg: S) -> Self {
        MapperError::Value(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        MapperError::Config(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        MapperError::Other(msg.into())
    }
}
