//! Non-fatal findings reported while resolving attributes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A mapping problem that does not prevent registration.
///
/// Each diagnostic is also logged as a warning when it is first found.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A property has no write accessor and is left out of the mapping.
    NoWriteAccessor { type_path: String, property: String },

    /// A property is explicitly excluded but also carries another declaration.
    ConflictingDeclaration {
        type_path: String,
        property: String,
        ignored: String,
    },

    /// A mapped property resolves to a display name already taken by an
    /// earlier property or by the discriminator field.
    DuplicateName { type_path: String, name: String },
}

impl Diagnostic {
    pub fn type_path(&self) -> &str {
        match self {
            Diagnostic::NoWriteAccessor { type_path, .. }
            | Diagnostic::ConflictingDeclaration { type_path, .. }
            | Diagnostic::DuplicateName { type_path, .. } => type_path,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NoWriteAccessor {
                type_path,
                property,
            } => write!(
                f,
                "Property '{property}' of type [{type_path}] has no write accessor and is ignored"
            ),
            Diagnostic::ConflictingDeclaration {
                type_path,
                property,
                ignored,
            } => write!(
                f,
                "Property '{property}' of type [{type_path}] is excluded, its {ignored} declaration is ignored"
            ),
            Diagnostic::DuplicateName { type_path, name } => write!(
                f,
                "Type [{type_path}] maps a property to the taken name '{name}', it is ignored"
            ),
        }
    }
}
