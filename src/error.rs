//! Error type for metadata construction, expression compilation and
//! statement generation.

use std::fmt;

/// Mapping core error.
///
/// Every variant is a configuration or programming error: fatal, synchronous
/// and never retried. Errors surface when metadata is built or a statement is
/// generated, not when the resulting SQL is executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// More than one property on the type is marked as the primary identity
    DuplicateIdentity { entity: &'static str },
    /// Two properties on the type resolve to the same column name
    DuplicateColumn { entity: &'static str, column: String },
    /// An identity property is required but the type declares none
    MissingIdentity { entity: &'static str },
    /// Identity-based operation on an instance whose identity value is unset
    UnsetIdentity { entity: &'static str },
    /// A property or projection name resolved to no column, or a literal was
    /// reached without an established column context
    UnresolvedColumn(String),
    /// Unsupported expression shape or operand position
    Unsupported(String),
    /// Converter failure, or a value/storage mismatch with no converter
    Conversion(String),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::DuplicateIdentity { entity } => {
                write!(f, "Only one property on '{entity}' can be marked as the identity")
            }
            MapError::DuplicateColumn { entity, column } => {
                write!(f, "Duplicate column '{column}' on entity '{entity}'")
            }
            MapError::MissingIdentity { entity } => {
                write!(f, "Entity '{entity}' does not have an identity property")
            }
            MapError::UnsetIdentity { entity } => {
                write!(f, "Identity value of entity '{entity}' is not set")
            }
            MapError::UnresolvedColumn(name) => {
                write!(f, "Failed to resolve a column for '{name}'")
            }
            MapError::Unsupported(msg) => {
                write!(f, "Unsupported operation: {msg}")
            }
            MapError::Conversion(msg) => {
                write!(f, "Conversion error: {msg}")
            }
        }
    }
}

impl std::error::Error for MapError {}
