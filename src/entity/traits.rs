//! The `Entity` trait: per-type registration record plus generated accessors.

use super::def::EntityDef;
use crate::error::MapError;
use sea_query::Value;

/// An in-memory type mapped to a table.
///
/// `entity_def` supplies the per-type configuration record, built once on
/// first access and cached for the lifetime of the process. `get`/`set` are
/// the type's accessor functions: explicit implementations take the place of
/// reflective field lookups, so row mapping and statement generation never
/// inspect the type at runtime. The `Default` bound is the zero-argument
/// factory used when mapping rows.
///
/// # Example
///
/// ```
/// use tidemap::{Entity, EntityDef, MapError, PropertyDef};
/// use tidemap::value::{extract, ValueType};
/// use sea_query::Value;
///
/// #[derive(Debug, Default, Clone)]
/// struct Driver {
///     id: Option<i64>,
///     name: Option<String>,
/// }
///
/// impl Entity for Driver {
///     fn entity_def() -> EntityDef {
///         EntityDef::new("Driver")
///             .property(PropertyDef::new("id").identity())
///             .property(PropertyDef::new("name"))
///     }
///
///     fn get(&self, property: &str) -> Option<Value> {
///         match property {
///             "id" => Some(self.id.into_value()),
///             "name" => Some(self.name.clone().into_value()),
///             _ => None,
///         }
///     }
///
///     fn set(&mut self, property: &str, value: Value) -> Result<(), MapError> {
///         match property {
///             "id" => self.id = extract(property, value)?,
///             "name" => self.name = extract(property, value)?,
///             _ => return Err(MapError::UnresolvedColumn(property.to_string())),
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Entity: Default + 'static {
    /// The per-type configuration record.
    fn entity_def() -> EntityDef;

    /// Read a property value by name. Returns `None` for unknown names.
    fn get(&self, property: &str) -> Option<Value>;

    /// Write a property value by name.
    ///
    /// Implementations return [`MapError::UnresolvedColumn`] for unknown names
    /// and [`MapError::Conversion`] when the value does not match the field
    /// type.
    fn set(&mut self, property: &str, value: Value) -> Result<(), MapError>;
}
