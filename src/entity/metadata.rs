//! Built entity metadata: immutable per-type descriptors derived from the
//! registration record.

use super::def::{EntityDef, PropertyDef};
use crate::convert::TypeConverter;
use crate::error::MapError;
use crate::naming::{default_table_name, NamingPolicy};
use std::collections::HashMap;
use std::fmt;

/// Immutable per-property metadata.
pub struct PropertyMetadata {
    name: &'static str,
    column: String,
    identity: bool,
    reference: Option<&'static str>,
    converter: Option<&'static dyn TypeConverter>,
    writable: bool,
}

impl PropertyMetadata {
    fn build(def: &PropertyDef, naming: NamingPolicy) -> Self {
        let column = def
            .column
            .map(str::to_owned)
            .unwrap_or_else(|| naming.convert(def.name));
        // a reference-tagged marker is not the primary identity
        let identity = def.identity.is_some_and(|tag| tag.is_primary());
        Self {
            name: def.name,
            column,
            identity,
            reference: def.identity.and_then(|tag| tag.reference),
            converter: def.explicit_converter.or(def.type_converter),
            writable: def.writable,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// Whether this property is the primary identity.
    pub fn is_identity(&self) -> bool {
        self.identity
    }

    /// The referenced entity of a reference-tagged identity, if any.
    pub fn identity_reference(&self) -> Option<&'static str> {
        self.reference
    }

    pub fn converter(&self) -> Option<&'static dyn TypeConverter> {
        self.converter
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }
}

impl fmt::Debug for PropertyMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMetadata")
            .field("name", &self.name)
            .field("column", &self.column)
            .field("identity", &self.identity)
            .field("reference", &self.reference)
            .field("converter", &self.converter.map(|_| "..."))
            .field("writable", &self.writable)
            .finish()
    }
}

/// Ordered unique-by-name property collection with case-insensitive lookup by
/// property name or column name.
pub struct PropertyCollection {
    properties: Vec<PropertyMetadata>,
    by_name: HashMap<String, usize>,
    by_column: HashMap<String, usize>,
    identity: Option<usize>,
}

impl PropertyCollection {
    fn build(
        entity: &'static str,
        defs: &[PropertyDef],
        naming: NamingPolicy,
    ) -> Result<Self, MapError> {
        let mut properties = Vec::with_capacity(defs.len());
        let mut by_name = HashMap::with_capacity(defs.len());
        let mut by_column = HashMap::with_capacity(defs.len());
        let mut identity = None;

        for (index, def) in defs.iter().enumerate() {
            let property = PropertyMetadata::build(def, naming);
            if property.is_identity() {
                if identity.is_some() {
                    return Err(MapError::DuplicateIdentity { entity });
                }
                identity = Some(index);
            }
            by_name.insert(property.name.to_lowercase(), index);
            if by_column
                .insert(property.column.to_lowercase(), index)
                .is_some()
            {
                return Err(MapError::DuplicateColumn {
                    entity,
                    column: property.column.clone(),
                });
            }
            properties.push(property);
        }

        Ok(Self {
            properties,
            by_name,
            by_column,
            identity,
        })
    }

    /// Look up a property by name, case-insensitively.
    pub fn get(&self, property: &str) -> Option<&PropertyMetadata> {
        self.by_name
            .get(&property.to_lowercase())
            .map(|index| &self.properties[*index])
    }

    /// Look up a property by column name, case-insensitively.
    pub fn by_column(&self, column: &str) -> Option<&PropertyMetadata> {
        self.by_column
            .get(&column.to_lowercase())
            .map(|index| &self.properties[*index])
    }

    /// The primary identity property, if declared.
    pub fn identity(&self) -> Option<&PropertyMetadata> {
        self.identity.map(|index| &self.properties[index])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PropertyMetadata> {
        self.properties.iter()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Immutable per-type metadata, built once per type and cached for process
/// lifetime.
pub struct EntityMetadata {
    type_name: &'static str,
    table: String,
    naming: NamingPolicy,
    properties: PropertyCollection,
}

impl EntityMetadata {
    pub(crate) fn build(def: EntityDef) -> Result<Self, MapError> {
        let table = def
            .table
            .map(str::to_owned)
            .unwrap_or_else(|| default_table_name(def.type_name, def.naming));
        let properties = PropertyCollection::build(def.type_name, &def.properties, def.naming)?;
        Ok(Self {
            type_name: def.type_name,
            table,
            naming: def.naming,
            properties,
        })
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn naming(&self) -> NamingPolicy {
        self.naming
    }

    pub fn properties(&self) -> &PropertyCollection {
        &self.properties
    }

    /// The primary identity property, if declared.
    pub fn identity(&self) -> Option<&PropertyMetadata> {
        self.properties.identity()
    }

    pub(crate) fn require_identity(&self) -> Result<&PropertyMetadata, MapError> {
        self.identity().ok_or(MapError::MissingIdentity {
            entity: self.type_name,
        })
    }

    /// Resolve an explicit projection of property names, ordered as given.
    pub fn projection(&self, names: &[&str]) -> Result<Vec<&PropertyMetadata>, MapError> {
        if names.is_empty() {
            return Err(MapError::Unsupported(
                "projection must name at least one property".to_string(),
            ));
        }
        names
            .iter()
            .map(|name| {
                self.properties
                    .get(name)
                    .ok_or_else(|| MapError::UnresolvedColumn((*name).to_string()))
            })
            .collect()
    }
}

impl fmt::Debug for EntityMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityMetadata")
            .field("type_name", &self.type_name)
            .field("table", &self.table)
            .field("naming", &self.naming)
            .field("properties", &self.properties.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn license_def() -> EntityDef {
        EntityDef::new("DriverLicense")
            .property(PropertyDef::new("id").identity())
            .property(PropertyDef::new("license_number"))
            .property(PropertyDef::new("issued_by").column("authority"))
            .property(PropertyDef::new("checksum").read_only())
    }

    #[test]
    fn test_table_name_is_pluralized_through_the_policy() {
        let meta = EntityMetadata::build(license_def()).unwrap();
        assert_eq!(meta.table(), "driver_licenses");

        let meta = EntityMetadata::build(license_def().naming(NamingPolicy::LowerCase)).unwrap();
        assert_eq!(meta.table(), "driverlicenses");

        let meta = EntityMetadata::build(license_def().table("licences")).unwrap();
        assert_eq!(meta.table(), "licences");
    }

    #[test]
    fn test_column_resolution() {
        let meta = EntityMetadata::build(license_def()).unwrap();
        let columns: Vec<_> = meta.properties().iter().map(|p| p.column()).collect();
        assert_eq!(columns, vec!["id", "license_number", "authority", "checksum"]);
        assert!(meta.properties().get("issued_by").is_some());
        assert!(meta.properties().by_column("authority").is_some());
        assert!(meta.properties().by_column("AUTHORITY").is_some());
    }

    #[test]
    fn test_writability_flag() {
        let meta = EntityMetadata::build(license_def()).unwrap();
        assert!(meta.properties().get("license_number").unwrap().is_writable());
        assert!(!meta.properties().get("checksum").unwrap().is_writable());
    }

    #[test]
    fn test_projection_is_ordered_and_case_insensitive() {
        let meta = EntityMetadata::build(license_def()).unwrap();
        let projection = meta.projection(&["License_Number", "id"]).unwrap();
        let names: Vec<_> = projection.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["license_number", "id"]);

        assert!(matches!(
            meta.projection(&[]).unwrap_err(),
            MapError::Unsupported(_)
        ));
        assert_eq!(
            meta.projection(&["missing"]).unwrap_err(),
            MapError::UnresolvedColumn("missing".to_string())
        );
    }

    #[test]
    fn test_colliding_columns_are_rejected() {
        let def = EntityDef::new("Collision")
            .property(PropertyDef::new("plate").column("plate_number"))
            .property(PropertyDef::new("plate_number"));
        let err = EntityMetadata::build(def).unwrap_err();
        assert_eq!(
            err,
            MapError::DuplicateColumn {
                entity: "Collision",
                column: "plate_number".to_string()
            }
        );
    }
}
