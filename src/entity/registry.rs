//! Process-wide entity metadata registry.

use super::metadata::EntityMetadata;
use super::traits::Entity;
use crate::error::MapError;
use crate::value;
use log::debug;
use once_cell::sync::Lazy;
use sea_query::Value;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::RwLock;

static ENTITIES: Lazy<RwLock<HashMap<TypeId, &'static EntityMetadata>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Metadata for `T`, built on first access and cached for process lifetime.
///
/// Concurrent first access may build the metadata more than once; the build is
/// a pure function of the registration record, so a losing duplicate is
/// discarded (compute-once-or-more, cache-last). Configuration errors are
/// returned to the caller and never cached.
pub fn metadata<T: Entity>() -> Result<&'static EntityMetadata, MapError> {
    let key = TypeId::of::<T>();
    {
        let map = ENTITIES.read().unwrap_or_else(|e| e.into_inner());
        if let Some(meta) = map.get(&key) {
            return Ok(meta);
        }
    }

    let built = EntityMetadata::build(T::entity_def())?;
    debug!(
        "built entity metadata for {} (table '{}', {} properties)",
        built.type_name(),
        built.table(),
        built.properties().len()
    );
    let leaked: &'static EntityMetadata = Box::leak(Box::new(built));

    let mut map = ENTITIES.write().unwrap_or_else(|e| e.into_inner());
    Ok(*map.entry(key).or_insert(leaked))
}

/// Table name for `T`.
pub fn table_name_of<T: Entity>() -> Result<String, MapError> {
    Ok(metadata::<T>()?.table().to_string())
}

/// New instance of `T` via the zero-argument factory.
pub fn create_instance<T: Entity>() -> T {
    T::default()
}

/// The identity value of `entity`.
///
/// Errors when `T` declares no primary identity or the value is unset.
pub fn identity_value<T: Entity>(entity: &T) -> Result<Value, MapError> {
    let meta = metadata::<T>()?;
    let id = meta.require_identity()?;
    match entity.get(id.name()) {
        Some(v) if !value::is_null(&v) => Ok(v),
        _ => Err(MapError::UnsetIdentity {
            entity: meta.type_name(),
        }),
    }
}

/// The identity value of `entity`, or `None` when missing or unset.
pub fn try_identity_value<T: Entity>(entity: &T) -> Option<Value> {
    identity_value(entity).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_cfg::{BrokenTwinId, Driver, TripLog, Vehicle, VerifiedDriver};
    use uuid::Uuid;

    #[test]
    fn test_metadata_is_cached() {
        let first = metadata::<Driver>().unwrap() as *const EntityMetadata;
        let second = metadata::<Driver>().unwrap() as *const EntityMetadata;
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_table_names() {
        assert_eq!(table_name_of::<Driver>().unwrap(), "drivers");
        // explicit override bypasses pluralization
        assert_eq!(table_name_of::<Vehicle>().unwrap(), "fleet");
        assert_eq!(table_name_of::<VerifiedDriver>().unwrap(), "verified_drivers");
    }

    #[test]
    fn test_identity_resolution() {
        let meta = metadata::<Driver>().unwrap();
        assert_eq!(meta.identity().map(|p| p.name()), Some("id"));

        // reference-tagged identity is not a primary identity
        let meta = metadata::<TripLog>().unwrap();
        assert!(meta.identity().is_none());
        assert_eq!(
            meta.properties()
                .get("driver_id")
                .and_then(|p| p.identity_reference()),
            Some("Driver")
        );
    }

    #[test]
    fn test_redeclared_property_is_not_duplicated() {
        let meta = metadata::<VerifiedDriver>().unwrap();
        assert_eq!(meta.properties().len(), 3);
        assert_eq!(meta.identity().map(|p| p.name()), Some("id"));
    }

    #[test]
    fn test_duplicate_identity_is_a_configuration_error() {
        let err = metadata::<BrokenTwinId>().unwrap_err();
        assert_eq!(err, MapError::DuplicateIdentity { entity: "BrokenTwinId" });
        // failed builds are never cached; the error is stable across calls
        let again = metadata::<BrokenTwinId>().unwrap_err();
        assert_eq!(err, again);
    }

    #[test]
    fn test_identity_value_extraction() {
        let id = Uuid::new_v4();
        let driver = Driver {
            id: Some(id),
            ..Driver::default()
        };
        assert_eq!(identity_value(&driver).unwrap(), Value::Uuid(Some(id)));

        let unset = Driver::default();
        assert_eq!(
            identity_value(&unset).unwrap_err(),
            MapError::UnsetIdentity { entity: "Driver" }
        );
        assert!(try_identity_value(&unset).is_none());

        let log = TripLog::default();
        assert_eq!(
            identity_value(&log).unwrap_err(),
            MapError::MissingIdentity { entity: "TripLog" }
        );
    }

    #[test]
    fn test_create_instance() {
        let driver: Driver = create_instance();
        assert_eq!(driver, Driver::default());
    }
}
