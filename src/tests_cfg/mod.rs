//! Shared entity definitions for unit tests.

use crate::convert::{ConvertedValue, UuidStringConverter};
use crate::entity::{Entity, EntityDef, PropertyDef};
use crate::error::MapError;
use crate::naming::NamingPolicy;
use crate::value::{extract, ValueType};
use sea_query::Value;
use uuid::Uuid;

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Driver {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub license_number: Option<String>,
}

impl Entity for Driver {
    fn entity_def() -> EntityDef {
        EntityDef::new("Driver")
            .property(PropertyDef::new("id").identity())
            .property(PropertyDef::new("name"))
            .property(PropertyDef::new("license_number"))
    }

    fn get(&self, property: &str) -> Option<Value> {
        match property {
            "id" => Some(self.id.into_value()),
            "name" => Some(self.name.clone().into_value()),
            "license_number" => Some(self.license_number.clone().into_value()),
            _ => None,
        }
    }

    fn set(&mut self, property: &str, value: Value) -> Result<(), MapError> {
        match property {
            "id" => self.id = extract(property, value)?,
            "name" => self.name = extract(property, value)?,
            "license_number" => self.license_number = extract(property, value)?,
            _ => return Err(MapError::UnresolvedColumn(property.to_string())),
        }
        Ok(())
    }
}

/// Re-declares `id` as a string key; the later declaration wins, mirroring a
/// derived type hiding a base property.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct VerifiedDriver {
    pub id: Option<String>,
    pub name: Option<String>,
    pub license_number: Option<String>,
}

impl Entity for VerifiedDriver {
    fn entity_def() -> EntityDef {
        EntityDef::new("VerifiedDriver")
            .property(PropertyDef::new("id").identity())
            .property(PropertyDef::new("name"))
            .property(PropertyDef::new("license_number"))
            .property(PropertyDef::new("id").identity())
    }

    fn get(&self, property: &str) -> Option<Value> {
        match property {
            "id" => Some(self.id.clone().into_value()),
            "name" => Some(self.name.clone().into_value()),
            "license_number" => Some(self.license_number.clone().into_value()),
            _ => None,
        }
    }

    fn set(&mut self, property: &str, value: Value) -> Result<(), MapError> {
        match property {
            "id" => self.id = extract(property, value)?,
            "name" => self.name = extract(property, value)?,
            "license_number" => self.license_number = extract(property, value)?,
            _ => return Err(MapError::UnresolvedColumn(property.to_string())),
        }
        Ok(())
    }
}

impl ConvertedValue for Uuid {
    type Converter = UuidStringConverter;
}

/// Uses an explicit table name, a lower-case naming policy, a column
/// override and a type-declared converter picked up through `Option<Uuid>`.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Vehicle {
    pub vin: Option<Uuid>,
    pub plate_number: Option<String>,
    pub owner_id: Option<Uuid>,
}

impl Entity for Vehicle {
    fn entity_def() -> EntityDef {
        EntityDef::new("Vehicle")
            .table("fleet")
            .naming(NamingPolicy::LowerCase)
            .property(
                PropertyDef::new("vin")
                    .identity()
                    .value_type::<Option<Uuid>>(),
            )
            .property(PropertyDef::new("plate_number").column("plate"))
            .property(PropertyDef::new("owner_id").identity_ref("Driver"))
    }

    fn get(&self, property: &str) -> Option<Value> {
        match property {
            "vin" => Some(self.vin.into_value()),
            "plate_number" => Some(self.plate_number.clone().into_value()),
            "owner_id" => Some(self.owner_id.into_value()),
            _ => None,
        }
    }

    fn set(&mut self, property: &str, value: Value) -> Result<(), MapError> {
        match property {
            "vin" => self.vin = extract(property, value)?,
            "plate_number" => self.plate_number = extract(property, value)?,
            "owner_id" => self.owner_id = extract(property, value)?,
            _ => return Err(MapError::UnresolvedColumn(property.to_string())),
        }
        Ok(())
    }
}

/// Declares no primary identity at all; only a reference-tagged one.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct TripLog {
    pub driver_id: Option<Uuid>,
    pub note: Option<String>,
}

impl Entity for TripLog {
    fn entity_def() -> EntityDef {
        EntityDef::new("TripLog")
            .property(PropertyDef::new("driver_id").identity_ref("Driver"))
            .property(PropertyDef::new("note"))
    }

    fn get(&self, property: &str) -> Option<Value> {
        match property {
            "driver_id" => Some(self.driver_id.into_value()),
            "note" => Some(self.note.clone().into_value()),
            _ => None,
        }
    }

    fn set(&mut self, property: &str, value: Value) -> Result<(), MapError> {
        match property {
            "driver_id" => self.driver_id = extract(property, value)?,
            "note" => self.note = extract(property, value)?,
            _ => return Err(MapError::UnresolvedColumn(property.to_string())),
        }
        Ok(())
    }
}

/// Invalid on purpose: two primary identity properties.
#[derive(Debug, Default, Clone)]
pub(crate) struct BrokenTwinId {
    pub first: Option<i64>,
    pub second: Option<i64>,
}

impl Entity for BrokenTwinId {
    fn entity_def() -> EntityDef {
        EntityDef::new("BrokenTwinId")
            .property(PropertyDef::new("first").identity())
            .property(PropertyDef::new("second").identity())
    }

    fn get(&self, property: &str) -> Option<Value> {
        match property {
            "first" => Some(self.first.into_value()),
            "second" => Some(self.second.into_value()),
            _ => None,
        }
    }

    fn set(&mut self, property: &str, value: Value) -> Result<(), MapError> {
        match property {
            "first" => self.first = extract(property, value)?,
            "second" => self.second = extract(property, value)?,
            _ => return Err(MapError::UnresolvedColumn(property.to_string())),
        }
        Ok(())
    }
}

/// Simple row accessor over in-memory columns.
pub(crate) struct FakeRow {
    pub columns: Vec<(String, Option<Value>)>,
}

impl FakeRow {
    pub fn new(columns: Vec<(&str, Option<Value>)>) -> Self {
        Self {
            columns: columns
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        }
    }
}

impl crate::row::RowAccessor for FakeRow {
    fn field_count(&self) -> usize {
        self.columns.len()
    }

    fn name(&self, ordinal: usize) -> &str {
        &self.columns[ordinal].0
    }

    fn is_null(&self, ordinal: usize) -> bool {
        self.columns[ordinal].1.is_none()
    }

    fn value(&self, ordinal: usize) -> Value {
        self.columns[ordinal]
            .1
            .clone()
            .unwrap_or(Value::String(None))
    }
}
