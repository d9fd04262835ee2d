//! End-to-end coverage of the public surface: registration, predicate
//! compilation, statement generation, parameter binding and row mapping.

use sea_query::Value;
use tidemap::value::{extract, ValueType};
use tidemap::{
    capture, col, compile_where, map_row, map_row_values, Delete, Dialect, Entity, EntityDef,
    Insert, MapError, ParameterSink, PropertyDef, RowAccessor, Select, SqlType, Update,
    UuidStringConverter,
};
use uuid::Uuid;

#[derive(Debug, Default, Clone, PartialEq)]
struct Courier {
    id: Option<Uuid>,
    name: Option<String>,
    license_number: Option<String>,
    depot_id: Option<Uuid>,
}

impl Entity for Courier {
    fn entity_def() -> EntityDef {
        EntityDef::new("Courier")
            .property(
                PropertyDef::new("id")
                    .identity()
                    .converter::<UuidStringConverter>(),
            )
            .property(PropertyDef::new("name"))
            .property(PropertyDef::new("license_number"))
            .property(PropertyDef::new("depot_id").identity_ref("Depot"))
    }

    fn get(&self, property: &str) -> Option<Value> {
        match property {
            "id" => Some(self.id.into_value()),
            "name" => Some(self.name.clone().into_value()),
            "license_number" => Some(self.license_number.clone().into_value()),
            "depot_id" => Some(self.depot_id.into_value()),
            _ => None,
        }
    }

    fn set(&mut self, property: &str, value: Value) -> Result<(), MapError> {
        match property {
            "id" => self.id = extract(property, value)?,
            "name" => self.name = extract(property, value)?,
            "license_number" => self.license_number = extract(property, value)?,
            "depot_id" => self.depot_id = extract(property, value)?,
            _ => return Err(MapError::UnresolvedColumn(property.to_string())),
        }
        Ok(())
    }
}

struct Postgresish;

impl Dialect for Postgresish {
    fn supports_prefix_limit(&self) -> bool {
        false
    }
}

#[derive(Default)]
struct RecordingSink {
    bound: Vec<(String, Value, Option<SqlType>)>,
}

impl ParameterSink for RecordingSink {
    fn bind(&mut self, name: &str, value: Value, sql_type: Option<SqlType>) {
        self.bound.push((name.to_string(), value, sql_type));
    }
}

struct VecRow(Vec<(&'static str, Option<Value>)>);

impl RowAccessor for VecRow {
    fn field_count(&self) -> usize {
        self.0.len()
    }

    fn name(&self, ordinal: usize) -> &str {
        self.0[ordinal].0
    }

    fn is_null(&self, ordinal: usize) -> bool {
        self.0[ordinal].1.is_none()
    }

    fn value(&self, ordinal: usize) -> Value {
        self.0[ordinal].1.clone().unwrap_or(Value::String(None))
    }
}

#[test]
fn select_with_predicate_binds_converted_identity() {
    let id = Uuid::new_v4();
    let statement = Select::<Courier>::new()
        .columns(["id", "name"])
        .filter(col("id").eq(id).and(col("license_number").eq("12345")))
        .limit(1)
        .build(&Postgresish)
        .unwrap();

    assert_eq!(
        statement.sql(),
        "SELECT\n    id,\n    name\nFROM couriers\nWHERE\n    id = @p_id AND license_number = @p_license_number\nLIMIT 1"
    );

    let mut sink = RecordingSink::default();
    statement.bind_all(&mut sink).unwrap();
    assert_eq!(sink.bound.len(), 2);
    // the identity converter stores uuids as text
    assert_eq!(sink.bound[0].0, "p_id");
    assert_eq!(sink.bound[0].1, Value::String(Some(id.to_string())));
    assert_eq!(sink.bound[0].2, Some(SqlType::Text));
    assert_eq!(sink.bound[1].0, "p_license_number");
}

#[test]
fn capture_reuse_survives_binding() {
    let license: Option<String> = None;
    let clause = compile_where::<Courier>(
        &capture("license_number", license.clone())
            .is_null()
            .or(col("license_number").eq_capture("license_number", license)),
    )
    .unwrap();

    assert_eq!(
        clause.sql(),
        "@p_license_number IS NULL OR license_number = @p_license_number"
    );
    assert_eq!(clause.parameters().len(), 1);
}

#[test]
fn insert_update_delete_roundtrip() {
    let courier = Courier {
        id: Some(Uuid::new_v4()),
        name: Some("John Doe".to_string()),
        license_number: Some("123456".to_string()),
        depot_id: None,
    };

    let insert = Insert::new(&courier).build().unwrap();
    assert_eq!(
        insert.sql(),
        "INSERT INTO couriers (\n    id,\n    name,\n    license_number,\n    depot_id\n)\nVALUES (\n    @id,\n    @name,\n    @license_number,\n    @depot_id\n)"
    );

    let update = Update::new(&courier).columns(["name"]).build().unwrap();
    assert_eq!(
        update.sql(),
        "UPDATE couriers SET\n    name = @name\nWHERE id = @p_id"
    );

    let delete = Delete::by_instance(&courier).unwrap().build().unwrap();
    assert_eq!(delete.sql(), "DELETE FROM couriers\nWHERE id = @p_id");

    let mut sink = RecordingSink::default();
    delete.bind_all(&mut sink).unwrap();
    assert_eq!(
        sink.bound[0].1,
        Value::String(Some(courier.id.unwrap().to_string()))
    );
}

#[test]
fn rows_map_back_through_converters() {
    let id = Uuid::new_v4();
    let row = VecRow(vec![
        ("id", Some(Value::String(Some(id.to_string())))),
        ("name", Some(Value::String(Some("John Doe".to_string())))),
        ("license_number", None),
        ("unmapped_extra", Some(Value::Int(Some(9)))),
    ]);

    let courier: Courier = map_row(&row).unwrap();
    assert_eq!(courier.id, Some(id));
    assert_eq!(courier.name, Some("John Doe".to_string()));
    assert_eq!(courier.license_number, None);

    let values = map_row_values(&row);
    assert_eq!(values.len(), 4);
    assert_eq!(values[2], ("license_number".to_string(), None));
}
