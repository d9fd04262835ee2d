//! INSERT statement generation.

use super::{property_param, push_indented_list, resolve_projection, Statement};
use crate::entity::{metadata, Entity};
use crate::error::MapError;
use crate::value::Parameters;
use log::trace;

/// Builder for INSERT statements over a single entity instance.
///
/// The value list is made of named placeholders equal to the column names;
/// the instance's property values are bound under those names, routed through
/// converters where declared.
pub struct Insert<'a, T: Entity> {
    entity: &'a T,
    projection: Option<Vec<String>>,
}

impl<'a, T: Entity> Insert<'a, T> {
    pub fn new(entity: &'a T) -> Self {
        Self {
            entity,
            projection: None,
        }
    }

    /// Restrict the inserted columns to the given property names, ordered as
    /// given.
    pub fn columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> Result<Statement, MapError> {
        let meta = metadata::<T>()?;
        let properties = resolve_projection(meta, self.projection.as_deref())?;

        let columns: Vec<String> = properties
            .iter()
            .map(|property| property.column().to_string())
            .collect();
        let placeholders: Vec<String> = columns
            .iter()
            .map(|column| format!("@{column}"))
            .collect();

        let mut sql = format!("INSERT INTO {} (\n", meta.table());
        push_indented_list(&mut sql, &columns);
        sql.push_str(")\nVALUES (\n");
        push_indented_list(&mut sql, &placeholders);
        sql.push(')');

        let mut parameters = Parameters::new();
        for property in &properties {
            parameters.insert(
                property.column().to_string(),
                property_param(property, self.entity)?,
            );
        }

        trace!("generated INSERT for {}", meta.type_name());
        Ok(Statement::new(sql, parameters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_cfg::{Driver, Vehicle};
    use sea_query::Value;
    use uuid::Uuid;

    #[test]
    fn test_insert_all_columns_in_declared_order() {
        let driver = Driver {
            id: Some(Uuid::new_v4()),
            name: Some("John Doe".to_string()),
            license_number: Some("123456".to_string()),
        };
        let statement = Insert::new(&driver).build().unwrap();

        assert_eq!(
            statement.sql(),
            "INSERT INTO drivers (\n    id,\n    name,\n    license_number\n)\nVALUES (\n    @id,\n    @name,\n    @license_number\n)"
        );
        let names: Vec<_> = statement.parameters().names().collect();
        assert_eq!(names, vec!["id", "name", "license_number"]);
    }

    #[test]
    fn test_insert_with_projection() {
        let driver = Driver {
            id: None,
            name: Some("John Doe".to_string()),
            license_number: Some("123456".to_string()),
        };
        let statement = Insert::new(&driver).columns(["name"]).build().unwrap();

        assert_eq!(
            statement.sql(),
            "INSERT INTO drivers (\n    name\n)\nVALUES (\n    @name\n)"
        );
        assert_eq!(statement.parameters().len(), 1);
        assert_eq!(
            statement
                .parameters()
                .get("name")
                .map(|p| p.value().clone()),
            Some(Value::String(Some("John Doe".to_string())))
        );
    }

    #[test]
    fn test_insert_routes_values_through_converters() {
        let vin = Uuid::new_v4();
        let vehicle = Vehicle {
            vin: Some(vin),
            plate_number: Some("AB-123".to_string()),
            owner_id: None,
        };
        let statement = Insert::new(&vehicle).build().unwrap();

        assert_eq!(
            statement.sql(),
            "INSERT INTO fleet (\n    vin,\n    plate,\n    owner_id\n)\nVALUES (\n    @vin,\n    @plate,\n    @owner_id\n)"
        );
        let (stored, _) = statement.parameters().get("vin").unwrap().resolve().unwrap();
        assert_eq!(stored, Value::String(Some(vin.to_string())));
    }

    #[test]
    fn test_insert_rejects_unknown_projection() {
        let driver = Driver::default();
        let err = Insert::new(&driver).columns(["bogus"]).build().unwrap_err();
        assert_eq!(err, MapError::UnresolvedColumn("bogus".to_string()));
    }

    #[test]
    fn test_insert_rejects_empty_projection() {
        let driver = Driver::default();
        let err = Insert::new(&driver)
            .columns(Vec::<String>::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, MapError::Unsupported(_)));
    }
}
