//! SELECT statement generation.

use super::{push_indented_list, resolve_projection, Dialect, Statement};
use crate::entity::{metadata, Entity};
use crate::error::MapError;
use crate::expr::{compile_with, Predicate};
use crate::value::Parameters;
use log::trace;
use std::marker::PhantomData;

/// Builder for SELECT statements.
///
/// # Example
///
/// ```
/// use tidemap::{col, Select, Dialect};
/// # use tidemap::{Entity, EntityDef, MapError, PropertyDef};
/// # use tidemap::value::{extract, ValueType};
/// # use sea_query::Value;
/// # #[derive(Debug, Default, Clone)]
/// # struct Driver { id: Option<i64>, name: Option<String> }
/// # impl Entity for Driver {
/// #     fn entity_def() -> EntityDef {
/// #         EntityDef::new("Driver")
/// #             .property(PropertyDef::new("id").identity())
/// #             .property(PropertyDef::new("name"))
/// #     }
/// #     fn get(&self, property: &str) -> Option<Value> {
/// #         match property {
/// #             "id" => Some(self.id.into_value()),
/// #             "name" => Some(self.name.clone().into_value()),
/// #             _ => None,
/// #         }
/// #     }
/// #     fn set(&mut self, property: &str, value: Value) -> Result<(), MapError> {
/// #         match property {
/// #             "id" => self.id = extract(property, value)?,
/// #             "name" => self.name = extract(property, value)?,
/// #             _ => return Err(MapError::UnresolvedColumn(property.to_string())),
/// #         }
/// #         Ok(())
/// #     }
/// # }
/// struct Suffix;
/// impl Dialect for Suffix {
///     fn supports_prefix_limit(&self) -> bool { false }
/// }
///
/// let statement = Select::<Driver>::new()
///     .filter(col("name").eq("John Doe"))
///     .limit(10)
///     .build(&Suffix)
///     .unwrap();
/// assert!(statement.sql().ends_with("LIMIT 10"));
/// ```
pub struct Select<T: Entity> {
    projection: Option<Vec<String>>,
    predicate: Option<Predicate>,
    limit: Option<u64>,
    _entity: PhantomData<T>,
}

impl<T: Entity> Select<T> {
    pub fn new() -> Self {
        Self {
            projection: None,
            predicate: None,
            limit: None,
            _entity: PhantomData,
        }
    }

    /// Restrict the column list to the given property names, ordered as
    /// given.
    pub fn columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Filter rows with a compiled predicate.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Maximum number of rows; placement is decided by the dialect.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn build(self, dialect: &dyn Dialect) -> Result<Statement, MapError> {
        let meta = metadata::<T>()?;
        let properties = resolve_projection(meta, self.projection.as_deref())?;

        let mut sql = String::from("SELECT\n");
        if let Some(limit) = self.limit {
            if dialect.supports_prefix_limit() {
                sql.push_str(&format!("TOP {limit}\n"));
            }
        }
        let columns: Vec<String> = properties
            .iter()
            .map(|property| property.column().to_string())
            .collect();
        push_indented_list(&mut sql, &columns);
        sql.push_str("FROM ");
        sql.push_str(meta.table());

        let mut parameters = Parameters::new();
        if let Some(predicate) = &self.predicate {
            let (text, params) = compile_with(meta, predicate)?.into_parts();
            sql.push_str("\nWHERE\n    ");
            sql.push_str(&text);
            parameters = params;
        }

        if let Some(limit) = self.limit {
            if !dialect.supports_prefix_limit() {
                sql.push_str(&format!("\nLIMIT {limit}"));
            }
        }

        trace!("generated SELECT for {}", meta.type_name());
        Ok(Statement::new(sql, parameters))
    }
}

impl<T: Entity> Default for Select<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::col;
    use crate::tests_cfg::{Driver, Vehicle};
    use uuid::Uuid;

    struct PrefixLimit;
    struct SuffixLimit;

    impl Dialect for PrefixLimit {
        fn supports_prefix_limit(&self) -> bool {
            true
        }
    }

    impl Dialect for SuffixLimit {
        fn supports_prefix_limit(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_select_all_columns() {
        let statement = Select::<Driver>::new().build(&SuffixLimit).unwrap();
        assert_eq!(
            statement.sql(),
            "SELECT\n    id,\n    name,\n    license_number\nFROM drivers"
        );
        assert!(statement.parameters().is_empty());
    }

    #[test]
    fn test_select_with_projection_and_filter() {
        let id = Uuid::new_v4();
        let statement = Select::<Driver>::new()
            .columns(["name", "id"])
            .filter(col("id").eq(id))
            .build(&SuffixLimit)
            .unwrap();

        assert_eq!(
            statement.sql(),
            "SELECT\n    name,\n    id\nFROM drivers\nWHERE\n    id = @p_id"
        );
        assert_eq!(statement.parameters().len(), 1);
    }

    #[test]
    fn test_select_limit_placement_follows_dialect() {
        let prefix = Select::<Driver>::new()
            .columns(["id"])
            .limit(5)
            .build(&PrefixLimit)
            .unwrap();
        assert_eq!(prefix.sql(), "SELECT\nTOP 5\n    id\nFROM drivers");

        let suffix = Select::<Driver>::new()
            .columns(["id"])
            .limit(5)
            .build(&SuffixLimit)
            .unwrap();
        assert_eq!(suffix.sql(), "SELECT\n    id\nFROM drivers\nLIMIT 5");
    }

    #[test]
    fn test_select_uses_table_override_and_column_overrides() {
        let statement = Select::<Vehicle>::new().build(&SuffixLimit).unwrap();
        assert_eq!(
            statement.sql(),
            "SELECT\n    vin,\n    plate,\n    owner_id\nFROM fleet"
        );
    }

    #[test]
    fn test_select_rejects_unknown_projection() {
        let err = Select::<Driver>::new()
            .columns(["bogus"])
            .build(&SuffixLimit)
            .unwrap_err();
        assert_eq!(err, MapError::UnresolvedColumn("bogus".to_string()));
    }
}
