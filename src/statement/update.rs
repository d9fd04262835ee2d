//! UPDATE statement generation.

use super::{property_param, resolve_projection, Statement};
use crate::entity::{metadata, Entity};
use crate::error::MapError;
use crate::expr::{compile_with, Predicate};
use crate::value::Parameters;
use log::trace;

/// Builder for UPDATE statements over a single entity instance.
///
/// The SET list covers the projection (or all properties) minus the primary
/// identity. Without an explicit filter the statement updates the row whose
/// identity matches the instance, which requires the entity to declare one.
pub struct Update<'a, T: Entity> {
    entity: &'a T,
    projection: Option<Vec<String>>,
    predicate: Option<Predicate>,
    coalesce: bool,
}

impl<'a, T: Entity> Update<'a, T> {
    pub fn new(entity: &'a T) -> Self {
        Self {
            entity,
            projection: None,
            predicate: None,
            coalesce: false,
        }
    }

    /// Restrict the SET list to the given property names, ordered as given.
    pub fn columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Explicit WHERE predicate instead of the identity equality default.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Wrap each assignment as `col = COALESCE( @col, col )`, so null-valued
    /// parameters keep the stored value (partial, non-destructive update).
    pub fn coalesce(mut self) -> Self {
        self.coalesce = true;
        self
    }

    pub fn build(self) -> Result<Statement, MapError> {
        let meta = metadata::<T>()?;
        let properties = resolve_projection(meta, self.projection.as_deref())?;
        let set_list: Vec<_> = properties
            .into_iter()
            .filter(|property| !property.is_identity())
            .collect();
        if set_list.is_empty() {
            return Err(MapError::Unsupported(
                "UPDATE requires at least one non-identity property".to_string(),
            ));
        }

        let mut sql = format!("UPDATE {} SET\n", meta.table());
        for (index, property) in set_list.iter().enumerate() {
            let column = property.column();
            if self.coalesce {
                sql.push_str(&format!("    {column} = COALESCE( @{column}, {column} )"));
            } else {
                sql.push_str(&format!("    {column} = @{column}"));
            }
            if index + 1 < set_list.len() {
                sql.push(',');
            }
            sql.push('\n');
        }

        let mut parameters = Parameters::new();
        for property in &set_list {
            parameters.insert(
                property.column().to_string(),
                property_param(property, self.entity)?,
            );
        }

        match &self.predicate {
            Some(predicate) => {
                let (text, params) = compile_with(meta, predicate)?.into_parts();
                sql.push_str("WHERE\n    ");
                sql.push_str(&text);
                parameters.merge(params);
            }
            None => {
                let id = meta.require_identity()?;
                let column = id.column();
                sql.push_str(&format!("WHERE {column} = @p_{column}"));
                parameters.insert(format!("p_{column}"), property_param(id, self.entity)?);
            }
        }

        trace!("generated UPDATE for {}", meta.type_name());
        Ok(Statement::new(sql, parameters))
    }
}
