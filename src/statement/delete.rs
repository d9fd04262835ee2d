//! DELETE statement generation.

use super::Statement;
use crate::entity::{identity_value, metadata, Entity};
use crate::error::MapError;
use crate::expr::{compile_with, Predicate};
use crate::value::{ParamValue, Parameters, SqlType};
use log::trace;
use sea_query::Value;
use std::marker::PhantomData;

#[derive(Debug)]
enum DeleteTarget {
    Predicate(Predicate),
    Identity(Value),
}

/// Builder for DELETE statements.
///
/// Deletes either the rows matching an explicit predicate, or the single row
/// identified by an identity value (given directly or extracted from an
/// instance).
#[derive(Debug)]
pub struct Delete<T: Entity> {
    target: DeleteTarget,
    _entity: PhantomData<T>,
}

impl<T: Entity> Delete<T> {
    /// Delete the rows matching `predicate`.
    pub fn by_filter(predicate: Predicate) -> Self {
        Self {
            target: DeleteTarget::Predicate(predicate),
            _entity: PhantomData,
        }
    }

    /// Delete the row whose identity equals `id`.
    pub fn by_id(id: impl Into<Value>) -> Self {
        Self {
            target: DeleteTarget::Identity(id.into()),
            _entity: PhantomData,
        }
    }

    /// Delete the row identified by `entity`'s identity value.
    ///
    /// Errors when the entity declares no identity or its value is unset.
    pub fn by_instance(entity: &T) -> Result<Self, MapError> {
        Ok(Self::by_id(identity_value(entity)?))
    }

    pub fn build(self) -> Result<Statement, MapError> {
        let meta = metadata::<T>()?;
        let mut sql = format!("DELETE FROM {}\n", meta.table());
        let parameters = match self.target {
            DeleteTarget::Predicate(predicate) => {
                let (text, params) = compile_with(meta, &predicate)?.into_parts();
                sql.push_str("WHERE ");
                sql.push_str(&text);
                params
            }
            DeleteTarget::Identity(id) => {
                let property = meta.require_identity()?;
                let column = property.column();
                sql.push_str(&format!("WHERE {column} = @p_{column}"));

                let mut param = ParamValue::new(id);
                match property.converter() {
                    Some(converter) => param = param.with_converter(converter),
                    None => {
                        if let Some(sql_type) = SqlType::of(param.value()) {
                            param = param.with_sql_type(sql_type);
                        }
                    }
                }
                let mut parameters = Parameters::new();
                parameters.insert(format!("p_{column}"), param);
                parameters
            }
        };

        trace!("generated DELETE for {}", meta.type_name());
        Ok(Statement::new(sql, parameters))
    }
}
