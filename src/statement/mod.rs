//! Statement generators for object CRUD.
//!
//! Each generator is a chained builder over one entity type, producing a
//! [`Statement`]: SQL text plus the ordered named parameters to bind. The
//! execution layer owns running the statement; [`Statement::bind_all`] feeds
//! a parameter sink, resolving converters on the way.

mod delete;
mod dialect;
mod insert;
mod select;
mod update;

pub use delete::Delete;
pub use dialect::Dialect;
pub use insert::Insert;
pub use select::Select;
pub use update::Update;

use crate::entity::{Entity, EntityMetadata, PropertyMetadata};
use crate::error::MapError;
use crate::value::{ParamValue, ParameterSink, Parameters, SqlType};

/// Generated SQL text plus its ordered named parameters.
#[derive(Debug, Clone)]
pub struct Statement {
    sql: String,
    parameters: Parameters,
}

impl Statement {
    pub(crate) fn new(sql: String, parameters: Parameters) -> Self {
        Self { sql, parameters }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Resolve converters and feed every parameter to the sink in order.
    pub fn bind_all(&self, sink: &mut dyn ParameterSink) -> Result<(), MapError> {
        self.parameters.bind_all(sink)
    }
}

/// Resolve the effective property list: the explicit projection when given,
/// else all mapped properties in declared order.
pub(crate) fn resolve_projection<'m>(
    meta: &'m EntityMetadata,
    projection: Option<&[String]>,
) -> Result<Vec<&'m PropertyMetadata>, MapError> {
    match projection {
        Some(names) => {
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            meta.projection(&names)
        }
        None => Ok(meta.properties().iter().collect()),
    }
}

/// Parameter for a property's current value on `entity`, routed through the
/// property's converter when one is declared, else tagged with the default
/// storage type of the value.
pub(crate) fn property_param<T: Entity>(
    property: &PropertyMetadata,
    entity: &T,
) -> Result<ParamValue, MapError> {
    let value = entity
        .get(property.name())
        .ok_or_else(|| MapError::UnresolvedColumn(property.name().to_string()))?;
    let mut param = ParamValue::new(value);
    match property.converter() {
        Some(converter) => param = param.with_converter(converter),
        None => {
            let sql_type = SqlType::of(param.value()).ok_or_else(|| {
                MapError::Conversion(format!(
                    "no storage type for the value of property '{}' and no converter declared",
                    property.name()
                ))
            })?;
            param = param.with_sql_type(sql_type);
        }
    }
    Ok(param)
}

/// Append the indented, comma-separated block of lines used by the column
/// lists of SELECT and INSERT.
pub(crate) fn push_indented_list(sql: &mut String, entries: &[String]) {
    for (index, entry) in entries.iter().enumerate() {
        sql.push_str("    ");
        sql.push_str(entry);
        if index + 1 < entries.len() {
            sql.push(',');
        }
        sql.push('\n');
    }
}
