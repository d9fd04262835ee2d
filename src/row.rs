//! Row access and row-to-object mapping.

use crate::entity::{metadata, Entity};
use crate::error::MapError;
use sea_query::Value;

/// Read access to a single result row, by ordinal. Implemented by the
/// execution layer over its driver's row type.
pub trait RowAccessor {
    fn field_count(&self) -> usize;

    /// Column name at `ordinal`.
    fn name(&self, ordinal: usize) -> &str;

    fn is_null(&self, ordinal: usize) -> bool;

    /// Raw value at `ordinal`. Only called for non-null fields.
    fn value(&self, ordinal: usize) -> Value;
}

/// Map the row to a new `T`.
///
/// Null fields are skipped and leave the target property at its default.
/// Columns are matched to properties case-insensitively; unmatched columns
/// are skipped silently, as are properties registered read-only. Values pass
/// through the property's converter when one is declared.
pub fn map_row<T: Entity>(row: &dyn RowAccessor) -> Result<T, MapError> {
    let meta = metadata::<T>()?;
    let mut target = T::default();

    for ordinal in 0..row.field_count() {
        if row.is_null(ordinal) {
            continue;
        }
        let Some(property) = meta.properties().by_column(row.name(ordinal)) else {
            continue;
        };
        if !property.is_writable() {
            continue;
        }
        let raw = row.value(ordinal);
        let value = match property.converter() {
            Some(converter) => converter.read(raw)?,
            None => raw,
        };
        target.set(property.name(), value)?;
    }

    Ok(target)
}

/// Map the row to ordered `(column, value)` pairs; null fields map to `None`.
pub fn map_row_values(row: &dyn RowAccessor) -> Vec<(String, Option<Value>)> {
    (0..row.field_count())
        .map(|ordinal| {
            let name = row.name(ordinal).to_string();
            let value = (!row.is_null(ordinal)).then(|| row.value(ordinal));
            (name, value)
        })
        .collect()
}
