//! Bidirectional value converters and the process-wide converter registry.
//!
//! A converter translates between the stored representation of a value and
//! its in-memory representation, in both directions. Converters are stateless
//! singletons: one instance per converter type, constructed via `Default` on
//! first use and cached for the lifetime of the process.

mod builtin;

pub use builtin::{JsonStringConverter, TimestampConverter, UuidStringConverter};

use crate::error::MapError;
use crate::value::SqlType;
use once_cell::sync::Lazy;
use sea_query::Value;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::RwLock;

/// Bidirectional transform between stored and in-memory representations.
pub trait TypeConverter: Send + Sync + 'static {
    /// Convert a stored value into the in-memory representation.
    fn read(&self, value: Value) -> Result<Value, MapError>;

    /// Convert an in-memory value into the stored representation, optionally
    /// tagging it with an explicit storage type for the parameter sink.
    fn write(&self, value: Value) -> Result<(Value, Option<SqlType>), MapError>;
}

/// Declares the converter bound to a value type.
///
/// The property registration record picks this up when no explicit
/// per-property converter is given. `Option<V>` delegates to `V`, so nullable
/// properties resolve through the inner type.
pub trait ConvertedValue: 'static {
    type Converter: TypeConverter + Default;
}

impl<V: ConvertedValue> ConvertedValue for Option<V> {
    type Converter = V::Converter;
}

static CONVERTERS: Lazy<RwLock<HashMap<TypeId, &'static dyn TypeConverter>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// The singleton instance of converter type `C`.
///
/// Concurrent first access may construct twice; the loser is discarded and
/// leaked. Construction is `Default`, so both instances are equivalent.
pub fn converter<C>() -> &'static dyn TypeConverter
where
    C: TypeConverter + Default,
{
    let key = TypeId::of::<C>();
    {
        let map = CONVERTERS.read().unwrap_or_else(|e| e.into_inner());
        if let Some(instance) = map.get(&key) {
            return *instance;
        }
    }
    let instance: &'static dyn TypeConverter = Box::leak(Box::new(C::default()));
    let mut map = CONVERTERS.write().unwrap_or_else(|e| e.into_inner());
    *map.entry(key).or_insert(instance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Passthrough;

    impl TypeConverter for Passthrough {
        fn read(&self, value: Value) -> Result<Value, MapError> {
            Ok(value)
        }

        fn write(&self, value: Value) -> Result<(Value, Option<SqlType>), MapError> {
            Ok((value, None))
        }
    }

    #[test]
    fn test_converter_is_cached_per_type() {
        let first = converter::<Passthrough>() as *const dyn TypeConverter;
        let second = converter::<Passthrough>() as *const dyn TypeConverter;
        assert!(std::ptr::eq(first, second));
    }
}
