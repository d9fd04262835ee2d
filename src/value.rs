//! Runtime value handling: typed conversions to and from `sea_query::Value`,
//! storage type tags, parameter values and the parameter sink abstraction.

use crate::convert::TypeConverter;
use crate::error::MapError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use sea_query::Value;
use std::fmt;
use uuid::Uuid;

/// Trait for mapping Rust types to their corresponding `sea_query::Value`
/// variant.
///
/// Used by `Entity::get`/`Entity::set` implementations to move field values in
/// and out of the dynamic value currency. `from_value` returns `None` when the
/// value does not match the expected variant.
pub trait ValueType: Sized {
    /// Convert this value into a `sea_query::Value`.
    fn into_value(self) -> Value;

    /// Convert a `sea_query::Value` into this type, if possible.
    fn from_value(value: Value) -> Option<Self>;

    /// The null variant for this type.
    fn null_value() -> Value;
}

macro_rules! impl_value_type {
    ($type:ty, $variant:ident) => {
        impl ValueType for $type {
            fn into_value(self) -> Value {
                Value::$variant(Some(self))
            }

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(Some(v)) => Some(v),
                    _ => None,
                }
            }

            fn null_value() -> Value {
                Value::$variant(None)
            }
        }
    };
}

impl_value_type!(bool, Bool);
impl_value_type!(i8, TinyInt);
impl_value_type!(i16, SmallInt);
impl_value_type!(i32, Int);
impl_value_type!(i64, BigInt);
impl_value_type!(f32, Float);
impl_value_type!(f64, Double);
impl_value_type!(String, String);
impl_value_type!(Vec<u8>, Bytes);
impl_value_type!(Uuid, Uuid);
impl_value_type!(Decimal, Decimal);
impl_value_type!(NaiveDate, ChronoDate);
impl_value_type!(NaiveTime, ChronoTime);
impl_value_type!(NaiveDateTime, ChronoDateTime);

// Json is boxed inside `Value`, so it does not fit the macro shape.
impl ValueType for serde_json::Value {
    fn into_value(self) -> Value {
        Value::Json(Some(Box::new(self)))
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Json(Some(v)) => Some(*v),
            _ => None,
        }
    }

    fn null_value() -> Value {
        Value::Json(None)
    }
}

impl<T: ValueType> ValueType for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(v) => T::into_value(v),
            None => T::null_value(),
        }
    }

    fn from_value(value: Value) -> Option<Self> {
        match T::from_value(value.clone()) {
            Some(v) => Some(Some(v)),
            None if value == T::null_value() => Some(None),
            None => None,
        }
    }

    fn null_value() -> Value {
        T::null_value()
    }
}

/// Extract a typed field value, with a property-qualified error on mismatch.
///
/// Convenience for `Entity::set` implementations.
pub fn extract<T: ValueType>(property: &str, value: Value) -> Result<T, MapError> {
    T::from_value(value).ok_or_else(|| {
        MapError::Conversion(format!(
            "value does not match the type of property '{property}'"
        ))
    })
}

/// Whether a runtime value carries the null of its variant.
pub(crate) fn is_null(value: &Value) -> bool {
    match value {
        Value::Bool(v) => v.is_none(),
        Value::TinyInt(v) => v.is_none(),
        Value::SmallInt(v) => v.is_none(),
        Value::Int(v) => v.is_none(),
        Value::BigInt(v) => v.is_none(),
        Value::TinyUnsigned(v) => v.is_none(),
        Value::SmallUnsigned(v) => v.is_none(),
        Value::Unsigned(v) => v.is_none(),
        Value::BigUnsigned(v) => v.is_none(),
        Value::Float(v) => v.is_none(),
        Value::Double(v) => v.is_none(),
        Value::String(v) => v.is_none(),
        Value::Bytes(v) => v.is_none(),
        Value::Json(v) => v.is_none(),
        Value::Uuid(v) => v.is_none(),
        Value::Decimal(v) => v.is_none(),
        Value::ChronoDate(v) => v.is_none(),
        Value::ChronoTime(v) => v.is_none(),
        Value::ChronoDateTime(v) => v.is_none(),
        Value::ChronoDateTimeUtc(v) => v.is_none(),
        Value::ChronoDateTimeLocal(v) => v.is_none(),
        Value::ChronoDateTimeWithTimeZone(v) => v.is_none(),
        _ => false,
    }
}

/// Storage type tag passed to the parameter sink alongside a bound value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Float,
    Double,
    Text,
    Bytes,
    Json,
    Uuid,
    Decimal,
    Date,
    Time,
    Timestamp,
}

impl SqlType {
    /// Default storage type for a runtime value, by variant.
    pub fn of(value: &Value) -> Option<SqlType> {
        match value {
            Value::Bool(_) => Some(SqlType::Boolean),
            Value::TinyInt(_) => Some(SqlType::TinyInt),
            Value::SmallInt(_) | Value::TinyUnsigned(_) => Some(SqlType::SmallInt),
            Value::Int(_) | Value::SmallUnsigned(_) => Some(SqlType::Integer),
            Value::BigInt(_) | Value::Unsigned(_) | Value::BigUnsigned(_) => Some(SqlType::BigInt),
            Value::Float(_) => Some(SqlType::Float),
            Value::Double(_) => Some(SqlType::Double),
            Value::String(_) => Some(SqlType::Text),
            Value::Bytes(_) => Some(SqlType::Bytes),
            Value::Json(_) => Some(SqlType::Json),
            Value::Uuid(_) => Some(SqlType::Uuid),
            Value::Decimal(_) => Some(SqlType::Decimal),
            Value::ChronoDate(_) => Some(SqlType::Date),
            Value::ChronoTime(_) => Some(SqlType::Time),
            Value::ChronoDateTime(_)
            | Value::ChronoDateTimeUtc(_)
            | Value::ChronoDateTimeLocal(_)
            | Value::ChronoDateTimeWithTimeZone(_) => Some(SqlType::Timestamp),
            _ => None,
        }
    }
}

/// A value tagged with an optional converter and an optional explicit storage
/// type, bound under a parameter name.
///
/// The converter, when present, is applied by [`ParamValue::resolve`] before
/// the value reaches the parameter sink.
#[derive(Clone)]
pub struct ParamValue {
    value: Value,
    converter: Option<&'static dyn TypeConverter>,
    sql_type: Option<SqlType>,
}

impl ParamValue {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            converter: None,
            sql_type: None,
        }
    }

    pub fn with_converter(mut self, converter: &'static dyn TypeConverter) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn with_sql_type(mut self, sql_type: SqlType) -> Self {
        self.sql_type = Some(sql_type);
        self
    }

    /// The raw value as bound, before converter application.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn has_converter(&self) -> bool {
        self.converter.is_some()
    }

    pub fn sql_type(&self) -> Option<SqlType> {
        self.sql_type
    }

    /// Apply the converter, if any, producing the storage value and type hint.
    ///
    /// A converter-supplied type hint takes precedence over the explicit one.
    pub fn resolve(&self) -> Result<(Value, Option<SqlType>), MapError> {
        match self.converter {
            Some(converter) => {
                let (value, hint) = converter.write(self.value.clone())?;
                Ok((value, hint.or(self.sql_type)))
            }
            None => Ok((self.value.clone(), self.sql_type)),
        }
    }
}

impl fmt::Debug for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamValue")
            .field("value", &self.value)
            .field("converter", &self.converter.map(|_| "..."))
            .field("sql_type", &self.sql_type)
            .finish()
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        ParamValue::new(value)
    }
}

/// Ordered name -> value parameter collection.
///
/// Names keep first-seen order; re-inserting a name overwrites the value in
/// place without moving it.
#[derive(Debug, Clone, Default)]
pub struct Parameters(Vec<(String, ParamValue)>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) {
        let name = name.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    /// Append another collection, preserving its order.
    pub fn merge(&mut self, other: Parameters) {
        for (name, value) in other.0 {
            self.insert(name, value);
        }
    }

    /// Resolve converters and feed every parameter to the sink in order.
    pub fn bind_all(&self, sink: &mut dyn ParameterSink) -> Result<(), MapError> {
        for (name, param) in self.iter() {
            let (value, sql_type) = param.resolve()?;
            sink.bind(name, value, sql_type);
        }
        Ok(())
    }
}

/// Consumer of named parameter bindings, implemented by the execution layer.
pub trait ParameterSink {
    /// Bind `value` under `name`, with an optional explicit storage type.
    fn bind(&mut self, name: &str, value: Value, sql_type: Option<SqlType>);
}
