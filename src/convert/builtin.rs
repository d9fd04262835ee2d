//! Built-in converters for common storage encodings.

use super::TypeConverter;
use crate::error::MapError;
use crate::value::SqlType;
use chrono::DateTime;
use sea_query::Value;
use uuid::Uuid;

/// Stores `Uuid` values in their canonical text form.
///
/// Useful for backends without a native uuid column type.
#[derive(Debug, Default)]
pub struct UuidStringConverter;

impl TypeConverter for UuidStringConverter {
    fn read(&self, value: Value) -> Result<Value, MapError> {
        match value {
            Value::String(Some(text)) => {
                let id = Uuid::parse_str(&text)
                    .map_err(|e| MapError::Conversion(format!("invalid uuid text '{text}': {e}")))?;
                Ok(Value::Uuid(Some(id)))
            }
            Value::String(None) | Value::Uuid(None) => Ok(Value::Uuid(None)),
            Value::Uuid(Some(id)) => Ok(Value::Uuid(Some(id))),
            other => Err(MapError::Conversion(format!(
                "expected a text column for a uuid value, got {other:?}"
            ))),
        }
    }

    fn write(&self, value: Value) -> Result<(Value, Option<SqlType>), MapError> {
        match value {
            Value::Uuid(Some(id)) => Ok((Value::String(Some(id.to_string())), Some(SqlType::Text))),
            Value::Uuid(None) | Value::String(None) => {
                Ok((Value::String(None), Some(SqlType::Text)))
            }
            Value::String(Some(text)) => Ok((Value::String(Some(text)), Some(SqlType::Text))),
            other => Err(MapError::Conversion(format!(
                "cannot store {other:?} as a uuid text column"
            ))),
        }
    }
}

/// Stores JSON values as serialized text.
#[derive(Debug, Default)]
pub struct JsonStringConverter;

impl TypeConverter for JsonStringConverter {
    fn read(&self, value: Value) -> Result<Value, MapError> {
        match value {
            Value::String(Some(text)) => {
                let json: serde_json::Value = serde_json::from_str(&text)
                    .map_err(|e| MapError::Conversion(format!("invalid json text: {e}")))?;
                Ok(Value::Json(Some(Box::new(json))))
            }
            Value::String(None) | Value::Json(None) => Ok(Value::Json(None)),
            Value::Json(Some(json)) => Ok(Value::Json(Some(json))),
            other => Err(MapError::Conversion(format!(
                "expected a text column for a json value, got {other:?}"
            ))),
        }
    }

    fn write(&self, value: Value) -> Result<(Value, Option<SqlType>), MapError> {
        match value {
            Value::Json(Some(json)) => {
                let text = serde_json::to_string(&*json)
                    .map_err(|e| MapError::Conversion(format!("failed to serialize json: {e}")))?;
                Ok((Value::String(Some(text)), Some(SqlType::Text)))
            }
            Value::Json(None) | Value::String(None) => {
                Ok((Value::String(None), Some(SqlType::Text)))
            }
            Value::String(Some(text)) => Ok((Value::String(Some(text)), Some(SqlType::Text))),
            other => Err(MapError::Conversion(format!(
                "cannot store {other:?} as a json text column"
            ))),
        }
    }
}

/// Stores `NaiveDateTime` values as unix seconds in a BIGINT column.
#[derive(Debug, Default)]
pub struct TimestampConverter;

impl TypeConverter for TimestampConverter {
    fn read(&self, value: Value) -> Result<Value, MapError> {
        match value {
            Value::BigInt(Some(seconds)) => {
                let timestamp = DateTime::from_timestamp(seconds, 0)
                    .map(|dt| dt.naive_utc())
                    .ok_or_else(|| {
                        MapError::Conversion(format!("{seconds} is out of range for a timestamp"))
                    })?;
                Ok(Value::ChronoDateTime(Some(timestamp)))
            }
            Value::BigInt(None) | Value::ChronoDateTime(None) => Ok(Value::ChronoDateTime(None)),
            Value::ChronoDateTime(Some(timestamp)) => Ok(Value::ChronoDateTime(Some(timestamp))),
            other => Err(MapError::Conversion(format!(
                "expected a bigint column for a timestamp value, got {other:?}"
            ))),
        }
    }

    fn write(&self, value: Value) -> Result<(Value, Option<SqlType>), MapError> {
        match value {
            Value::ChronoDateTime(Some(timestamp)) => Ok((
                Value::BigInt(Some(timestamp.and_utc().timestamp())),
                Some(SqlType::BigInt),
            )),
            Value::ChronoDateTime(None) | Value::BigInt(None) => {
                Ok((Value::BigInt(None), Some(SqlType::BigInt)))
            }
            Value::BigInt(Some(seconds)) => {
                Ok((Value::BigInt(Some(seconds)), Some(SqlType::BigInt)))
            }
            other => Err(MapError::Conversion(format!(
                "cannot store {other:?} as a unix timestamp"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::converter;

    #[test]
    fn test_uuid_text_roundtrip() {
        let conv = converter::<UuidStringConverter>();
        let id = Uuid::new_v4();

        let (stored, sql_type) = conv.write(Value::Uuid(Some(id))).unwrap();
        assert_eq!(sql_type, Some(SqlType::Text));
        assert_eq!(stored, Value::String(Some(id.to_string())));

        let loaded = conv.read(stored).unwrap();
        assert_eq!(loaded, Value::Uuid(Some(id)));
    }

    #[test]
    fn test_uuid_text_null_passthrough() {
        let conv = converter::<UuidStringConverter>();
        let (stored, _) = conv.write(Value::Uuid(None)).unwrap();
        assert_eq!(stored, Value::String(None));
        assert_eq!(conv.read(Value::String(None)).unwrap(), Value::Uuid(None));
    }

    #[test]
    fn test_uuid_text_rejects_garbage() {
        let conv = converter::<UuidStringConverter>();
        assert!(conv.read(Value::String(Some("not-a-uuid".into()))).is_err());
        assert!(conv.write(Value::Int(Some(1))).is_err());
    }

    #[test]
    fn test_json_text_roundtrip() {
        let conv = converter::<JsonStringConverter>();
        let json = serde_json::json!({"plate": "AB-123", "active": true});

        let (stored, _) = conv.write(Value::Json(Some(Box::new(json.clone())))).unwrap();
        let loaded = conv.read(stored).unwrap();
        assert_eq!(loaded, Value::Json(Some(Box::new(json))));
    }

    #[test]
    fn test_timestamp_unix_seconds_roundtrip() {
        let conv = converter::<TimestampConverter>();
        let timestamp = DateTime::from_timestamp(1_700_000_000, 0).unwrap().naive_utc();

        let (stored, sql_type) = conv
            .write(Value::ChronoDateTime(Some(timestamp)))
            .unwrap();
        assert_eq!(sql_type, Some(SqlType::BigInt));
        assert_eq!(stored, Value::BigInt(Some(1_700_000_000)));

        let loaded = conv.read(stored).unwrap();
        assert_eq!(loaded, Value::ChronoDateTime(Some(timestamp)));
    }
}
