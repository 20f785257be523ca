//! Context values attached to nodes.
//!
//! Values are a closed set of variants so every one of them has a defined
//! JSON encoding, or a defined failure message when it has none.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::EncodeError;

/// A single piece of diagnostic context.
///
/// Two values are equal when they encode to the same JSON, so `UInt(3)`
/// equals `Int(3)` and a `Timestamp` equals its RFC 3339 `String`.
#[derive(Debug, Clone)]
pub enum ContextValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    /// Encoded as an RFC 3339 string
    Timestamp(DateTime<Utc>),
    /// Nested structured value
    Json(Value),
    /// A value whose conversion failed; carries the failure message
    Unencodable(String),
}

impl ContextValue {
    /// Convert any serializable value, capturing conversion failures.
    pub fn serialized<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => ContextValue::Json(json),
            Err(e) => ContextValue::Unencodable(e.to_string()),
        }
    }

    /// Encode to a JSON value.
    pub fn encode(&self) -> Result<Value, EncodeError> {
        let value = match self {
            ContextValue::Null => Value::Null,
            ContextValue::Bool(b) => Value::Bool(*b),
            ContextValue::Int(i) => Value::from(*i),
            ContextValue::UInt(u) => Value::from(*u),
            ContextValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .ok_or(EncodeError::UnsupportedFloat(*f))?,
            ContextValue::String(s) => Value::String(s.clone()),
            ContextValue::Timestamp(ts) => {
                Value::String(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            ContextValue::Json(json) => json.clone(),
            ContextValue::Unencodable(msg) => return Err(EncodeError::Serialize(msg.clone())),
        };
        Ok(value)
    }

    /// Encode to a JSON value, substituting the failure message on error.
    pub fn encode_or_fallback(&self, key: &str) -> Value {
        self.encode().unwrap_or_else(|e| {
            tracing::warn!("Context value at {:?} could not be encoded: {}", key, e);
            Value::String(e.to_string())
        })
    }

    /// Rebuild a value from decoded JSON.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => ContextValue::Null,
            Value::Bool(b) => ContextValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ContextValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    ContextValue::UInt(u)
                } else {
                    ContextValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => ContextValue::String(s),
            other => ContextValue::Json(other),
        }
    }
}

impl PartialEq for ContextValue {
    fn eq(&self, other: &Self) -> bool {
        match (self.encode(), other.encode()) {
            (Ok(a), Ok(b)) => a == b,
            (Err(a), Err(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

impl Serialize for ContextValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.encode() {
            Ok(value) => value.serialize(serializer),
            Err(e) => serializer.serialize_str(&e.to_string()),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for ContextValue {
                fn from(v: $ty) -> Self {
                    ContextValue::$variant(v.into())
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => UInt,
    u16 => UInt,
    u32 => UInt,
    u64 => UInt,
    f32 => Float,
    f64 => Float,
    String => String,
    &str => String,
    DateTime<Utc> => Timestamp,
    Value => Json,
}

impl From<usize> for ContextValue {
    fn from(v: usize) -> Self {
        ContextValue::UInt(v as u64)
    }
}

impl From<isize> for ContextValue {
    fn from(v: isize) -> Self {
        ContextValue::Int(v as i64)
    }
}

impl<T: Into<ContextValue>> From<Option<T>> for ContextValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(ContextValue::Null)
    }
}

/// Typed extraction from a [`ContextValue`].
pub trait FromContextValue: Sized {
    fn from_context_value(value: &ContextValue) -> Option<Self>;
}

impl FromContextValue for i64 {
    fn from_context_value(value: &ContextValue) -> Option<Self> {
        match value {
            ContextValue::Int(i) => Some(*i),
            ContextValue::UInt(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }
}

impl FromContextValue for u64 {
    fn from_context_value(value: &ContextValue) -> Option<Self> {
        match value {
            ContextValue::UInt(u) => Some(*u),
            ContextValue::Int(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }
}

impl FromContextValue for f64 {
    fn from_context_value(value: &ContextValue) -> Option<Self> {
        match value {
            ContextValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl FromContextValue for bool {
    fn from_context_value(value: &ContextValue) -> Option<Self> {
        match value {
            ContextValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromContextValue for String {
    fn from_context_value(value: &ContextValue) -> Option<Self> {
        match value {
            ContextValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromContextValue for DateTime<Utc> {
    fn from_context_value(value: &ContextValue) -> Option<Self> {
        match value {
            ContextValue::Timestamp(ts) => Some(*ts),
            ContextValue::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|ts| ts.with_timezone(&Utc)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    #[test]
    fn test_encode_scalars() {
        assert_eq!(ContextValue::from(1337).encode().unwrap(), Value::from(1337));
        assert_eq!(ContextValue::from("x").encode().unwrap(), Value::from("x"));
        assert_eq!(ContextValue::from(true).encode().unwrap(), Value::Bool(true));
        assert_eq!(ContextValue::from(None::<i32>).encode().unwrap(), Value::Null);
    }

    #[test]
    fn test_encode_timestamp() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let encoded = ContextValue::from(ts).encode().unwrap();
        assert_eq!(encoded, Value::from("2024-03-01T12:30:00Z"));
    }

    #[test]
    fn test_non_finite_float_fails() {
        let err = ContextValue::from(f64::NAN).encode().unwrap_err();
        assert!(matches!(err, EncodeError::UnsupportedFloat(_)));

        let fallback = ContextValue::from(f64::NAN).encode_or_fallback("ratio");
        assert_eq!(fallback, Value::from("json: unsupported value: NaN"));
    }

    #[test]
    fn test_serialized_captures_failure() {
        let mut bad = HashMap::new();
        bad.insert(vec![1u8], "non-string key");

        let value = ContextValue::serialized(&bad);
        assert!(matches!(value, ContextValue::Unencodable(_)));
        assert!(value.encode().is_err());

        let json = serde_json::to_string(&value).unwrap();
        assert!(json.starts_with("\"json: "));
    }

    #[test]
    fn test_serialized_nested() {
        let value = ContextValue::serialized(&serde_json::json!({"a": [1, 2]}));
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"a":[1,2]}"#);
    }

    #[test]
    fn test_from_json_numbers() {
        assert!(matches!(
            ContextValue::from_json(Value::from(-3)),
            ContextValue::Int(-3)
        ));
        assert!(matches!(
            ContextValue::from_json(Value::from(u64::MAX)),
            ContextValue::UInt(u64::MAX)
        ));
        assert!(matches!(
            ContextValue::from_json(Value::from(0.5)),
            ContextValue::Float(f) if f == 0.5
        ));
    }

    #[test]
    fn test_equality_by_encoding() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(ContextValue::from(3u32), ContextValue::Int(3));
        assert_eq!(ContextValue::from(ts), ContextValue::from("2024-01-01T00:00:00Z"));
        assert_eq!(ContextValue::Json(Value::from(7)), ContextValue::Int(7));
        assert_eq!(ContextValue::from(0.5), ContextValue::Json(Value::from(0.5)));

        assert_ne!(ContextValue::Int(3), ContextValue::Float(3.0));
        assert_ne!(ContextValue::Int(3), ContextValue::from("3"));
        assert_ne!(ContextValue::Null, ContextValue::from(false));
    }

    #[test]
    fn test_equality_of_unencodable_values() {
        assert_eq!(ContextValue::from(f64::NAN), ContextValue::from(f64::NAN));
        assert_ne!(
            ContextValue::from(f64::NAN),
            ContextValue::from("json: unsupported value: NaN")
        );
    }

    #[test]
    fn test_typed_extraction() {
        assert_eq!(i64::from_context_value(&ContextValue::UInt(7)), Some(7));
        assert_eq!(u64::from_context_value(&ContextValue::Int(-1)), None);
        assert_eq!(
            String::from_context_value(&ContextValue::from("here")),
            Some("here".to_string())
        );
        assert_eq!(bool::from_context_value(&ContextValue::Int(1)), None);

        let parsed = DateTime::<Utc>::from_context_value(&ContextValue::from("2024-03-01T12:30:00Z"));
        assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()));
    }
}
