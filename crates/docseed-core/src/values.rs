//! Generated field values and records.

use bson::oid::ObjectId;
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashMap;
use std::fmt;

/// A whole generated record: field name to value.
pub type Record = HashMap<String, FieldValue>;

/// A generated (or tapped-in) field value.
///
/// The [`fmt::Display`] form doubles as the uniqueness key for
/// `ensure_unique` fields, so two values compare equal for uniqueness
/// purposes exactly when their string forms match.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Double(f64),
    /// String value
    String(String),
    /// Date/time in UTC
    Date(DateTime<Utc>),
    /// BSON ObjectId
    ObjectId(ObjectId),
    /// Array of values
    Array(Vec<FieldValue>),
    /// Nested document
    Object(HashMap<String, FieldValue>),
    /// Null value
    Null,
}

impl FieldValue {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a date.
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Try to get this value as an ObjectId.
    pub fn as_object_id(&self) -> Option<ObjectId> {
        match self {
            Self::ObjectId(oid) => Some(*oid),
            _ => None,
        }
    }

    /// Try to get this value as an array slice.
    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Double(d) => write!(f, "{d}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Date(d) => write!(f, "{}", d.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::ObjectId(oid) => write!(f, "{}", oid.to_hex()),
            Self::Array(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Self::Object(map) => {
                // Stable key order so the uniqueness form is deterministic
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                write!(f, "{{")?;
                for (idx, key) in keys.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{key}:{}", map[*key])?;
                }
                write!(f, "}}")
            }
            Self::Null => write!(f, "null"),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl From<ObjectId> for FieldValue {
    fn from(value: ObjectId) -> Self {
        Self::ObjectId(value)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(value: Vec<FieldValue>) -> Self {
        Self::Array(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_accessors() {
        assert_eq!(FieldValue::Bool(true).as_bool(), Some(true));
        assert_eq!(FieldValue::Int(42).as_i64(), Some(42));
        assert_eq!(FieldValue::Int(42).as_f64(), Some(42.0));
        assert_eq!(FieldValue::Double(1.5).as_f64(), Some(1.5));
        assert_eq!(FieldValue::String("x".into()).as_str(), Some("x"));
        assert!(FieldValue::Null.is_null());
        assert_eq!(FieldValue::Null.as_i64(), None);
    }

    #[test]
    fn test_display_scalars() {
        assert_eq!(FieldValue::Bool(false).to_string(), "false");
        assert_eq!(FieldValue::Int(-3).to_string(), "-3");
        assert_eq!(FieldValue::String("hi".into()).to_string(), "hi");
        assert_eq!(FieldValue::Null.to_string(), "null");

        let date = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(
            FieldValue::Date(date).to_string(),
            "2024-06-01T12:00:00.000Z"
        );
    }

    #[test]
    fn test_display_array_joins_elements() {
        let value = FieldValue::Array(vec![
            FieldValue::Int(1),
            FieldValue::Int(2),
            FieldValue::String("x".into()),
        ]);
        assert_eq!(value.to_string(), "1,2,x");
    }

    #[test]
    fn test_display_object_is_key_sorted() {
        let mut map = HashMap::new();
        map.insert("b".to_string(), FieldValue::Int(2));
        map.insert("a".to_string(), FieldValue::Int(1));
        assert_eq!(FieldValue::Object(map).to_string(), "{a:1,b:2}");
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(FieldValue::from(7i64), FieldValue::Int(7));
        assert_eq!(FieldValue::from(7i32), FieldValue::Int(7));
        assert_eq!(FieldValue::from("s"), FieldValue::String("s".into()));
        assert_eq!(FieldValue::from(true), FieldValue::Bool(true));

        let oid = ObjectId::new();
        assert_eq!(FieldValue::from(oid).as_object_id(), Some(oid));
    }
}
