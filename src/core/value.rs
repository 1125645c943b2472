use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{DbError, Result};

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    Guid(Uuid),
    DateTime(DateTime<Utc>),
    Binary(Vec<u8>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Integer(_) => "INTEGER",
            Self::Float(_) => "FLOAT",
            Self::Text(_) => "TEXT",
            Self::Boolean(_) => "BOOLEAN",
            Self::Guid(_) => "GUID",
            Self::DateTime(_) => "DATETIME",
            Self::Binary(_) => "BINARY",
        }
    }

    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Self::Null => None,
            Self::Integer(_) => Some(DataType::Integer),
            Self::Float(_) => Some(DataType::Float),
            Self::Text(_) => Some(DataType::Text),
            Self::Boolean(_) => Some(DataType::Boolean),
            Self::Guid(_) => Some(DataType::Guid),
            Self::DateTime(_) => Some(DataType::DateTime),
            Self::Binary(_) => Some(DataType::Binary),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_guid(&self) -> Option<Uuid> {
        match self {
            Self::Guid(g) => Some(*g),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

// Floats compare by bit pattern so that Eq and Hash stay consistent; values are
// used as identity keys when lookup results are re-associated.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Guid(a), Self::Guid(b)) => a == b,
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            (Self::Binary(a), Self::Binary(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Null => 0u8.hash(state),
            Self::Integer(i) => {
                1u8.hash(state);
                i.hash(state);
            }
            Self::Float(f) => {
                2u8.hash(state);
                f.to_bits().hash(state);
            }
            Self::Text(s) => {
                3u8.hash(state);
                s.hash(state);
            }
            Self::Boolean(b) => {
                4u8.hash(state);
                b.hash(state);
            }
            Self::Guid(g) => {
                5u8.hash(state);
                g.hash(state);
            }
            Self::DateTime(d) => {
                6u8.hash(state);
                d.hash(state);
            }
            Self::Binary(b) => {
                7u8.hash(state);
                b.hash(state);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(fl) => write!(f, "{}", fl),
            Self::Text(s) => write!(f, "{}", s),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Guid(g) => write!(f, "{}", g),
            Self::DateTime(d) => write!(f, "{}", d.to_rfc3339()),
            Self::Binary(bytes) => {
                write!(f, "0x")?;
                for byte in bytes {
                    write!(f, "{:02X}", byte)?;
                }
                Ok(())
            }
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<Uuid> for Value {
    fn from(g: Uuid) -> Self {
        Self::Guid(g)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Self::DateTime(d)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Binary(b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Integer,
    Float,
    Text,
    Boolean,
    Guid,
    DateTime,
    Binary,
}

impl DataType {
    pub fn is_compatible(&self, value: &Value) -> bool {
        match value.data_type() {
            None => true,
            Some(actual) => actual == *self,
        }
    }

    /// Converts `value` into this type. NULL passes through unchanged.
    pub fn convert(&self, value: &Value) -> Result<Value> {
        if self.is_compatible(value) {
            return Ok(value.clone());
        }

        let converted = match (self, value) {
            (Self::Float, Value::Integer(i)) => Some(Value::Float(*i as f64)),
            (Self::Text, Value::Integer(_))
            | (Self::Text, Value::Float(_))
            | (Self::Text, Value::Boolean(_))
            | (Self::Text, Value::Guid(_)) => Some(Value::Text(value.to_string())),
            (Self::Guid, Value::Text(s)) => Uuid::parse_str(s).ok().map(Value::Guid),
            (Self::DateTime, Value::Text(s)) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|d| Value::DateTime(d.with_timezone(&Utc))),
            _ => None,
        };

        converted.ok_or_else(|| {
            DbError::TypeMismatch(format!(
                "Cannot convert {} value '{}' to {}",
                value.type_name(),
                value,
                self
            ))
        })
    }

    /// Parses a textual literal into a value of this type.
    pub fn parse(&self, text: &str) -> Result<Value> {
        let parsed = match self {
            Self::Integer => text.parse::<i64>().ok().map(Value::Integer),
            Self::Float => text.parse::<f64>().ok().map(Value::Float),
            Self::Text => Some(Value::Text(text.to_string())),
            Self::Boolean => text.parse::<bool>().ok().map(Value::Boolean),
            Self::Guid | Self::DateTime => return self.convert(&Value::Text(text.to_string())),
            Self::Binary => {
                return Err(DbError::UnsupportedOperation(
                    "BINARY values cannot be parsed from text".into(),
                ));
            }
        };

        parsed.ok_or_else(|| DbError::ParseError(format!("'{}' is not a valid {} literal", text, self)))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => write!(f, "INTEGER"),
            Self::Float => write!(f, "FLOAT"),
            Self::Text => write!(f, "TEXT"),
            Self::Boolean => write!(f, "BOOLEAN"),
            Self::Guid => write!(f, "GUID"),
            Self::DateTime => write!(f, "DATETIME"),
            Self::Binary => write!(f, "BINARY"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_equality() {
        assert_eq!(Value::Integer(42), Value::Integer(42));
        assert_eq!(Value::Float(3.5), Value::Float(3.5));
        assert_ne!(Value::Integer(1), Value::Float(1.0));
        let id = Uuid::new_v4();
        assert_eq!(Value::Guid(id), Value::from(id));
    }

    #[test]
    fn test_type_compatibility() {
        let int_type = DataType::Integer;
        assert!(int_type.is_compatible(&Value::Integer(42)));
        assert!(int_type.is_compatible(&Value::Null));
        assert!(!int_type.is_compatible(&Value::Text("hello".into())));
    }

    #[test]
    fn test_convert() {
        assert_eq!(DataType::Float.convert(&Value::Integer(2)).unwrap(), Value::Float(2.0));
        let id = Uuid::new_v4();
        assert_eq!(
            DataType::Guid.convert(&Value::Text(id.to_string())).unwrap(),
            Value::Guid(id)
        );
        assert!(matches!(
            DataType::Integer.convert(&Value::Text("x".into())),
            Err(DbError::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_parse() {
        assert_eq!(DataType::Integer.parse("17").unwrap(), Value::Integer(17));
        assert!(DataType::Boolean.parse("maybe").is_err());
        assert_eq!(Value::Binary(vec![0xAB, 0x01]).to_string(), "0xAB01");
    }
}
