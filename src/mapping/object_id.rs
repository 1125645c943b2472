use std::fmt;

use crate::core::Value;

/// Durable identity of a persisted object: the id of its concrete class plus
/// the primary key value. The owning storage provider is resolved through the
/// class definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectId {
    class_id: String,
    value: Value,
}

impl ObjectId {
    pub fn new(class_id: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            class_id: class_id.into(),
            value: value.into(),
        }
    }

    pub fn class_id(&self) -> &str {
        &self.class_id
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.class_id, self.value, self.value.type_name())
    }
}
