use serde::{Deserialize, Serialize};

use crate::core::{ColumnDefinition, ColumnValue, DbError, Result, Value};
use crate::data::PropertyValue;
use crate::mapping::ObjectId;
use crate::reader::RowView;

/// An object reference stored as a value column plus a class-id column.
/// Used both for an entity's own identity and for foreign keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectIdStoragePropertyDefinition {
    pub value: ColumnDefinition,
    pub class_id: ColumnDefinition,
}

impl ObjectIdStoragePropertyDefinition {
    pub fn new(value: ColumnDefinition, class_id: ColumnDefinition) -> Self {
        Self { value, class_id }
    }

    pub fn columns(&self) -> Vec<&ColumnDefinition> {
        vec![&self.value, &self.class_id]
    }

    pub fn split_value(&self, id: Option<&ObjectId>) -> Vec<ColumnValue> {
        match id {
            Some(id) => vec![
                ColumnValue::new(self.value.clone(), id.value().clone()),
                ColumnValue::new(self.class_id.clone(), id.class_id()),
            ],
            None => vec![
                ColumnValue::new(self.value.clone(), Value::Null),
                ColumnValue::new(self.class_id.clone(), Value::Null),
            ],
        }
    }

    /// Only the value column takes part in comparisons; the class id is
    /// implied by the value.
    pub fn split_value_for_comparison(&self, id: &ObjectId) -> Vec<ColumnValue> {
        vec![ColumnValue::new(self.value.clone(), id.value().clone())]
    }

    pub fn combine_value(&self, row: &RowView<'_>) -> Result<Option<ObjectId>> {
        let value = row.get(&self.value)?;
        if value.is_null() {
            return Ok(None);
        }

        let class_id = row.get(&self.class_id)?;
        let Some(class_id) = class_id.as_str() else {
            return Err(DbError::ExecutionError(format!(
                "Class id column '{}' must contain text, got {}",
                self.class_id.name,
                class_id.type_name()
            )));
        };

        Ok(Some(ObjectId::new(class_id, value.clone())))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoragePropertyDefinition {
    Simple(ColumnDefinition),
    ObjectId(ObjectIdStoragePropertyDefinition),
}

impl StoragePropertyDefinition {
    pub fn columns(&self) -> Vec<&ColumnDefinition> {
        match self {
            Self::Simple(column) => vec![column],
            Self::ObjectId(property) => property.columns(),
        }
    }

    pub fn default_value(&self) -> PropertyValue {
        match self {
            Self::Simple(_) => PropertyValue::Scalar(Value::Null),
            Self::ObjectId(_) => PropertyValue::Reference(None),
        }
    }

    pub fn split_value(&self, value: &PropertyValue) -> Result<Vec<ColumnValue>> {
        match (self, value) {
            (Self::Simple(column), PropertyValue::Scalar(v)) => {
                Ok(vec![ColumnValue::new(column.clone(), v.clone())])
            }
            (Self::ObjectId(property), PropertyValue::Reference(id)) => {
                Ok(property.split_value(id.as_ref()))
            }
            _ => Err(self.mismatch(value)),
        }
    }

    pub fn split_value_for_comparison(&self, value: &PropertyValue) -> Result<Vec<ColumnValue>> {
        match (self, value) {
            (Self::Simple(column), PropertyValue::Scalar(v)) => {
                Ok(vec![ColumnValue::new(column.clone(), v.clone())])
            }
            (Self::ObjectId(property), PropertyValue::Reference(Some(id))) => {
                Ok(property.split_value_for_comparison(id))
            }
            (Self::ObjectId(_), PropertyValue::Reference(None)) => Err(DbError::argument(
                "value",
                "a NULL object reference cannot be used in an equality comparison",
            )),
            _ => Err(self.mismatch(value)),
        }
    }

    pub fn combine_value(&self, row: &RowView<'_>) -> Result<PropertyValue> {
        match self {
            Self::Simple(column) => Ok(PropertyValue::Scalar(row.get(column)?.clone())),
            Self::ObjectId(property) => Ok(PropertyValue::Reference(property.combine_value(row)?)),
        }
    }

    fn mismatch(&self, value: &PropertyValue) -> DbError {
        let expected = match self {
            Self::Simple(_) => "a scalar value",
            Self::ObjectId(_) => "an object reference",
        };
        DbError::TypeMismatch(format!("Storage property expects {}, got {:?}", expected, value))
    }
}
