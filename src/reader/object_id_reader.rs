use crate::core::{ColumnDefinition, Result, Value};
use crate::mapping::{ObjectId, ObjectIdStoragePropertyDefinition};
use crate::reader::{ObjectReader, RowView};

#[derive(Debug, Clone)]
pub struct ObjectIdReader {
    object_id_property: ObjectIdStoragePropertyDefinition,
}

impl ObjectIdReader {
    pub fn new(object_id_property: ObjectIdStoragePropertyDefinition) -> Self {
        Self { object_id_property }
    }
}

impl ObjectReader for ObjectIdReader {
    type Output = ObjectId;

    fn read_row(&self, row: &RowView<'_>) -> Result<Option<ObjectId>> {
        self.object_id_property.combine_value(row)
    }
}

/// An object's id paired with its current concurrency token.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectTimestamp {
    pub object_id: ObjectId,
    pub timestamp: Value,
}

#[derive(Debug, Clone)]
pub struct TimestampReader {
    object_id_property: ObjectIdStoragePropertyDefinition,
    timestamp_column: ColumnDefinition,
}

impl TimestampReader {
    pub fn new(
        object_id_property: ObjectIdStoragePropertyDefinition,
        timestamp_column: ColumnDefinition,
    ) -> Self {
        Self {
            object_id_property,
            timestamp_column,
        }
    }
}

impl ObjectReader for TimestampReader {
    type Output = ObjectTimestamp;

    fn read_row(&self, row: &RowView<'_>) -> Result<Option<ObjectTimestamp>> {
        let Some(object_id) = self.object_id_property.combine_value(row)? else {
            return Ok(None);
        };
        let timestamp = row.get(&self.timestamp_column)?.clone();
        Ok(Some(ObjectTimestamp {
            object_id,
            timestamp,
        }))
    }
}
