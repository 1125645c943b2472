use std::sync::Arc;

use crate::core::{ColumnDefinition, Result};
use crate::data::DataContainer;
use crate::mapping::{MappingConfiguration, ObjectIdStoragePropertyDefinition, TableDefinition};
use crate::reader::{ObjectReader, RowView};

/// Reads full data containers. The concrete class of each row comes from its
/// class-id column, so one reader serves every class sharing a table.
#[derive(Debug, Clone)]
pub struct DataContainerReader {
    mapping: Arc<MappingConfiguration>,
    object_id_property: ObjectIdStoragePropertyDefinition,
    timestamp_column: ColumnDefinition,
}

impl DataContainerReader {
    pub fn new(
        mapping: Arc<MappingConfiguration>,
        object_id_property: ObjectIdStoragePropertyDefinition,
        timestamp_column: ColumnDefinition,
    ) -> Self {
        Self {
            mapping,
            object_id_property,
            timestamp_column,
        }
    }

    pub fn for_table(mapping: Arc<MappingConfiguration>, table: &TableDefinition) -> Self {
        Self::new(
            mapping,
            table.object_id_property.clone(),
            table.timestamp_column.clone(),
        )
    }

    /// Reader for free-form query results, which use the shared
    /// infrastructure column names.
    pub fn for_query(mapping: Arc<MappingConfiguration>) -> Self {
        let infrastructure = mapping.infrastructure().clone();
        Self::new(
            mapping,
            infrastructure.object_id_property,
            infrastructure.timestamp_column,
        )
    }
}

impl ObjectReader for DataContainerReader {
    type Output = DataContainer;

    fn read_row(&self, row: &RowView<'_>) -> Result<Option<DataContainer>> {
        let Some(id) = self.object_id_property.combine_value(row)? else {
            return Ok(None);
        };

        let class = self.mapping.class(id.class_id())?;
        let timestamp = row.get(&self.timestamp_column)?.clone();
        let values = class
            .persistent_properties()
            .map(|p| Ok((p.name.clone(), p.storage_property.combine_value(row)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(DataContainer::create_for_existing(id, timestamp, values)))
    }
}
