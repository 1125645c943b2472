use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::command::{DbCommandBuilder, DbCommandBuilderFactory};
use crate::core::{ColumnDefinition, DbError, Result, Value};
use crate::data::DataContainer;
use crate::mapping::{EntityName, MappingConfiguration, ObjectId, ResolvedEntity, TableDefinition};
use crate::provider_command::{
    DelegatingCommand, FixedValueCommand, MultiObjectAssociateWithIdsCommand,
    MultiObjectLoadCommand, SingleObjectAssociateWithIdCommand, SingleObjectLoadCommand,
    StorageProviderCommand,
};
use crate::reader::{DataContainerReader, ObjectReader, ObjectTimestamp, TimestampReader};
use crate::result::ObjectLookupResult;
use crate::specification::{
    ComparedColumns, ComparedColumnsSpecification, OrderedColumns, SelectedColumns,
    SelectedColumnsSpecification, SetComparedColumns,
};

/// Builds commands that load objects by id.
#[derive(Debug, Clone)]
pub struct LookupCommandFactory {
    storage_provider_id: String,
    builder_factory: DbCommandBuilderFactory,
    mapping: Arc<MappingConfiguration>,
    max_set_comparison_values: usize,
}

/// Ids sharing one table, in first-seen order.
struct TableGroup<'a> {
    table: &'a TableDefinition,
    ids: Vec<ObjectId>,
}

impl LookupCommandFactory {
    pub fn new(
        storage_provider_id: impl Into<String>,
        builder_factory: DbCommandBuilderFactory,
        mapping: Arc<MappingConfiguration>,
        max_set_comparison_values: usize,
    ) -> Self {
        Self {
            storage_provider_id: storage_provider_id.into(),
            builder_factory,
            mapping,
            max_set_comparison_values: max_set_comparison_values.max(1),
        }
    }

    pub fn storage_provider_id(&self) -> &str {
        &self.storage_provider_id
    }

    pub fn create_for_single_id_lookup(
        &self,
        object_id: &ObjectId,
    ) -> Result<Box<dyn StorageProviderCommand<ObjectLookupResult<DataContainer>>>> {
        let table = self.table_for(object_id)?;
        let compared = ComparedColumns::new(table.object_id_property.split_value_for_comparison(object_id))?;
        let builder = self.builder_factory.create_for_select(
            table,
            Arc::new(SelectedColumns::new(table.all_columns())),
            Arc::new(compared),
            Arc::new(OrderedColumns::create_empty()),
        );
        let reader: Arc<dyn ObjectReader<Output = DataContainer>> =
            Arc::new(DataContainerReader::for_table(self.mapping.clone(), table));
        debug!(object_id = %object_id, table = %table.table_name, "single id lookup");

        Ok(Box::new(SingleObjectAssociateWithIdCommand::new(
            object_id.clone(),
            Box::new(SingleObjectLoadCommand::new(builder, reader)),
        )))
    }

    /// Loads the data containers of `object_ids`, one result per requested
    /// id, in request order. Ids may span any number of tables.
    pub fn create_for_sorted_multi_id_lookup(
        &self,
        object_ids: &[ObjectId],
    ) -> Result<Box<dyn StorageProviderCommand<Vec<ObjectLookupResult<DataContainer>>>>> {
        let groups = self.group_by_table(object_ids)?;
        if groups.is_empty() {
            return Ok(Box::new(FixedValueCommand::new(Vec::new())));
        }

        let mut parts: Vec<(Box<dyn DbCommandBuilder>, Arc<dyn ObjectReader<Output = DataContainer>>)> =
            Vec::new();
        for group in &groups {
            let table = group.table;
            let reader: Arc<dyn ObjectReader<Output = DataContainer>> =
                Arc::new(DataContainerReader::for_table(self.mapping.clone(), table));
            for chunk in group.ids.chunks(self.max_set_comparison_values) {
                let builder = self.builder_factory.create_for_select(
                    table,
                    Arc::new(SelectedColumns::new(table.all_columns())),
                    id_comparison(table, chunk)?,
                    Arc::new(OrderedColumns::create_empty()),
                );
                parts.push((builder, reader.clone()));
            }
        }
        debug!(ids = object_ids.len(), commands = parts.len(), "sorted multi id lookup");

        Ok(Box::new(MultiObjectAssociateWithIdsCommand::new(
            object_ids.to_vec(),
            Box::new(MultiObjectLoadCommand::new(parts)),
        )))
    }

    /// Loads only the current timestamps of `object_ids`.
    pub fn create_for_multi_timestamp_lookup(
        &self,
        object_ids: &[ObjectId],
    ) -> Result<Box<dyn StorageProviderCommand<Vec<ObjectLookupResult<ObjectTimestamp>>>>> {
        let groups = self.group_by_table(object_ids)?;
        if groups.is_empty() {
            return Ok(Box::new(FixedValueCommand::new(Vec::new())));
        }

        let mut parts: Vec<(Box<dyn DbCommandBuilder>, Arc<dyn ObjectReader<Output = ObjectTimestamp>>)> =
            Vec::new();
        for group in &groups {
            let table = group.table;
            let id_property = &table.object_id_property;
            let selected = SelectedColumns::new([
                id_property.value.clone(),
                id_property.class_id.clone(),
                table.timestamp_column.clone(),
            ]);
            let selected: Arc<dyn SelectedColumnsSpecification> = Arc::new(selected);
            let reader: Arc<dyn ObjectReader<Output = ObjectTimestamp>> = Arc::new(
                TimestampReader::new(id_property.clone(), table.timestamp_column.clone()),
            );
            for chunk in group.ids.chunks(self.max_set_comparison_values) {
                let builder = self.builder_factory.create_for_select(
                    table,
                    selected.clone(),
                    id_comparison(table, chunk)?,
                    Arc::new(OrderedColumns::create_empty()),
                );
                parts.push((builder, reader.clone()));
            }
        }
        debug!(ids = object_ids.len(), commands = parts.len(), "multi timestamp lookup");

        let loaded: Box<dyn StorageProviderCommand<Vec<Option<ObjectTimestamp>>>> =
            Box::new(MultiObjectLoadCommand::new(parts));
        let checked = DelegatingCommand::new(
            loaded,
            |timestamps: Vec<Option<ObjectTimestamp>>| {
                // Plain selects without outer joins never produce an empty row.
                assert!(
                    timestamps.iter().all(Option::is_some),
                    "timestamp lookup returned a row without an object id"
                );
                Ok(timestamps)
            },
        );
        Ok(Box::new(MultiObjectAssociateWithIdsCommand::new(
            object_ids.to_vec(),
            Box::new(checked),
        )))
    }

    /// Resolves the table holding `object_id`. Fails for ids of another
    /// provider and for classes stored in views that cannot be queried by id.
    pub fn table_for(&self, object_id: &ObjectId) -> Result<&TableDefinition> {
        let class = self.mapping.class(object_id.class_id())?;
        if class.storage_provider_id() != self.storage_provider_id {
            return Err(DbError::argument(
                "object_ids",
                format!(
                    "object '{}' belongs to storage provider '{}', not '{}'",
                    object_id,
                    class.storage_provider_id(),
                    self.storage_provider_id
                ),
            ));
        }

        match class.storage_entity.resolve() {
            ResolvedEntity::Table(table) => Ok(table),
            ResolvedEntity::UnionView(_) | ResolvedEntity::Empty(_) => Err(DbError::MappingError(format!(
                "Class '{}' is stored in {} '{}', which cannot be looked up by id",
                class.id,
                class.storage_entity.kind_name(),
                class.storage_entity.entity_name()
            ))),
        }
    }

    fn group_by_table<'a>(&'a self, object_ids: &[ObjectId]) -> Result<Vec<TableGroup<'a>>> {
        let mut groups: Vec<TableGroup<'a>> = Vec::new();
        let mut group_index: HashMap<&'a EntityName, usize> = HashMap::new();
        let mut seen: HashSet<(&'a EntityName, Value)> = HashSet::new();

        for object_id in object_ids {
            let table = self.table_for(object_id)?;
            let idx = *group_index.entry(&table.table_name).or_insert_with(|| {
                groups.push(TableGroup {
                    table,
                    ids: Vec::new(),
                });
                groups.len() - 1
            });
            if seen.insert((&table.table_name, object_id.value().clone())) {
                groups[idx].ids.push(object_id.clone());
            }
        }

        for group in &groups {
            trace!(table = %group.table.table_name, ids = group.ids.len(), "grouped lookup ids");
        }
        Ok(groups)
    }
}

/// Equality for a single id, a set comparison for several.
fn id_comparison(
    table: &TableDefinition,
    ids: &[ObjectId],
) -> Result<Arc<dyn ComparedColumnsSpecification>> {
    match ids {
        [id] => Ok(Arc::new(ComparedColumns::new(
            table.object_id_property.split_value_for_comparison(id),
        )?)),
        _ => {
            let column: ColumnDefinition = table.object_id_property.value.clone();
            Ok(Arc::new(SetComparedColumns::new(
                column,
                ids.iter().map(|id| id.value().clone()),
            )?))
        }
    }
}
