use std::sync::Arc;

use tracing::debug;

use crate::command::DbCommandBuilderFactory;
use crate::core::{ColumnValue, DbError, Result, Value};
use crate::data::{DataContainer, DataContainerState};
use crate::mapping::{ClassDefinition, MappingConfiguration, ResolvedEntity, TableDefinition};
use crate::provider_command::{
    MultiDataContainerSaveCommand, SaveStatement, SaveStatementKind, StorageProviderCommand,
};
use crate::specification::{ComparedColumns, InsertedColumns, UpdatedColumns};

/// Builds the command that writes a change set.
///
/// Every INSERT of the batch runs before every UPDATE, and every UPDATE
/// before every DELETE. Foreign keys are written by UPDATEs only: new
/// objects are inserted without them and then updated, deleted objects are
/// updated (detaching them) before they are deleted.
#[derive(Debug, Clone)]
pub struct SaveCommandFactory {
    storage_provider_id: String,
    builder_factory: DbCommandBuilderFactory,
    mapping: Arc<MappingConfiguration>,
}

struct SaveTarget<'a> {
    container: &'a DataContainer,
    class: &'a ClassDefinition,
    table: &'a TableDefinition,
}

impl SaveCommandFactory {
    pub fn new(
        storage_provider_id: impl Into<String>,
        builder_factory: DbCommandBuilderFactory,
        mapping: Arc<MappingConfiguration>,
    ) -> Self {
        Self {
            storage_provider_id: storage_provider_id.into(),
            builder_factory,
            mapping,
        }
    }

    pub fn create_for_save(
        &self,
        data_containers: &[DataContainer],
    ) -> Result<Box<dyn StorageProviderCommand<()>>> {
        let mut inserts = Vec::new();
        let mut updates = Vec::new();
        let mut deletes = Vec::new();

        for container in data_containers {
            let target = self.target(container)?;
            match container.state() {
                DataContainerState::New => {
                    inserts.push(self.insert_statement(&target)?);
                    if let Some(update) = self.relation_update_statement(&target)? {
                        updates.push(update);
                    }
                }
                DataContainerState::Changed => {
                    if let Some(update) = self.changed_update_statement(&target)? {
                        updates.push(update);
                    }
                }
                DataContainerState::Deleted => {
                    if let Some(update) = self.relation_update_statement(&target)? {
                        updates.push(update);
                    }
                    deletes.push(self.delete_statement(&target)?);
                }
                DataContainerState::Unchanged => {}
            }
        }

        debug!(
            inserts = inserts.len(),
            updates = updates.len(),
            deletes = deletes.len(),
            "save batch"
        );

        let mut statements = inserts;
        statements.append(&mut updates);
        statements.append(&mut deletes);
        Ok(Box::new(MultiDataContainerSaveCommand::new(statements)))
    }

    fn target<'a>(&'a self, container: &'a DataContainer) -> Result<SaveTarget<'a>> {
        let class = self.mapping.class(container.id().class_id())?;
        if class.storage_provider_id() != self.storage_provider_id {
            return Err(DbError::argument(
                "data_containers",
                format!(
                    "object '{}' belongs to storage provider '{}', not '{}'",
                    container.id(),
                    class.storage_provider_id(),
                    self.storage_provider_id
                ),
            ));
        }

        match class.storage_entity.resolve() {
            ResolvedEntity::Table(table) => Ok(SaveTarget {
                container,
                class,
                table,
            }),
            ResolvedEntity::UnionView(_) | ResolvedEntity::Empty(_) => Err(DbError::MappingError(
                format!(
                    "Class '{}' is stored in {} '{}' and cannot be saved",
                    class.id,
                    class.storage_entity.kind_name(),
                    class.storage_entity.entity_name()
                ),
            )),
        }
    }

    /// ID, ClassID and every persistent non-relation property.
    fn insert_statement(&self, target: &SaveTarget<'_>) -> Result<SaveStatement> {
        let mut column_values = target
            .table
            .object_id_property
            .split_value(Some(target.container.id()));
        for property in target.class.persistent_properties().filter(|p| !p.is_relation()) {
            let default_value = property.storage_property.default_value();
            let value = target.container.value(&property.name).unwrap_or(&default_value);
            column_values.extend(property.storage_property.split_value(value)?);
        }

        let builder = self
            .builder_factory
            .create_for_insert(target.table, Arc::new(InsertedColumns::new(column_values)));
        Ok(SaveStatement::new(
            SaveStatementKind::Insert,
            target.container.id().clone(),
            builder,
        ))
    }

    /// Writes the current foreign keys of a new or deleted object. `None` for
    /// classes without relation properties.
    fn relation_update_statement(&self, target: &SaveTarget<'_>) -> Result<Option<SaveStatement>> {
        let mut column_values = Vec::new();
        for property in target.class.persistent_properties().filter(|p| p.is_relation()) {
            let default_value = property.storage_property.default_value();
            let value = target.container.value(&property.name).unwrap_or(&default_value);
            column_values.extend(property.storage_property.split_value(value)?);
        }
        if column_values.is_empty() {
            return Ok(None);
        }
        self.update_statement(target, column_values).map(Some)
    }

    /// Writes the changed persistent properties. A container marked as
    /// changed without any changed value still gets its class id rewritten.
    fn changed_update_statement(&self, target: &SaveTarget<'_>) -> Result<Option<SaveStatement>> {
        let mut column_values = Vec::new();
        for property in target
            .class
            .persistent_properties()
            .filter(|p| target.container.has_value_changed(&p.name))
        {
            if let Some(value) = target.container.value(&property.name) {
                column_values.extend(property.storage_property.split_value(value)?);
            }
        }

        if column_values.is_empty() {
            if !target.container.has_been_marked_changed() {
                return Ok(None);
            }
            column_values.push(ColumnValue::new(
                target.table.object_id_property.class_id.clone(),
                Value::Text(target.class.id.clone()),
            ));
        }
        self.update_statement(target, column_values).map(Some)
    }

    /// Predicate: id, plus the timestamp unless the object is new.
    fn update_statement(
        &self,
        target: &SaveTarget<'_>,
        column_values: Vec<ColumnValue>,
    ) -> Result<SaveStatement> {
        let include_timestamp = target.container.state() != DataContainerState::New;
        let compared = self.comparison(target, include_timestamp)?;
        let builder = self.builder_factory.create_for_update(
            target.table,
            Arc::new(UpdatedColumns::new(column_values)?),
            Arc::new(compared),
        );
        Ok(SaveStatement::new(
            SaveStatementKind::Update,
            target.container.id().clone(),
            builder,
        ))
    }

    /// Predicate: id, plus the timestamp only for classes without relation
    /// properties. Otherwise the relation update of the same batch has
    /// already checked it.
    fn delete_statement(&self, target: &SaveTarget<'_>) -> Result<SaveStatement> {
        let include_timestamp = !target.class.has_relation_properties();
        let compared = self.comparison(target, include_timestamp)?;
        let builder = self
            .builder_factory
            .create_for_delete(target.table, Arc::new(compared));
        Ok(SaveStatement::new(
            SaveStatementKind::Delete,
            target.container.id().clone(),
            builder,
        ))
    }

    fn comparison(&self, target: &SaveTarget<'_>, include_timestamp: bool) -> Result<ComparedColumns> {
        let id = target.container.id();
        let mut column_values = target.table.object_id_property.split_value_for_comparison(id);
        if include_timestamp {
            let timestamp = target.container.timestamp().ok_or_else(|| {
                DbError::argument(
                    "data_containers",
                    format!("object '{}' has no timestamp to check against", id),
                )
            })?;
            column_values.push(ColumnValue::new(
                target.table.timestamp_column.clone(),
                timestamp.clone(),
            ));
        }
        ComparedColumns::new(column_values)
    }
}
