use std::sync::Arc;

use tracing::debug;

use crate::command::{DbCommandBuilder, DbCommandBuilderFactory};
use crate::core::{DbError, Result};
use crate::data::{DataContainer, PropertyValue};
use crate::factory::LookupCommandFactory;
use crate::mapping::{
    ClassDefinition, MappingConfiguration, ObjectId, RelationEndPointDefinition, ResolvedEntity,
    SortExpressionDefinition, TableDefinition, UnionViewDefinition,
};
use crate::provider_command::{
    DelegatingCommand, FixedValueCommand, IndirectDataContainerLoadCommand, MultiObjectLoadCommand,
    StorageProviderCommand,
};
use crate::reader::{DataContainerReader, ObjectIdReader, ObjectReader};
use crate::specification::{
    AllSelectedColumns, ComparedColumns, ComparedColumnsSpecification, OrderedColumns,
    OrderedColumnsSpecification, SelectedColumns,
};

/// Builds commands that load the objects pointing at a given object through
/// a foreign key.
///
/// The strategy depends on where the related class is stored: a table is
/// queried directly, a filter view through its base entity, a union view in
/// two phases (ids first, then a multi-id lookup) and an empty view yields
/// nothing without touching the database.
#[derive(Debug, Clone)]
pub struct RelationLookupCommandFactory {
    storage_provider_id: String,
    builder_factory: DbCommandBuilderFactory,
    mapping: Arc<MappingConfiguration>,
    lookup_factory: LookupCommandFactory,
}

impl RelationLookupCommandFactory {
    pub fn new(
        storage_provider_id: impl Into<String>,
        builder_factory: DbCommandBuilderFactory,
        mapping: Arc<MappingConfiguration>,
        lookup_factory: LookupCommandFactory,
    ) -> Self {
        Self {
            storage_provider_id: storage_provider_id.into(),
            builder_factory,
            mapping,
            lookup_factory,
        }
    }

    pub fn create_for_relation_lookup(
        &self,
        end_point: &RelationEndPointDefinition,
        related_id: &ObjectId,
        sort_expression: Option<&SortExpressionDefinition>,
    ) -> Result<Box<dyn StorageProviderCommand<Vec<DataContainer>>>> {
        let class = self.mapping.class(&end_point.class_id)?;
        if class.storage_provider_id() != self.storage_provider_id {
            return Err(DbError::argument(
                "end_point",
                format!(
                    "class '{}' belongs to storage provider '{}', not '{}'",
                    class.id,
                    class.storage_provider_id(),
                    self.storage_provider_id
                ),
            ));
        }

        let property = class.property(&end_point.property_name)?;
        if !property.is_relation() || !property.is_persistent() {
            return Err(DbError::argument(
                "end_point",
                format!(
                    "property '{}' of class '{}' is not a persistent foreign key",
                    property.name, class.id
                ),
            ));
        }

        let compared: Arc<dyn ComparedColumnsSpecification> = Arc::new(ComparedColumns::new(
            property
                .storage_property
                .split_value_for_comparison(&PropertyValue::Reference(Some(related_id.clone())))?,
        )?);
        let ordered = ordered_columns(class, sort_expression)?;

        debug!(
            class = %class.id,
            property = %property.name,
            related_id = %related_id,
            entity = class.storage_entity.kind_name(),
            "relation lookup"
        );

        match class.storage_entity.resolve() {
            ResolvedEntity::Table(table) => Ok(self.direct_lookup(table, compared, ordered)),
            ResolvedEntity::UnionView(view) => Ok(self.indirect_lookup(view, compared, ordered)),
            ResolvedEntity::Empty(_) => Ok(Box::new(FixedValueCommand::new(Vec::new()))),
        }
    }

    fn direct_lookup(
        &self,
        table: &TableDefinition,
        compared: Arc<dyn ComparedColumnsSpecification>,
        ordered: Arc<dyn OrderedColumnsSpecification>,
    ) -> Box<dyn StorageProviderCommand<Vec<DataContainer>>> {
        let builder = self.builder_factory.create_for_select(
            table,
            Arc::new(AllSelectedColumns),
            compared,
            ordered,
        );
        let reader: Arc<dyn ObjectReader<Output = DataContainer>> =
            Arc::new(DataContainerReader::for_table(self.mapping.clone(), table));
        let loaded: Box<dyn StorageProviderCommand<Vec<Option<DataContainer>>>> =
            Box::new(MultiObjectLoadCommand::new(vec![(builder, reader)]));

        Box::new(DelegatingCommand::new(
            loaded,
            |containers: Vec<Option<DataContainer>>| Ok(expect_all_present(containers)),
        ))
    }

    fn indirect_lookup(
        &self,
        view: &UnionViewDefinition,
        compared: Arc<dyn ComparedColumnsSpecification>,
        ordered: Arc<dyn OrderedColumnsSpecification>,
    ) -> Box<dyn StorageProviderCommand<Vec<DataContainer>>> {
        let id_columns = view.object_id_property.columns().into_iter().cloned();
        let builder: Box<dyn DbCommandBuilder> = self.builder_factory.create_for_union_select(
            view,
            Arc::new(SelectedColumns::new(id_columns)),
            compared,
            ordered,
        );
        let reader: Arc<dyn ObjectReader<Output = ObjectId>> =
            Arc::new(ObjectIdReader::new(view.object_id_property.clone()));
        let loaded: Box<dyn StorageProviderCommand<Vec<Option<ObjectId>>>> =
            Box::new(MultiObjectLoadCommand::new(vec![(builder, reader)]));
        let object_ids = DelegatingCommand::new(loaded, |ids: Vec<Option<ObjectId>>| {
            Ok(expect_all_present(ids))
        });

        Box::new(IndirectDataContainerLoadCommand::new(
            Box::new(object_ids),
            self.lookup_factory.clone(),
        ))
    }
}

fn ordered_columns(
    class: &ClassDefinition,
    sort_expression: Option<&SortExpressionDefinition>,
) -> Result<Arc<dyn OrderedColumnsSpecification>> {
    match sort_expression {
        Some(sort) if !sort.is_empty() => Ok(Arc::new(OrderedColumns::new(sort.ordered_columns(class)?))),
        _ => Ok(Arc::new(OrderedColumns::create_empty())),
    }
}

/// Foreign-key selects involve no outer join, so every row carries an id.
fn expect_all_present<T>(objects: Vec<Option<T>>) -> Vec<T> {
    let row_count = objects.len();
    let present: Vec<T> = objects.into_iter().flatten().collect();
    assert_eq!(
        present.len(),
        row_count,
        "relation lookup returned a row without an object id"
    );
    present
}
