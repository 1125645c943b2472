use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::core::{ColumnDefinition, DataType, DbError, Result, StorageTypeInformation};
use crate::mapping::{ClassDefinition, EntityDefinition, ObjectIdStoragePropertyDefinition};

/// Column layout shared by every table: the identity columns and the
/// timestamp. Used to read results of free-form queries, whose projection is
/// not tied to a single table.
#[derive(Debug, Clone, Deserialize)]
pub struct InfrastructureColumns {
    pub object_id_property: ObjectIdStoragePropertyDefinition,
    pub timestamp_column: ColumnDefinition,
}

impl Default for InfrastructureColumns {
    fn default() -> Self {
        Self {
            object_id_property: ObjectIdStoragePropertyDefinition::new(
                ColumnDefinition::new(
                    "ID",
                    StorageTypeInformation::new(DataType::Guid, "uniqueidentifier").not_null(),
                )
                .primary_key(),
                ColumnDefinition::new(
                    "ClassID",
                    StorageTypeInformation::new(DataType::Text, "varchar(100)").not_null(),
                ),
            ),
            timestamp_column: ColumnDefinition::new(
                "Timestamp",
                StorageTypeInformation::new(DataType::Binary, "rowversion").not_null(),
            ),
        }
    }
}

#[derive(Deserialize)]
struct MappingDocument {
    #[serde(default)]
    infrastructure: InfrastructureColumns,
    classes: Vec<ClassDefinition>,
}

/// Read-only mapping metadata: class definitions with their storage entities.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "MappingDocument")]
pub struct MappingConfiguration {
    infrastructure: InfrastructureColumns,
    classes: Vec<ClassDefinition>,
    class_index: HashMap<String, usize>,
}

impl TryFrom<MappingDocument> for MappingConfiguration {
    type Error = DbError;

    fn try_from(document: MappingDocument) -> Result<Self> {
        Self::with_infrastructure(document.classes, document.infrastructure)
    }
}

impl MappingConfiguration {
    pub fn new(classes: Vec<ClassDefinition>) -> Result<Self> {
        Self::with_infrastructure(classes, InfrastructureColumns::default())
    }

    pub fn with_infrastructure(
        classes: Vec<ClassDefinition>,
        infrastructure: InfrastructureColumns,
    ) -> Result<Self> {
        let mut class_index = HashMap::with_capacity(classes.len());
        for (idx, class) in classes.iter().enumerate() {
            if class_index.insert(class.id.clone(), idx).is_some() {
                return Err(DbError::MappingError(format!(
                    "Class '{}' is defined more than once",
                    class.id
                )));
            }
            validate_class(class)?;
        }

        Ok(Self {
            infrastructure,
            classes,
            class_index,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            DbError::IoError(format!("Failed to read mapping '{}': {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    pub fn class(&self, class_id: &str) -> Result<&ClassDefinition> {
        self.class_index
            .get(class_id)
            .map(|idx| &self.classes[*idx])
            .ok_or_else(|| DbError::MappingError(format!("Class '{}' is not mapped", class_id)))
    }

    pub fn classes(&self) -> &[ClassDefinition] {
        &self.classes
    }

    pub fn infrastructure(&self) -> &InfrastructureColumns {
        &self.infrastructure
    }
}

fn validate_class(class: &ClassDefinition) -> Result<()> {
    let mut names = HashSet::new();
    for property in &class.properties {
        if !names.insert(property.name.as_str()) {
            return Err(DbError::MappingError(format!(
                "Class '{}' declares property '{}' more than once",
                class.id, property.name
            )));
        }
    }
    validate_entity(&class.id, &class.storage_entity)?;
    validate_property_columns(class)
}

/// Every column of a persistent property must exist in at least one table of
/// the class. Union views align missing columns with NULL, so one table is
/// enough; empty views have no columns to check.
fn validate_property_columns(class: &ClassDefinition) -> Result<()> {
    let tables = class.storage_entity.tables();
    if tables.is_empty() {
        return Ok(());
    }

    for property in class.persistent_properties() {
        for column in property.storage_property.columns() {
            if !tables.iter().any(|t| t.find_column(&column.name).is_some()) {
                return Err(DbError::MappingError(format!(
                    "Property '{}' of class '{}' is stored in column '{}', which {} '{}' does not have",
                    property.name,
                    class.id,
                    column.name,
                    class.storage_entity.kind_name(),
                    class.storage_entity.entity_name()
                )));
            }
        }
    }
    Ok(())
}

fn validate_entity(class_id: &str, entity: &EntityDefinition) -> Result<()> {
    match entity {
        EntityDefinition::Table(_) | EntityDefinition::EmptyView(_) => Ok(()),
        EntityDefinition::FilterView(view) => {
            if view.base_entity.storage_provider_id() != view.storage_provider_id {
                return Err(DbError::MappingError(format!(
                    "Filter view '{}' of class '{}' spans storage providers",
                    view.view_name, class_id
                )));
            }
            validate_entity(class_id, &view.base_entity)
        }
        EntityDefinition::UnionView(view) => {
            if view.union_entities.is_empty() {
                return Err(DbError::MappingError(format!(
                    "Union view '{}' of class '{}' has no union entities",
                    view.view_name, class_id
                )));
            }
            view.union_entities
                .iter()
                .try_for_each(|e| validate_entity(class_id, e))
        }
    }
}
