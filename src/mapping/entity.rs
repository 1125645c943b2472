use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::ColumnDefinition;
use crate::mapping::{ObjectIdStoragePropertyDefinition, StoragePropertyDefinition};

/// A possibly schema-qualified table or view name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub name: String,
}

impl EntityName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    pub fn with_schema(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A physical table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDefinition {
    pub storage_provider_id: String,
    pub table_name: EntityName,
    pub object_id_property: ObjectIdStoragePropertyDefinition,
    pub timestamp_column: ColumnDefinition,
    #[serde(default)]
    pub data_properties: Vec<StoragePropertyDefinition>,
}

impl TableDefinition {
    /// Identity columns first, then the timestamp, then data columns in
    /// declaration order. A column shared by several properties appears once.
    pub fn all_columns(&self) -> Vec<ColumnDefinition> {
        let mut columns: Vec<ColumnDefinition> = Vec::new();
        let candidates = self
            .object_id_property
            .columns()
            .into_iter()
            .chain(std::iter::once(&self.timestamp_column))
            .chain(self.data_properties.iter().flat_map(|p| p.columns()));

        for column in candidates {
            if !columns.contains(column) {
                columns.push(column.clone());
            }
        }
        columns
    }

    pub fn find_column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.object_id_property
            .columns()
            .into_iter()
            .chain(std::iter::once(&self.timestamp_column))
            .chain(self.data_properties.iter().flat_map(|p| p.columns()))
            .find(|column| column.name == name)
    }
}

/// A view restricting exactly one base entity (single-table inheritance).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterViewDefinition {
    pub storage_provider_id: String,
    pub view_name: EntityName,
    pub base_entity: Box<EntityDefinition>,
}

/// A view spanning several concrete tables. Only identity projections are
/// supported efficiently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnionViewDefinition {
    pub storage_provider_id: String,
    pub view_name: EntityName,
    pub object_id_property: ObjectIdStoragePropertyDefinition,
    pub union_entities: Vec<EntityDefinition>,
}

impl UnionViewDefinition {
    pub fn tables(&self) -> Vec<&TableDefinition> {
        self.union_entities.iter().flat_map(|e| e.tables()).collect()
    }
}

/// An entity that never contains instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmptyViewDefinition {
    pub storage_provider_id: String,
    pub view_name: EntityName,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityDefinition {
    Table(TableDefinition),
    FilterView(FilterViewDefinition),
    UnionView(UnionViewDefinition),
    EmptyView(EmptyViewDefinition),
}

/// The physical shape an entity definition resolves to once filter views
/// have been followed to their base entity.
#[derive(Debug, Clone, Copy)]
pub enum ResolvedEntity<'a> {
    Table(&'a TableDefinition),
    UnionView(&'a UnionViewDefinition),
    Empty(&'a EmptyViewDefinition),
}

impl EntityDefinition {
    pub fn resolve(&self) -> ResolvedEntity<'_> {
        match self {
            Self::Table(table) => ResolvedEntity::Table(table),
            Self::FilterView(view) => view.base_entity.resolve(),
            Self::UnionView(view) => ResolvedEntity::UnionView(view),
            Self::EmptyView(view) => ResolvedEntity::Empty(view),
        }
    }

    /// All concrete tables holding instances of this entity.
    pub fn tables(&self) -> Vec<&TableDefinition> {
        match self.resolve() {
            ResolvedEntity::Table(table) => vec![table],
            ResolvedEntity::UnionView(view) => view.tables(),
            ResolvedEntity::Empty(_) => Vec::new(),
        }
    }

    pub fn storage_provider_id(&self) -> &str {
        match self {
            Self::Table(table) => &table.storage_provider_id,
            Self::FilterView(view) => &view.storage_provider_id,
            Self::UnionView(view) => &view.storage_provider_id,
            Self::EmptyView(view) => &view.storage_provider_id,
        }
    }

    pub fn entity_name(&self) -> &EntityName {
        match self {
            Self::Table(table) => &table.table_name,
            Self::FilterView(view) => &view.view_name,
            Self::UnionView(view) => &view.view_name,
            Self::EmptyView(view) => &view.view_name,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Table(_) => "table",
            Self::FilterView(_) => "filter view",
            Self::UnionView(_) => "union view",
            Self::EmptyView(_) => "empty view",
        }
    }
}
