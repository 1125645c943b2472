use serde::{Deserialize, Serialize};

use crate::core::{DbError, Result};
use crate::mapping::{EntityDefinition, StoragePropertyDefinition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageClass {
    #[default]
    Persistent,
    /// Lives only in the client transaction, never written to the database.
    Transaction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    pub storage_property: StoragePropertyDefinition,
    #[serde(default)]
    pub storage_class: StorageClass,
}

impl PropertyDefinition {
    pub fn new(name: impl Into<String>, storage_property: StoragePropertyDefinition) -> Self {
        Self {
            name: name.into(),
            storage_property,
            storage_class: StorageClass::Persistent,
        }
    }

    pub fn transaction_only(mut self) -> Self {
        self.storage_class = StorageClass::Transaction;
        self
    }

    pub fn is_persistent(&self) -> bool {
        self.storage_class == StorageClass::Persistent
    }

    /// True for foreign-key properties referencing another object.
    pub fn is_relation(&self) -> bool {
        matches!(self.storage_property, StoragePropertyDefinition::ObjectId(_))
    }
}

/// Mapping of one persisted class. `properties` lists inherited properties as
/// well, so a class definition is self-contained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDefinition {
    pub id: String,
    pub storage_entity: EntityDefinition,
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
}

impl ClassDefinition {
    pub fn new(id: impl Into<String>, storage_entity: EntityDefinition) -> Self {
        Self {
            id: id.into(),
            storage_entity,
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: PropertyDefinition) -> Self {
        self.properties.push(property);
        self
    }

    pub fn storage_provider_id(&self) -> &str {
        self.storage_entity.storage_provider_id()
    }

    pub fn property(&self, name: &str) -> Result<&PropertyDefinition> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| {
                DbError::MappingError(format!(
                    "Class '{}' has no property '{}'",
                    self.id, name
                ))
            })
    }

    pub fn persistent_properties(&self) -> impl Iterator<Item = &PropertyDefinition> {
        self.properties.iter().filter(|p| p.is_persistent())
    }

    pub fn has_relation_properties(&self) -> bool {
        self.persistent_properties().any(|p| p.is_relation())
    }
}

/// The foreign-key side of a relation: the class holding the key and the
/// property storing it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationEndPointDefinition {
    pub class_id: String,
    pub property_name: String,
}

impl RelationEndPointDefinition {
    pub fn new(class_id: impl Into<String>, property_name: impl Into<String>) -> Self {
        Self {
            class_id: class_id.into(),
            property_name: property_name.into(),
        }
    }
}
