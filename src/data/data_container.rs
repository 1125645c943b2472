use std::collections::BTreeMap;

use crate::core::Value;
use crate::mapping::ObjectId;

/// Current value of one property: a scalar, or a reference to another object.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Scalar(Value),
    Reference(Option<ObjectId>),
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        Self::Scalar(value)
    }
}

impl From<ObjectId> for PropertyValue {
    fn from(id: ObjectId) -> Self {
        Self::Reference(Some(id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataContainerState {
    New,
    Changed,
    Deleted,
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    New,
    Existing,
    Deleted,
}

#[derive(Debug, Clone, PartialEq)]
struct PropertyEntry {
    original: PropertyValue,
    current: PropertyValue,
}

/// Snapshot of one persisted object's property values and lifecycle state.
#[derive(Debug, Clone, PartialEq)]
pub struct DataContainer {
    id: ObjectId,
    timestamp: Option<Value>,
    properties: BTreeMap<String, PropertyEntry>,
    lifecycle: Lifecycle,
    marked_changed: bool,
}

impl DataContainer {
    pub fn create_new(id: ObjectId) -> Self {
        Self {
            id,
            timestamp: None,
            properties: BTreeMap::new(),
            lifecycle: Lifecycle::New,
            marked_changed: false,
        }
    }

    pub fn create_for_existing<I>(id: ObjectId, timestamp: Value, values: I) -> Self
    where
        I: IntoIterator<Item = (String, PropertyValue)>,
    {
        let properties = values
            .into_iter()
            .map(|(name, value)| {
                (
                    name,
                    PropertyEntry {
                        original: value.clone(),
                        current: value,
                    },
                )
            })
            .collect();

        Self {
            id,
            timestamp: Some(timestamp),
            properties,
            lifecycle: Lifecycle::Existing,
            marked_changed: false,
        }
    }

    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    pub fn timestamp(&self) -> Option<&Value> {
        self.timestamp.as_ref()
    }

    pub fn state(&self) -> DataContainerState {
        match self.lifecycle {
            Lifecycle::New => DataContainerState::New,
            Lifecycle::Deleted => DataContainerState::Deleted,
            Lifecycle::Existing if self.marked_changed || self.has_changed_values() => {
                DataContainerState::Changed
            }
            Lifecycle::Existing => DataContainerState::Unchanged,
        }
    }

    pub fn value(&self, property_name: &str) -> Option<&PropertyValue> {
        self.properties.get(property_name).map(|e| &e.current)
    }

    pub fn original_value(&self, property_name: &str) -> Option<&PropertyValue> {
        self.properties.get(property_name).map(|e| &e.original)
    }

    pub fn set_value(&mut self, property_name: impl Into<String>, value: impl Into<PropertyValue>) {
        let value = value.into();
        let lifecycle = self.lifecycle;
        self.properties
            .entry(property_name.into())
            .and_modify(|entry| entry.current = value.clone())
            .or_insert_with(|| PropertyEntry {
                // A property first assigned on an existing object counts as a change.
                original: match lifecycle {
                    Lifecycle::New => value.clone(),
                    _ => PropertyValue::Scalar(Value::Null),
                },
                current: value,
            });
    }

    pub fn has_value_changed(&self, property_name: &str) -> bool {
        self.properties
            .get(property_name)
            .is_some_and(|e| e.original != e.current)
    }

    pub fn mark_as_changed(&mut self) {
        self.marked_changed = true;
    }

    pub fn has_been_marked_changed(&self) -> bool {
        self.marked_changed
    }

    pub fn delete(&mut self) {
        self.lifecycle = Lifecycle::Deleted;
    }

    fn has_changed_values(&self) -> bool {
        self.properties.values().any(|e| e.original != e.current)
    }
}
