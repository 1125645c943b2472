use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{DbError, OrderedColumn, Result, SortOrder};
use crate::mapping::ClassDefinition;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortedPropertySpecification {
    pub property_name: String,
    pub order: SortOrder,
}

impl SortedPropertySpecification {
    pub fn new(property_name: impl Into<String>, order: SortOrder) -> Self {
        Self {
            property_name: property_name.into(),
            order,
        }
    }
}

/// An ordered list of (logical property, direction) pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortExpressionDefinition {
    pub sorted_properties: Vec<SortedPropertySpecification>,
}

impl SortExpressionDefinition {
    pub fn new(sorted_properties: Vec<SortedPropertySpecification>) -> Self {
        Self { sorted_properties }
    }

    pub fn then_by(mut self, property_name: impl Into<String>, order: SortOrder) -> Self {
        self.sorted_properties
            .push(SortedPropertySpecification::new(property_name, order));
        self
    }

    /// Parses `"Name, Position desc"`; the direction defaults to ascending.
    pub fn parse(text: &str) -> Result<Self> {
        let mut sorted_properties = Vec::new();
        for item in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let mut parts = item.split_whitespace();
            let Some(property_name) = parts.next() else {
                continue;
            };
            let order = match parts.next().map(|s| s.to_ascii_lowercase()) {
                None => SortOrder::Ascending,
                Some(dir) if dir == "asc" || dir == "ascending" => SortOrder::Ascending,
                Some(dir) if dir == "desc" || dir == "descending" => SortOrder::Descending,
                Some(dir) => {
                    return Err(DbError::ParseError(format!(
                        "Unknown sort direction '{}' in '{}'",
                        dir, item
                    )));
                }
            };
            if parts.next().is_some() {
                return Err(DbError::ParseError(format!("Malformed sort item '{}'", item)));
            }
            sorted_properties.push(SortedPropertySpecification::new(property_name, order));
        }
        Ok(Self { sorted_properties })
    }

    pub fn is_empty(&self) -> bool {
        self.sorted_properties.is_empty()
    }

    /// Expands every sorted property into its physical columns, in declared
    /// order, each column carrying the property's direction.
    pub fn ordered_columns(&self, class: &ClassDefinition) -> Result<Vec<OrderedColumn>> {
        let mut ordered = Vec::new();
        for sorted in &self.sorted_properties {
            let property = class.property(&sorted.property_name)?;
            if !property.is_persistent() {
                return Err(DbError::MappingError(format!(
                    "Property '{}' of class '{}' is not persistent and cannot be sorted on",
                    property.name, class.id
                )));
            }
            for column in property.storage_property.columns() {
                ordered.push(OrderedColumn::new(column.clone(), sorted.order));
            }
        }
        Ok(ordered)
    }
}

impl fmt::Display for SortExpressionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self
            .sorted_properties
            .iter()
            .map(|s| format!("{} {}", s.property_name, s.order.sql_keyword()))
            .collect();
        write!(f, "{}", items.join(", "))
    }
}
