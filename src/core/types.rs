use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::{DataType, DbError, Result, Value};

pub type Row = Vec<Value>;

fn default_nullable() -> bool {
    true
}

/// Storage-side description of a column's type: the portable data type, the
/// native type name of the target database and nullability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageTypeInformation {
    pub data_type: DataType,
    pub native_type: String,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

impl StorageTypeInformation {
    pub fn new(data_type: DataType, native_type: impl Into<String>) -> Self {
        Self {
            data_type,
            native_type: native_type.into(),
            nullable: true,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Infers a storage type for an ad-hoc value, e.g. a query parameter.
    pub fn for_value(value: &Value) -> Self {
        let data_type = value.data_type().unwrap_or(DataType::Text);
        let native_type = match data_type {
            DataType::Integer => "bigint",
            DataType::Float => "float",
            DataType::Text => "nvarchar(max)",
            DataType::Boolean => "bit",
            DataType::Guid => "uniqueidentifier",
            DataType::DateTime => "datetime2",
            DataType::Binary => "varbinary(max)",
        };
        Self::new(data_type, native_type)
    }

    /// Converts a runtime value into the representation bound as a parameter.
    pub fn convert_value(&self, value: &Value) -> Result<Value> {
        if value.is_null() && !self.nullable {
            return Err(DbError::TypeMismatch(format!(
                "NULL cannot be stored in non-nullable {}",
                self.native_type
            )));
        }
        self.data_type.convert(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub storage_type: StorageTypeInformation,
    #[serde(default)]
    pub is_part_of_primary_key: bool,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, storage_type: StorageTypeInformation) -> Self {
        Self {
            name: name.into(),
            storage_type,
            is_part_of_primary_key: false,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.is_part_of_primary_key = true;
        self
    }

    pub fn is_nullable(&self) -> bool {
        self.storage_type.nullable
    }
}

// Columns are identified by name within a table.
impl PartialEq for ColumnDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ColumnDefinition {}

impl Hash for ColumnDefinition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnValue {
    pub column: ColumnDefinition,
    pub value: Value,
}

impl ColumnValue {
    pub fn new(column: ColumnDefinition, value: impl Into<Value>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn sql_keyword(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderedColumn {
    pub column: ColumnDefinition,
    pub order: SortOrder,
}

impl OrderedColumn {
    pub fn new(column: ColumnDefinition, order: SortOrder) -> Self {
        Self { column, order }
    }
}
