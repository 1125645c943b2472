use std::fmt::Debug;

use crate::command::DbCommand;
use crate::core::{ColumnDefinition, ColumnValue, DbError, Result, Value};
use crate::dialect::SqlDialect;

/// The predicate of a SELECT, UPDATE or DELETE.
pub trait ComparedColumnsSpecification: Debug + Send + Sync {
    fn add_parameters(&self, command: &mut DbCommand, dialect: &dyn SqlDialect) -> Result<()>;

    fn append_comparisons(&self, fragments: &mut Vec<String>, dialect: &dyn SqlDialect);
}

/// `c1 = p1 AND c2 = p2 ...`, one parameter per column value.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparedColumns {
    column_values: Vec<ColumnValue>,
}

impl ComparedColumns {
    pub fn new(column_values: impl IntoIterator<Item = ColumnValue>) -> Result<Self> {
        let column_values: Vec<ColumnValue> = column_values.into_iter().collect();
        if column_values.is_empty() {
            return Err(DbError::argument(
                "column_values",
                "at least one compared column is required",
            ));
        }
        Ok(Self { column_values })
    }

    pub fn column_values(&self) -> &[ColumnValue] {
        &self.column_values
    }
}

impl ComparedColumnsSpecification for ComparedColumns {
    fn add_parameters(&self, command: &mut DbCommand, dialect: &dyn SqlDialect) -> Result<()> {
        for column_value in &self.column_values {
            let parameter = dialect.create_parameter(
                &column_value.column.name,
                &column_value.value,
                &column_value.column.storage_type,
            )?;
            command.add_parameter(parameter)?;
        }
        Ok(())
    }

    fn append_comparisons(&self, fragments: &mut Vec<String>, dialect: &dyn SqlDialect) {
        let comparisons: Vec<String> = self
            .column_values
            .iter()
            .map(|cv| {
                format!(
                    "{} = {}",
                    dialect.delimit_identifier(&cv.column.name),
                    dialect.parameter_name(&cv.column.name)
                )
            })
            .collect();
        fragments.push(comparisons.join(" AND "));
    }
}

/// `c IN (p0, p1, ...)`: one column compared against a set of values.
#[derive(Debug, Clone, PartialEq)]
pub struct SetComparedColumns {
    column: ColumnDefinition,
    values: Vec<Value>,
}

impl SetComparedColumns {
    pub fn new(column: ColumnDefinition, values: impl IntoIterator<Item = Value>) -> Result<Self> {
        let values: Vec<Value> = values.into_iter().collect();
        if values.is_empty() {
            return Err(DbError::argument("values", "at least one value is required"));
        }
        Ok(Self { column, values })
    }

    fn parameter_base_name(&self, index: usize) -> String {
        format!("{}_{}", self.column.name, index)
    }
}

impl ComparedColumnsSpecification for SetComparedColumns {
    fn add_parameters(&self, command: &mut DbCommand, dialect: &dyn SqlDialect) -> Result<()> {
        for (idx, value) in self.values.iter().enumerate() {
            let parameter = dialect.create_parameter(
                &self.parameter_base_name(idx),
                value,
                &self.column.storage_type,
            )?;
            command.add_parameter(parameter)?;
        }
        Ok(())
    }

    fn append_comparisons(&self, fragments: &mut Vec<String>, dialect: &dyn SqlDialect) {
        let placeholders: Vec<String> = (0..self.values.len())
            .map(|idx| dialect.parameter_name(&self.parameter_base_name(idx)))
            .collect();
        fragments.push(format!(
            "{} IN ({})",
            dialect.delimit_identifier(&self.column.name),
            placeholders.join(", ")
        ));
    }
}
