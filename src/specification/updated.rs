use std::fmt::Debug;

use crate::command::DbCommand;
use crate::core::{ColumnValue, DbError, Result};
use crate::dialect::SqlDialect;

/// The SET list of an UPDATE.
pub trait UpdatedColumnsSpecification: Debug + Send + Sync {
    fn append_updated_column_values(
        &self,
        fragments: &mut Vec<String>,
        command: &mut DbCommand,
        dialect: &dyn SqlDialect,
    ) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdatedColumns {
    column_values: Vec<ColumnValue>,
}

impl UpdatedColumns {
    pub fn new(column_values: impl IntoIterator<Item = ColumnValue>) -> Result<Self> {
        let column_values: Vec<ColumnValue> = column_values.into_iter().collect();
        if column_values.is_empty() {
            return Err(DbError::argument(
                "column_values",
                "at least one updated column is required",
            ));
        }
        Ok(Self { column_values })
    }

    pub fn column_values(&self) -> &[ColumnValue] {
        &self.column_values
    }
}

impl UpdatedColumnsSpecification for UpdatedColumns {
    fn append_updated_column_values(
        &self,
        fragments: &mut Vec<String>,
        command: &mut DbCommand,
        dialect: &dyn SqlDialect,
    ) -> Result<()> {
        let mut assignments = Vec::with_capacity(self.column_values.len());
        for cv in &self.column_values {
            let parameter =
                dialect.create_parameter(&cv.column.name, &cv.value, &cv.column.storage_type)?;
            assignments.push(format!(
                "{} = {}",
                dialect.delimit_identifier(&cv.column.name),
                parameter.name
            ));
            command.add_parameter(parameter)?;
        }
        fragments.push(assignments.join(", "));
        Ok(())
    }
}
