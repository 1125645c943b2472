use std::fmt::Debug;

use crate::command::DbCommand;
use crate::core::{ColumnValue, Result};
use crate::dialect::SqlDialect;

/// Column list and parallel value list of an INSERT.
pub trait InsertedColumnsSpecification: Debug + Send + Sync {
    fn append_column_names(&self, fragments: &mut Vec<String>, dialect: &dyn SqlDialect);

    fn append_column_values(
        &self,
        fragments: &mut Vec<String>,
        command: &mut DbCommand,
        dialect: &dyn SqlDialect,
    ) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertedColumns {
    column_values: Vec<ColumnValue>,
}

impl InsertedColumns {
    pub fn new(column_values: impl IntoIterator<Item = ColumnValue>) -> Self {
        Self {
            column_values: column_values.into_iter().collect(),
        }
    }

    pub fn column_values(&self) -> &[ColumnValue] {
        &self.column_values
    }
}

impl InsertedColumnsSpecification for InsertedColumns {
    fn append_column_names(&self, fragments: &mut Vec<String>, dialect: &dyn SqlDialect) {
        let names: Vec<String> = self
            .column_values
            .iter()
            .map(|cv| dialect.delimit_identifier(&cv.column.name))
            .collect();
        fragments.push(names.join(", "));
    }

    fn append_column_values(
        &self,
        fragments: &mut Vec<String>,
        command: &mut DbCommand,
        dialect: &dyn SqlDialect,
    ) -> Result<()> {
        let mut placeholders = Vec::with_capacity(self.column_values.len());
        for cv in &self.column_values {
            let parameter =
                dialect.create_parameter(&cv.column.name, &cv.value, &cv.column.storage_type)?;
            placeholders.push(parameter.name.clone());
            command.add_parameter(parameter)?;
        }
        fragments.push(placeholders.join(", "));
        Ok(())
    }
}
