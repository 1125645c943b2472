use std::fmt::Debug;
use std::sync::Arc;

use crate::command::DbCommand;
use crate::core::{DbError, Result, StorageTypeInformation};
use crate::dialect::SqlDialect;
use crate::mapping::{EntityName, TableDefinition};
use crate::query::{QueryParameter, QueryParameterType};
use crate::specification::{
    ComparedColumnsSpecification, InsertedColumnsSpecification, OrderedColumnsSpecification,
    SelectedColumnsSpecification, UpdatedColumnsSpecification,
};

/// Produces one parameterized command. Builders are cheap descriptions and
/// never hold a connection.
pub trait DbCommandBuilder: Debug + Send + Sync {
    fn create(&self) -> Result<DbCommand>;
}

#[derive(Debug)]
pub struct SelectDbCommandBuilder {
    pub(crate) table_name: EntityName,
    pub(crate) selected_columns: Arc<dyn SelectedColumnsSpecification>,
    pub(crate) compared_columns: Arc<dyn ComparedColumnsSpecification>,
    pub(crate) ordered_columns: Arc<dyn OrderedColumnsSpecification>,
    pub(crate) dialect: Arc<dyn SqlDialect>,
}

impl DbCommandBuilder for SelectDbCommandBuilder {
    fn create(&self) -> Result<DbCommand> {
        let dialect = self.dialect.as_ref();
        let mut command = DbCommand::new();
        let mut fragments = vec!["SELECT".to_string()];

        self.selected_columns.append_projection(&mut fragments, dialect);
        fragments.push("FROM".to_string());
        fragments.push(dialect.delimit_entity_name(&self.table_name));
        fragments.push("WHERE".to_string());
        self.compared_columns.append_comparisons(&mut fragments, dialect);
        self.compared_columns.add_parameters(&mut command, dialect)?;

        if !self.ordered_columns.is_empty() {
            fragments.push("ORDER BY".to_string());
            self.ordered_columns.append_orderings(&mut fragments, dialect);
        }

        command.set_text(fragments.join(" "));
        Ok(command)
    }
}

/// Selects from every concrete table of a union view, aligning the
/// projections with `NULL AS <column>` where a table lacks a column.
#[derive(Debug)]
pub struct UnionSelectDbCommandBuilder {
    pub(crate) tables: Vec<TableDefinition>,
    pub(crate) selected_columns: Arc<dyn SelectedColumnsSpecification>,
    pub(crate) compared_columns: Arc<dyn ComparedColumnsSpecification>,
    pub(crate) ordered_columns: Arc<dyn OrderedColumnsSpecification>,
    pub(crate) dialect: Arc<dyn SqlDialect>,
}

impl DbCommandBuilder for UnionSelectDbCommandBuilder {
    fn create(&self) -> Result<DbCommand> {
        if self.tables.is_empty() {
            return Err(DbError::UnsupportedOperation(
                "A UNION select needs at least one table".into(),
            ));
        }

        let dialect = self.dialect.as_ref();
        let mut command = DbCommand::new();
        let mut fragments = Vec::new();
        let selected = self
            .ordered_columns
            .union_with_selected_columns(self.selected_columns.clone());

        for (idx, table) in self.tables.iter().enumerate() {
            if idx > 0 {
                fragments.push("UNION ALL".to_string());
            }
            fragments.push("SELECT".to_string());
            selected
                .adjust_for_table(table)?
                .append_projection(&mut fragments, dialect);
            fragments.push("FROM".to_string());
            fragments.push(dialect.delimit_entity_name(&table.table_name));
            fragments.push("WHERE".to_string());
            self.compared_columns.append_comparisons(&mut fragments, dialect);
        }
        // Every part references the same placeholders.
        self.compared_columns.add_parameters(&mut command, dialect)?;

        if !self.ordered_columns.is_empty() {
            fragments.push("ORDER BY".to_string());
            self.ordered_columns.append_orderings(&mut fragments, dialect);
        }

        command.set_text(fragments.join(" "));
        Ok(command)
    }
}

#[derive(Debug)]
pub struct InsertDbCommandBuilder {
    pub(crate) table_name: EntityName,
    pub(crate) inserted_columns: Arc<dyn InsertedColumnsSpecification>,
    pub(crate) dialect: Arc<dyn SqlDialect>,
}

impl DbCommandBuilder for InsertDbCommandBuilder {
    fn create(&self) -> Result<DbCommand> {
        let dialect = self.dialect.as_ref();
        let mut command = DbCommand::new();
        let mut fragments = vec![
            "INSERT INTO".to_string(),
            dialect.delimit_entity_name(&self.table_name),
        ];

        let mut names = Vec::new();
        self.inserted_columns.append_column_names(&mut names, dialect);
        fragments.push(format!("({})", names.join(" ")));

        fragments.push("VALUES".to_string());
        let mut values = Vec::new();
        self.inserted_columns
            .append_column_values(&mut values, &mut command, dialect)?;
        fragments.push(format!("({})", values.join(" ")));

        command.set_text(fragments.join(" "));
        Ok(command)
    }
}

#[derive(Debug)]
pub struct UpdateDbCommandBuilder {
    pub(crate) table_name: EntityName,
    pub(crate) updated_columns: Arc<dyn UpdatedColumnsSpecification>,
    pub(crate) compared_columns: Arc<dyn ComparedColumnsSpecification>,
    pub(crate) dialect: Arc<dyn SqlDialect>,
}

impl DbCommandBuilder for UpdateDbCommandBuilder {
    fn create(&self) -> Result<DbCommand> {
        let dialect = self.dialect.as_ref();
        let mut command = DbCommand::new();
        let mut fragments = vec![
            "UPDATE".to_string(),
            dialect.delimit_entity_name(&self.table_name),
            "SET".to_string(),
        ];

        self.updated_columns
            .append_updated_column_values(&mut fragments, &mut command, dialect)?;
        fragments.push("WHERE".to_string());
        self.compared_columns.append_comparisons(&mut fragments, dialect);
        self.compared_columns.add_parameters(&mut command, dialect)?;

        command.set_text(fragments.join(" "));
        Ok(command)
    }
}

#[derive(Debug)]
pub struct DeleteDbCommandBuilder {
    pub(crate) table_name: EntityName,
    pub(crate) compared_columns: Arc<dyn ComparedColumnsSpecification>,
    pub(crate) dialect: Arc<dyn SqlDialect>,
}

impl DbCommandBuilder for DeleteDbCommandBuilder {
    fn create(&self) -> Result<DbCommand> {
        let dialect = self.dialect.as_ref();
        let mut command = DbCommand::new();
        let mut fragments = vec![
            "DELETE FROM".to_string(),
            dialect.delimit_entity_name(&self.table_name),
            "WHERE".to_string(),
        ];

        self.compared_columns.append_comparisons(&mut fragments, dialect);
        self.compared_columns.add_parameters(&mut command, dialect)?;

        command.set_text(fragments.join(" "));
        Ok(command)
    }
}

/// Binds the parameters of an already-resolved statement. Text parameters
/// are spliced into the statement, value parameters are bound.
#[derive(Debug)]
pub struct QueryDbCommandBuilder {
    pub(crate) statement: String,
    pub(crate) parameters: Vec<QueryParameter>,
    pub(crate) dialect: Arc<dyn SqlDialect>,
}

impl DbCommandBuilder for QueryDbCommandBuilder {
    fn create(&self) -> Result<DbCommand> {
        let mut command = DbCommand::new();
        for parameter in &self.parameters {
            if parameter.parameter_type == QueryParameterType::Value {
                let value = parameter.value.to_value();
                let storage_type = StorageTypeInformation::for_value(&value);
                command.add_parameter(self.dialect.create_parameter(
                    &parameter.name,
                    &value,
                    &storage_type,
                )?)?;
            }
        }

        command.set_text(crate::query::splice_text_parameters(
            &self.statement,
            &self.parameters,
        )?);
        Ok(command)
    }
}
