use std::sync::Arc;

use crate::command::builder::{
    DbCommandBuilder, DeleteDbCommandBuilder, InsertDbCommandBuilder, QueryDbCommandBuilder,
    SelectDbCommandBuilder, UnionSelectDbCommandBuilder, UpdateDbCommandBuilder,
};
use crate::dialect::SqlDialect;
use crate::mapping::{TableDefinition, UnionViewDefinition};
use crate::query::Query;
use crate::specification::{
    ComparedColumnsSpecification, InsertedColumnsSpecification, OrderedColumnsSpecification,
    SelectedColumnsSpecification, UpdatedColumnsSpecification,
};

/// Creates command builders for a target entity, all sharing one dialect.
#[derive(Debug, Clone)]
pub struct DbCommandBuilderFactory {
    dialect: Arc<dyn SqlDialect>,
}

impl DbCommandBuilderFactory {
    pub fn new(dialect: Arc<dyn SqlDialect>) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> &Arc<dyn SqlDialect> {
        &self.dialect
    }

    pub fn create_for_select(
        &self,
        table: &TableDefinition,
        selected_columns: Arc<dyn SelectedColumnsSpecification>,
        compared_columns: Arc<dyn ComparedColumnsSpecification>,
        ordered_columns: Arc<dyn OrderedColumnsSpecification>,
    ) -> Box<dyn DbCommandBuilder> {
        Box::new(SelectDbCommandBuilder {
            table_name: table.table_name.clone(),
            selected_columns,
            compared_columns,
            ordered_columns,
            dialect: self.dialect.clone(),
        })
    }

    pub fn create_for_union_select(
        &self,
        view: &UnionViewDefinition,
        selected_columns: Arc<dyn SelectedColumnsSpecification>,
        compared_columns: Arc<dyn ComparedColumnsSpecification>,
        ordered_columns: Arc<dyn OrderedColumnsSpecification>,
    ) -> Box<dyn DbCommandBuilder> {
        Box::new(UnionSelectDbCommandBuilder {
            tables: view.tables().into_iter().cloned().collect(),
            selected_columns,
            compared_columns,
            ordered_columns,
            dialect: self.dialect.clone(),
        })
    }

    pub fn create_for_insert(
        &self,
        table: &TableDefinition,
        inserted_columns: Arc<dyn InsertedColumnsSpecification>,
    ) -> Box<dyn DbCommandBuilder> {
        Box::new(InsertDbCommandBuilder {
            table_name: table.table_name.clone(),
            inserted_columns,
            dialect: self.dialect.clone(),
        })
    }

    pub fn create_for_update(
        &self,
        table: &TableDefinition,
        updated_columns: Arc<dyn UpdatedColumnsSpecification>,
        compared_columns: Arc<dyn ComparedColumnsSpecification>,
    ) -> Box<dyn DbCommandBuilder> {
        Box::new(UpdateDbCommandBuilder {
            table_name: table.table_name.clone(),
            updated_columns,
            compared_columns,
            dialect: self.dialect.clone(),
        })
    }

    pub fn create_for_delete(
        &self,
        table: &TableDefinition,
        compared_columns: Arc<dyn ComparedColumnsSpecification>,
    ) -> Box<dyn DbCommandBuilder> {
        Box::new(DeleteDbCommandBuilder {
            table_name: table.table_name.clone(),
            compared_columns,
            dialect: self.dialect.clone(),
        })
    }

    pub fn create_for_query(&self, query: &Query) -> Box<dyn DbCommandBuilder> {
        Box::new(QueryDbCommandBuilder {
            statement: query.statement.clone(),
            parameters: query.parameters.clone(),
            dialect: self.dialect.clone(),
        })
    }
}
