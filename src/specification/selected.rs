use std::fmt::Debug;
use std::sync::Arc;

use crate::core::{ColumnDefinition, DbError, Result};
use crate::dialect::SqlDialect;
use crate::mapping::TableDefinition;

/// The projection of a SELECT.
pub trait SelectedColumnsSpecification: Debug + Send + Sync {
    fn append_projection(&self, fragments: &mut Vec<String>, dialect: &dyn SqlDialect);

    /// Adds `additional` columns that are not yet part of the projection.
    fn union(
        self: Arc<Self>,
        additional: &[ColumnDefinition],
    ) -> Arc<dyn SelectedColumnsSpecification>;

    /// Re-targets the projection at one concrete table of a UNION.
    fn adjust_for_table(
        &self,
        table: &TableDefinition,
    ) -> Result<Arc<dyn SelectedColumnsSpecification>>;
}

/// `SELECT *`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllSelectedColumns;

impl SelectedColumnsSpecification for AllSelectedColumns {
    fn append_projection(&self, fragments: &mut Vec<String>, _dialect: &dyn SqlDialect) {
        fragments.push("*".to_string());
    }

    fn union(
        self: Arc<Self>,
        _additional: &[ColumnDefinition],
    ) -> Arc<dyn SelectedColumnsSpecification> {
        self
    }

    fn adjust_for_table(
        &self,
        table: &TableDefinition,
    ) -> Result<Arc<dyn SelectedColumnsSpecification>> {
        Err(DbError::UnsupportedOperation(format!(
            "'*' cannot be adjusted to the columns of table '{}'",
            table.table_name
        )))
    }
}

/// An explicit column list. Absent entries stand for columns the current
/// table lacks and are rendered as `NULL`, keeping UNION parts aligned. An
/// absent entry produced by `adjust_for_table` keeps the column's name as its
/// alias, so the first UNION part names every result column for ORDER BY.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedColumns {
    columns: Vec<Projected>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Projected {
    Column(ColumnDefinition),
    Null(Option<String>),
}

impl SelectedColumns {
    pub fn new(columns: impl IntoIterator<Item = ColumnDefinition>) -> Self {
        Self {
            columns: columns.into_iter().map(Projected::Column).collect(),
        }
    }

    pub fn with_absent_columns(columns: Vec<Option<ColumnDefinition>>) -> Self {
        let columns = columns
            .into_iter()
            .map(|column| column.map_or(Projected::Null(None), Projected::Column))
            .collect();
        Self { columns }
    }
}

impl SelectedColumnsSpecification for SelectedColumns {
    fn append_projection(&self, fragments: &mut Vec<String>, dialect: &dyn SqlDialect) {
        let projection: Vec<String> = self
            .columns
            .iter()
            .map(|column| match column {
                Projected::Column(column) => dialect.delimit_identifier(&column.name),
                Projected::Null(None) => "NULL".to_string(),
                Projected::Null(Some(alias)) => {
                    format!("NULL AS {}", dialect.delimit_identifier(alias))
                }
            })
            .collect();
        fragments.push(projection.join(", "));
    }

    fn union(
        self: Arc<Self>,
        additional: &[ColumnDefinition],
    ) -> Arc<dyn SelectedColumnsSpecification> {
        let mut columns = self.columns.clone();
        for column in additional {
            if !columns.iter().any(|c| matches!(c, Projected::Column(c) if c == column)) {
                columns.push(Projected::Column(column.clone()));
            }
        }
        Arc::new(Self { columns })
    }

    fn adjust_for_table(
        &self,
        table: &TableDefinition,
    ) -> Result<Arc<dyn SelectedColumnsSpecification>> {
        let columns = self
            .columns
            .iter()
            .map(|column| match column {
                Projected::Column(c) => table
                    .find_column(&c.name)
                    .cloned()
                    .map_or_else(|| Projected::Null(Some(c.name.clone())), Projected::Column),
                Projected::Null(alias) => Projected::Null(alias.clone()),
            })
            .collect();
        Ok(Arc::new(Self { columns }))
    }
}
