//! Readers turning raw result rows into typed objects. Column ordinals are
//! resolved by name, case-insensitively, once per result.

pub mod data_container_reader;
pub mod object_id_reader;

use std::collections::HashMap;
use std::fmt::Debug;

use crate::core::{ColumnDefinition, DbError, Result, Row, Value};
use crate::result::QueryResult;

pub use data_container_reader::DataContainerReader;
pub use object_id_reader::{ObjectIdReader, ObjectTimestamp, TimestampReader};

#[derive(Debug, Clone)]
pub struct ColumnOrdinals {
    by_name: HashMap<String, usize>,
}

impl ColumnOrdinals {
    pub fn new(columns: &[String]) -> Self {
        let mut by_name = HashMap::with_capacity(columns.len());
        for (idx, name) in columns.iter().enumerate() {
            by_name.entry(name.to_ascii_lowercase()).or_insert(idx);
        }
        Self { by_name }
    }

    pub fn ordinal(&self, column_name: &str) -> Option<usize> {
        self.by_name.get(&column_name.to_ascii_lowercase()).copied()
    }
}

/// One result row addressed by column definition.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    ordinals: &'a ColumnOrdinals,
    row: &'a Row,
}

impl<'a> RowView<'a> {
    pub fn new(ordinals: &'a ColumnOrdinals, row: &'a Row) -> Self {
        Self { ordinals, row }
    }

    pub fn get(&self, column: &ColumnDefinition) -> Result<&'a Value> {
        let ordinal = self.ordinals.ordinal(&column.name).ok_or_else(|| {
            DbError::ExecutionError(format!("Column '{}' is not part of the result", column.name))
        })?;
        self.row.get(ordinal).ok_or_else(|| {
            DbError::ExecutionError(format!(
                "Row has {} values but column '{}' is at ordinal {}",
                self.row.len(),
                column.name,
                ordinal
            ))
        })
    }
}

pub trait ObjectReader: Debug + Send + Sync {
    type Output;

    /// Reads one row. `None` means the row carries no object, e.g. the NULL
    /// side of an outer join.
    fn read_row(&self, row: &RowView<'_>) -> Result<Option<Self::Output>>;

    fn read(&self, result: &QueryResult) -> Result<Option<Self::Output>> {
        let ordinals = ColumnOrdinals::new(&result.columns);
        match result.rows.as_slice() {
            [] => Ok(None),
            [row] => self.read_row(&RowView::new(&ordinals, row)),
            rows => Err(DbError::ExecutionError(format!(
                "Expected at most one row, got {}",
                rows.len()
            ))),
        }
    }

    fn read_sequence(&self, result: &QueryResult) -> Result<Vec<Option<Self::Output>>> {
        let ordinals = ColumnOrdinals::new(&result.columns);
        result
            .rows
            .iter()
            .map(|row| self.read_row(&RowView::new(&ordinals, row)))
            .collect()
    }
}
