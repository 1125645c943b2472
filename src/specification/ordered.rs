use std::fmt::Debug;
use std::sync::Arc;

use crate::core::{ColumnDefinition, OrderedColumn};
use crate::dialect::SqlDialect;
use crate::specification::SelectedColumnsSpecification;

/// The ORDER BY list of a SELECT. An empty specification renders nothing.
pub trait OrderedColumnsSpecification: Debug + Send + Sync {
    fn is_empty(&self) -> bool;

    fn append_orderings(&self, fragments: &mut Vec<String>, dialect: &dyn SqlDialect);

    /// ORDER BY columns must generally be part of the projection; this adds
    /// them to `selected`.
    fn union_with_selected_columns(
        &self,
        selected: Arc<dyn SelectedColumnsSpecification>,
    ) -> Arc<dyn SelectedColumnsSpecification>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedColumns {
    columns: Vec<OrderedColumn>,
}

impl OrderedColumns {
    pub fn new(columns: impl IntoIterator<Item = OrderedColumn>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
        }
    }

    pub fn create_empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[OrderedColumn] {
        &self.columns
    }
}

impl OrderedColumnsSpecification for OrderedColumns {
    fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn append_orderings(&self, fragments: &mut Vec<String>, dialect: &dyn SqlDialect) {
        if self.columns.is_empty() {
            return;
        }
        let orderings: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                format!(
                    "{} {}",
                    dialect.delimit_identifier(&c.column.name),
                    c.order.sql_keyword()
                )
            })
            .collect();
        fragments.push(orderings.join(", "));
    }

    fn union_with_selected_columns(
        &self,
        selected: Arc<dyn SelectedColumnsSpecification>,
    ) -> Arc<dyn SelectedColumnsSpecification> {
        if self.columns.is_empty() {
            return selected;
        }
        let columns: Vec<ColumnDefinition> =
            self.columns.iter().map(|c| c.column.clone()).collect();
        selected.union(&columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DataType, SortOrder, StorageTypeInformation};
    use crate::dialect::SqlServerDialect;
    use crate::specification::SelectedColumns;

    fn column(name: &str) -> ColumnDefinition {
        ColumnDefinition::new(name, StorageTypeInformation::new(DataType::Integer, "int"))
    }

    #[test]
    fn test_empty_appends_nothing() {
        let mut fragments = vec!["SELECT".to_string(), "*".to_string()];
        OrderedColumns::create_empty().append_orderings(&mut fragments, &SqlServerDialect);
        assert_eq!(fragments, vec!["SELECT", "*"]);
    }

    #[test]
    fn test_orderings_with_direction_tokens() {
        let spec = OrderedColumns::new(vec![
            OrderedColumn::new(column("Name"), SortOrder::Ascending),
            OrderedColumn::new(column("Position"), SortOrder::Descending),
        ]);
        let mut fragments = vec!["ORDER BY".to_string()];
        spec.append_orderings(&mut fragments, &SqlServerDialect);
        assert_eq!(fragments.join(" "), "ORDER BY [Name] ASC, [Position] DESC");
    }

    #[test]
    fn test_union_with_selected_columns() {
        let selected: Arc<dyn SelectedColumnsSpecification> =
            Arc::new(SelectedColumns::new(vec![column("ID")]));

        let unchanged = OrderedColumns::create_empty().union_with_selected_columns(selected.clone());
        assert!(Arc::ptr_eq(&unchanged, &selected));

        let spec = OrderedColumns::new(vec![OrderedColumn::new(column("Name"), SortOrder::Ascending)]);
        let unioned = spec.union_with_selected_columns(selected);
        let mut fragments = Vec::new();
        unioned.append_projection(&mut fragments, &SqlServerDialect);
        assert_eq!(fragments, vec!["[ID], [Name]"]);
    }
}
