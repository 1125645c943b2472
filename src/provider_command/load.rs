use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::command::DbCommandBuilder;
use crate::core::{Result, Value};
use crate::execution::ExecutionContext;
use crate::provider_command::StorageProviderCommand;
use crate::reader::ObjectReader;
use crate::result::QueryResult;

/// Executes one reader command and reads at most one object from it.
pub struct SingleObjectLoadCommand<T> {
    builder: Box<dyn DbCommandBuilder>,
    reader: Arc<dyn ObjectReader<Output = T>>,
}

impl<T> SingleObjectLoadCommand<T> {
    pub fn new(builder: Box<dyn DbCommandBuilder>, reader: Arc<dyn ObjectReader<Output = T>>) -> Self {
        Self { builder, reader }
    }
}

impl<T> fmt::Debug for SingleObjectLoadCommand<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleObjectLoadCommand")
            .field("builder", &self.builder)
            .field("reader", &self.reader)
            .finish()
    }
}

impl<T> StorageProviderCommand<Option<T>> for SingleObjectLoadCommand<T> {
    fn execute(&self, context: &mut dyn ExecutionContext) -> Result<Option<T>> {
        let command = self.builder.create()?;
        debug!(
            text = command.text(),
            parameters = command.parameters().len(),
            "executing single object load"
        );
        let result = context.execute_reader(&command)?;
        self.reader.read(&result)
    }
}

/// Executes several reader commands in order and concatenates what they read.
pub struct MultiObjectLoadCommand<T> {
    parts: Vec<(Box<dyn DbCommandBuilder>, Arc<dyn ObjectReader<Output = T>>)>,
}

impl<T> MultiObjectLoadCommand<T> {
    pub fn new(parts: Vec<(Box<dyn DbCommandBuilder>, Arc<dyn ObjectReader<Output = T>>)>) -> Self {
        Self { parts }
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }
}

impl<T> fmt::Debug for MultiObjectLoadCommand<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiObjectLoadCommand")
            .field("parts", &self.parts)
            .finish()
    }
}

impl<T> StorageProviderCommand<Vec<Option<T>>> for MultiObjectLoadCommand<T> {
    fn execute(&self, context: &mut dyn ExecutionContext) -> Result<Vec<Option<T>>> {
        let mut objects = Vec::new();
        for (builder, reader) in &self.parts {
            let command = builder.create()?;
            debug!(
                text = command.text(),
                parameters = command.parameters().len(),
                "executing multi object load"
            );
            let result = context.execute_reader(&command)?;
            objects.extend(reader.read_sequence(&result)?);
        }
        Ok(objects)
    }
}

#[derive(Debug)]
pub struct ScalarValueLoadCommand {
    builder: Box<dyn DbCommandBuilder>,
}

impl ScalarValueLoadCommand {
    pub fn new(builder: Box<dyn DbCommandBuilder>) -> Self {
        Self { builder }
    }
}

impl StorageProviderCommand<Value> for ScalarValueLoadCommand {
    fn execute(&self, context: &mut dyn ExecutionContext) -> Result<Value> {
        let command = self.builder.create()?;
        debug!(text = command.text(), "executing scalar load");
        context.execute_scalar(&command)
    }
}

/// Hands back the raw rows of a custom query.
#[derive(Debug)]
pub struct QueryResultLoadCommand {
    builder: Box<dyn DbCommandBuilder>,
}

impl QueryResultLoadCommand {
    pub fn new(builder: Box<dyn DbCommandBuilder>) -> Self {
        Self { builder }
    }
}

impl StorageProviderCommand<QueryResult> for QueryResultLoadCommand {
    fn execute(&self, context: &mut dyn ExecutionContext) -> Result<QueryResult> {
        let command = self.builder.create()?;
        debug!(text = command.text(), "executing custom query");
        context.execute_reader(&command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::DbCommand;
    use crate::core::{ColumnDefinition, DataType, StorageTypeInformation};
    use crate::mapping::ObjectIdStoragePropertyDefinition;
    use crate::provider_command::test_support::ScriptedContext;
    use crate::reader::ObjectIdReader;

    #[derive(Debug)]
    struct FixedTextBuilder(&'static str);

    impl DbCommandBuilder for FixedTextBuilder {
        fn create(&self) -> Result<DbCommand> {
            let mut command = DbCommand::new();
            command.set_text(self.0);
            Ok(command)
        }
    }

    fn id_reader() -> Arc<dyn ObjectReader<Output = crate::mapping::ObjectId>> {
        Arc::new(ObjectIdReader::new(ObjectIdStoragePropertyDefinition::new(
            ColumnDefinition::new("ID", StorageTypeInformation::new(DataType::Integer, "int")),
            ColumnDefinition::new("ClassID", StorageTypeInformation::new(DataType::Text, "varchar(100)")),
        )))
    }

    fn id_rows(rows: &[(i64, &str)]) -> QueryResult {
        let mut result = QueryResult::with_columns(["ID", "ClassID"]);
        for (id, class_id) in rows {
            result.push_row(vec![Value::Integer(*id), Value::Text(class_id.to_string())]);
        }
        result
    }

    #[test]
    fn test_single_load_reads_missing_row_as_none() {
        let command = SingleObjectLoadCommand::new(Box::new(FixedTextBuilder("SELECT 1")), id_reader());
        let mut context = ScriptedContext::with_results(vec![QueryResult::with_columns(["ID", "ClassID"])]);

        assert_eq!(command.execute(&mut context).unwrap(), None);
        assert_eq!(context.executed, vec!["SELECT 1"]);
    }

    #[test]
    fn test_single_load_rejects_more_than_one_row() {
        let command = SingleObjectLoadCommand::new(Box::new(FixedTextBuilder("SELECT 1")), id_reader());
        let mut context =
            ScriptedContext::with_results(vec![id_rows(&[(1, "Order"), (2, "Order")])]);

        assert!(command.execute(&mut context).is_err());
    }

    #[test]
    fn test_multi_load_concatenates_parts_in_order() {
        let command = MultiObjectLoadCommand::new(vec![
            (Box::new(FixedTextBuilder("SELECT a")) as Box<dyn DbCommandBuilder>, id_reader()),
            (Box::new(FixedTextBuilder("SELECT b")), id_reader()),
        ]);
        let mut context = ScriptedContext::with_results(vec![
            id_rows(&[(1, "Order")]),
            id_rows(&[(2, "Company"), (3, "Company")]),
        ]);

        let ids = command.execute(&mut context).unwrap();
        let values: Vec<i64> = ids
            .iter()
            .map(|id| id.as_ref().unwrap().value().as_i64().unwrap())
            .collect();
        assert_eq!(values, vec![1, 2, 3]);
        assert_eq!(context.executed, vec!["SELECT a", "SELECT b"]);
    }

    #[test]
    fn test_scalar_load_returns_first_cell() {
        let command = ScalarValueLoadCommand::new(Box::new(FixedTextBuilder("SELECT COUNT(*)")));
        let mut result = QueryResult::with_columns(["count"]);
        result.push_row(vec![Value::Integer(42)]);
        let mut context = ScriptedContext::with_results(vec![result]);

        assert_eq!(command.execute(&mut context).unwrap(), Value::Integer(42));
    }
}
