//! Executable commands returned by the factories. A command describes the
//! database round trips needed for one persistence intent; nothing touches
//! the database until `execute` is called with an execution context.

pub mod associate;
pub mod indirect;
pub mod load;
pub mod save;

use std::fmt::Debug;

use crate::core::Result;
use crate::execution::ExecutionContext;

pub use associate::{
    DelegatingCommand, FixedValueCommand, Identifiable, MultiObjectAssociateWithIdsCommand,
    SingleObjectAssociateWithIdCommand,
};
pub use indirect::IndirectDataContainerLoadCommand;
pub use load::{
    MultiObjectLoadCommand, QueryResultLoadCommand, ScalarValueLoadCommand, SingleObjectLoadCommand,
};
pub use save::{MultiDataContainerSaveCommand, SaveStatement, SaveStatementKind};

pub trait StorageProviderCommand<T>: Debug {
    fn execute(&self, context: &mut dyn ExecutionContext) -> Result<T>;
}

impl<T, C> StorageProviderCommand<T> for Box<C>
where
    C: StorageProviderCommand<T> + ?Sized,
{
    fn execute(&self, context: &mut dyn ExecutionContext) -> Result<T> {
        (**self).execute(context)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::VecDeque;

    use crate::command::DbCommand;
    use crate::core::{Result, Value};
    use crate::execution::ExecutionContext;
    use crate::result::QueryResult;

    /// Answers readers from a queue of canned results and non-queries with a
    /// fixed row count, recording every command text.
    #[derive(Debug, Default)]
    pub(crate) struct ScriptedContext {
        pub results: VecDeque<QueryResult>,
        pub affected_rows: usize,
        pub executed: Vec<String>,
    }

    impl ScriptedContext {
        pub fn with_results(results: Vec<QueryResult>) -> Self {
            Self {
                results: results.into(),
                affected_rows: 1,
                executed: Vec::new(),
            }
        }
    }

    impl ExecutionContext for ScriptedContext {
        fn execute_reader(&mut self, command: &DbCommand) -> Result<QueryResult> {
            self.executed.push(command.text().to_string());
            Ok(self.results.pop_front().unwrap_or_default())
        }

        fn execute_scalar(&mut self, command: &DbCommand) -> Result<Value> {
            self.executed.push(command.text().to_string());
            Ok(self
                .results
                .pop_front()
                .map(|r| r.scalar())
                .unwrap_or(Value::Null))
        }

        fn execute_non_query(&mut self, command: &DbCommand) -> Result<usize> {
            self.executed.push(command.text().to_string());
            Ok(self.affected_rows)
        }
    }
}
