use tracing::debug;

use crate::command::DbCommand;
use crate::core::{Result, Value};
use crate::execution::ExecutionContext;
use crate::result::QueryResult;

/// Records every command instead of executing it. Readers see empty results,
/// scalars are NULL and every non-query reports one affected row.
#[derive(Debug, Default)]
pub struct DryRunExecutionContext {
    commands: Vec<DbCommand>,
}

impl DryRunExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DbCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DbCommand> {
        self.commands
    }

    fn record(&mut self, command: &DbCommand) {
        debug!(text = command.text(), "dry run");
        self.commands.push(command.clone());
    }
}

impl ExecutionContext for DryRunExecutionContext {
    fn execute_reader(&mut self, command: &DbCommand) -> Result<QueryResult> {
        self.record(command);
        Ok(QueryResult::empty())
    }

    fn execute_scalar(&mut self, command: &DbCommand) -> Result<Value> {
        self.record(command);
        Ok(Value::Null)
    }

    fn execute_non_query(&mut self, command: &DbCommand) -> Result<usize> {
        self.record(command);
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(text: &str) -> DbCommand {
        let mut command = DbCommand::new();
        command.set_text(text);
        command
    }

    #[test]
    fn test_records_commands_in_order() {
        let mut context = DryRunExecutionContext::new();

        assert!(context.execute_reader(&command("SELECT 1")).unwrap().is_empty());
        assert_eq!(context.execute_scalar(&command("SELECT 2")).unwrap(), Value::Null);
        assert_eq!(context.execute_non_query(&command("DELETE FROM t")).unwrap(), 1);

        let texts: Vec<_> = context.commands().iter().map(|c| c.text().to_string()).collect();
        assert_eq!(texts, vec!["SELECT 1", "SELECT 2", "DELETE FROM t"]);
        assert_eq!(context.into_commands().len(), 3);
    }
}
