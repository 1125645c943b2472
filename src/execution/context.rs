use crate::command::DbCommand;
use crate::core::{Result, Value};
use crate::result::QueryResult;

/// Executes prepared commands on behalf of provider commands. Implemented by
/// the caller's connection/transaction layer, which owns every database
/// resource; provider commands only borrow it for the duration of a call.
///
/// Implementations report the affected-row count of non-query commands
/// faithfully: a count of zero for an UPDATE or DELETE is how concurrency
/// conflicts are detected.
pub trait ExecutionContext {
    fn execute_reader(&mut self, command: &DbCommand) -> Result<QueryResult>;

    fn execute_scalar(&mut self, command: &DbCommand) -> Result<Value>;

    fn execute_non_query(&mut self, command: &DbCommand) -> Result<usize>;
}
