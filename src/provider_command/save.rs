use tracing::{debug, info_span};

use crate::command::DbCommandBuilder;
use crate::core::{DbError, Result};
use crate::execution::ExecutionContext;
use crate::mapping::ObjectId;
use crate::provider_command::StorageProviderCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatementKind {
    Insert,
    Update,
    Delete,
}

impl SaveStatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// One statement of a save batch and the object it writes.
#[derive(Debug)]
pub struct SaveStatement {
    pub kind: SaveStatementKind,
    pub object_id: ObjectId,
    pub builder: Box<dyn DbCommandBuilder>,
}

impl SaveStatement {
    pub fn new(kind: SaveStatementKind, object_id: ObjectId, builder: Box<dyn DbCommandBuilder>) -> Self {
        Self {
            kind,
            object_id,
            builder,
        }
    }
}

/// Executes the statements of a save batch in the order given.
///
/// An UPDATE or DELETE whose predicate matches no row means the object was
/// changed or removed since it was loaded and fails the batch with
/// [`DbError::ConcurrencyViolation`]. Nothing is retried.
#[derive(Debug)]
pub struct MultiDataContainerSaveCommand {
    statements: Vec<SaveStatement>,
}

impl MultiDataContainerSaveCommand {
    pub fn new(statements: Vec<SaveStatement>) -> Self {
        Self { statements }
    }

    pub fn statements(&self) -> &[SaveStatement] {
        &self.statements
    }
}

impl StorageProviderCommand<()> for MultiDataContainerSaveCommand {
    fn execute(&self, context: &mut dyn ExecutionContext) -> Result<()> {
        let span = info_span!("provider.save", statements = self.statements.len());
        let _enter = span.enter();

        for statement in &self.statements {
            let command = statement.builder.create()?;
            debug!(
                kind = statement.kind.as_str(),
                object_id = %statement.object_id,
                text = command.text(),
                "executing save statement"
            );
            let affected = context.execute_non_query(&command)?;
            if affected == 0 {
                return Err(match statement.kind {
                    SaveStatementKind::Update | SaveStatementKind::Delete => {
                        DbError::ConcurrencyViolation(statement.object_id.clone())
                    }
                    SaveStatementKind::Insert => DbError::ExecutionError(format!(
                        "Inserting object '{}' affected no rows",
                        statement.object_id
                    )),
                });
            }
        }
        Ok(())
    }
}
