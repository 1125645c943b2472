use std::sync::Arc;

use tracing::debug;

use crate::command::{DbCommandBuilder, DbCommandBuilderFactory};
use crate::core::{DbError, Result, Value};
use crate::data::DataContainer;
use crate::dialect::DialectKind;
use crate::mapping::MappingConfiguration;
use crate::provider_command::{
    MultiObjectLoadCommand, QueryResultLoadCommand, ScalarValueLoadCommand, StorageProviderCommand,
};
use crate::query::{Query, QueryType, splice_text_parameters, validate_query_statement};
use crate::reader::{DataContainerReader, ObjectReader};
use crate::result::QueryResult;

/// Builds commands for free-form queries whose SQL has already been
/// resolved by the caller.
#[derive(Debug, Clone)]
pub struct QueryCommandFactory {
    storage_provider_id: String,
    builder_factory: DbCommandBuilderFactory,
    mapping: Arc<MappingConfiguration>,
    /// `Some` when statements are parsed before use.
    validation_dialect: Option<DialectKind>,
}

impl QueryCommandFactory {
    pub fn new(
        storage_provider_id: impl Into<String>,
        builder_factory: DbCommandBuilderFactory,
        mapping: Arc<MappingConfiguration>,
        validation_dialect: Option<DialectKind>,
    ) -> Self {
        Self {
            storage_provider_id: storage_provider_id.into(),
            builder_factory,
            mapping,
            validation_dialect,
        }
    }

    pub fn create_for_data_container_query(
        &self,
        query: &Query,
    ) -> Result<Box<dyn StorageProviderCommand<Vec<Option<DataContainer>>>>> {
        let builder = self.prepare(query, QueryType::Collection)?;
        let reader: Arc<dyn ObjectReader<Output = DataContainer>> =
            Arc::new(DataContainerReader::for_query(self.mapping.clone()));
        Ok(Box::new(MultiObjectLoadCommand::new(vec![(builder, reader)])))
    }

    pub fn create_for_custom_query(
        &self,
        query: &Query,
    ) -> Result<Box<dyn StorageProviderCommand<QueryResult>>> {
        let builder = self.prepare(query, QueryType::Custom)?;
        Ok(Box::new(QueryResultLoadCommand::new(builder)))
    }

    pub fn create_for_scalar_query(
        &self,
        query: &Query,
    ) -> Result<Box<dyn StorageProviderCommand<Value>>> {
        let builder = self.prepare(query, QueryType::Scalar)?;
        Ok(Box::new(ScalarValueLoadCommand::new(builder)))
    }

    fn prepare(&self, query: &Query, expected: QueryType) -> Result<Box<dyn DbCommandBuilder>> {
        if query.query_type != expected {
            return Err(DbError::argument(
                "query",
                format!(
                    "query '{}' is a {:?} query, expected {:?}",
                    query.id, query.query_type, expected
                ),
            ));
        }
        if query.storage_provider_id != self.storage_provider_id {
            return Err(DbError::argument(
                "query",
                format!(
                    "query '{}' targets storage provider '{}', not '{}'",
                    query.id, query.storage_provider_id, self.storage_provider_id
                ),
            ));
        }

        if let Some(dialect) = self.validation_dialect {
            let statement = splice_text_parameters(&query.statement, &query.parameters)?;
            validate_query_statement(&statement, dialect)?;
        }

        debug!(query = %query.id, parameters = query.parameters.len(), "query command");
        Ok(self.builder_factory.create_for_query(query))
    }
}
