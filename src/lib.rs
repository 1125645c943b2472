// ============================================================================
// rdbprovider Library
// ============================================================================

pub mod command;
pub mod config;
pub mod core;
pub mod data;
pub mod dialect;
pub mod execution;
pub mod factory;
pub mod mapping;
pub mod provider_command;
pub mod query;
pub mod reader;
pub mod result;
pub mod specification;

// Re-export main types for convenience
pub use command::{DbCommand, DbCommandBuilder, DbCommandBuilderFactory, DbParameter};
pub use config::ProviderConfig;
pub use core::{DataType, DbError, Result, Value};
pub use data::{DataContainer, DataContainerState, PropertyValue};
pub use dialect::{AnsiDialect, DialectKind, SqlDialect, SqlServerDialect};
pub use execution::{DryRunExecutionContext, ExecutionContext};
pub use factory::{
    LookupCommandFactory, ProviderCommandFactory, QueryCommandFactory,
    RelationLookupCommandFactory, SaveCommandFactory,
};
pub use mapping::{MappingConfiguration, ObjectId};
pub use provider_command::StorageProviderCommand;
pub use query::{Query, QueryParameter, QueryType};
pub use result::{ObjectLookupResult, QueryResult};

// ============================================================================
// High-level entry point
// ============================================================================

use std::sync::Arc;

/// A configured storage provider: its mapping plus the command factories.
///
/// # Examples
///
/// ```
/// use rdbprovider::{
///     DryRunExecutionContext, ObjectId, ProviderConfig, StorageProvider, StorageProviderCommand,
///     Value,
/// };
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mapping = r#"{
///   "classes": [{
///     "id": "Order",
///     "storage_entity": {
///       "kind": "table",
///       "storage_provider_id": "Default",
///       "table_name": { "schema": "dbo", "name": "Order" },
///       "object_id_property": {
///         "value": { "name": "ID", "storage_type": { "data_type": "integer", "native_type": "int" } },
///         "class_id": { "name": "ClassID", "storage_type": { "data_type": "text", "native_type": "varchar(100)" } }
///       },
///       "timestamp_column": { "name": "Timestamp", "storage_type": { "data_type": "binary", "native_type": "rowversion" } }
///     }
///   }]
/// }"#;
///
/// let provider = StorageProvider::from_json(ProviderConfig::default(), mapping)?;
/// let command = provider
///     .factories()
///     .lookup()
///     .create_for_single_id_lookup(&ObjectId::new("Order", Value::Integer(1)))?;
///
/// let mut context = DryRunExecutionContext::new();
/// let result = command.execute(&mut context)?;
/// assert!(!result.is_found());
/// assert_eq!(context.commands().len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StorageProvider {
    config: ProviderConfig,
    mapping: Arc<MappingConfiguration>,
    factories: ProviderCommandFactory,
}

impl StorageProvider {
    pub fn new(config: ProviderConfig, mapping: MappingConfiguration) -> Result<Self> {
        config.validate()?;
        let mapping = Arc::new(mapping);
        let factories = ProviderCommandFactory::new(&config, mapping.clone());
        Ok(Self {
            config,
            mapping,
            factories,
        })
    }

    /// Builds a provider from a mapping document in JSON.
    pub fn from_json(config: ProviderConfig, mapping_json: &str) -> Result<Self> {
        Self::new(config, MappingConfiguration::from_json_str(mapping_json)?)
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn mapping(&self) -> &Arc<MappingConfiguration> {
        &self.mapping
    }

    pub fn factories(&self) -> &ProviderCommandFactory {
        &self.factories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_config() {
        let config = ProviderConfig::default().max_set_comparison_values(0);
        let err = StorageProvider::new(config, MappingConfiguration::new(Vec::new()).unwrap())
            .unwrap_err();
        assert!(matches!(err, DbError::ConfigError(_)));
    }

    #[test]
    fn test_empty_mapping() {
        let provider = StorageProvider::from_json(ProviderConfig::default(), r#"{"classes": []}"#)
            .unwrap();
        assert!(provider.mapping().classes().is_empty());
        assert_eq!(provider.config().storage_provider_id, "Default");
    }
}
