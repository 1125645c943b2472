//! Storage provider command factories.

pub mod lookup;
pub mod query;
pub mod relation_lookup;
pub mod save;

use std::sync::Arc;

use crate::command::DbCommandBuilderFactory;
use crate::config::ProviderConfig;
use crate::mapping::MappingConfiguration;

pub use lookup::LookupCommandFactory;
pub use query::QueryCommandFactory;
pub use relation_lookup::RelationLookupCommandFactory;
pub use save::SaveCommandFactory;

/// All factories of one storage provider, sharing its dialect and mapping.
#[derive(Debug, Clone)]
pub struct ProviderCommandFactory {
    lookup: LookupCommandFactory,
    relation_lookup: RelationLookupCommandFactory,
    query: QueryCommandFactory,
    save: SaveCommandFactory,
}

impl ProviderCommandFactory {
    pub fn new(config: &ProviderConfig, mapping: Arc<MappingConfiguration>) -> Self {
        let provider_id = config.storage_provider_id.as_str();
        let builder_factory = DbCommandBuilderFactory::new(config.dialect.create());

        let lookup = LookupCommandFactory::new(
            provider_id,
            builder_factory.clone(),
            mapping.clone(),
            config.max_set_comparison_values,
        );
        let relation_lookup = RelationLookupCommandFactory::new(
            provider_id,
            builder_factory.clone(),
            mapping.clone(),
            lookup.clone(),
        );
        let query = QueryCommandFactory::new(
            provider_id,
            builder_factory.clone(),
            mapping.clone(),
            config.validate_query_statements.then_some(config.dialect),
        );
        let save = SaveCommandFactory::new(provider_id, builder_factory, mapping);

        Self {
            lookup,
            relation_lookup,
            query,
            save,
        }
    }

    pub fn lookup(&self) -> &LookupCommandFactory {
        &self.lookup
    }

    pub fn relation_lookup(&self) -> &RelationLookupCommandFactory {
        &self.relation_lookup
    }

    pub fn query(&self) -> &QueryCommandFactory {
        &self.query
    }

    pub fn save(&self) -> &SaveCommandFactory {
        &self.save
    }
}
