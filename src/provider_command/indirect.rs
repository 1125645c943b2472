use std::fmt;

use tracing::{trace, warn};

use crate::core::Result;
use crate::data::DataContainer;
use crate::execution::ExecutionContext;
use crate::factory::LookupCommandFactory;
use crate::mapping::ObjectId;
use crate::provider_command::StorageProviderCommand;

/// Two-phase load for entities that can only be queried for ids.
///
/// The first command yields the ordered ids, the second phase loads the data
/// containers through a sorted multi-id lookup. Objects deleted between the
/// two phases are skipped.
pub struct IndirectDataContainerLoadCommand {
    object_id_load_command: Box<dyn StorageProviderCommand<Vec<ObjectId>>>,
    lookup_factory: LookupCommandFactory,
}

impl IndirectDataContainerLoadCommand {
    pub fn new(
        object_id_load_command: Box<dyn StorageProviderCommand<Vec<ObjectId>>>,
        lookup_factory: LookupCommandFactory,
    ) -> Self {
        Self {
            object_id_load_command,
            lookup_factory,
        }
    }
}

impl fmt::Debug for IndirectDataContainerLoadCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndirectDataContainerLoadCommand")
            .field("object_id_load_command", &self.object_id_load_command)
            .finish_non_exhaustive()
    }
}

impl StorageProviderCommand<Vec<DataContainer>> for IndirectDataContainerLoadCommand {
    fn execute(&self, context: &mut dyn ExecutionContext) -> Result<Vec<DataContainer>> {
        let object_ids = self.object_id_load_command.execute(context)?;
        trace!(count = object_ids.len(), "indirect load resolved object ids");
        if object_ids.is_empty() {
            return Ok(Vec::new());
        }

        let lookup = self
            .lookup_factory
            .create_for_sorted_multi_id_lookup(&object_ids)?;
        let results = lookup.execute(context)?;

        Ok(results
            .into_iter()
            .filter_map(|result| {
                if result.located_object.is_none() {
                    warn!(
                        object_id = %result.object_id,
                        "object vanished between the id query and the data container lookup"
                    );
                }
                result.located_object
            })
            .collect())
    }
}
