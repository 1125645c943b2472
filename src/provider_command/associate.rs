use std::collections::{HashMap, HashSet};
use std::collections::hash_map::Entry;
use std::fmt;

use crate::core::{DbError, Result};
use crate::data::DataContainer;
use crate::execution::ExecutionContext;
use crate::mapping::ObjectId;
use crate::provider_command::StorageProviderCommand;
use crate::reader::ObjectTimestamp;
use crate::result::ObjectLookupResult;

/// Anything that can be matched back to the id it was requested with.
pub trait Identifiable {
    fn object_id(&self) -> &ObjectId;
}

impl Identifiable for ObjectId {
    fn object_id(&self) -> &ObjectId {
        self
    }
}

impl Identifiable for DataContainer {
    fn object_id(&self) -> &ObjectId {
        self.id()
    }
}

impl Identifiable for ObjectTimestamp {
    fn object_id(&self) -> &ObjectId {
        &self.object_id
    }
}

/// Returns a value without touching the database.
#[derive(Debug, Clone)]
pub struct FixedValueCommand<T> {
    value: T,
}

impl<T> FixedValueCommand<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T: Clone + fmt::Debug> StorageProviderCommand<T> for FixedValueCommand<T> {
    fn execute(&self, _context: &mut dyn ExecutionContext) -> Result<T> {
        Ok(self.value.clone())
    }
}

type Operation<TIn, TOut> = Box<dyn Fn(TIn) -> Result<TOut> + Send + Sync>;

/// Runs an inner command and transforms its result.
pub struct DelegatingCommand<TIn, TOut> {
    inner: Box<dyn StorageProviderCommand<TIn>>,
    operation: Operation<TIn, TOut>,
}

impl<TIn, TOut> DelegatingCommand<TIn, TOut> {
    pub fn new<F>(inner: Box<dyn StorageProviderCommand<TIn>>, operation: F) -> Self
    where
        F: Fn(TIn) -> Result<TOut> + Send + Sync + 'static,
    {
        Self {
            inner,
            operation: Box::new(operation),
        }
    }
}

impl<TIn, TOut> fmt::Debug for DelegatingCommand<TIn, TOut> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatingCommand")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<TIn, TOut> StorageProviderCommand<TOut> for DelegatingCommand<TIn, TOut> {
    fn execute(&self, context: &mut dyn ExecutionContext) -> Result<TOut> {
        let value = self.inner.execute(context)?;
        (self.operation)(value)
    }
}

/// Re-keys the objects loaded by an inner command to the requested ids.
///
/// The inner command may return its objects in any order and grouped however
/// it likes. After it completes, loaded objects are indexed by their full id
/// (class and value) and one lookup result is produced per requested id, in
/// request order. Rows of different classes may share a key value. Absent
/// rows (`None`) are ignored; ids without a loaded object come back as not
/// found.
pub struct MultiObjectAssociateWithIdsCommand<T> {
    expected_ids: Vec<ObjectId>,
    inner: Box<dyn StorageProviderCommand<Vec<Option<T>>>>,
}

impl<T> MultiObjectAssociateWithIdsCommand<T> {
    pub fn new(
        expected_ids: Vec<ObjectId>,
        inner: Box<dyn StorageProviderCommand<Vec<Option<T>>>>,
    ) -> Self {
        Self {
            expected_ids,
            inner,
        }
    }

    pub fn expected_ids(&self) -> &[ObjectId] {
        &self.expected_ids
    }
}

impl<T> fmt::Debug for MultiObjectAssociateWithIdsCommand<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiObjectAssociateWithIdsCommand")
            .field("expected_ids", &self.expected_ids)
            .field("inner", &self.inner)
            .finish()
    }
}

impl<T: Identifiable + Clone> StorageProviderCommand<Vec<ObjectLookupResult<T>>>
    for MultiObjectAssociateWithIdsCommand<T>
{
    fn execute(&self, context: &mut dyn ExecutionContext) -> Result<Vec<ObjectLookupResult<T>>> {
        let loaded = self.inner.execute(context)?;

        let mut by_id: HashMap<ObjectId, T> = HashMap::with_capacity(loaded.len());
        for object in loaded.into_iter().flatten() {
            match by_id.entry(object.object_id().clone()) {
                Entry::Occupied(existing) => {
                    return Err(DbError::ExecutionError(format!(
                        "Object '{}' was loaded more than once",
                        existing.get().object_id()
                    )));
                }
                Entry::Vacant(slot) => {
                    slot.insert(object);
                }
            }
        }

        let results: Vec<ObjectLookupResult<T>> = self
            .expected_ids
            .iter()
            .map(|expected| {
                ObjectLookupResult::new(expected.clone(), by_id.get(expected).cloned())
            })
            .collect();

        // A loaded row nobody asked for carries the value of a requested id
        // under another class id.
        let requested: HashSet<&ObjectId> = self.expected_ids.iter().collect();
        for loaded in by_id.keys().filter(|id| !requested.contains(id)) {
            let mismatched = results
                .iter()
                .find(|r| !r.is_found() && r.object_id.value() == loaded.value());
            if let Some(result) = mismatched {
                check_class(&result.object_id, loaded)?;
            }
        }

        Ok(results)
    }
}

/// Tags the optional result of a single-object load with the requested id.
pub struct SingleObjectAssociateWithIdCommand<T> {
    expected_id: ObjectId,
    inner: Box<dyn StorageProviderCommand<Option<T>>>,
}

impl<T> SingleObjectAssociateWithIdCommand<T> {
    pub fn new(expected_id: ObjectId, inner: Box<dyn StorageProviderCommand<Option<T>>>) -> Self {
        Self { expected_id, inner }
    }
}

impl<T> fmt::Debug for SingleObjectAssociateWithIdCommand<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleObjectAssociateWithIdCommand")
            .field("expected_id", &self.expected_id)
            .field("inner", &self.inner)
            .finish()
    }
}

impl<T: Identifiable> StorageProviderCommand<ObjectLookupResult<T>>
    for SingleObjectAssociateWithIdCommand<T>
{
    fn execute(&self, context: &mut dyn ExecutionContext) -> Result<ObjectLookupResult<T>> {
        let located = self.inner.execute(context)?;
        if let Some(object) = &located {
            let loaded = object.object_id();
            if loaded.value() != self.expected_id.value() {
                return Err(DbError::ExecutionError(format!(
                    "Loaded object '{}' does not match the requested id '{}'",
                    loaded, self.expected_id
                )));
            }
            check_class(&self.expected_id, loaded)?;
        }
        Ok(ObjectLookupResult::new(self.expected_id.clone(), located))
    }
}

fn check_class(expected: &ObjectId, loaded: &ObjectId) -> Result<()> {
    if expected.class_id() != loaded.class_id() {
        return Err(DbError::ExecutionError(format!(
            "The object '{}' was requested as class '{}' but the database row belongs to class '{}'",
            expected.value(),
            expected.class_id(),
            loaded.class_id()
        )));
    }
    Ok(())
}
