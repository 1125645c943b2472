use crate::mapping::ObjectId;

/// Outcome of looking up one object: the requested id and the located
/// object, if the database had a row for it. Absence is a normal outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectLookupResult<T> {
    pub object_id: ObjectId,
    pub located_object: Option<T>,
}

impl<T> ObjectLookupResult<T> {
    pub fn new(object_id: ObjectId, located_object: Option<T>) -> Self {
        Self {
            object_id,
            located_object,
        }
    }

    pub fn not_found(object_id: ObjectId) -> Self {
        Self::new(object_id, None)
    }

    pub fn is_found(&self) -> bool {
        self.located_object.is_some()
    }

    pub fn map<U>(self, op: impl FnOnce(T) -> U) -> ObjectLookupResult<U> {
        ObjectLookupResult {
            object_id: self.object_id,
            located_object: self.located_object.map(op),
        }
    }
}
