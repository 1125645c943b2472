//! Read-only mapping metadata consumed by the command factories: classes,
//! their storage entities and the columns behind each property.

pub mod class;
pub mod configuration;
pub mod entity;
pub mod object_id;
pub mod sort;
pub mod storage_property;

pub use class::{ClassDefinition, PropertyDefinition, RelationEndPointDefinition, StorageClass};
pub use configuration::{InfrastructureColumns, MappingConfiguration};
pub use entity::{
    EmptyViewDefinition, EntityDefinition, EntityName, FilterViewDefinition, ResolvedEntity,
    TableDefinition, UnionViewDefinition,
};
pub use object_id::ObjectId;
pub use sort::{SortExpressionDefinition, SortedPropertySpecification};
pub use storage_property::{ObjectIdStoragePropertyDefinition, StoragePropertyDefinition};
