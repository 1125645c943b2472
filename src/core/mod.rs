pub mod error;
pub mod types;
pub mod value;

pub use error::{DbError, Result};
pub use types::{ColumnDefinition, ColumnValue, OrderedColumn, Row, SortOrder, StorageTypeInformation};
pub use value::{DataType, Value};
