pub mod lookup;
#[allow(clippy::module_inception)]
pub mod result;

pub use lookup::ObjectLookupResult;
pub use result::QueryResult;
