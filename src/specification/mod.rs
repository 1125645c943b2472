//! Dialect-agnostic clause fragments. Each specification is built for one
//! command, never mutated, and renders into an ordered list of fragments.

pub mod compared;
pub mod inserted;
pub mod ordered;
pub mod selected;
pub mod updated;

pub use compared::{ComparedColumns, ComparedColumnsSpecification, SetComparedColumns};
pub use inserted::{InsertedColumns, InsertedColumnsSpecification};
pub use ordered::{OrderedColumns, OrderedColumnsSpecification};
pub use selected::{AllSelectedColumns, SelectedColumns, SelectedColumnsSpecification};
pub use updated::{UpdatedColumns, UpdatedColumnsSpecification};
