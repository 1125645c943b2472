pub mod builder;
pub mod db_command;
pub mod factory;

pub use builder::{
    DbCommandBuilder, DeleteDbCommandBuilder, InsertDbCommandBuilder, QueryDbCommandBuilder,
    SelectDbCommandBuilder, UnionSelectDbCommandBuilder, UpdateDbCommandBuilder,
};
pub use db_command::{DbCommand, DbParameter};
pub use factory::DbCommandBuilderFactory;
