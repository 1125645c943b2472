use std::fmt::Debug;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::command::DbParameter;
use crate::core::{Result, StorageTypeInformation, Value};
use crate::mapping::EntityName;

/// Formatting rules of the target database. Specifications and builders
/// never emit quoting or placeholder syntax themselves.
pub trait SqlDialect: Debug + Send + Sync {
    fn delimit_identifier(&self, identifier: &str) -> String;

    /// Placeholder name for a parameter derived from `name`. Idempotent.
    fn parameter_name(&self, name: &str) -> String;

    fn delimit_entity_name(&self, name: &EntityName) -> String {
        match &name.schema {
            Some(schema) => format!(
                "{}.{}",
                self.delimit_identifier(schema),
                self.delimit_identifier(&name.name)
            ),
            None => self.delimit_identifier(&name.name),
        }
    }

    fn create_parameter(
        &self,
        name: &str,
        value: &Value,
        storage_type: &StorageTypeInformation,
    ) -> Result<DbParameter> {
        let converted = storage_type.convert_value(value)?;
        Ok(DbParameter::new(
            self.parameter_name(name),
            converted,
            storage_type.clone(),
        ))
    }
}

/// `[identifier]` and `@parameter`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerDialect;

impl SqlDialect for SqlServerDialect {
    fn delimit_identifier(&self, identifier: &str) -> String {
        format!("[{}]", identifier.replace(']', "]]"))
    }

    fn parameter_name(&self, name: &str) -> String {
        if name.starts_with('@') {
            name.to_string()
        } else {
            format!("@{}", name)
        }
    }
}

/// `"identifier"` and `:parameter`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiDialect;

impl SqlDialect for AnsiDialect {
    fn delimit_identifier(&self, identifier: &str) -> String {
        format!("\"{}\"", identifier.replace('"', "\"\""))
    }

    fn parameter_name(&self, name: &str) -> String {
        if name.starts_with(':') {
            name.to_string()
        } else {
            format!(":{}", name)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialectKind {
    #[default]
    SqlServer,
    Ansi,
}

impl DialectKind {
    pub fn create(self) -> Arc<dyn SqlDialect> {
        match self {
            Self::SqlServer => Arc::new(SqlServerDialect),
            Self::Ansi => Arc::new(AnsiDialect),
        }
    }
}
