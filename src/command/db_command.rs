use std::fmt;

use crate::core::{DbError, Result, StorageTypeInformation, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct DbParameter {
    pub name: String,
    pub value: Value,
    pub storage_type: StorageTypeInformation,
}

impl DbParameter {
    pub fn new(name: impl Into<String>, value: Value, storage_type: StorageTypeInformation) -> Self {
        Self {
            name: name.into(),
            value,
            storage_type,
        }
    }
}

/// Command text plus bound parameters, ready to hand to a connection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DbCommand {
    text: String,
    parameters: Vec<DbParameter>,
}

impl DbCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Registers a parameter; names must be unique within a command.
    pub fn add_parameter(&mut self, parameter: DbParameter) -> Result<()> {
        if self.parameter(&parameter.name).is_some() {
            return Err(DbError::ExecutionError(format!(
                "Parameter '{}' is already registered on the command",
                parameter.name
            )));
        }
        self.parameters.push(parameter);
        Ok(())
    }

    pub fn parameters(&self) -> &[DbParameter] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&DbParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

impl fmt::Display for DbCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)?;
        for parameter in &self.parameters {
            write!(
                f,
                "\n  {} = {} ({})",
                parameter.name, parameter.value, parameter.storage_type.native_type
            )?;
        }
        Ok(())
    }
}
