use thiserror::Error;

use crate::mapping::ObjectId;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid argument '{argument}': {message}")]
    ArgumentError {
        argument: &'static str,
        message: String,
    },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Mapping error: {0}")]
    MappingError(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Execution error: {0}")]
    ExecutionError(String),

    #[error("Concurrency violation: object '{0}' was modified or deleted by another transaction")]
    ConcurrencyViolation(ObjectId),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl DbError {
    pub fn argument(argument: &'static str, message: impl Into<String>) -> Self {
        Self::ArgumentError {
            argument,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;

impl From<std::io::Error> for DbError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigError(err.to_string())
    }
}
