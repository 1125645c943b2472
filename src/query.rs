use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use sqlparser::ast as sql_ast;
use sqlparser::dialect::{GenericDialect, MsSqlDialect};
use sqlparser::parser::Parser;

use crate::core::{DbError, Result, Value};
use crate::dialect::DialectKind;
use crate::mapping::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    /// Returns data containers.
    Collection,
    /// Returns a single value.
    Scalar,
    /// Returns raw rows.
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryParameterType {
    /// Bound as a command parameter.
    Value,
    /// Spliced verbatim into the statement text.
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryParameterValue {
    Value(Value),
    ObjectId(ObjectId),
}

impl QueryParameterValue {
    /// Object ids are bound by their id value.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::ObjectId(id) => id.value().clone(),
        }
    }
}

impl From<Value> for QueryParameterValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<ObjectId> for QueryParameterValue {
    fn from(id: ObjectId) -> Self {
        Self::ObjectId(id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryParameter {
    pub name: String,
    pub value: QueryParameterValue,
    pub parameter_type: QueryParameterType,
}

impl QueryParameter {
    pub fn value(name: impl Into<String>, value: impl Into<QueryParameterValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            parameter_type: QueryParameterType::Value,
        }
    }

    pub fn text(name: impl Into<String>, value: impl Into<QueryParameterValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            parameter_type: QueryParameterType::Text,
        }
    }
}

/// A resolved statement against one storage provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub id: String,
    pub storage_provider_id: String,
    pub statement: String,
    pub query_type: QueryType,
    pub parameters: Vec<QueryParameter>,
}

impl Query {
    pub fn new(
        id: impl Into<String>,
        storage_provider_id: impl Into<String>,
        statement: impl Into<String>,
        query_type: QueryType,
    ) -> Self {
        Self {
            id: id.into(),
            storage_provider_id: storage_provider_id.into(),
            statement: statement.into(),
            query_type,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, parameter: QueryParameter) -> Self {
        self.parameters.push(parameter);
        self
    }
}

/// Replaces every text parameter's name in `statement` with its value. A
/// name only matches as a whole word, so `@id` leaves `@idx` alone.
pub fn splice_text_parameters(statement: &str, parameters: &[QueryParameter]) -> Result<String> {
    let mut text = statement.to_string();
    for parameter in parameters
        .iter()
        .filter(|p| p.parameter_type == QueryParameterType::Text)
    {
        let ends_in_word = parameter
            .name
            .chars()
            .last()
            .is_some_and(|c| c.is_alphanumeric() || c == '_');
        let pattern = format!(
            "{}{}",
            regex::escape(&parameter.name),
            if ends_in_word { r"\b" } else { "" }
        );
        let regex = Regex::new(&pattern).map_err(|e| {
            DbError::ParseError(format!("Invalid parameter name '{}': {}", parameter.name, e))
        })?;
        let replacement = parameter.value.to_value().to_string();
        text = regex.replace_all(&text, NoExpand(&replacement)).into_owned();
    }
    Ok(text)
}

/// Checks that `statement` is exactly one query statement.
pub fn validate_query_statement(statement: &str, dialect: DialectKind) -> Result<()> {
    let parsed = match dialect {
        DialectKind::SqlServer => Parser::parse_sql(&MsSqlDialect {}, statement),
        DialectKind::Ansi => Parser::parse_sql(&GenericDialect {}, statement),
    }
    .map_err(|e| DbError::ParseError(e.to_string()))?;

    match parsed.as_slice() {
        [sql_ast::Statement::Query(_)] => Ok(()),
        [] => Err(DbError::argument("statement", "the statement is empty")),
        [_] => Err(DbError::argument(
            "statement",
            "only SELECT statements can be executed as queries",
        )),
        many => Err(DbError::argument(
            "statement",
            format!("exactly one statement expected, got {}", many.len()),
        )),
    }
}
