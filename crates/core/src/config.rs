#![forbid(unsafe_code)]

use crate::ids::{Identifier, IdentifierError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_POSITION_COLUMN: &str = "position";

/// How records of one table are partitioned into independent lists.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeConfig {
    /// The whole table is a single list.
    #[default]
    Unscoped,
    /// Records with equal values in this column share a list. Null is a value.
    Column(String),
    /// A boolean SQL fragment with `:field` placeholders filled from the record.
    Expression(String),
    /// Shorthand for the foreign key of an association: `parent` scopes by
    /// `parent_id`. Names already ending in `_id` are used as-is.
    Association(String),
}

impl ScopeConfig {
    /// The column an `Association` scope compares on.
    pub fn association_column(name: &str) -> String {
        if name.ends_with("_id") {
            name.to_string()
        } else {
            format!("{name}_id")
        }
    }
}

/// Position-list configuration for one table/scope pair.
///
/// ```json
/// { "table": "mixins", "position_column": "pos", "scope": { "column": "parent_id" } }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListConfig {
    pub table: String,
    #[serde(default = "default_position_column")]
    pub position_column: String,
    #[serde(default)]
    pub scope: ScopeConfig,
}

fn default_position_column() -> String {
    DEFAULT_POSITION_COLUMN.to_string()
}

impl ListConfig {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            position_column: default_position_column(),
            scope: ScopeConfig::Unscoped,
        }
    }

    pub fn position_column(mut self, column: impl Into<String>) -> Self {
        self.position_column = column.into();
        self
    }

    pub fn scope_column(mut self, column: impl Into<String>) -> Self {
        self.scope = ScopeConfig::Column(column.into());
        self
    }

    pub fn scope_association(mut self, name: impl Into<String>) -> Self {
        self.scope = ScopeConfig::Association(name.into());
        self
    }

    pub fn scope_expression(mut self, expression: impl Into<String>) -> Self {
        self.scope = ScopeConfig::Expression(expression.into());
        self
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        identifier("table", &self.table)?;
        identifier("position_column", &self.position_column)?;
        match &self.scope {
            ScopeConfig::Unscoped => {}
            ScopeConfig::Column(column) => {
                identifier("scope.column", column)?;
            }
            ScopeConfig::Expression(expression) => {
                crate::scope::ExpressionScope::compile(expression)?;
            }
            ScopeConfig::Association(name) => {
                identifier("scope.association", &ScopeConfig::association_column(name))?;
            }
        }
        Ok(())
    }
}

fn identifier(field: &'static str, value: &str) -> Result<Identifier, ConfigError> {
    Identifier::try_new(value).map_err(|source| ConfigError::InvalidIdentifier {
        field,
        value: value.to_string(),
        source,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} is not a valid identifier ({value:?})")]
    InvalidIdentifier {
        field: &'static str,
        value: String,
        #[source]
        source: IdentifierError,
    },
    #[error("scope expression must not be empty")]
    EmptyExpression,
    #[error("scope expression has an unterminated string literal")]
    UnterminatedLiteral,
    #[error("scope expression must use :field placeholders, not '?'")]
    PositionalPlaceholder,
    #[error("config json: {0}")]
    Json(#[from] serde_json::Error),
}
