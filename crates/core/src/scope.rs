#![forbid(unsafe_code)]

use crate::condition::Condition;
use crate::config::{ConfigError, ScopeConfig};
use crate::ids::{is_identifier_char, is_identifier_start};
use crate::record::Record;

/// Turns a record into the condition selecting every record of its list.
///
/// Resolution reads the record's current field values on every call, so a
/// record whose scope fields change between calls resolves to its new list.
#[derive(Clone, Debug, PartialEq)]
pub enum ScopeResolver {
    Unscoped,
    Column(String),
    Expression(ExpressionScope),
}

impl ScopeResolver {
    pub fn from_config(config: &ScopeConfig) -> Result<Self, ConfigError> {
        Ok(match config {
            ScopeConfig::Unscoped => Self::Unscoped,
            ScopeConfig::Column(column) => Self::Column(column.clone()),
            ScopeConfig::Association(name) => Self::Column(ScopeConfig::association_column(name)),
            ScopeConfig::Expression(expression) => {
                Self::Expression(ExpressionScope::compile(expression)?)
            }
        })
    }

    pub fn resolve(&self, record: &Record) -> Condition {
        match self {
            Self::Unscoped => Condition::All,
            Self::Column(column) => Condition::eq(column.clone(), record.field(column).clone()),
            Self::Expression(expression) => expression.resolve(record),
        }
    }

    /// Fields whose values decide which list a record belongs to.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Self::Unscoped => Vec::new(),
            Self::Column(column) => vec![column.as_str()],
            Self::Expression(expression) => expression.fields(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(String),
}

/// A scope expression split into literal SQL and `:field` placeholders.
///
/// Placeholders become bound parameters, never spliced text. Colons inside
/// single-quoted literals are left alone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpressionScope {
    segments: Vec<Segment>,
}

impl ExpressionScope {
    pub fn compile(expression: &str) -> Result<Self, ConfigError> {
        if expression.trim().is_empty() {
            return Err(ConfigError::EmptyExpression);
        }

        let mut segments = Vec::new();
        let mut text = String::new();
        let mut in_literal = false;
        let mut chars = expression.chars().peekable();

        while let Some(ch) = chars.next() {
            if in_literal {
                text.push(ch);
                if ch == '\'' {
                    in_literal = false;
                }
                continue;
            }
            match ch {
                '\'' => {
                    in_literal = true;
                    text.push(ch);
                }
                '?' => return Err(ConfigError::PositionalPlaceholder),
                ':' if chars.peek().copied().is_some_and(is_identifier_start) => {
                    let mut name = String::new();
                    while let Some(next) = chars.next_if(|next| is_identifier_char(*next)) {
                        name.push(next);
                    }
                    null_safe_comparison(&mut text);
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Field(name));
                }
                _ => text.push(ch),
            }
        }

        if in_literal {
            return Err(ConfigError::UnterminatedLiteral);
        }
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }
        Ok(Self { segments })
    }

    pub fn resolve(&self, record: &Record) -> Condition {
        let mut clause = String::new();
        let mut bindings = Vec::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => clause.push_str(text),
                Segment::Field(name) => {
                    clause.push('?');
                    bindings.push(record.field(name).clone());
                }
            }
        }
        Condition::sql_with(clause, bindings)
    }

    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Field(name) = segment
                && !fields.contains(&name.as_str())
            {
                fields.push(name.as_str());
            }
        }
        fields
    }
}

/// Rewrites a trailing `=`/`==` to `IS` and `!=`/`<>` to `IS NOT`, so a
/// null field value binds to a comparison that matches null rows.
fn null_safe_comparison(text: &mut String) {
    let trimmed = text.trim_end();
    let (operator_len, replacement) = if trimmed.ends_with("!=") || trimmed.ends_with("<>") {
        (2, "IS NOT ")
    } else if trimmed.ends_with("==") {
        (2, "IS ")
    } else if trimmed.ends_with('=') && !trimmed.ends_with("<=") && !trimmed.ends_with(">=") {
        (1, "IS ")
    } else {
        return;
    };
    let keep = trimmed.len() - operator_len;
    text.truncate(keep);
    if !text.is_empty() && !text.ends_with(char::is_whitespace) {
        text.push(' ');
    }
    text.push_str(replacement);
}
