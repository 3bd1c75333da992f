#![forbid(unsafe_code)]

use crate::value::FieldValue;

/// A row filter understood by every record store.
///
/// Conditions are data, not SQL text: stores render them in their own
/// dialect. `Expr` is the one escape hatch; its clause is an opaque boolean
/// fragment whose `?` placeholders are bound, in order, to `bindings`.
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    All,
    /// Null-safe equality: `Null` matches rows whose column is null.
    Eq {
        column: String,
        value: FieldValue,
    },
    IsNull {
        column: String,
    },
    NotNull {
        column: String,
    },
    /// Inclusive integer range; an open bound is unbounded.
    Range {
        column: String,
        from: Option<i64>,
        to: Option<i64>,
    },
    Expr {
        clause: String,
        bindings: Vec<FieldValue>,
    },
    And(Vec<Condition>),
}

impl Condition {
    pub fn eq(column: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::Eq {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Self::IsNull {
            column: column.into(),
        }
    }

    pub fn not_null(column: impl Into<String>) -> Self {
        Self::NotNull {
            column: column.into(),
        }
    }

    pub fn range(column: impl Into<String>, from: Option<i64>, to: Option<i64>) -> Self {
        Self::Range {
            column: column.into(),
            from,
            to,
        }
    }

    /// A raw boolean fragment with no bound parameters, e.g. `"parent_id IS NULL"`.
    pub fn sql(clause: impl Into<String>) -> Self {
        Self::Expr {
            clause: clause.into(),
            bindings: Vec::new(),
        }
    }

    pub fn sql_with(clause: impl Into<String>, bindings: Vec<FieldValue>) -> Self {
        Self::Expr {
            clause: clause.into(),
            bindings,
        }
    }

    /// Conjunction. `All` is the identity and nested `And`s are flattened.
    pub fn and(self, other: Condition) -> Self {
        match (self, other) {
            (Self::All, other) => other,
            (this, Self::All) => this,
            (Self::And(mut left), Self::And(right)) => {
                left.extend(right);
                Self::And(left)
            }
            (Self::And(mut left), other) => {
                left.push(other);
                Self::And(left)
            }
            (this, Self::And(right)) => {
                let mut parts = Vec::with_capacity(right.len() + 1);
                parts.push(this);
                parts.extend(right);
                Self::And(parts)
            }
            (this, other) => Self::And(vec![this, other]),
        }
    }
}
