#![forbid(unsafe_code)]

use crate::error::StoreError;
use crate::query::ListQuery;
use rl_core::ids::Identifier;
use rl_core::{Condition, FieldValue};
use rusqlite::types::{Value, ValueRef};

/// SQL text plus its positional parameters, in placeholder order.
#[derive(Debug, Default)]
pub(crate) struct SqlFragment {
    pub sql: String,
    pub params: Vec<Value>,
}

pub(crate) fn quote(name: &str) -> Result<String, StoreError> {
    Identifier::try_new(name)
        .map(|ident| ident.quoted())
        .map_err(|_| StoreError::InvalidInput("invalid table or column name"))
}

pub(crate) fn to_sql_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Integer(value) => Value::Integer(*value),
        FieldValue::Real(value) => Value::Real(*value),
        FieldValue::Text(value) => Value::Text(value.clone()),
        FieldValue::Blob(value) => Value::Blob(value.clone()),
    }
}

pub(crate) fn from_sql_value(value: ValueRef<'_>) -> FieldValue {
    match value {
        ValueRef::Null => FieldValue::Null,
        ValueRef::Integer(value) => FieldValue::Integer(value),
        ValueRef::Real(value) => FieldValue::Real(value),
        ValueRef::Text(value) => FieldValue::Text(String::from_utf8_lossy(value).into_owned()),
        ValueRef::Blob(value) => FieldValue::Blob(value.to_vec()),
    }
}

pub(crate) fn render_condition(
    condition: &Condition,
    out: &mut SqlFragment,
) -> Result<(), StoreError> {
    match condition {
        Condition::All => out.sql.push_str("1=1"),
        Condition::Eq { column, value } => {
            out.sql.push_str(&format!("{} IS ?", quote(column)?));
            out.params.push(to_sql_value(value));
        }
        Condition::IsNull { column } => {
            out.sql.push_str(&format!("{} IS NULL", quote(column)?));
        }
        Condition::NotNull { column } => {
            out.sql.push_str(&format!("{} IS NOT NULL", quote(column)?));
        }
        Condition::Range { column, from, to } => {
            let column = quote(column)?;
            match (from, to) {
                (None, None) => out.sql.push_str(&format!("{column} IS NOT NULL")),
                (Some(from), None) => {
                    out.sql.push_str(&format!("{column} >= ?"));
                    out.params.push(Value::Integer(*from));
                }
                (None, Some(to)) => {
                    out.sql.push_str(&format!("{column} <= ?"));
                    out.params.push(Value::Integer(*to));
                }
                (Some(from), Some(to)) => {
                    out.sql.push_str(&format!("{column} BETWEEN ? AND ?"));
                    out.params.push(Value::Integer(*from));
                    out.params.push(Value::Integer(*to));
                }
            }
        }
        Condition::Expr { clause, bindings } => {
            out.sql.push('(');
            out.sql.push_str(clause);
            out.sql.push(')');
            out.params.extend(bindings.iter().map(to_sql_value));
        }
        Condition::And(parts) => {
            if parts.is_empty() {
                out.sql.push_str("1=1");
                return Ok(());
            }
            for (index, part) in parts.iter().enumerate() {
                if index > 0 {
                    out.sql.push_str(" AND ");
                }
                out.sql.push('(');
                render_condition(part, out)?;
                out.sql.push(')');
            }
        }
    }
    Ok(())
}

pub(crate) fn render_select(query: &ListQuery) -> Result<SqlFragment, StoreError> {
    let columns = match query.projection() {
        None => "*".to_string(),
        Some(columns) => {
            let mut quoted = vec![quote(rl_core::ID_COLUMN)?];
            for column in columns {
                if column != rl_core::ID_COLUMN {
                    quoted.push(quote(column)?);
                }
            }
            quoted.join(", ")
        }
    };

    let mut out = SqlFragment {
        sql: format!("SELECT {columns} FROM {} WHERE ", quote(query.table())?),
        params: Vec::new(),
    };
    render_condition(query.condition(), &mut out)?;

    if let Some(order_by) = query.order_by() {
        let order_by = quote(order_by)?;
        let id = quote(rl_core::ID_COLUMN)?;
        out.sql
            .push_str(&format!(" ORDER BY {order_by} IS NULL, {order_by} ASC, {id} ASC"));
    }
    match (query.max_rows(), query.offset()) {
        (None, None) => {}
        (limit, offset) => {
            out.sql.push_str(" LIMIT ? OFFSET ?");
            out.params.push(Value::Integer(limit.map_or(-1, clamp_u64)));
            out.params.push(Value::Integer(offset.map_or(0, clamp_u64)));
        }
    }
    Ok(out)
}

fn clamp_u64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
