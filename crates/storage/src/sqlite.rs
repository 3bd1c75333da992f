#![forbid(unsafe_code)]

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::query::ListQuery;
use crate::record_store::{AtomicStore, RecordStore};
use crate::sql::{SqlFragment, from_sql_value, quote, render_condition, render_select, to_sql_value};
use rl_core::{Condition, FieldValue, ID_COLUMN, Record};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, Statement, TransactionBehavior, params, params_from_iter};

/// A [`RecordStore`] over one SQLite database.
///
/// Host tables must carry an integer `id` primary key. Atomic groups run in
/// `BEGIN IMMEDIATE` transactions, so the write lock is held from the first
/// read of a list until the last shift is committed.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    config: StoreConfig,
}

impl SqliteStore {
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        let conn = match config.path.as_deref() {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                let conn = Connection::open(path)?;
                conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
                conn
            }
            None => Connection::open_in_memory()?,
        };
        conn.busy_timeout(config.busy_timeout())?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        tracing::debug!(
            path = ?config.path,
            busy_timeout_ms = config.busy_timeout_ms,
            "opened sqlite record store"
        );
        Ok(Self { conn, config })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::open(StoreConfig::in_memory())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Runs raw SQL, e.g. the host's `CREATE TABLE` statements.
    pub fn execute_batch(&self, sql: &str) -> Result<(), StoreError> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }
}

impl RecordStore for SqliteStore {
    fn find(&self, table: &str, id: i64) -> Result<Record, StoreError> {
        self.conn.find(table, id)
    }

    fn find_all(&self, query: &ListQuery) -> Result<Vec<Record>, StoreError> {
        self.conn.find_all(query)
    }

    fn count(&self, table: &str, condition: &Condition) -> Result<i64, StoreError> {
        self.conn.count(table, condition)
    }

    fn update_field(
        &self,
        table: &str,
        id: i64,
        field: &str,
        value: &FieldValue,
    ) -> Result<(), StoreError> {
        self.conn.update_field(table, id, field, value)
    }

    fn delete(&self, table: &str, id: i64) -> Result<(), StoreError> {
        self.conn.delete(table, id)
    }

    fn insert(&self, table: &str, record: &Record) -> Result<i64, StoreError> {
        self.conn.insert(table, record)
    }

    fn shift(
        &self,
        table: &str,
        condition: &Condition,
        column: &str,
        delta: i64,
    ) -> Result<usize, StoreError> {
        self.conn.shift(table, condition, column, delta)
    }
}

impl AtomicStore for SqliteStore {
    fn atomically<T, F>(&mut self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&dyn RecordStore) -> Result<T, StoreError>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(report_contention)?;
        let out = op(&*tx)?;
        tx.commit().map_err(report_contention)?;
        Ok(out)
    }
}

fn report_contention(err: rusqlite::Error) -> StoreError {
    let err = StoreError::from(err);
    if err.is_retryable() {
        tracing::warn!(error = %err, "sqlite write lock not acquired");
    }
    err
}

/// Plain connections (and transactions, through `Deref`) are record stores too.
impl RecordStore for Connection {
    fn find(&self, table: &str, id: i64) -> Result<Record, StoreError> {
        let sql = format!("SELECT * FROM {} WHERE {} = ?1", quote(table)?, quote(ID_COLUMN)?);
        let mut stmt = self.prepare(&sql)?;
        let columns = column_names(&stmt);
        stmt.query_row(params![id], |row| read_record(row, &columns))
            .optional()?
            .ok_or_else(|| StoreError::not_found(table, id))
    }

    fn find_all(&self, query: &ListQuery) -> Result<Vec<Record>, StoreError> {
        let fragment = render_select(query)?;
        let mut stmt = self.prepare(&fragment.sql)?;
        let columns = column_names(&stmt);
        let rows = stmt.query_map(params_from_iter(fragment.params.iter()), |row| {
            read_record(row, &columns)
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn count(&self, table: &str, condition: &Condition) -> Result<i64, StoreError> {
        let mut out = SqlFragment {
            sql: format!("SELECT COUNT(*) FROM {} WHERE ", quote(table)?),
            params: Vec::new(),
        };
        render_condition(condition, &mut out)?;
        let count = self.query_row(&out.sql, params_from_iter(out.params.iter()), |row| {
            row.get::<_, i64>(0)
        })?;
        Ok(count)
    }

    fn update_field(
        &self,
        table: &str,
        id: i64,
        field: &str,
        value: &FieldValue,
    ) -> Result<(), StoreError> {
        let sql = format!(
            "UPDATE {} SET {} = ?1 WHERE {} = ?2",
            quote(table)?,
            quote(field)?,
            quote(ID_COLUMN)?
        );
        let changed = self.execute(&sql, params![to_sql_value(value), id])?;
        if changed == 0 {
            return Err(StoreError::not_found(table, id));
        }
        Ok(())
    }

    fn delete(&self, table: &str, id: i64) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM {} WHERE {} = ?1", quote(table)?, quote(ID_COLUMN)?);
        let changed = self.execute(&sql, params![id])?;
        if changed == 0 {
            return Err(StoreError::not_found(table, id));
        }
        Ok(())
    }

    fn insert(&self, table: &str, record: &Record) -> Result<i64, StoreError> {
        let mut columns = Vec::new();
        let mut values = Vec::new();
        if let Some(id) = record.id() {
            columns.push(quote(ID_COLUMN)?);
            values.push(Value::Integer(id));
        }
        for (name, value) in record.fields() {
            if name == ID_COLUMN {
                continue;
            }
            columns.push(quote(name)?);
            values.push(to_sql_value(value));
        }

        let table = quote(table)?;
        let sql = if columns.is_empty() {
            format!("INSERT INTO {table} DEFAULT VALUES")
        } else {
            let placeholders = vec!["?"; columns.len()].join(", ");
            format!(
                "INSERT INTO {table} ({}) VALUES ({placeholders})",
                columns.join(", ")
            )
        };
        self.execute(&sql, params_from_iter(values.iter()))?;
        Ok(self.last_insert_rowid())
    }

    fn shift(
        &self,
        table: &str,
        condition: &Condition,
        column: &str,
        delta: i64,
    ) -> Result<usize, StoreError> {
        let quoted = quote(column)?;
        let mut out = SqlFragment {
            sql: format!(
                "UPDATE {} SET {quoted} = {quoted} + ? WHERE {quoted} IS NOT NULL AND (",
                quote(table)?
            ),
            params: vec![Value::Integer(delta)],
        };
        render_condition(condition, &mut out)?;
        out.sql.push(')');

        let changed = self.execute(&out.sql, params_from_iter(out.params.iter()))?;
        tracing::trace!(table, column, delta, rows = changed, "shifted positions");
        Ok(changed)
    }
}

fn column_names(stmt: &Statement<'_>) -> Vec<String> {
    stmt.column_names().into_iter().map(String::from).collect()
}

fn read_record(row: &Row<'_>, columns: &[String]) -> rusqlite::Result<Record> {
    let mut record = Record::new();
    for (index, name) in columns.iter().enumerate() {
        let value = from_sql_value(row.get_ref(index)?);
        if name == ID_COLUMN
            && let FieldValue::Integer(id) = value
        {
            record.set_id(id);
            continue;
        }
        record.set(name.clone(), value);
    }
    Ok(record)
}
