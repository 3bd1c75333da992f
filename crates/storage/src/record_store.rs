#![forbid(unsafe_code)]

use crate::error::StoreError;
use crate::query::ListQuery;
use rl_core::{Condition, FieldValue, Record};

/// Row access the position list needs from its backing table.
///
/// Implementations report missing rows as [`StoreError::NotFound`].
pub trait RecordStore {
    fn find(&self, table: &str, id: i64) -> Result<Record, StoreError>;

    fn find_all(&self, query: &ListQuery) -> Result<Vec<Record>, StoreError>;

    fn count(&self, table: &str, condition: &Condition) -> Result<i64, StoreError>;

    fn update_field(
        &self,
        table: &str,
        id: i64,
        field: &str,
        value: &FieldValue,
    ) -> Result<(), StoreError>;

    fn delete(&self, table: &str, id: i64) -> Result<(), StoreError>;

    /// Inserts every field of `record` and returns the new primary key.
    fn insert(&self, table: &str, record: &Record) -> Result<i64, StoreError>;

    /// Adds `delta` to `column` on every matching row; returns the row count.
    ///
    /// Rows whose column is null are skipped.
    fn shift(
        &self,
        table: &str,
        condition: &Condition,
        column: &str,
        delta: i64,
    ) -> Result<usize, StoreError> {
        let query = ListQuery::new(table, condition.clone()).with_options(
            crate::query::ListOptions::default()
                .select([column])
                .conditions(Condition::not_null(column)),
        );
        let rows = self.find_all(&query)?;
        for row in &rows {
            let id = row
                .id()
                .ok_or(StoreError::InvalidInput("shifted row has no id"))?;
            let current = row
                .field(column)
                .as_i64()
                .ok_or(StoreError::InvalidInput("position column is not an integer"))?;
            self.update_field(table, id, column, &FieldValue::Integer(current + delta))?;
        }
        Ok(rows.len())
    }
}

/// A store that can run a group of operations as one unit.
///
/// `op` sees every write it makes; if it returns an error nothing it did is
/// kept. Writers are serialized for the duration of `op`.
pub trait AtomicStore: RecordStore {
    fn atomically<T, F>(&mut self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&dyn RecordStore) -> Result<T, StoreError>;
}
