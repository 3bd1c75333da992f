#![forbid(unsafe_code)]

//! The position list manager.
//!
//! Every mutating operation comes in two forms: `op(store, ..)` opens its own
//! atomic group, `op_tx(tx, ..)` runs inside a group the host already holds
//! (e.g. next to the host's own `DELETE`). Mutations read the stored row
//! inside the group rather than trusting the caller's copy, and mirror the
//! resulting position back into the caller's [`Record`].

mod insert;
mod lookup;
mod remove;
mod reorder;

use crate::error::StoreError;
use crate::record_store::RecordStore;
use rl_core::{Condition, FieldValue, ID_COLUMN, ListConfig, Record, ScopeResolver};

/// Where [`PositionList::create`] puts a new record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Placement {
    #[default]
    Bottom,
    At(i64),
    Unlisted,
}

/// Keeps one table's `position` column dense within each scope.
///
/// One instance serves every record kind stored in the table; hold it by
/// reference wherever those records are created, moved or destroyed.
#[derive(Clone, Debug)]
pub struct PositionList {
    config: ListConfig,
    resolver: ScopeResolver,
}

/// A record's list membership as found in the store.
#[derive(Clone, Debug)]
struct Stored {
    id: i64,
    row: Record,
    scope: Condition,
    position: Option<i64>,
}

impl PositionList {
    pub fn new(config: ListConfig) -> Result<Self, StoreError> {
        config.validate()?;
        let resolver = ScopeResolver::from_config(&config.scope)?;
        Ok(Self { config, resolver })
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    pub fn table(&self) -> &str {
        &self.config.table
    }

    pub fn position_column(&self) -> &str {
        &self.config.position_column
    }

    /// The condition selecting every record in `record`'s list, from its current fields.
    pub fn scope_of(&self, record: &Record) -> Condition {
        self.resolver.resolve(record)
    }

    pub fn is_listed(&self, record: &Record) -> bool {
        record.position(self.position_column()).is_some()
    }

    fn listed(&self, scope: Condition) -> Condition {
        scope.and(Condition::not_null(self.position_column()))
    }

    fn count_listed<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        scope: &Condition,
    ) -> Result<i64, StoreError> {
        store.count(self.table(), &self.listed(scope.clone()))
    }

    fn stored<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        record: &Record,
    ) -> Result<Option<Stored>, StoreError> {
        let Some(id) = record.id() else {
            return Ok(None);
        };
        let row = store.find(self.table(), id)?;
        Ok(Some(Stored {
            id,
            scope: self.scope_of(&row),
            position: row.position(self.position_column()),
            row,
        }))
    }

    /// Scope of `record`, taking any scope field it does not carry from `row`.
    ///
    /// A record read through a narrow projection keeps the list it is stored in.
    fn merged_scope(&self, record: &Record, row: Option<&Record>) -> Condition {
        let Some(row) = row else {
            return self.scope_of(record);
        };
        let mut view = Record::new();
        for field in self.resolver.fields() {
            let source = if record.has_field(field) { record } else { row };
            view.set(field, source.field(field).clone());
        }
        self.resolver.resolve(&view)
    }

    /// Like [`PositionList::scope_of`], but reads missing scope fields of a
    /// persisted record from the store.
    fn resolved_scope<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        record: &Record,
    ) -> Result<Condition, StoreError> {
        let complete = self
            .resolver
            .fields()
            .into_iter()
            .all(|field| record.has_field(field));
        match record.id() {
            Some(id) if !complete => {
                let row = store.find(self.table(), id)?;
                Ok(self.merged_scope(record, Some(&row)))
            }
            _ => Ok(self.scope_of(record)),
        }
    }

    /// Whether the stored row `id` matches `scope`, compared by the store so
    /// that its own type coercions apply.
    fn row_in_scope(
        &self,
        tx: &dyn RecordStore,
        id: i64,
        scope: &Condition,
    ) -> Result<bool, StoreError> {
        let matching = scope.clone().and(Condition::eq(ID_COLUMN, id));
        Ok(tx.count(self.table(), &matching)? > 0)
    }

    fn shift_tx(
        &self,
        tx: &dyn RecordStore,
        scope: &Condition,
        shift: rl_core::plan::Shift,
    ) -> Result<usize, StoreError> {
        let column = self.position_column();
        tx.shift(
            self.table(),
            &scope.clone().and(shift.condition(column)),
            column,
            shift.delta,
        )
    }

    /// Writes `position` to the stored row (when there is one) and to `record`.
    fn set_position_tx(
        &self,
        tx: &dyn RecordStore,
        record: &mut Record,
        position: Option<i64>,
    ) -> Result<(), StoreError> {
        let value = FieldValue::from(position);
        if let Some(id) = record.id() {
            tx.update_field(self.table(), id, self.position_column(), &value)?;
        }
        record.set(self.position_column().to_string(), value);
        Ok(())
    }

    /// Persists the fields that decide `record`'s scope, so the stored row
    /// follows the record into the list it is being inserted into.
    /// Only fields `record` carries are written.
    fn adopt_scope_tx(&self, tx: &dyn RecordStore, record: &Record) -> Result<(), StoreError> {
        let Some(id) = record.id() else {
            return Ok(());
        };
        for field in self.resolver.fields() {
            if !record.has_field(field) {
                continue;
            }
            tx.update_field(self.table(), id, field, record.field(field))?;
        }
        Ok(())
    }

    fn mirror_position(&self, record: &mut Record, position: Option<i64>) {
        record.set(self.position_column().to_string(), position);
    }
}
