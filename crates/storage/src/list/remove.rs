#![forbid(unsafe_code)]

use super::PositionList;
use crate::error::StoreError;
use crate::record_store::{AtomicStore, RecordStore};
use rl_core::Record;
use rl_core::plan;

impl PositionList {
    /// Takes `record` out of its list and closes the gap. The row stays.
    ///
    /// Returns `false` when the stored row was already unlisted.
    pub fn remove_from_list<S: AtomicStore>(
        &self,
        store: &mut S,
        record: &mut Record,
    ) -> Result<bool, StoreError> {
        store.atomically(|tx| self.remove_from_list_tx(tx, record))
    }

    pub fn remove_from_list_tx(
        &self,
        tx: &dyn RecordStore,
        record: &mut Record,
    ) -> Result<bool, StoreError> {
        self.vacate_tx(tx, record)
    }

    /// Compaction to run right before the host deletes `record`'s row.
    ///
    /// Keyed on the stored position at the start of the call, so running it
    /// after [`PositionList::remove_from_list`] shifts nothing a second time.
    pub fn on_destroy<S: AtomicStore>(
        &self,
        store: &mut S,
        record: &mut Record,
    ) -> Result<bool, StoreError> {
        store.atomically(|tx| self.on_destroy_tx(tx, record))
    }

    pub fn on_destroy_tx(
        &self,
        tx: &dyn RecordStore,
        record: &mut Record,
    ) -> Result<bool, StoreError> {
        self.vacate_tx(tx, record)
    }

    /// [`PositionList::on_destroy`] followed by the delete, as one unit.
    pub fn destroy<S: AtomicStore>(
        &self,
        store: &mut S,
        record: &mut Record,
    ) -> Result<(), StoreError> {
        store.atomically(|tx| self.destroy_tx(tx, record))
    }

    pub fn destroy_tx(&self, tx: &dyn RecordStore, record: &mut Record) -> Result<(), StoreError> {
        let id = record.id().ok_or(StoreError::Unpersisted)?;
        self.on_destroy_tx(tx, record)?;
        tx.delete(self.table(), id)?;
        tracing::debug!(table = self.table(), id, "destroyed listed record");
        Ok(())
    }

    fn vacate_tx(&self, tx: &dyn RecordStore, record: &mut Record) -> Result<bool, StoreError> {
        let Some(stored) = self.stored(tx, record)? else {
            self.mirror_position(record, None);
            return Ok(false);
        };
        let Some(old) = stored.position else {
            self.mirror_position(record, None);
            return Ok(false);
        };

        let shifted = self.shift_tx(tx, &stored.scope, plan::plan_removal(old))?;
        self.set_position_tx(tx, record, None)?;

        tracing::debug!(
            table = self.table(),
            id = ?record.id(),
            from = old,
            shifted,
            "removed from list"
        );
        Ok(true)
    }
}
