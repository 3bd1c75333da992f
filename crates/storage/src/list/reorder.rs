#![forbid(unsafe_code)]

use super::PositionList;
use crate::error::StoreError;
use crate::record_store::{AtomicStore, RecordStore};
use rl_core::plan::{self, Direction};
use rl_core::{FieldValue, Record};

impl PositionList {
    pub fn move_to_top<S: AtomicStore>(
        &self,
        store: &mut S,
        record: &mut Record,
    ) -> Result<i64, StoreError> {
        self.insert_at(store, record, 1)
    }

    pub fn move_to_top_tx(
        &self,
        tx: &dyn RecordStore,
        record: &mut Record,
    ) -> Result<i64, StoreError> {
        self.insert_at_tx(tx, record, 1)
    }

    pub fn move_to_bottom<S: AtomicStore>(
        &self,
        store: &mut S,
        record: &mut Record,
    ) -> Result<i64, StoreError> {
        self.insert_at(store, record, i64::MAX)
    }

    pub fn move_to_bottom_tx(
        &self,
        tx: &dyn RecordStore,
        record: &mut Record,
    ) -> Result<i64, StoreError> {
        self.insert_at_tx(tx, record, i64::MAX)
    }

    /// Swaps `record` with the item above it. Returns `false` at the top or when unlisted.
    pub fn move_higher<S: AtomicStore>(
        &self,
        store: &mut S,
        record: &mut Record,
    ) -> Result<bool, StoreError> {
        store.atomically(|tx| self.swap_tx(tx, record, Direction::Higher))
    }

    pub fn move_higher_tx(
        &self,
        tx: &dyn RecordStore,
        record: &mut Record,
    ) -> Result<bool, StoreError> {
        self.swap_tx(tx, record, Direction::Higher)
    }

    /// Swaps `record` with the item below it. Returns `false` at the bottom or when unlisted.
    pub fn move_lower<S: AtomicStore>(
        &self,
        store: &mut S,
        record: &mut Record,
    ) -> Result<bool, StoreError> {
        store.atomically(|tx| self.swap_tx(tx, record, Direction::Lower))
    }

    pub fn move_lower_tx(
        &self,
        tx: &dyn RecordStore,
        record: &mut Record,
    ) -> Result<bool, StoreError> {
        self.swap_tx(tx, record, Direction::Lower)
    }

    fn swap_tx(
        &self,
        tx: &dyn RecordStore,
        record: &mut Record,
        direction: Direction,
    ) -> Result<bool, StoreError> {
        let Some(stored) = self.stored(tx, record)? else {
            return Ok(false);
        };
        let Some(position) = stored.position else {
            self.mirror_position(record, None);
            return Ok(false);
        };
        let Some(id) = record.id() else {
            return Ok(false);
        };

        let listed = self.count_listed(tx, &stored.scope)?;
        let Some(partner) = plan::swap_partner(position, direction, listed) else {
            self.mirror_position(record, Some(position));
            return Ok(false);
        };
        let Some(neighbour) = self.item_at_tx(tx, &stored.scope, partner)? else {
            self.mirror_position(record, Some(position));
            return Ok(false);
        };
        let neighbour_id = neighbour
            .id()
            .ok_or(StoreError::InvalidInput("listed row has no id"))?;

        let column = self.position_column();
        tx.update_field(self.table(), neighbour_id, column, &FieldValue::Integer(position))?;
        tx.update_field(self.table(), id, column, &FieldValue::Integer(partner))?;
        self.mirror_position(record, Some(partner));

        tracing::debug!(
            table = self.table(),
            id,
            neighbour = neighbour_id,
            from = position,
            to = partner,
            ?direction,
            "swapped list items"
        );
        Ok(true)
    }
}
