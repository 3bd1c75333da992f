#![forbid(unsafe_code)]

use super::{Placement, PositionList};
use crate::error::StoreError;
use crate::record_store::{AtomicStore, RecordStore};
use rl_core::Record;
use rl_core::plan::{self, Membership};

impl PositionList {
    /// Appends `record` to the list its current fields resolve to.
    ///
    /// Works on records that have not been inserted yet: the position is
    /// computed and set on `record`, and the host inserts it afterwards in
    /// the same atomic group (see [`PositionList::create_tx`]).
    pub fn add_to_bottom<S: AtomicStore>(
        &self,
        store: &mut S,
        record: &mut Record,
    ) -> Result<i64, StoreError> {
        store.atomically(|tx| self.add_to_bottom_tx(tx, record))
    }

    pub fn add_to_bottom_tx(
        &self,
        tx: &dyn RecordStore,
        record: &mut Record,
    ) -> Result<i64, StoreError> {
        self.insert_at_tx(tx, record, i64::MAX)
    }

    /// Inserts `record` and places it. Returns the new primary key.
    pub fn create<S: AtomicStore>(
        &self,
        store: &mut S,
        record: &mut Record,
        placement: Placement,
    ) -> Result<i64, StoreError> {
        store.atomically(|tx| self.create_tx(tx, record, placement))
    }

    pub fn create_tx(
        &self,
        tx: &dyn RecordStore,
        record: &mut Record,
        placement: Placement,
    ) -> Result<i64, StoreError> {
        if record.id().is_some() {
            return Err(StoreError::InvalidInput("record is already persisted"));
        }

        let id = match placement {
            Placement::Bottom => {
                self.add_to_bottom_tx(tx, record)?;
                tx.insert(self.table(), record)?
            }
            Placement::Unlisted => {
                self.mirror_position(record, None);
                tx.insert(self.table(), record)?
            }
            Placement::At(target) => {
                self.mirror_position(record, None);
                let id = tx.insert(self.table(), record)?;
                record.set_id(id);
                self.insert_at_tx(tx, record, target)?;
                id
            }
        };
        record.set_id(id);

        tracing::debug!(
            table = self.table(),
            id,
            position = ?record.position(self.position_column()),
            "created listed record"
        );
        Ok(id)
    }

    /// Places `record` at `target` in the list its current fields resolve to.
    ///
    /// `target` is clamped into `1..=n + 1`. Records between the old and new
    /// slot shift by one; a record arriving from another list (or from no
    /// list) pushes everything at or below `target` down, and the list it
    /// left is compacted. Returns the position taken.
    pub fn insert_at<S: AtomicStore>(
        &self,
        store: &mut S,
        record: &mut Record,
        target: i64,
    ) -> Result<i64, StoreError> {
        store.atomically(|tx| self.insert_at_tx(tx, record, target))
    }

    pub fn insert_at_tx(
        &self,
        tx: &dyn RecordStore,
        record: &mut Record,
        target: i64,
    ) -> Result<i64, StoreError> {
        let stored = self.stored(tx, record)?;
        let target_scope = self.merged_scope(record, stored.as_ref().map(|stored| &stored.row));
        let same_scope = match stored.as_ref() {
            Some(stored) => self.row_in_scope(tx, stored.id, &target_scope)?,
            None => true,
        };
        let membership = match stored.as_ref().and_then(|stored| stored.position) {
            None => Membership::Unlisted,
            Some(old) if same_scope => Membership::Listed(old),
            Some(old) => Membership::Elsewhere(old),
        };

        let mut listed = self.count_listed(tx, &target_scope)?;
        if matches!(membership, Membership::Listed(_)) {
            listed -= 1;
        }

        let Some(plan) = plan::plan_insert(membership, target, listed) else {
            let position = plan::clamp_target(target, listed);
            self.mirror_position(record, Some(position));
            return Ok(position);
        };

        if let (Some(shift), Some(stored)) = (plan.vacate, stored.as_ref()) {
            self.shift_tx(tx, &stored.scope, shift)?;
        }
        if let Some(shift) = plan.make_room {
            self.shift_tx(tx, &target_scope, shift)?;
        }
        if !same_scope {
            self.adopt_scope_tx(tx, record)?;
        }
        self.set_position_tx(tx, record, Some(plan.position))?;

        tracing::debug!(
            table = self.table(),
            id = ?record.id(),
            requested = target,
            position = plan.position,
            ?membership,
            "inserted into list"
        );
        Ok(plan.position)
    }
}
