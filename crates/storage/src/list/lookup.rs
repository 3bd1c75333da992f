#![forbid(unsafe_code)]

use super::PositionList;
use crate::error::StoreError;
use crate::query::{ListOptions, ListQuery};
use crate::record_store::RecordStore;
use rl_core::{Condition, Record};

impl PositionList {
    /// Records matching `condition`, ordered by position (unlisted rows last).
    ///
    /// Nothing runs until the returned query is fetched.
    pub fn list(&self, condition: Condition, options: ListOptions) -> ListQuery {
        ListQuery::new(self.table(), condition)
            .ordered_by(self.position_column())
            .with_options(options)
    }

    /// The list `record` belongs to, resolved from the fields it carries.
    ///
    /// Missing scope fields read as null here; fetch them before calling.
    pub fn listed_with(&self, record: &Record) -> ListQuery {
        self.list(self.scope_of(record), ListOptions::default())
    }

    /// Number of listed records matching `condition`.
    pub fn count<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        condition: &Condition,
    ) -> Result<i64, StoreError> {
        self.count_listed(store, condition)
    }

    pub fn lower_item<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        record: &Record,
    ) -> Result<Option<Record>, StoreError> {
        let Some(position) = record.position(self.position_column()) else {
            return Ok(None);
        };
        self.item_at_tx(store, &self.resolved_scope(store, record)?, position + 1)
    }

    pub fn higher_item<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        record: &Record,
    ) -> Result<Option<Record>, StoreError> {
        match record.position(self.position_column()) {
            Some(position) if position > 1 => {
                self.item_at_tx(store, &self.resolved_scope(store, record)?, position - 1)
            }
            _ => Ok(None),
        }
    }

    pub fn is_first(&self, record: &Record) -> bool {
        record.position(self.position_column()) == Some(1)
    }

    pub fn is_last<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        record: &Record,
    ) -> Result<bool, StoreError> {
        let Some(position) = record.position(self.position_column()) else {
            return Ok(false);
        };
        let scope = self.resolved_scope(store, record)?;
        Ok(position == self.count_listed(store, &scope)?)
    }

    pub(super) fn item_at_tx<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        scope: &Condition,
        position: i64,
    ) -> Result<Option<Record>, StoreError> {
        let query = self.list(
            scope.clone(),
            ListOptions::default()
                .conditions(Condition::eq(self.position_column(), position))
                .limit(1),
        );
        Ok(query.fetch(store)?.into_iter().next())
    }
}
