#![forbid(unsafe_code)]

use crate::error::StoreError;
use crate::record_store::RecordStore;
use rl_core::{Condition, Record};

/// Caller-facing options for `PositionList::list`, forwarded to the store as-is.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListOptions {
    pub select: Option<Vec<String>>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
    /// Narrows the listed condition (conjunction).
    pub conditions: Option<Condition>,
}

impl ListOptions {
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn conditions(mut self, condition: Condition) -> Self {
        self.conditions = Some(condition);
        self
    }
}

/// A read that has been described but not run.
///
/// Building a query touches no store. Every [`ListQuery::fetch`] re-executes
/// it, so the same query observes later reorderings.
#[derive(Clone, Debug, PartialEq)]
pub struct ListQuery {
    table: String,
    condition: Condition,
    order_by: Option<String>,
    select: Option<Vec<String>>,
    offset: Option<u64>,
    limit: Option<u64>,
}

impl ListQuery {
    pub fn new(table: impl Into<String>, condition: Condition) -> Self {
        Self {
            table: table.into(),
            condition,
            order_by: None,
            select: None,
            offset: None,
            limit: None,
        }
    }

    pub fn ordered_by(mut self, column: impl Into<String>) -> Self {
        self.order_by = Some(column.into());
        self
    }

    pub fn with_options(mut self, options: ListOptions) -> Self {
        if let Some(extra) = options.conditions {
            self.condition = self.condition.and(extra);
        }
        self.select = options.select;
        self.offset = options.offset;
        self.limit = options.limit;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    pub fn order_by(&self) -> Option<&str> {
        self.order_by.as_deref()
    }

    pub fn projection(&self) -> Option<&[String]> {
        self.select.as_deref()
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    pub fn max_rows(&self) -> Option<u64> {
        self.limit
    }

    pub fn fetch<S: RecordStore + ?Sized>(&self, store: &S) -> Result<Vec<Record>, StoreError> {
        store.find_all(self)
    }

    pub fn first<S: RecordStore + ?Sized>(&self, store: &S) -> Result<Option<Record>, StoreError> {
        Ok(self.clone().limit(1).fetch(store)?.into_iter().next())
    }

    /// Primary keys in list order.
    pub fn ids<S: RecordStore + ?Sized>(&self, store: &S) -> Result<Vec<i64>, StoreError> {
        Ok(self.fetch(store)?.iter().filter_map(Record::id).collect())
    }
}
