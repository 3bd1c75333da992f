#![forbid(unsafe_code)]

use crate::value::FieldValue;
use std::collections::BTreeMap;

static NULL: FieldValue = FieldValue::Null;

/// A row of a listed table: an optional primary key plus named fields.
///
/// `id` is `None` until the row has been inserted. The position column is an
/// ordinary field; [`Record::position`] reads it as a nullable integer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    id: Option<i64>,
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(id: i64) -> Self {
        Self {
            id: Some(id),
            fields: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    /// Missing fields read as [`FieldValue::Null`].
    pub fn field(&self, name: &str) -> &FieldValue {
        self.fields.get(name).unwrap_or(&NULL)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    pub fn position(&self, column: &str) -> Option<i64> {
        self.field(column).as_i64()
    }
}
