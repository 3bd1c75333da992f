#![forbid(unsafe_code)]

//! Position lists over a row store.
//!
//! [`PositionList`] keeps a nullable integer column numbered `1..=n` inside
//! every scope of a table. It talks to storage only through [`RecordStore`]
//! and [`AtomicStore`]; [`SqliteStore`] is the bundled implementation.
//!
//! ```no_run
//! use rl_core::{ListConfig, Record};
//! use rl_storage::{Placement, PositionList, SqliteStore};
//!
//! # fn main() -> Result<(), rl_storage::StoreError> {
//! let mut store = SqliteStore::open_in_memory()?;
//! store.execute_batch("CREATE TABLE todos (id INTEGER PRIMARY KEY, pos INTEGER, list_id INTEGER)")?;
//!
//! let todos = PositionList::new(ListConfig::new("todos").position_column("pos").scope_column("list_id"))?;
//! let mut first = Record::new().with("list_id", 1);
//! todos.create(&mut store, &mut first, Placement::Bottom)?;
//! let mut second = Record::new().with("list_id", 1);
//! todos.create(&mut store, &mut second, Placement::Bottom)?;
//! todos.move_to_top(&mut store, &mut second)?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod list;
mod query;
mod record_store;
mod sql;
mod sqlite;

pub use config::StoreConfig;
pub use error::StoreError;
pub use list::{Placement, PositionList};
pub use query::{ListOptions, ListQuery};
pub use record_store::{AtomicStore, RecordStore};
pub use sqlite::SqliteStore;
