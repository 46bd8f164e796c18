#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{InMemoryResultStore, ResultStore, StorageError, StoredResult};
pub use sqlite::{SqliteInitError, SqliteResultStore};
