use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::ResultSummary;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A persisted result row: one completed session's summary, tagged with the
/// principal that produced it and the timestamp assigned at write time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResult {
    pub id: i64,
    pub principal_id: String,
    pub recorded_at: DateTime<Utc>,
    pub summary: ResultSummary,
}

/// Write-one / query-by-principal contract for the result store.
///
/// `list_results` makes no ordering promise; callers sort client-side (the
/// design deliberately avoids depending on server-side ordering).
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Persist one completed session summary.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the row cannot be stored.
    async fn append_result(
        &self,
        principal_id: &str,
        summary: &ResultSummary,
        recorded_at: DateTime<Utc>,
    ) -> Result<i64, StorageError>;

    /// Fetch a stored result by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_result(&self, id: i64) -> Result<StoredResult, StorageError>;

    /// Fetch all stored results for a principal, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_results(&self, principal_id: &str) -> Result<Vec<StoredResult>, StorageError>;
}

/// In-memory result store for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryResultStore {
    rows: Arc<Mutex<Vec<StoredResult>>>,
}

impl InMemoryResultStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl ResultStore for InMemoryResultStore {
    async fn append_result(
        &self,
        principal_id: &str,
        summary: &ResultSummary,
        recorded_at: DateTime<Utc>,
    ) -> Result<i64, StorageError> {
        let mut guard = self
            .rows
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = i64::try_from(guard.len())
            .map_err(|_| StorageError::Serialization("row id overflow".into()))?
            + 1;
        guard.push(StoredResult {
            id,
            principal_id: principal_id.to_owned(),
            recorded_at,
            summary: summary.clone(),
        });
        Ok(id)
    }

    async fn get_result(&self, id: i64) -> Result<StoredResult, StorageError> {
        let guard = self
            .rows
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .iter()
            .find(|row| row.id == id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_results(&self, principal_id: &str) -> Result<Vec<StoredResult>, StorageError> {
        let guard = self
            .rows
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|row| row.principal_id == principal_id)
            .cloned()
            .collect())
    }
}
