//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuestionError, SummaryError};
use storage::repository::StorageError;

/// Errors emitted while fetching and decoding question banks.
///
/// Any of these leaves session start disabled: the bank is loaded
/// all-or-nothing, with no per-subject fallback.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("question fetch for {subject} failed with status {status}")]
    HttpStatus {
        subject: &'static str,
        status: reqwest::StatusCode,
    },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("question bank is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error("{subject} questions are unavailable")]
    Unavailable { subject: &'static str },
}

/// Errors emitted by the quiz session and its workflow.
///
/// Each is handled at the boundary where it occurs and returns the caller to
/// a well-defined state; none is fatal.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for this selection")]
    EmptyPool,

    #[error("a session needs at least one question")]
    NothingRequested,

    #[error("choose an answer before moving on")]
    NoSelection,

    #[error("option {index} is out of range for {len} options")]
    OptionOutOfRange { index: usize, len: usize },

    #[error("session is already finished")]
    AlreadyFinished,

    #[error("session is still in progress")]
    NotFinished,

    #[error("sign in before starting a quiz")]
    NotSignedIn,

    #[error(transparent)]
    Summary(#[from] SummaryError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
