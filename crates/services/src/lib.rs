#![forbid(unsafe_code)]

pub mod auth;
pub mod bank;
pub mod error;
pub mod session;
pub mod source;

pub use quiz_core::Clock;

pub use auth::{Principal, PrincipalProvider, StaticPrincipalProvider};
pub use bank::QuestionBank;
pub use error::{SessionError, SourceError};
pub use session::{
    AdvanceResult, AnswerOutcome, FinishReason, QuizConfig, QuizSession, QuizTimer, QuizWorkflow,
    ResultListItem, ReviewItem, SessionProgress, Tick, TickResult, TimerState,
};
pub use source::{HttpQuestionSource, QuestionSource, StaticQuestionSource};
