mod progress;
mod service;
mod timer;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use service::{AnswerOutcome, FinishReason, QuizSession};
pub use timer::{QuizTimer, Tick, TimerState};
pub use view::{ResultListItem, ReviewItem};
pub use workflow::{AdvanceResult, QuizConfig, QuizWorkflow, TickResult};
