mod question;
mod subject;
mod summary;

pub use question::{Question, QuestionDraft, QuestionError};
pub use subject::{ParseSubjectError, Subject, SubjectFilter};
pub use summary::{
    BucketStats, OTHER_BUCKET, ParseModeError, QuestionOutcome, QuizMode, ResultSummary,
    SummaryError, percentage,
};
