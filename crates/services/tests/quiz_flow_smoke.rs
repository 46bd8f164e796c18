use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use quiz_core::model::{Question, QuizMode, ResultSummary, Subject, SubjectFilter};
use quiz_core::time::fixed_clock;
use services::{
    QuestionBank, QuizConfig, QuizWorkflow, SessionError, StaticPrincipalProvider,
    StaticQuestionSource, Tick,
};
use storage::repository::{InMemoryResultStore, ResultStore, StorageError, StoredResult};

fn maths_question(i: usize, topic: &str) -> Question {
    Question::new(
        "Maths",
        Some(topic.to_owned()),
        format!("maths q{i}"),
        vec!["right".into(), "wrong".into(), "also wrong".into()],
        0,
        Some("because".into()),
    )
    .unwrap()
}

fn english_question(i: usize) -> Question {
    Question::new(
        "English",
        None,
        format!("english q{i}"),
        vec!["right".into(), "wrong".into()],
        0,
        None,
    )
    .unwrap()
}

async fn loaded_bank() -> QuestionBank {
    let source = StaticQuestionSource::new()
        .with_questions(
            Subject::Maths,
            (0..3).map(|i| maths_question(i, "fractions")).collect(),
        )
        .with_questions(Subject::English, (0..2).map(english_question).collect());
    QuestionBank::load(&source).await.unwrap()
}

#[tokio::test]
async fn practice_quiz_runs_end_to_end_and_persists() {
    let store = InMemoryResultStore::new();
    let flow = QuizWorkflow::new(
        fixed_clock(),
        loaded_bank().await,
        Arc::new(StaticPrincipalProvider::signed_in(
            "u-1",
            Some("u@example.com".into()),
        )),
        Arc::new(store.clone()),
    );

    let mut session = flow
        .start_session(QuizConfig {
            filter: SubjectFilter::All,
            requested: 10, // clamps to the 5 available questions
            mode: QuizMode::Practice,
            duration_minutes: 0,
        })
        .unwrap();
    assert_eq!(session.total_questions(), 5);

    let mut summary = None;
    while !session.is_finished() {
        session.select(0).unwrap();
        let result = flow.advance(&mut session).await.unwrap();
        if result.summary.is_some() {
            summary = result.summary;
        }
    }

    let summary = summary.expect("completed session yields a summary");
    assert_eq!(summary.score(), 5);
    assert_eq!(summary.overall_percentage(), 100);
    assert_eq!(summary.subjects().len(), 2);
    assert_eq!(summary.topics()["Maths"]["fractions"].total, 3);

    let review = session.review();
    assert_eq!(review.len(), 5);
    assert!(review.iter().all(|item| item.correct));

    let history = flow.history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].overall_percentage, 100);
}

#[tokio::test]
async fn exam_timeout_ends_the_session_through_the_workflow() {
    let store = InMemoryResultStore::new();
    let flow = QuizWorkflow::new(
        fixed_clock(),
        loaded_bank().await,
        Arc::new(StaticPrincipalProvider::signed_in("u-1", None)),
        Arc::new(store.clone()),
    );

    let mut session = flow
        .start_session(QuizConfig {
            filter: SubjectFilter::Only(Subject::Maths),
            requested: 3,
            mode: QuizMode::Exam,
            duration_minutes: 1,
        })
        .unwrap();
    assert_eq!(session.remaining_secs(), Some(60));

    // Answer one question, then let the countdown run out.
    session.select(0).unwrap();
    flow.advance(&mut session).await.unwrap();

    let mut summary = None;
    loop {
        let result = flow.tick(&mut session).await.unwrap();
        if result.tick == Tick::Expired {
            summary = result.summary;
            break;
        }
    }

    let summary = summary.expect("expiry yields a summary");
    assert_eq!(summary.total_questions(), 3);
    assert_eq!(summary.score(), 1);

    let stored = store.list_results("u-1").await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].summary, summary);

    // The finished session refuses further answers.
    assert!(matches!(
        session.select(0).unwrap_err(),
        SessionError::AlreadyFinished
    ));
}

/// Store that always fails, to prove persistence never blocks completion.
#[derive(Clone, Default)]
struct BrokenResultStore;

#[async_trait]
impl ResultStore for BrokenResultStore {
    async fn append_result(
        &self,
        _principal_id: &str,
        _summary: &ResultSummary,
        _recorded_at: DateTime<Utc>,
    ) -> Result<i64, StorageError> {
        Err(StorageError::Connection("store is down".into()))
    }

    async fn get_result(&self, _id: i64) -> Result<StoredResult, StorageError> {
        Err(StorageError::Connection("store is down".into()))
    }

    async fn list_results(&self, _principal_id: &str) -> Result<Vec<StoredResult>, StorageError> {
        Err(StorageError::Connection("store is down".into()))
    }
}

#[tokio::test]
async fn persistence_failure_does_not_block_completion() {
    let flow = QuizWorkflow::new(
        fixed_clock(),
        loaded_bank().await,
        Arc::new(StaticPrincipalProvider::signed_in("u-1", None)),
        Arc::new(BrokenResultStore),
    );

    let mut session = flow
        .start_session(QuizConfig {
            filter: SubjectFilter::Only(Subject::English),
            requested: 2,
            mode: QuizMode::Practice,
            duration_minutes: 0,
        })
        .unwrap();

    let mut summary = None;
    while !session.is_finished() {
        session.select(1).unwrap();
        let result = flow.advance(&mut session).await.unwrap();
        if result.summary.is_some() {
            summary = result.summary;
        }
    }

    // The user still gets their summary and review; only the write was lost.
    let summary = summary.expect("summary survives a dead store");
    assert_eq!(summary.score(), 0);
    assert_eq!(session.result_id(), None);
    assert_eq!(session.review().len(), 2);
}

#[tokio::test]
async fn bank_load_failure_keeps_sessions_disabled() {
    let source = StaticQuestionSource::new()
        .with_questions(Subject::Maths, vec![maths_question(0, "fractions")])
        .with_failure(Subject::English);

    // No bank value exists, so nothing downstream can start a session.
    assert!(QuestionBank::load(&source).await.is_err());
}

#[tokio::test]
async fn empty_subject_is_loadable_but_not_startable() {
    let source = StaticQuestionSource::new()
        .with_questions(Subject::Maths, vec![maths_question(0, "fractions")]);
    let bank = QuestionBank::load(&source).await.unwrap();

    let flow = QuizWorkflow::new(
        fixed_clock(),
        bank,
        Arc::new(StaticPrincipalProvider::signed_in("u-1", None)),
        Arc::new(InMemoryResultStore::new()),
    );

    let err = flow
        .start_session(QuizConfig {
            filter: SubjectFilter::Only(Subject::Verbal),
            requested: 5,
            mode: QuizMode::Practice,
            duration_minutes: 0,
        })
        .unwrap_err();
    assert!(matches!(err, SessionError::EmptyPool));
}
