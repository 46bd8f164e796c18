use quiz_core::model::{QuestionOutcome, QuizMode, ResultSummary};
use quiz_core::time::fixed_now;
use storage::{ResultStore, SqliteResultStore, StorageError};

fn mixed_summary() -> ResultSummary {
    let outcomes = vec![
        QuestionOutcome {
            category: "Maths".to_owned(),
            topic: Some("fractions".to_owned()),
            correct: true,
        },
        QuestionOutcome {
            category: "Maths".to_owned(),
            topic: Some("arithmetic".to_owned()),
            correct: false,
        },
        QuestionOutcome {
            category: "English".to_owned(),
            topic: None,
            correct: true,
        },
    ];
    ResultSummary::from_outcomes(QuizMode::Exam, &outcomes).unwrap()
}

#[tokio::test]
async fn result_round_trips_with_buckets() {
    let store = SqliteResultStore::connect("sqlite::memory:").await.unwrap();
    let summary = mixed_summary();

    let id = store
        .append_result("user-1", &summary, fixed_now())
        .await
        .unwrap();

    let fetched = store.get_result(id).await.unwrap();
    assert_eq!(fetched.principal_id, "user-1");
    assert_eq!(fetched.recorded_at, fixed_now());
    assert_eq!(fetched.summary, summary);
    assert_eq!(fetched.summary.subjects().len(), 2);
    assert_eq!(fetched.summary.topics()["Maths"].len(), 2);
}

#[tokio::test]
async fn list_returns_only_the_principals_results() {
    let store = SqliteResultStore::connect("sqlite::memory:").await.unwrap();
    let summary = mixed_summary();

    store
        .append_result("user-1", &summary, fixed_now())
        .await
        .unwrap();
    store
        .append_result("user-1", &summary, fixed_now() + chrono::Duration::hours(1))
        .await
        .unwrap();
    store
        .append_result("user-2", &summary, fixed_now())
        .await
        .unwrap();

    let mine = store.list_results("user-1").await.unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|row| row.principal_id == "user-1"));

    let empty = store.list_results("nobody").await.unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn missing_result_is_not_found() {
    let store = SqliteResultStore::connect("sqlite::memory:").await.unwrap();
    assert!(matches!(
        store.get_result(999).await.unwrap_err(),
        StorageError::NotFound
    ));
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let store = SqliteResultStore::connect("sqlite::memory:").await.unwrap();
    store.migrate().await.unwrap();
    store.migrate().await.unwrap();
}
