use std::collections::BTreeMap;

use quiz_core::model::{BucketStats, QuizMode, ResultSummary};
use sqlx::Row;

use crate::repository::{StorageError, StoredResult};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

/// One decoded `result_buckets` row; `topic` is NULL for subject-level rows.
pub(crate) struct BucketRow {
    pub subject: String,
    pub topic: Option<String>,
    pub stats: BucketStats,
}

pub(crate) fn map_bucket_row(row: &sqlx::sqlite::SqliteRow) -> Result<BucketRow, StorageError> {
    Ok(BucketRow {
        subject: row.try_get("subject").map_err(ser)?,
        topic: row.try_get("topic").map_err(ser)?,
        stats: BucketStats {
            correct: u32_from_i64("correct", row.try_get::<i64, _>("correct").map_err(ser)?)?,
            total: u32_from_i64("total", row.try_get::<i64, _>("total").map_err(ser)?)?,
            percentage: u32_from_i64(
                "percentage",
                row.try_get::<i64, _>("percentage").map_err(ser)?,
            )?,
        },
    })
}

/// Rebuild a stored result from its `results` row and its bucket rows.
pub(crate) fn map_result_row(
    row: &sqlx::sqlite::SqliteRow,
    buckets: Vec<BucketRow>,
) -> Result<StoredResult, StorageError> {
    let id: i64 = row.try_get("id").map_err(ser)?;
    let principal_id: String = row.try_get("principal_id").map_err(ser)?;
    let recorded_at = row.try_get("recorded_at").map_err(ser)?;

    let mode: QuizMode = row
        .try_get::<String, _>("mode")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;
    let total_questions = u32_from_i64(
        "total_questions",
        row.try_get::<i64, _>("total_questions").map_err(ser)?,
    )?;
    let score = u32_from_i64("score", row.try_get::<i64, _>("score").map_err(ser)?)?;
    let overall_percentage = u32_from_i64(
        "overall_percentage",
        row.try_get::<i64, _>("overall_percentage").map_err(ser)?,
    )?;

    let mut subjects: BTreeMap<String, BucketStats> = BTreeMap::new();
    let mut topics: BTreeMap<String, BTreeMap<String, BucketStats>> = BTreeMap::new();
    for bucket in buckets {
        match bucket.topic {
            None => {
                subjects.insert(bucket.subject, bucket.stats);
            }
            Some(topic) => {
                topics
                    .entry(bucket.subject)
                    .or_default()
                    .insert(topic, bucket.stats);
            }
        }
    }

    let summary = ResultSummary::from_persisted(
        mode,
        total_questions,
        score,
        overall_percentage,
        subjects,
        topics,
    )
    .map_err(ser)?;

    Ok(StoredResult {
        id,
        principal_id,
        recorded_at,
        summary,
    })
}
