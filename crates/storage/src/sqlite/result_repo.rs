use chrono::{DateTime, Utc};
use quiz_core::model::{BucketStats, ResultSummary};
use sqlx::Row;

use super::SqliteResultStore;
use super::mapping::{BucketRow, conn, map_bucket_row, map_result_row, ser};
use crate::repository::{ResultStore, StorageError, StoredResult};

async fn insert_bucket(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    result_id: i64,
    subject: &str,
    topic: Option<&str>,
    stats: &BucketStats,
) -> Result<(), StorageError> {
    sqlx::query(
        r"
            INSERT INTO result_buckets (result_id, subject, topic, correct, total, percentage)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ",
    )
    .bind(result_id)
    .bind(subject)
    .bind(topic)
    .bind(i64::from(stats.correct))
    .bind(i64::from(stats.total))
    .bind(i64::from(stats.percentage))
    .execute(&mut **tx)
    .await
    .map_err(conn)?;
    Ok(())
}

impl SqliteResultStore {
    async fn buckets_for(&self, result_id: i64) -> Result<Vec<BucketRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT subject, topic, correct, total, percentage
                FROM result_buckets
                WHERE result_id = ?1
            ",
        )
        .bind(result_id)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_bucket_row).collect()
    }
}

#[async_trait::async_trait]
impl ResultStore for SqliteResultStore {
    async fn append_result(
        &self,
        principal_id: &str,
        summary: &ResultSummary,
        recorded_at: DateTime<Utc>,
    ) -> Result<i64, StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let res = sqlx::query(
            r"
                INSERT INTO results (
                    principal_id, mode, total_questions, score,
                    overall_percentage, recorded_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(principal_id)
        .bind(summary.mode().as_str())
        .bind(i64::from(summary.total_questions()))
        .bind(i64::from(summary.score()))
        .bind(i64::from(summary.overall_percentage()))
        .bind(recorded_at)
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        let result_id = res.last_insert_rowid();

        for (subject, stats) in summary.subjects() {
            insert_bucket(&mut tx, result_id, subject, None, stats).await?;
        }
        for (subject, by_topic) in summary.topics() {
            for (topic, stats) in by_topic {
                insert_bucket(&mut tx, result_id, subject, Some(topic), stats).await?;
            }
        }

        tx.commit().await.map_err(conn)?;
        Ok(result_id)
    }

    async fn get_result(&self, id: i64) -> Result<StoredResult, StorageError> {
        let row = sqlx::query(
            r"
                SELECT id, principal_id, mode, total_questions, score,
                       overall_percentage, recorded_at
                FROM results
                WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?
        .ok_or(StorageError::NotFound)?;

        let buckets = self.buckets_for(id).await?;
        map_result_row(&row, buckets)
    }

    async fn list_results(&self, principal_id: &str) -> Result<Vec<StoredResult>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, principal_id, mode, total_questions, score,
                       overall_percentage, recorded_at
                FROM results
                WHERE principal_id = ?1
            ",
        )
        .bind(principal_id)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row.try_get("id").map_err(ser)?;
            let buckets = self.buckets_for(id).await?;
            out.push(map_result_row(&row, buckets)?);
        }
        Ok(out)
    }
}
