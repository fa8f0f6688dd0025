use async_trait::async_trait;
use chrono::SecondsFormat;
use sqlx::{Pool, Sqlite};

use super::SampleStore;
use crate::errors::PersistenceError;
use crate::models::MetricSample;

/// SQLite-backed sample log.
#[derive(Clone)]
pub struct SampleLogRepository {
    pool: Pool<Sqlite>,
}

impl SampleLogRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SampleStore for SampleLogRepository {
    async fn append(&self, sample: &MetricSample) -> Result<(), PersistenceError> {
        sqlx::query(
            r#"
            INSERT INTO sample_log (
                cpu_usage, gpu_usage, hbm_usage,
                total_memory, used_memory,
                total_storage, used_storage,
                training_progress, timestamp
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(sample.cpu_usage)
        .bind(sample.gpu_usage)
        .bind(sample.hbm_usage)
        .bind(sample.total_memory)
        .bind(sample.used_memory)
        .bind(sample.total_storage)
        .bind(sample.used_storage)
        .bind(i64::from(sample.training_progress))
        // Fixed millisecond precision keeps the text column ordering
        // identical to chronological ordering.
        .bind(sample.timestamp.to_rfc3339_opts(SecondsFormat::Millis, false))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn recent(&self, limit: u32) -> Result<Vec<MetricSample>, PersistenceError> {
        let samples = sqlx::query_as::<_, MetricSample>(
            r#"
            SELECT cpu_usage, gpu_usage, hbm_usage,
                   total_memory, used_memory,
                   total_storage, used_storage,
                   training_progress, timestamp
            FROM sample_log
            ORDER BY timestamp DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(samples)
    }
}
