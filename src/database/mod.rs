use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{migrate::MigrateDatabase, Pool, Sqlite};
use tracing::info;

use crate::config::DatabaseConfig;

/// SQLite-backed storage for the sample log.
///
/// The pool is the only resource shared across sessions; appends from
/// concurrent sessions may interleave in any order.
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    pub fn pool(&self) -> Pool<Sqlite> {
        self.pool.clone()
    }

    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        // Create database if it doesn't exist (for file-backed SQLite)
        if !config.url.contains(":memory:") && !Sqlite::database_exists(&config.url).await? {
            Sqlite::create_database(&config.url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.unwrap_or(5))
            .connect(&config.url)
            .await?;

        Ok(Self { pool })
    }

    /// Apply the embedded schema. Idempotent, run at every startup.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sample_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                cpu_usage REAL NOT NULL,
                gpu_usage REAL NOT NULL,
                hbm_usage REAL NOT NULL,
                total_memory REAL NOT NULL,
                used_memory REAL NOT NULL,
                total_storage REAL NOT NULL,
                used_storage REAL NOT NULL,
                training_progress INTEGER NOT NULL,
                timestamp TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_sample_log_timestamp ON sample_log (timestamp)",
        )
        .execute(&self.pool)
        .await?;

        info!("Sample log schema applied");
        Ok(())
    }
}
