//! Persistence tests against a real SQLite sample log.

use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use tokio_test::assert_ok;
use uuid::Uuid;

use sysdash::config::DatabaseConfig;
use sysdash::database::Database;
use sysdash::models::MetricSample;
use sysdash::repositories::{SampleLogRepository, SampleStore};

async fn temp_repository() -> SampleLogRepository {
    let path = std::env::temp_dir().join(format!("sysdash-test-{}.db", Uuid::new_v4()));
    let config = DatabaseConfig {
        url: format!("sqlite://{}", path.display()),
        max_connections: Some(1),
    };
    let database = Database::new(&config).await.expect("database setup");
    database.migrate().await.expect("schema setup");
    SampleLogRepository::new(database.pool())
}

fn sample_at(seconds: i64) -> MetricSample {
    let mut sample =
        MetricSample::new(40.0 + seconds as f64 % 10.0, 16.0, 61.2, 512.0, 73.4, 33.0, 66.0)
            .with_training_progress((seconds % 100) as u8);
    sample.timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        + ChronoDuration::seconds(seconds);
    sample
}

#[tokio::test]
async fn append_then_recent_round_trips_fields() {
    let repo = temp_repository().await;

    let sample = sample_at(0);
    tokio_test::assert_ok!(repo.append(&sample).await);

    let fetched = repo.recent(10).await.expect("recent");
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].cpu_usage, sample.cpu_usage);
    assert_eq!(fetched[0].total_memory, sample.total_memory);
    assert_eq!(fetched[0].used_storage, sample.used_storage);
    assert_eq!(fetched[0].training_progress, sample.training_progress);
    assert_eq!(fetched[0].timestamp, sample.timestamp);
}

#[tokio::test]
async fn recent_caps_at_limit_and_orders_newest_first() {
    let repo = temp_repository().await;

    for i in 0..150 {
        repo.append(&sample_at(i)).await.expect("append");
    }

    let fetched = repo.recent(100).await.expect("recent");
    assert_eq!(fetched.len(), 100);
    assert_eq!(fetched[0].timestamp, sample_at(149).timestamp);
    assert!(fetched
        .windows(2)
        .all(|pair| pair[0].timestamp > pair[1].timestamp));
}

#[tokio::test]
async fn interleaved_appends_are_all_visible() {
    let repo = temp_repository().await;

    // Appends from two sessions may interleave in any order; readers see
    // whatever has been durably appended at read time.
    for i in 0..5 {
        repo.append(&sample_at(i * 2)).await.expect("append");
        repo.append(&sample_at(i * 2 + 1)).await.expect("append");
    }

    let fetched = repo.recent(100).await.expect("recent");
    assert_eq!(fetched.len(), 10);
}
