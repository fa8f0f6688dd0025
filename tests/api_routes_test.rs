use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use serde_json::{json, Value};

use tower::ServiceExt;

use sysdash::config::Config;
use sysdash::errors::SamplingError;
use sysdash::models::MetricSample;
use sysdash::repositories::{MemoryStore, SampleStore};
use sysdash::sampler::MetricSource;
use sysdash::web::{AppState, WebServer};

// Helper function to send requests to the app
async fn send_request(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request_builder = Request::builder().method(method).uri(uri);

    let request = if let Some(body) = body {
        request_builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    } else {
        request_builder.body(Body::empty()).unwrap()
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json: Value = if body_bytes.is_empty() {
        json!({})
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(json!({}))
    };

    (status, json)
}

fn fixed_sample() -> MetricSample {
    MetricSample::new(42.5, 16.0, 61.2, 512.0, 73.4, 33.0, 66.0)
}

struct FixedSource;

#[async_trait]
impl MetricSource for FixedSource {
    async fn sample(&self) -> Result<MetricSample, SamplingError> {
        Ok(fixed_sample())
    }
}

struct FailingSource;

#[async_trait]
impl MetricSource for FailingSource {
    async fn sample(&self) -> Result<MetricSample, SamplingError> {
        Err(SamplingError::PrimaryVolumeUnavailable)
    }
}

fn test_app(sampler: Arc<dyn MetricSource>, sample_log: Arc<dyn SampleStore>) -> Router {
    WebServer::create_router(AppState {
        config: Config::default(),
        sampler,
        sample_log,
    })
}

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let app = test_app(Arc::new(FixedSource), Arc::new(MemoryStore::new()));

    let (status, response) = send_request(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert!(response.get("timestamp").is_some());
}

#[tokio::test]
async fn stats_endpoint_returns_one_current_sample() {
    let store = Arc::new(MemoryStore::new());
    let app = test_app(Arc::new(FixedSource), store.clone());

    let (status, response) = send_request(&app, Method::GET, "/api/system/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["cpuUsage"], 42.5);
    assert_eq!(response["usedMemory"], 61.2);
    assert_eq!(response["usedStorage"], 73.4);
    // The on-demand path never touches session progress
    assert_eq!(response["trainingProgress"], 0);
    // ... and never persists
    assert!(store.is_empty());
}

#[tokio::test]
async fn stats_endpoint_maps_sampling_error_to_500() {
    let app = test_app(Arc::new(FailingSource), Arc::new(MemoryStore::new()));

    let (status, response) = send_request(&app, Method::GET, "/api/system/stats", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response["message"], "Error fetching system data");
    assert!(response["error"]
        .as_str()
        .unwrap()
        .contains("Primary volume unavailable"));
}

#[tokio::test]
async fn logs_endpoint_caps_at_100_newest_first() {
    let store = Arc::new(MemoryStore::new());
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    for i in 0..150i64 {
        let mut sample = fixed_sample().with_training_progress((i % 100) as u8);
        sample.timestamp = base + ChronoDuration::seconds(i);
        store.append(&sample).await.unwrap();
    }

    let app = test_app(Arc::new(FixedSource), store);
    let (status, response) = send_request(&app, Method::GET, "/api/system/logs", None).await;

    assert_eq!(status, StatusCode::OK);
    let logs = response.as_array().expect("logs payload is an array");
    assert_eq!(logs.len(), 100);

    // First element is the newest persisted sample
    let newest = (base + ChronoDuration::seconds(149)).to_rfc3339();
    let first_ts = logs[0]["timestamp"].as_str().unwrap();
    assert_eq!(
        chrono::DateTime::parse_from_rfc3339(first_ts).unwrap(),
        chrono::DateTime::parse_from_rfc3339(&newest).unwrap()
    );

    // Strictly descending by timestamp
    let timestamps: Vec<chrono::DateTime<chrono::FixedOffset>> = logs
        .iter()
        .map(|entry| {
            chrono::DateTime::parse_from_rfc3339(entry["timestamp"].as_str().unwrap()).unwrap()
        })
        .collect();
    assert!(timestamps.windows(2).all(|pair| pair[0] > pair[1]));
}

#[tokio::test]
async fn logs_endpoint_is_empty_before_any_session() {
    let app = test_app(Arc::new(FixedSource), Arc::new(MemoryStore::new()));

    let (status, response) = send_request(&app, Method::GET, "/api/system/logs", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!([]));
}
