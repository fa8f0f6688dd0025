//! Data model for sampled host metrics.
//!
//! `MetricSample` is the one schema shared by the wire format (WebSocket
//! pushes and the HTTP API) and the persisted log. Field names serialize in
//! camelCase to match the dashboard payload. All bounds are enforced at
//! construction, not at the edges: every percentage is clamped to [0, 100]
//! and sizes to >= 0 before a sample is visible to any consumer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One immutable snapshot of host metrics plus the simulated training
/// progress value.
///
/// Created by the sampler with `training_progress = 0`; a session loop stamps
/// its own progress counter via [`MetricSample::with_training_progress`]
/// before the sample fans out. Never mutated after that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MetricSample {
    /// CPU load percentage
    pub cpu_usage: f64,
    /// GPU usage percentage (placeholder, no real sensor assumed available)
    pub gpu_usage: f64,
    /// HBM usage percentage (placeholder, no real sensor assumed available)
    pub hbm_usage: f64,
    /// Total memory in GB
    pub total_memory: f64,
    /// Memory usage percentage
    pub used_memory: f64,
    /// Total storage of the primary volume in GB
    pub total_storage: f64,
    /// Storage usage percentage of the primary volume
    pub used_storage: f64,
    /// Simulated training progress percentage, stepped per session tick
    pub training_progress: u8,
    /// Creation time; strictly increasing within one session
    pub timestamp: DateTime<Utc>,
}

impl MetricSample {
    /// Build a sample from raw host readings, clamping every field into its
    /// documented bounds. Non-finite inputs collapse to 0.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cpu_usage: f64,
        total_memory: f64,
        used_memory: f64,
        total_storage: f64,
        used_storage: f64,
        gpu_usage: f64,
        hbm_usage: f64,
    ) -> Self {
        Self {
            cpu_usage: clamp_pct(cpu_usage),
            gpu_usage: clamp_pct(gpu_usage),
            hbm_usage: clamp_pct(hbm_usage),
            total_memory: clamp_size(total_memory),
            used_memory: clamp_pct(used_memory),
            total_storage: clamp_size(total_storage),
            used_storage: clamp_pct(used_storage),
            training_progress: 0,
            timestamp: Utc::now(),
        }
    }

    /// Stamp the owning session's training progress onto this sample,
    /// capped at 100.
    pub fn with_training_progress(mut self, pct: u8) -> Self {
        self.training_progress = pct.min(100);
        self
    }
}

fn clamp_pct(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

fn clamp_size(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}
