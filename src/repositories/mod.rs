//! Data access for the append-only sample log.
//!
//! The [`SampleStore`] trait keeps the session loop and the web layer
//! independent of the backing store; production uses the SQLite-backed
//! [`SampleLogRepository`], tests use the in-memory [`MemoryStore`].

pub mod memory;
pub mod sample_log;

pub use memory::MemoryStore;
pub use sample_log::SampleLogRepository;

use async_trait::async_trait;

use crate::errors::PersistenceError;
use crate::models::MetricSample;

/// Append-only store of samples, queryable by most-recent-N.
///
/// No update, no delete, no retention policy: the store grows without bound.
/// That is an accepted gap, not a defect to silently fix here.
#[async_trait]
pub trait SampleStore: Send + Sync {
    /// Durably append one sample.
    async fn append(&self, sample: &MetricSample) -> Result<(), PersistenceError>;

    /// Return up to `limit` samples ordered most-recent-first.
    async fn recent(&self, limit: u32) -> Result<Vec<MetricSample>, PersistenceError>;
}
