use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::SampleStore;
use crate::errors::PersistenceError;
use crate::models::MetricSample;

/// In-memory [`SampleStore`] used by the session and API tests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    samples: Arc<Mutex<Vec<MetricSample>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All appended samples in insertion order.
    pub fn snapshot(&self) -> Vec<MetricSample> {
        self.samples.lock().expect("store lock poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.samples.lock().expect("store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SampleStore for MemoryStore {
    async fn append(&self, sample: &MetricSample) -> Result<(), PersistenceError> {
        self.samples
            .lock()
            .map_err(|_| PersistenceError::store_failed("store lock poisoned"))?
            .push(sample.clone());
        Ok(())
    }

    async fn recent(&self, limit: u32) -> Result<Vec<MetricSample>, PersistenceError> {
        let mut samples = self
            .samples
            .lock()
            .map_err(|_| PersistenceError::store_failed("store lock poisoned"))?
            .clone();
        samples.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        samples.truncate(limit as usize);
        Ok(samples)
    }
}
