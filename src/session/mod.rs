//! Per-viewer session state and the periodic push loop.
//!
//! Exactly one session loop exists per live viewer connection; no state is
//! shared between sessions. Each tick samples the host, stamps the session's
//! training progress, appends to the shared log, and pushes to the viewer.
//! Failures stay inside the tick that produced them: a sampling error skips
//! the tick, a persistence error is logged but delivery still proceeds, and
//! a delivery error cancels the session.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::errors::DeliveryError;
use crate::models::MetricSample;
use crate::repositories::SampleStore;
use crate::sampler::MetricSource;

/// Server-side state bound to one viewer connection.
///
/// Owns an independent training-progress counter seeded at 0. The counter is
/// a per-viewer simulation, never shared across sessions or persisted as
/// global state.
pub struct Session {
    id: Uuid,
    training_progress: u8,
    progress_step: u8,
}

impl Session {
    pub fn new(progress_step: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            training_progress: 0,
            progress_step,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn training_progress(&self) -> u8 {
        self.training_progress
    }

    /// Advance progress by one step, saturating at 100. Called once per
    /// tick; a tick whose sample fails still advances the counter, it just
    /// publishes nothing.
    pub fn advance_progress(&mut self) -> u8 {
        self.training_progress = self
            .training_progress
            .saturating_add(self.progress_step)
            .min(100);
        self.training_progress
    }
}

/// Destination for samples produced by a session loop.
#[async_trait]
pub trait SampleSink: Send {
    async fn deliver(&mut self, sample: &MetricSample) -> Result<(), DeliveryError>;
}

/// Run one session's periodic pipeline until cancelled or the viewer is gone.
///
/// The cancellation token is checked before every append and again before
/// every push, so closing a connection prevents any further write or push
/// attributable to this session within one tick period.
pub async fn run_session_loop<S>(
    source: Arc<dyn MetricSource>,
    store: Arc<dyn SampleStore>,
    mut sink: S,
    mut session: Session,
    period: Duration,
    cancel: CancellationToken,
) where
    S: SampleSink,
{
    let session_id = session.id();
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(session_id = %session_id, "session cancelled");
                break;
            }
            _ = ticker.tick() => {
                let progress = session.advance_progress();
                let sample = match source.sample().await {
                    Ok(sample) => sample,
                    Err(e) => {
                        warn!(session_id = %session_id, "sampling failed, skipping tick: {}", e);
                        continue;
                    }
                };
                let sample = sample.with_training_progress(progress);

                if cancel.is_cancelled() {
                    break;
                }
                if let Err(e) = store.append(&sample).await {
                    error!(session_id = %session_id, "failed to persist sample: {}", e);
                }

                if cancel.is_cancelled() {
                    break;
                }
                if let Err(e) = sink.deliver(&sample).await {
                    debug!(session_id = %session_id, "viewer gone, stopping pushes: {}", e);
                    cancel.cancel();
                    break;
                }
            }
        }
    }
}
