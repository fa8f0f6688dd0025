//! Client-side history buffer and playback.
//!
//! A viewer keeps every sample received during its session in an ordered,
//! append-only buffer and scrubs through it with a cursor. The cursor
//! auto-follows the newest entry until the viewer steps backward; from then
//! on new arrivals append without moving it, and manual navigation wins until
//! the viewer returns to the tail.
//!
//! Two derived views feed the rendered dashboard: instantaneous gauges read
//! the sample under the cursor, and the time-series view reads the whole
//! buffer in order with x-axis labels derived from tick index times the push
//! period, not wall-clock time.

use std::time::Duration;

use serde::Serialize;

use crate::models::MetricSample;

/// Ordered, append-only record of samples received in the current viewer
/// session, plus the playback cursor.
#[derive(Debug, Default)]
pub struct HistoryBuffer {
    samples: Vec<MetricSample>,
    cursor: usize,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a received sample. If the cursor was at the previous tail it
    /// advances to the new tail; otherwise the viewer has navigated backward
    /// and the cursor stays put.
    pub fn push(&mut self, sample: MetricSample) {
        let was_at_tail = self.samples.is_empty() || self.cursor + 1 == self.samples.len();
        self.samples.push(sample);
        if was_at_tail {
            self.cursor = self.samples.len() - 1;
        }
    }

    /// Move the cursor one sample back. No-op at the oldest entry; returns
    /// whether the cursor moved.
    pub fn step_backward(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Move the cursor one sample forward. No-op at the newest entry;
    /// returns whether the cursor moved.
    pub fn step_forward(&mut self) -> bool {
        if self.cursor + 1 < self.samples.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// The sample under the cursor, if any samples have arrived.
    pub fn current(&self) -> Option<&MetricSample> {
        self.samples.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Whether the cursor is following the newest entry.
    pub fn at_tail(&self) -> bool {
        self.samples.is_empty() || self.cursor + 1 == self.samples.len()
    }

    /// The full buffer in arrival order.
    pub fn samples(&self) -> &[MetricSample] {
        &self.samples
    }

    /// Time-series view over the whole buffer. Labels come from the tick
    /// index and the push period (`T+0s`, `T+2s`, ...).
    pub fn time_series(&self, period: Duration) -> Vec<SeriesPoint> {
        self.samples
            .iter()
            .enumerate()
            .map(|(i, sample)| SeriesPoint {
                label: format!("T+{}s", i as u64 * period.as_secs()),
                cpu_usage: sample.cpu_usage,
                gpu_usage: sample.gpu_usage,
                hbm_usage: sample.hbm_usage,
                used_memory: sample.used_memory,
                used_storage: sample.used_storage,
                training_progress: sample.training_progress,
            })
            .collect()
    }
}

/// One point of the time-series view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub cpu_usage: f64,
    pub gpu_usage: f64,
    pub hbm_usage: f64,
    pub used_memory: f64,
    pub used_storage: f64,
    pub training_progress: u8,
}

/// Instantaneous gauge readings for the sample under the cursor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauges {
    pub cpu_usage: f64,
    pub gpu_usage: f64,
    pub hbm_usage: f64,
    pub used_memory: f64,
    pub used_storage: f64,
    pub training_progress: u8,
}

impl From<&MetricSample> for Gauges {
    fn from(sample: &MetricSample) -> Self {
        Self {
            cpu_usage: sample.cpu_usage,
            gpu_usage: sample.gpu_usage,
            hbm_usage: sample.hbm_usage,
            used_memory: sample.used_memory,
            used_storage: sample.used_storage,
            training_progress: sample.training_progress,
        }
    }
}

/// Everything a viewer tracks: the history buffer plus the last live sample
/// so gauges can render before playback has anything to show.
#[derive(Debug, Default)]
pub struct ViewerState {
    live: Option<MetricSample>,
    history: HistoryBuffer,
}

impl ViewerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one received sample.
    pub fn on_receive(&mut self, sample: MetricSample) {
        self.live = Some(sample.clone());
        self.history.push(sample);
    }

    /// The sample selected for display: the one under the cursor, or the
    /// most recent live sample while the buffer is still empty.
    pub fn current(&self) -> Option<&MetricSample> {
        self.history.current().or(self.live.as_ref())
    }

    pub fn gauges(&self) -> Option<Gauges> {
        self.current().map(Gauges::from)
    }

    pub fn step_backward(&mut self) -> bool {
        self.history.step_backward()
    }

    pub fn step_forward(&mut self) -> bool {
        self.history.step_forward()
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MetricSample;

    fn sample(cpu: f64) -> MetricSample {
        MetricSample::new(cpu, 16.0, 40.0, 512.0, 20.0, 10.0, 10.0)
    }

    #[test]
    fn cursor_follows_tail_without_manual_navigation() {
        let mut buffer = HistoryBuffer::new();
        for i in 0..7 {
            buffer.push(sample(i as f64));
        }
        assert_eq!(buffer.cursor(), 6);
        assert!(buffer.at_tail());
        assert_eq!(buffer.current().unwrap().cpu_usage, 6.0);
    }

    #[test]
    fn manual_navigation_pins_the_cursor() {
        let mut buffer = HistoryBuffer::new();
        for i in 0..3 {
            buffer.push(sample(i as f64));
        }
        assert!(buffer.step_backward());
        assert_eq!(buffer.cursor(), 1);

        // New arrivals append without moving a manually placed cursor.
        buffer.push(sample(3.0));
        buffer.push(sample(4.0));
        assert_eq!(buffer.cursor(), 1);
        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.current().unwrap().cpu_usage, 1.0);

        // Stepping forward to the tail resumes auto-follow.
        assert!(buffer.step_forward());
        assert!(buffer.step_forward());
        assert!(buffer.step_forward());
        assert!(buffer.at_tail());
        buffer.push(sample(5.0));
        assert_eq!(buffer.cursor(), 5);
    }

    #[test]
    fn steps_are_noops_at_the_boundaries() {
        let mut buffer = HistoryBuffer::new();
        assert!(!buffer.step_backward());
        assert!(!buffer.step_forward());

        for i in 0..3 {
            buffer.push(sample(i as f64));
        }
        assert!(!buffer.step_forward(), "already at newest");
        buffer.step_backward();
        buffer.step_backward();
        assert_eq!(buffer.cursor(), 0);
        assert!(!buffer.step_backward(), "already at oldest");
        assert_eq!(buffer.cursor(), 0);
    }

    #[test]
    fn empty_buffer_has_no_current_sample() {
        let buffer = HistoryBuffer::new();
        assert!(buffer.current().is_none());
        assert!(buffer.is_empty());
    }

    #[test]
    fn series_labels_derive_from_tick_index() {
        let mut buffer = HistoryBuffer::new();
        for i in 0..4 {
            buffer.push(sample(i as f64));
        }
        let series = buffer.time_series(Duration::from_secs(2));
        let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["T+0s", "T+2s", "T+4s", "T+6s"]);
        assert_eq!(series[3].cpu_usage, 3.0);
    }

    #[test]
    fn viewer_state_falls_back_to_live_sample() {
        let mut state = ViewerState::new();
        assert!(state.current().is_none());
        state.on_receive(sample(42.0));
        assert_eq!(state.current().unwrap().cpu_usage, 42.0);
        assert_eq!(state.gauges().unwrap().cpu_usage, 42.0);
    }

    #[test]
    fn viewer_state_scrubs_through_history() {
        let mut state = ViewerState::new();
        for i in 0..5 {
            state.on_receive(sample(i as f64));
        }
        assert_eq!(state.current().unwrap().cpu_usage, 4.0);
        state.step_backward();
        state.step_backward();
        assert_eq!(state.current().unwrap().cpu_usage, 2.0);
        state.step_forward();
        assert_eq!(state.current().unwrap().cpu_usage, 3.0);
    }
}
