//! Host metrics sampling.
//!
//! One shared sampling routine serves both the per-session push loop and the
//! on-demand `/api/system/stats` query path. Consumers depend on the
//! [`MetricSource`] trait so tests can substitute deterministic sources.

use async_trait::async_trait;
use sysinfo::{CpuRefreshKind, Disks, MemoryRefreshKind, RefreshKind, System};
use tokio::sync::Mutex;

use crate::errors::SamplingError;
use crate::models::MetricSample;

const BYTES_PER_GB: f64 = (1024 * 1024 * 1024) as f64;

/// Anything that can produce a current [`MetricSample`].
#[async_trait]
pub trait MetricSource: Send + Sync {
    /// Take one sample of the host. Failures are retryable on the next tick
    /// and never fatal to the process.
    async fn sample(&self) -> Result<MetricSample, SamplingError>;
}

/// Sampler backed by `sysinfo`.
///
/// CPU load, memory totals/usage, and primary-volume storage come from the
/// host. GPU and HBM usage are uniformly random placeholders in [0, 100]
/// because no real sensor is assumed available; this is an explicit stand-in,
/// not a measurement.
pub struct Sampler {
    // Refreshing sysinfo needs &mut; sampling only suspends the issuing task.
    probe: Mutex<HostProbe>,
}

struct HostProbe {
    system: System,
    disks: Disks,
}

impl Sampler {
    pub fn new() -> Self {
        let system = System::new_with_specifics(
            RefreshKind::new()
                .with_cpu(CpuRefreshKind::new().with_cpu_usage())
                .with_memory(MemoryRefreshKind::everything()),
        );
        let disks = Disks::new_with_refreshed_list();
        Self {
            probe: Mutex::new(HostProbe { system, disks }),
        }
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricSource for Sampler {
    async fn sample(&self) -> Result<MetricSample, SamplingError> {
        let mut probe = self.probe.lock().await;
        probe.system.refresh_cpu_usage();
        probe.system.refresh_memory();
        probe.disks.refresh();

        let cpu_usage = probe.system.global_cpu_info().cpu_usage() as f64;

        let total_memory = probe.system.total_memory();
        if total_memory == 0 {
            return Err(SamplingError::host_query("total memory reported as zero"));
        }
        let used_memory_pct =
            probe.system.used_memory() as f64 / total_memory as f64 * 100.0;

        // The first enumerated volume is treated as the primary one.
        let disk = probe
            .disks
            .list()
            .first()
            .ok_or(SamplingError::PrimaryVolumeUnavailable)?;
        let total_space = disk.total_space();
        if total_space == 0 {
            return Err(SamplingError::host_query(
                "primary volume reports zero size",
            ));
        }
        let used_space = total_space.saturating_sub(disk.available_space());
        let used_storage_pct = used_space as f64 / total_space as f64 * 100.0;

        let gpu_usage = f64::from(fastrand::u8(..=100));
        let hbm_usage = f64::from(fastrand::u8(..=100));

        Ok(MetricSample::new(
            round2(cpu_usage),
            round2(total_memory as f64 / BYTES_PER_GB),
            round2(used_memory_pct),
            round2(total_space as f64 / BYTES_PER_GB),
            round2(used_storage_pct),
            gpu_usage,
            hbm_usage,
        ))
    }
}

/// Round to two decimal places, matching the precision the dashboard shows.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
