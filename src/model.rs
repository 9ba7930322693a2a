//! Sample and metric types shared by the source, engine, ranker and renderers.

use serde::Serialize;

/// Process identifier as exposed by the kernel.
pub type EntityId = u32;

/// One process's raw counters at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySample {
    pub pid: EntityId,
    /// User name for the real UID, numeric UID when unresolved.
    pub owner: String,
    /// Command name, never truncated here.
    pub name: String,
    /// utime + stime in scheduler ticks.
    pub cpu_time_ticks: u64,
    pub resident_memory_kb: u64,
}

/// System-wide counters at a point in time.
///
/// The all-zero value (see [`GlobalSample::is_empty`]) means the counters
/// could not be read this cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GlobalSample {
    pub total_ticks: u64,
    /// idle + iowait
    pub idle_ticks: u64,
    pub mem_total_kb: u64,
    pub mem_free_kb: u64,
    pub mem_available_kb: u64,
    pub uptime_seconds: f64,
}

impl GlobalSample {
    pub fn is_empty(&self) -> bool {
        *self == GlobalSample::default()
    }
}

/// Output of one differencing cycle for one process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DerivedMetric {
    /// Share of all CPU time elapsed since the previous cycle. Not clamped.
    pub cpu_percent: f64,
    pub mem_percent: f64,
}

/// A process sample paired with the metrics derived for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityMetrics {
    #[serde(flatten)]
    pub sample: EntitySample,
    #[serde(flatten)]
    pub metric: DerivedMetric,
}

/// Result of [`crate::engine::compute_cycle`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    pub global_cpu_percent: f64,
    /// Global tick delta the per-process percentages were divided by.
    pub total_delta_ticks: u64,
    pub entries: Vec<EntityMetrics>,
}
