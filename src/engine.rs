//! Delta computation between successive counter snapshots.
//!
//! Global CPU usage is derived from the idle share of the elapsed ticks;
//! per-process usage is the process's tick delta over the same global delta.
//! Counters that went backwards (counter reset, PID reuse) count as no
//! history rather than negative usage, and every division is guarded.

use ahash::AHashMap as HashMap;
use tracing::trace;

use crate::model::{CycleReport, DerivedMetric, EntityMetrics, EntitySample, GlobalSample};
use crate::store::SampleStore;

/// Difference between two monotonic counter readings.
///
/// Returns 0 when there is no previous reading or the counter decreased.
pub fn tick_delta(prev: Option<u64>, current: u64) -> u64 {
    match prev {
        Some(prev) => current.saturating_sub(prev),
        None => 0,
    }
}

/// `100 * part / whole`, or 0 when `whole` is 0.
pub fn percent_of(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64) * 100.0
}

/// Global tick deltas `(total, idle)` against the stored baseline.
///
/// A zero baseline (first cycle, or the source was unavailable last cycle)
/// and a total counter that went backwards both yield `(0, 0)`.
pub fn global_deltas(global: &GlobalSample, store: &SampleStore) -> (u64, u64) {
    let prev_total = store.prev_total_ticks();
    if prev_total == 0 || global.total_ticks < prev_total {
        return (0, 0);
    }

    let total_delta = global.total_ticks - prev_total;
    let idle_delta = tick_delta(Some(store.prev_idle_ticks()), global.idle_ticks);
    (total_delta, idle_delta)
}

/// Busy share of the elapsed global ticks.
pub fn global_cpu_percent(total_delta: u64, idle_delta: u64) -> f64 {
    percent_of(total_delta.saturating_sub(idle_delta), total_delta)
}

/// Derives metrics for one process.
pub fn derive_metric(
    sample: &EntitySample,
    prev_ticks: Option<u64>,
    total_delta: u64,
    mem_total_kb: u64,
) -> DerivedMetric {
    let entity_delta = tick_delta(prev_ticks, sample.cpu_time_ticks);

    DerivedMetric {
        cpu_percent: percent_of(entity_delta, total_delta),
        mem_percent: percent_of(sample.resident_memory_kb, mem_total_kb),
    }
}

/// Runs one differencing cycle and rebuilds `store` from this snapshot.
///
/// The previous store contents are only used as lookup input; afterwards
/// the store holds exactly the processes in `entities` plus this cycle's
/// global totals.
pub fn compute_cycle(
    global: &GlobalSample,
    entities: Vec<EntitySample>,
    store: &mut SampleStore,
) -> CycleReport {
    let (total_delta, idle_delta) = global_deltas(global, store);
    let cpu_percent = global_cpu_percent(total_delta, idle_delta);

    let mut next_ticks = HashMap::with_capacity(entities.len());
    let mut entries = Vec::with_capacity(entities.len());

    for sample in entities {
        let prev = store.prev_cpu_ticks(sample.pid);
        if let Some(prev) = prev {
            if sample.cpu_time_ticks < prev {
                trace!(
                    "pid {} tick counter went backwards ({} -> {}), treating as new process",
                    sample.pid,
                    prev,
                    sample.cpu_time_ticks
                );
            }
        }

        let metric = derive_metric(&sample, prev, total_delta, global.mem_total_kb);
        next_ticks.insert(sample.pid, sample.cpu_time_ticks);
        entries.push(EntityMetrics { sample, metric });
    }

    store.replace(next_ticks, global.total_ticks, global.idle_ticks);

    CycleReport {
        global_cpu_percent: cpu_percent,
        total_delta_ticks: total_delta,
        entries,
    }
}
