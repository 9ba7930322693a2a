//! Ordering of derived process metrics for display.

use std::cmp::Ordering;

use crate::model::EntityMetrics;

/// Display order: CPU share descending, then resident memory descending,
/// then PID ascending so equal rows keep a stable position between frames.
pub fn compare(a: &EntityMetrics, b: &EntityMetrics) -> Ordering {
    b.metric
        .cpu_percent
        .total_cmp(&a.metric.cpu_percent)
        .then_with(|| {
            b.sample
                .resident_memory_kb
                .cmp(&a.sample.resident_memory_kb)
        })
        .then_with(|| a.sample.pid.cmp(&b.sample.pid))
}

/// Sorts `entries` by [`compare`] and keeps at most `limit` of them.
pub fn rank(mut entries: Vec<EntityMetrics>, limit: usize) -> Vec<EntityMetrics> {
    entries.sort_by(compare);
    entries.truncate(limit);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DerivedMetric, EntitySample};

    fn entry(pid: u32, cpu: f64, rss_kb: u64) -> EntityMetrics {
        EntityMetrics {
            sample: EntitySample {
                pid,
                owner: "user".into(),
                name: format!("p{pid}"),
                cpu_time_ticks: 0,
                resident_memory_kb: rss_kb,
            },
            metric: DerivedMetric {
                cpu_percent: cpu,
                mem_percent: 0.0,
            },
        }
    }

    fn pids(entries: &[EntityMetrics]) -> Vec<u32> {
        entries.iter().map(|e| e.sample.pid).collect()
    }

    #[test]
    fn test_rank_by_cpu_descending() {
        let ranked = rank(vec![entry(1, 5.0, 0), entry(2, 50.0, 0), entry(3, 20.0, 0)], 10);
        assert_eq!(pids(&ranked), vec![2, 3, 1]);
    }

    #[test]
    fn test_rank_ties_broken_by_memory() {
        let ranked = rank(
            vec![entry(1, 10.0, 100), entry(2, 10.0, 300), entry(3, 10.0, 200)],
            10,
        );
        assert_eq!(pids(&ranked), vec![2, 3, 1]);
    }

    #[test]
    fn test_rank_full_ties_ordered_by_pid() {
        let ranked = rank(vec![entry(9, 0.0, 0), entry(4, 0.0, 0), entry(6, 0.0, 0)], 10);
        assert_eq!(pids(&ranked), vec![4, 6, 9]);
    }

    #[test]
    fn test_rank_truncates_to_limit() {
        let entries: Vec<_> = (0..20).map(|i| entry(i, i as f64, 0)).collect();
        let ranked = rank(entries, 10);
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].sample.pid, 19);

        let ranked = rank(vec![entry(1, 1.0, 0)], 10);
        assert_eq!(ranked.len(), 1);

        assert!(rank(vec![entry(1, 1.0, 0)], 0).is_empty());
    }
}
