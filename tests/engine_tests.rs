//! Multi-cycle behavior of the delta engine and ranker.

use herakles_top::{
    compute_cycle, rank, EntitySample, GlobalSample, SampleStore, StoreState,
};

fn process(pid: u32, ticks: u64, rss_kb: u64) -> EntitySample {
    EntitySample {
        pid,
        owner: "tester".to_string(),
        name: format!("proc-{}", pid),
        cpu_time_ticks: ticks,
        resident_memory_kb: rss_kb,
    }
}

fn global(total: u64, idle: u64) -> GlobalSample {
    GlobalSample {
        total_ticks: total,
        idle_ticks: idle,
        mem_total_kb: 1000,
        mem_free_kb: 500,
        mem_available_kb: 700,
        uptime_seconds: 42.0,
    }
}

#[test]
fn test_first_cycle_is_all_zero() {
    let mut store = SampleStore::new();
    assert_eq!(store.state(), StoreState::Empty);

    let report = compute_cycle(
        &global(1000, 800),
        vec![process(1, 500, 100), process(2, 10, 50)],
        &mut store,
    );

    assert_eq!(report.global_cpu_percent, 0.0);
    assert_eq!(report.total_delta_ticks, 0);
    assert!(report.entries.iter().all(|e| e.metric.cpu_percent == 0.0));
    // Memory share needs no history
    assert_eq!(report.entries[0].metric.mem_percent, 10.0);
    assert_eq!(store.state(), StoreState::Warm);
}

#[test]
fn test_three_cycles_track_latest_baseline() {
    let mut store = SampleStore::new();
    compute_cycle(&global(1000, 800), vec![process(1, 100, 0)], &mut store);

    let second = compute_cycle(&global(1200, 900), vec![process(1, 150, 0)], &mut store);
    assert_eq!(second.global_cpu_percent, 50.0);
    assert_eq!(second.entries[0].metric.cpu_percent, 25.0);

    // Deltas are taken against cycle two, not cycle one
    let third = compute_cycle(&global(1300, 990), vec![process(1, 160, 0)], &mut store);
    assert_eq!(third.global_cpu_percent, 10.0);
    assert_eq!(third.entries[0].metric.cpu_percent, 10.0);
}

#[test]
fn test_store_holds_exactly_latest_snapshot() {
    let mut store = SampleStore::new();
    compute_cycle(
        &global(1000, 800),
        vec![process(1, 10, 0), process(2, 20, 0), process(3, 30, 0)],
        &mut store,
    );
    compute_cycle(
        &global(1100, 850),
        vec![process(2, 25, 0), process(4, 40, 0)],
        &mut store,
    );

    assert_eq!(store.len(), 2);
    assert_eq!(store.prev_cpu_ticks(1), None);
    assert_eq!(store.prev_cpu_ticks(2), Some(25));
    assert_eq!(store.prev_cpu_ticks(3), None);
    assert_eq!(store.prev_cpu_ticks(4), Some(40));
    assert_eq!(store.prev_total_ticks(), 1100);
    assert_eq!(store.prev_idle_ticks(), 850);
}

#[test]
fn test_returning_pid_gets_no_stale_baseline() {
    let mut store = SampleStore::new();
    compute_cycle(
        &global(1000, 800),
        vec![process(1, 100, 0), process(2, 10, 0)],
        &mut store,
    );

    // PID 1 missing for one cycle
    compute_cycle(&global(1100, 850), vec![process(2, 20, 0)], &mut store);

    // Back with a higher counter; the first-cycle 100 ticks must not be used
    let report = compute_cycle(
        &global(1200, 900),
        vec![process(1, 180, 0), process(2, 30, 0)],
        &mut store,
    );
    let returned = report
        .entries
        .iter()
        .find(|e| e.sample.pid == 1)
        .expect("pid 1 reported");
    assert_eq!(returned.metric.cpu_percent, 0.0);
    assert_eq!(store.prev_cpu_ticks(1), Some(180));

    let next = compute_cycle(
        &global(1300, 950),
        vec![process(1, 230, 0), process(2, 40, 0)],
        &mut store,
    );
    assert_eq!(next.entries[0].metric.cpu_percent, 50.0);
}

#[test]
fn test_pid_reuse_counts_as_new_process() {
    let mut store = SampleStore::new();
    compute_cycle(&global(1000, 800), vec![process(9, 5000, 0)], &mut store);

    // Same PID, fresh process with a much smaller counter
    let report = compute_cycle(&global(1100, 850), vec![process(9, 30, 0)], &mut store);
    assert_eq!(report.entries[0].metric.cpu_percent, 0.0);
    assert_eq!(store.prev_cpu_ticks(9), Some(30));

    let next = compute_cycle(&global(1200, 900), vec![process(9, 80, 0)], &mut store);
    assert_eq!(next.entries[0].metric.cpu_percent, 50.0);
}

#[test]
fn test_unreadable_global_resets_baseline() {
    let mut store = SampleStore::new();
    compute_cycle(&global(1000, 800), vec![process(1, 100, 0)], &mut store);

    let outage = compute_cycle(&GlobalSample::default(), vec![process(1, 150, 0)], &mut store);
    assert_eq!(outage.global_cpu_percent, 0.0);
    assert_eq!(outage.entries[0].metric.cpu_percent, 0.0);
    assert_eq!(outage.entries[0].metric.mem_percent, 0.0);
    assert_eq!(store.prev_total_ticks(), 0);

    // First cycle after the outage warms up again
    let recovered = compute_cycle(&global(1200, 900), vec![process(1, 200, 0)], &mut store);
    assert_eq!(recovered.global_cpu_percent, 0.0);
    assert_eq!(recovered.entries[0].metric.cpu_percent, 0.0);

    let warm = compute_cycle(&global(1300, 950), vec![process(1, 250, 0)], &mut store);
    assert_eq!(warm.global_cpu_percent, 50.0);
    assert_eq!(warm.entries[0].metric.cpu_percent, 50.0);
}

#[test]
fn test_global_counter_going_backwards() {
    let mut store = SampleStore::new();
    compute_cycle(&global(5000, 4000), vec![process(1, 100, 0)], &mut store);

    let report = compute_cycle(&global(1000, 800), vec![process(1, 150, 0)], &mut store);
    assert_eq!(report.global_cpu_percent, 0.0);
    assert_eq!(report.total_delta_ticks, 0);
    assert_eq!(report.entries[0].metric.cpu_percent, 0.0);
}

#[test]
fn test_no_elapsed_ticks() {
    let mut store = SampleStore::new();
    compute_cycle(&global(1000, 800), vec![process(1, 100, 0)], &mut store);

    let report = compute_cycle(&global(1000, 800), vec![process(1, 100, 0)], &mut store);
    assert_eq!(report.global_cpu_percent, 0.0);
    assert_eq!(report.entries[0].metric.cpu_percent, 0.0);
}

#[test]
fn test_rank_after_cycle() {
    let mut store = SampleStore::new();
    compute_cycle(
        &global(1000, 800),
        vec![
            process(1, 100, 10),
            process(2, 100, 300),
            process(3, 100, 200),
            process(4, 100, 10),
        ],
        &mut store,
    );
    let report = compute_cycle(
        &global(1100, 800),
        vec![
            process(1, 100, 10),
            process(2, 110, 300),
            process(3, 110, 200),
            process(4, 140, 10),
        ],
        &mut store,
    );

    let top = rank(report.entries, 3);
    let pids: Vec<u32> = top.iter().map(|e| e.sample.pid).collect();
    // 4 leads on CPU; 2 and 3 tie on CPU and are split by memory
    assert_eq!(pids, vec![4, 2, 3]);
}
