//! The monitor loop driven by an in-memory counter source.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use herakles_top::{
    CounterSource, EntityId, EntitySample, Frame, GlobalSample, JsonRenderer, Monitor,
    MonitorSettings, Renderer,
};

/// Every cycle 1000 ticks elapse, half of them idle. PID 1 uses 100 ticks
/// per cycle and PID 2 uses 250; PID 3 is enumerated but always gone by
/// the time it is read.
#[derive(Default)]
struct SteadySource {
    step: AtomicU64,
}

impl CounterSource for SteadySource {
    fn read_global(&self) -> GlobalSample {
        let step = self.step.fetch_add(1, Ordering::SeqCst) + 1;
        GlobalSample {
            total_ticks: 1000 * step,
            idle_ticks: 500 * step,
            mem_total_kb: 1000,
            mem_free_kb: 400,
            mem_available_kb: 600,
            uptime_seconds: step as f64,
        }
    }

    fn enumerate_entities(&self) -> Vec<EntityId> {
        vec![1, 2, 3]
    }

    fn read_entity(&self, pid: EntityId) -> Option<EntitySample> {
        let step = self.step.load(Ordering::SeqCst);
        let per_cycle = match pid {
            1 => 100,
            2 => 250,
            _ => return None,
        };
        Some(EntitySample {
            pid,
            owner: "tester".to_string(),
            name: format!("task-{}", pid),
            cpu_time_ticks: per_cycle * step,
            resident_memory_kb: 100 * pid as u64,
        })
    }

    fn resolve_owner(&self, uid: u32) -> String {
        uid.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct RecordedFrame {
    global_cpu_percent: f64,
    total_processes: usize,
    pids: Vec<u32>,
    cpu: Vec<f64>,
}

#[derive(Default)]
struct RecordingRenderer {
    frames: Vec<RecordedFrame>,
    finished: bool,
    fail: bool,
}

impl Renderer for RecordingRenderer {
    fn display(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        }
        self.frames.push(RecordedFrame {
            global_cpu_percent: frame.global_cpu_percent,
            total_processes: frame.total_processes,
            pids: frame.processes.iter().map(|e| e.sample.pid).collect(),
            cpu: frame.processes.iter().map(|e| e.metric.cpu_percent).collect(),
        });
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.finished = true;
        Ok(())
    }
}

fn settings(top_n: usize) -> MonitorSettings {
    MonitorSettings {
        refresh: Duration::from_millis(10),
        top_n,
        parallel: false,
    }
}

#[test]
fn test_unprimed_cycle_shows_zero_rates() {
    let mut monitor = Monitor::new(
        SteadySource::default(),
        RecordingRenderer::default(),
        settings(10),
    );

    let summary = monitor.run_cycle();
    assert_eq!(summary.enumerated, 3);
    assert_eq!(summary.sampled, 2);
    assert_eq!(summary.shown, 2);
    assert!(summary.rendered);
    assert_eq!(summary.global_cpu_percent, 0.0);

    let frame = &monitor.renderer().frames[0];
    assert_eq!(frame.cpu, vec![0.0, 0.0]);
    // Equal CPU, so the larger RSS comes first
    assert_eq!(frame.pids, vec![2, 1]);
}

#[test]
fn test_primed_cycle_shows_rates() {
    let mut monitor = Monitor::new(
        SteadySource::default(),
        RecordingRenderer::default(),
        settings(10),
    );

    assert_eq!(monitor.prime(), 2);
    assert!(monitor.renderer().frames.is_empty());

    let summary = monitor.run_cycle();
    assert_eq!(summary.global_cpu_percent, 50.0);

    let frame = &monitor.renderer().frames[0];
    assert_eq!(frame.global_cpu_percent, 50.0);
    assert_eq!(frame.pids, vec![2, 1]);
    assert_eq!(frame.cpu, vec![25.0, 10.0]);
}

#[test]
fn test_top_n_limits_rows_not_total() {
    let mut monitor = Monitor::new(
        SteadySource::default(),
        RecordingRenderer::default(),
        settings(1),
    );
    monitor.prime();

    let summary = monitor.run_cycle();
    assert_eq!(summary.shown, 1);

    let frame = &monitor.renderer().frames[0];
    assert_eq!(frame.pids, vec![2]);
    assert_eq!(frame.total_processes, 2);
}

#[test]
fn test_render_failure_keeps_sampling() {
    let renderer = RecordingRenderer {
        fail: true,
        ..Default::default()
    };
    let mut monitor = Monitor::new(SteadySource::default(), renderer, settings(10));
    monitor.prime();

    let summary = monitor.run_cycle();
    assert!(!summary.rendered);
    assert_eq!(monitor.store().len(), 2);
    assert_eq!(monitor.store().cycles(), 2);
}

#[tokio::test]
async fn test_run_stops_after_max_cycles() {
    let mut monitor = Monitor::new(
        SteadySource::default(),
        RecordingRenderer::default(),
        settings(10),
    );

    let shown = monitor
        .run(std::future::pending::<()>(), Some(3))
        .await;

    assert_eq!(shown, 3);
    assert_eq!(monitor.store().cycles(), 4);

    let renderer = monitor.into_renderer();
    assert!(renderer.finished);
    assert_eq!(renderer.frames.len(), 3);
    assert!(renderer
        .frames
        .iter()
        .all(|f| f.global_cpu_percent == 50.0 && f.cpu == vec![25.0, 10.0]));
}

#[tokio::test]
async fn test_run_stops_on_shutdown() {
    let mut monitor = Monitor::new(
        SteadySource::default(),
        RecordingRenderer::default(),
        settings(10),
    );

    let shown = monitor.run(std::future::ready(()), None).await;

    assert_eq!(shown, 0);
    assert!(monitor.renderer().frames.is_empty());
    assert!(monitor.renderer().finished);
}

#[tokio::test]
async fn test_run_with_json_output() {
    let mut monitor = Monitor::new(
        SteadySource::default(),
        JsonRenderer::new(Vec::new()),
        settings(10),
    );

    assert_eq!(monitor.run(std::future::pending::<()>(), Some(2)).await, 2);

    let out = String::from_utf8(monitor.into_renderer().into_inner()).expect("utf-8 output");
    let frames: Vec<serde_json::Value> = out
        .lines()
        .map(|l| serde_json::from_str(l).expect("valid json line"))
        .collect();

    assert_eq!(frames.len(), 2);
    assert_eq!(frames[1]["global_cpu_percent"], 50.0);
    assert_eq!(frames[1]["processes"][0]["pid"], 2);
    assert_eq!(frames[1]["processes"][0]["cpu_percent"], 25.0);
    assert_eq!(frames[1]["processes"][1]["name"], "task-1");
}
