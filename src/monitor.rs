//! The sampling loop.
//!
//! One cycle reads a snapshot from the counter source, differences it
//! against the sample store, ranks the result and hands it to the renderer.
//! Cycles never overlap: the loop sleeps a fixed interval between them and
//! a slow snapshot simply delays the next one.

use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::engine::compute_cycle;
use crate::rank::rank;
use crate::render::{Frame, Renderer};
use crate::source::{take_snapshot, CounterSource};
use crate::store::SampleStore;

/// Default refresh interval in seconds.
pub const DEFAULT_REFRESH_SECONDS: u64 = 2;
/// Smallest accepted refresh interval in seconds.
pub const MIN_REFRESH_SECONDS: u64 = 1;
/// Default number of processes shown.
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub refresh: Duration,
    pub top_n: usize,
    /// Read per-process records on the rayon pool.
    pub parallel: bool,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            refresh: Duration::from_secs(DEFAULT_REFRESH_SECONDS),
            top_n: DEFAULT_TOP_N,
            parallel: true,
        }
    }
}

/// What happened in one cycle.
#[derive(Debug, Clone, Default)]
pub struct CycleSummary {
    pub enumerated: usize,
    pub sampled: usize,
    pub shown: usize,
    pub global_cpu_percent: f64,
    pub rendered: bool,
    pub duration: Duration,
}

pub struct Monitor<S, R> {
    source: S,
    renderer: R,
    store: SampleStore,
    settings: MonitorSettings,
}

impl<S, R> Monitor<S, R>
where
    S: CounterSource + Sync,
    R: Renderer,
{
    pub fn new(source: S, renderer: R, settings: MonitorSettings) -> Self {
        Self {
            source,
            renderer,
            store: SampleStore::new(),
            settings,
        }
    }

    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Records a baseline without rendering, so the first displayed frame
    /// already carries rates instead of the all-zero warm-up cycle.
    pub fn prime(&mut self) -> usize {
        let snapshot = take_snapshot(&self.source, self.settings.parallel);
        let sampled = snapshot.entities.len();
        compute_cycle(&snapshot.global, snapshot.entities, &mut self.store);
        debug!("Baseline recorded for {} processes", sampled);
        sampled
    }

    /// Runs one full cycle: snapshot, differencing, ranking, rendering.
    ///
    /// A render failure is logged and reported in the summary; it does not
    /// affect the sample store.
    #[instrument(level = "debug", skip(self))]
    pub fn run_cycle(&mut self) -> CycleSummary {
        let start = Instant::now();

        let snapshot = take_snapshot(&self.source, self.settings.parallel);
        let global = snapshot.global;
        let enumerated = snapshot.enumerated;
        let sampled = snapshot.entities.len();

        let report = compute_cycle(&global, snapshot.entities, &mut self.store);
        let global_cpu_percent = report.global_cpu_percent;
        let ranked = rank(report.entries, self.settings.top_n);

        let frame = Frame::new(
            &global,
            global_cpu_percent,
            sampled,
            &ranked,
            self.settings.refresh.as_secs_f64(),
        );
        let rendered = match self.renderer.display(&frame) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to render frame: {}", e);
                false
            }
        };

        let summary = CycleSummary {
            enumerated,
            sampled,
            shown: ranked.len(),
            global_cpu_percent,
            rendered,
            duration: start.elapsed(),
        };
        debug!(
            "Cycle done: {} enumerated, {} sampled, {} shown, cpu {:.2}% in {:.2}ms",
            summary.enumerated,
            summary.sampled,
            summary.shown,
            summary.global_cpu_percent,
            summary.duration.as_secs_f64() * 1000.0
        );
        summary
    }

    /// Primes the store, then runs a cycle after every refresh interval
    /// until `shutdown` resolves or `max_cycles` cycles have been shown.
    ///
    /// Returns the number of cycles shown.
    pub async fn run<F>(&mut self, shutdown: F, max_cycles: Option<u64>) -> u64
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        self.prime();
        info!(
            "Monitor started (refresh every {:?}, top {})",
            self.settings.refresh, self.settings.top_n
        );

        let mut cycles = 0u64;
        loop {
            if max_cycles.is_some_and(|max| cycles >= max) {
                debug!("Reached {} cycles, stopping", cycles);
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.settings.refresh) => {}
                _ = &mut shutdown => {
                    info!("Stop requested, leaving monitor loop");
                    break;
                }
            }

            self.run_cycle();
            cycles += 1;
        }

        if let Err(e) = self.renderer.finish() {
            warn!("Failed to finish output: {}", e);
        }
        cycles
    }
}
