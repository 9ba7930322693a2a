//! Herakles Top Library
//!
//! Sampling-and-derivation engine for a live process monitor. Raw tick and
//! memory counters are read from procfs, differenced against the previous
//! cycle and turned into CPU and memory percentages, then ranked for display.
//!
//! # Features
//!
//! - **Delta Engine**: Global and per-process CPU share from tick deltas
//! - **PID Reuse Safety**: Counters that go backwards count as no history
//! - **Pluggable Sources**: The `CounterSource` trait decouples the engine from /proc
//! - **Pluggable Output**: Terminal, plain text and JSON renderers
//!
//! # Usage
//!
//! ```rust
//! use herakles_top::{compute_cycle, rank, EntitySample, GlobalSample, SampleStore};
//!
//! let mut store = SampleStore::new();
//! let process = |ticks| EntitySample {
//!     pid: 7,
//!     owner: "root".into(),
//!     name: "worker".into(),
//!     cpu_time_ticks: ticks,
//!     resident_memory_kb: 2048,
//! };
//! let global = |total, idle| GlobalSample {
//!     total_ticks: total,
//!     idle_ticks: idle,
//!     mem_total_kb: 8192,
//!     ..Default::default()
//! };
//!
//! // The first cycle only records a baseline
//! compute_cycle(&global(1000, 800), vec![process(200)], &mut store);
//!
//! let report = compute_cycle(&global(1100, 850), vec![process(250)], &mut store);
//! assert_eq!(report.global_cpu_percent, 50.0);
//!
//! let top = rank(report.entries, 10);
//! assert_eq!(top[0].metric.cpu_percent, 50.0);
//! assert_eq!(top[0].metric.mem_percent, 25.0);
//! ```

pub mod engine;
pub mod error;
pub mod model;
pub mod monitor;
pub mod process;
pub mod rank;
pub mod render;
pub mod source;
pub mod store;
pub mod system;

// Re-export main types for convenience
pub use engine::compute_cycle;
pub use error::SourceError;
pub use model::{CycleReport, DerivedMetric, EntityId, EntityMetrics, EntitySample, GlobalSample};
pub use monitor::{CycleSummary, Monitor, MonitorSettings};
pub use rank::rank;
pub use render::{Frame, JsonRenderer, PlainRenderer, Renderer, TerminalRenderer};
pub use source::{take_snapshot, CounterSource, ProcfsSource, Snapshot};
pub use store::{SampleStore, StoreState};
