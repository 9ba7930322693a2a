//! Counter sources feeding the delta engine.
//!
//! [`CounterSource`] is the seam between the engine and the operating
//! system. [`ProcfsSource`] implements it over a procfs tree; tests and
//! alternative backends provide their own implementations.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

use crate::model::{EntityId, EntitySample, GlobalSample};
use crate::process::{
    collect_proc_entries, read_proc_stat, read_uid, should_include_process, OwnerResolver,
    ProcessFilter,
};
use crate::system::{read_cpu_stat, read_meminfo, read_uptime, CpuStat, MemoryInfo};

/// Default procfs mount point.
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Owner shown when a process's UID could not be read.
pub const UNKNOWN_OWNER: &str = "?";

/// Read-only access to global and per-process counters.
///
/// Implementations never fail a whole cycle: unreadable global counters
/// come back as zeros and vanished or malformed processes as `None`.
pub trait CounterSource {
    /// System-wide counters; zero-valued where unreadable.
    fn read_global(&self) -> GlobalSample;

    /// PIDs alive right now. Called again every cycle.
    fn enumerate_entities(&self) -> Vec<EntityId>;

    /// Counters for one process, `None` if it exited or its record is unusable.
    fn read_entity(&self, pid: EntityId) -> Option<EntitySample>;

    /// User name for `uid`, falling back to the number as text.
    fn resolve_owner(&self, uid: u32) -> String;
}

/// One cycle's worth of raw counters.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub global: GlobalSample,
    pub entities: Vec<EntitySample>,
    /// PIDs enumerated, including ones that vanished before being read.
    pub enumerated: usize,
}

/// Reads global counters, then every enumerated process.
///
/// With `parallel` set the per-process reads run on the rayon pool; the
/// result keeps enumeration order either way.
pub fn take_snapshot<S>(source: &S, parallel: bool) -> Snapshot
where
    S: CounterSource + Sync + ?Sized,
{
    let global = source.read_global();
    let pids = source.enumerate_entities();

    let entities: Vec<EntitySample> = if parallel {
        pids.par_iter()
            .filter_map(|&pid| source.read_entity(pid))
            .collect()
    } else {
        pids.iter()
            .filter_map(|&pid| source.read_entity(pid))
            .collect()
    };

    Snapshot {
        global,
        entities,
        enumerated: pids.len(),
    }
}

/// [`CounterSource`] backed by a procfs tree.
pub struct ProcfsSource {
    root: PathBuf,
    filter: ProcessFilter,
    max_processes: Option<usize>,
    owners: OwnerResolver,
}

impl ProcfsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            filter: ProcessFilter::default(),
            max_processes: None,
            owners: OwnerResolver::new(),
        }
    }

    pub fn with_filter(mut self, filter: ProcessFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_max_processes(mut self, max: Option<usize>) -> Self {
        self.max_processes = max;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for ProcfsSource {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT)
    }
}

impl CounterSource for ProcfsSource {
    fn read_global(&self) -> GlobalSample {
        let cpu = read_cpu_stat(&self.root).unwrap_or_else(|e| {
            warn!("CPU counters unavailable this cycle: {}", e);
            CpuStat::default()
        });
        let mem = read_meminfo(&self.root).unwrap_or_else(|e| {
            warn!("Memory totals unavailable this cycle: {}", e);
            MemoryInfo::default()
        });
        let uptime_seconds = read_uptime(&self.root).unwrap_or_else(|e| {
            warn!("Uptime unavailable this cycle: {}", e);
            0.0
        });

        GlobalSample {
            total_ticks: cpu.total(),
            idle_ticks: cpu.idle_total(),
            mem_total_kb: mem.total_kb,
            mem_free_kb: mem.free_kb,
            mem_available_kb: mem.available_kb,
            uptime_seconds,
        }
    }

    fn enumerate_entities(&self) -> Vec<EntityId> {
        collect_proc_entries(&self.root, self.max_processes)
            .into_iter()
            .map(|e| e.pid)
            .collect()
    }

    fn read_entity(&self, pid: EntityId) -> Option<EntitySample> {
        let proc_path = self.root.join(pid.to_string());

        let stat = match read_proc_stat(&proc_path) {
            Ok(stat) => stat,
            Err(e) if e.is_not_found() => {
                trace!("pid {} exited before it could be read", pid);
                return None;
            }
            Err(e) => {
                debug!("Skipping pid {}: {}", pid, e);
                return None;
            }
        };

        if !should_include_process(&stat.comm, &self.filter) {
            trace!("Skipping pid {} ({}): filtered by name config", pid, stat.comm);
            return None;
        }

        let owner = match read_uid(&proc_path) {
            Ok(uid) => self.resolve_owner(uid),
            Err(e) => {
                debug!("Owner of pid {} unknown: {}", pid, e);
                UNKNOWN_OWNER.to_string()
            }
        };

        Some(EntitySample {
            pid,
            owner,
            cpu_time_ticks: stat.cpu_time_ticks(),
            resident_memory_kb: stat.resident_memory_kb(),
            name: stat.comm,
        })
    }

    fn resolve_owner(&self, uid: u32) -> String {
        self.owners.resolve(uid)
    }
}
