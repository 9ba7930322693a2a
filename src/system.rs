//! System-wide counters from the /proc filesystem.
//!
//! This module reads the aggregate CPU tick counters from `/proc/stat`,
//! memory totals from `/proc/meminfo` and the uptime from `/proc/uptime`.
//! Every reader takes the procfs root so tests can point it at a fake tree.

use std::path::Path;

use crate::error::{read_proc_file, SourceError};

/// Aggregate CPU tick counters from the `cpu` line of /proc/stat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuStat {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuStat {
    /// Calculate total CPU time (all fields).
    ///
    /// guest and guest_nice are left out on purpose: the kernel already
    /// accounts them inside user and nice.
    pub fn total(&self) -> u64 {
        self.user
            + self.nice
            + self.system
            + self.idle
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
    }

    /// Calculate non-active time (idle + iowait).
    pub fn idle_total(&self) -> u64 {
        self.idle + self.iowait
    }
}

/// Memory totals from /proc/meminfo, in KiB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryInfo {
    pub total_kb: u64,
    pub free_kb: u64,
    pub available_kb: u64,
}

/// Parses the aggregate `cpu` line of /proc/stat content.
///
/// Per-core lines (`cpu0`, `cpu1`, ...) are ignored. Kernels older than
/// 2.6.11 have no steal column; it is treated as 0.
pub fn parse_cpu_stat(content: &str) -> Option<CpuStat> {
    let line = content
        .lines()
        .find(|l| l.split_whitespace().next() == Some("cpu"))?;

    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 8 {
        return None;
    }

    let field = |i: usize| -> Option<u64> {
        match parts.get(i) {
            Some(v) => v.parse::<u64>().ok(),
            None => Some(0),
        }
    };

    Some(CpuStat {
        user: field(1)?,
        nice: field(2)?,
        system: field(3)?,
        idle: field(4)?,
        iowait: field(5)?,
        irq: field(6)?,
        softirq: field(7)?,
        steal: field(8)?,
    })
}

/// Reads the aggregate CPU counters from `<root>/stat`.
pub fn read_cpu_stat(root: &Path) -> Result<CpuStat, SourceError> {
    let path = root.join("stat");
    let content = read_proc_file(&path)?;
    parse_cpu_stat(&content)
        .ok_or_else(|| SourceError::parse(path.display().to_string(), "no aggregate cpu line"))
}

/// Parses /proc/meminfo content. Missing keys are left at 0.
pub fn parse_meminfo(content: &str) -> MemoryInfo {
    let mut info = MemoryInfo::default();
    let mut found = 0;

    for line in content.lines() {
        let mut parts = line.split_whitespace();
        let key = match parts.next() {
            Some(k) => k,
            None => continue,
        };
        let slot = match key {
            "MemTotal:" => &mut info.total_kb,
            "MemFree:" => &mut info.free_kb,
            "MemAvailable:" => &mut info.available_kb,
            _ => continue,
        };
        if let Some(Ok(kb)) = parts.next().map(str::parse::<u64>) {
            *slot = kb;
            found += 1;
        }
        if found == 3 {
            break;
        }
    }

    info
}

/// Reads memory totals from `<root>/meminfo`.
///
/// Fails when MemTotal is missing or zero, since every percentage derived
/// from it would be meaningless.
pub fn read_meminfo(root: &Path) -> Result<MemoryInfo, SourceError> {
    let path = root.join("meminfo");
    let content = read_proc_file(&path)?;
    let info = parse_meminfo(&content);
    if info.total_kb == 0 {
        return Err(SourceError::parse(
            path.display().to_string(),
            "MemTotal missing or zero",
        ));
    }
    Ok(info)
}

/// Reads the system uptime in seconds from `<root>/uptime`.
pub fn read_uptime(root: &Path) -> Result<f64, SourceError> {
    let path = root.join("uptime");
    let content = read_proc_file(&path)?;
    content
        .split_whitespace()
        .next()
        .and_then(|v| v.parse::<f64>().ok())
        .ok_or_else(|| {
            SourceError::parse(
                path.display().to_string(),
                format!("expected seconds, got '{}'", content.trim()),
            )
        })
}
