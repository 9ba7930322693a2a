//! Process discovery in the /proc filesystem.
//!
//! This module enumerates numeric process directories under the procfs
//! root and applies the configured name filters.

use std::fs;
use std::path::{Path, PathBuf};

/// Process entry representing a directory in /proc filesystem.
#[derive(Debug, Clone)]
pub struct ProcEntry {
    pub pid: u32,
    pub proc_path: PathBuf,
}

/// Name based include/exclude filters.
#[derive(Debug, Clone, Default)]
pub struct ProcessFilter {
    pub include_names: Option<Vec<String>>,
    pub exclude_names: Option<Vec<String>>,
}

impl ProcessFilter {
    pub fn is_empty(&self) -> bool {
        self.include_names.as_ref().map_or(true, |v| v.is_empty())
            && self.exclude_names.as_ref().map_or(true, |v| v.is_empty())
    }
}

/// Scans the procfs root for process entries with numeric PIDs.
///
/// Entries come back in ascending PID order. An unreadable root yields an
/// empty list.
pub fn collect_proc_entries(root: &Path, max: Option<usize>) -> Vec<ProcEntry> {
    let mut out = Vec::new();
    if let Ok(entries) = fs::read_dir(root) {
        for entry in entries.flatten() {
            let p = entry.path();
            let name = match p.file_name().and_then(|s| s.to_str()) {
                Some(v) => v,
                None => continue,
            };
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            if !p.is_dir() {
                continue;
            }
            let pid: u32 = match name.parse() {
                Ok(v) => v,
                Err(_) => continue,
            };
            out.push(ProcEntry { pid, proc_path: p });
        }
    }
    out.sort_by_key(|e| e.pid);
    if let Some(maxp) = max {
        out.truncate(maxp);
    }
    out
}

/// Determines if a process should be included based on the name filters.
///
/// Exclusion wins over inclusion; an empty include list includes everything.
pub fn should_include_process(name: &str, filter: &ProcessFilter) -> bool {
    if let Some(ex) = &filter.exclude_names {
        if ex.iter().any(|s| name.contains(s.as_str())) {
            return false;
        }
    }
    if let Some(inc) = &filter.include_names {
        if !inc.is_empty() {
            return inc.iter().any(|s| name.contains(s.as_str()));
        }
    }
    true
}
