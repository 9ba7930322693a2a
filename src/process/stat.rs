//! Per-process counters from `/proc/<pid>/stat`.
//!
//! The command name sits between the first `(` and the last `)` and may
//! itself contain spaces or parentheses, so fields are counted from the
//! closing parenthesis rather than by naive whitespace splitting.

use once_cell::sync::Lazy;
use std::path::Path;

use crate::error::{read_proc_file, SourceError};

/// Get system clock ticks per second (usually 100, but can vary).
fn get_clk_tck() -> u64 {
    #[cfg(unix)]
    {
        // SAFETY: sysconf is safe to call with _SC_CLK_TCK
        // Returns -1 on error, 0 if undefined - both are handled by the > 0 check
        unsafe {
            let tck = libc::sysconf(libc::_SC_CLK_TCK);
            if tck > 0 {
                return tck as u64;
            }
        }
    }
    100
}

/// Get the memory page size in KiB (usually 4).
fn get_page_size_kb() -> u64 {
    #[cfg(unix)]
    {
        // SAFETY: sysconf is safe to call with _SC_PAGESIZE
        unsafe {
            let size = libc::sysconf(libc::_SC_PAGESIZE);
            if size >= 1024 {
                return size as u64 / 1024;
            }
        }
    }
    4
}

/// System clock ticks per second (for converting tick counters to time).
pub static CLK_TCK: Lazy<u64> = Lazy::new(get_clk_tck);

/// Page size in KiB (for converting the rss page count).
pub static PAGE_SIZE_KB: Lazy<u64> = Lazy::new(get_page_size_kb);

// Field offsets counted from the first token after the closing parenthesis
// (the state field is 0).
const UTIME_IDX: usize = 11;
const STIME_IDX: usize = 12;
const RSS_IDX: usize = 21;

/// The subset of /proc/<pid>/stat the monitor needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcStat {
    pub comm: String,
    pub utime: u64,
    pub stime: u64,
    /// Resident set size in pages.
    pub rss_pages: u64,
}

impl ProcStat {
    pub fn cpu_time_ticks(&self) -> u64 {
        self.utime + self.stime
    }

    pub fn resident_memory_kb(&self) -> u64 {
        self.rss_pages * *PAGE_SIZE_KB
    }
}

/// Parses the content of a /proc/<pid>/stat file.
///
/// utime and stime are required. A missing or negative rss is read as 0,
/// which is what the kernel reports for kernel threads anyway.
pub fn parse_stat(content: &str) -> Result<ProcStat, String> {
    let lparen = content.find('(').ok_or("missing '(' around comm")?;
    let rparen = content.rfind(')').ok_or("missing ')' around comm")?;
    if rparen <= lparen {
        return Err("malformed comm field".into());
    }

    let comm = content[lparen + 1..rparen].to_string();
    let fields: Vec<&str> = content[rparen + 1..].split_whitespace().collect();
    if fields.len() <= STIME_IDX {
        return Err(format!(
            "expected at least {} fields after comm, got {}",
            STIME_IDX + 1,
            fields.len()
        ));
    }

    let utime = fields[UTIME_IDX]
        .parse::<u64>()
        .map_err(|e| format!("invalid utime '{}': {}", fields[UTIME_IDX], e))?;
    let stime = fields[STIME_IDX]
        .parse::<u64>()
        .map_err(|e| format!("invalid stime '{}': {}", fields[STIME_IDX], e))?;
    let rss_pages = fields
        .get(RSS_IDX)
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);

    Ok(ProcStat {
        comm,
        utime,
        stime,
        rss_pages,
    })
}

/// Reads and parses `<proc_path>/stat`.
pub fn read_proc_stat(proc_path: &Path) -> Result<ProcStat, SourceError> {
    let path = proc_path.join("stat");
    let content = read_proc_file(&path)?;
    parse_stat(&content).map_err(|detail| SourceError::parse(path.display().to_string(), detail))
}
