//! Per-process counter acquisition.
//!
//! This module provides:
//! - `scanner`: Process discovery and name filtering
//! - `stat`: CPU tick and RSS parsing from /proc/<pid>/stat
//! - `owner`: UID lookup and user name resolution

pub mod owner;
pub mod scanner;
pub mod stat;

// Re-export commonly used types
pub use owner::{read_uid, OwnerResolver};
pub use scanner::{collect_proc_entries, should_include_process, ProcEntry, ProcessFilter};
pub use stat::{read_proc_stat, ProcStat, CLK_TCK, PAGE_SIZE_KB};
