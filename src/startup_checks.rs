//! Startup requirement validation for herakles-top.
//!
//! Checks that the procfs tree is present and readable before the monitor
//! starts sampling.

use herakles_top::system::read_cpu_stat;
use nix::unistd::geteuid;
use std::fs;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Validate all runtime requirements
pub fn validate_requirements(proc_root: &Path) -> Result<(), ValidationError> {
    debug!("Validating runtime requirements for {}", proc_root.display());

    check_user_privileges();
    check_proc_root(proc_root)?;
    check_global_counters(proc_root)?;
    if !check_foreign_processes(proc_root) {
        debug!("Continuing with partial process visibility");
    }

    info!("All runtime requirements validated");
    Ok(())
}

/// Without root, processes of other users may hide their status file.
fn check_user_privileges() {
    if !geteuid().is_root() {
        debug!("Not running as root - owners of foreign processes may show as '?'");
    }
}

fn check_proc_root(proc_root: &Path) -> Result<(), ValidationError> {
    if !proc_root.is_dir() {
        error!("{} is not a directory - is procfs mounted?", proc_root.display());
        return Err(ValidationError::ProcRootMissing(
            proc_root.display().to_string(),
        ));
    }
    Ok(())
}

fn check_global_counters(proc_root: &Path) -> Result<(), ValidationError> {
    read_cpu_stat(proc_root)
        .map(|_| ())
        .map_err(|e| ValidationError::StatUnreadable(e.to_string()))
}

/// PID 1 belongs to root; failing to read it means other users' processes
/// will be partially hidden. Returns false when access is denied.
///
/// The file has to be opened: `stat` succeeds on unreadable files.
fn check_foreign_processes(proc_root: &Path) -> bool {
    let status = proc_root.join("1").join("status");
    match fs::File::open(&status) {
        Ok(_) => {
            debug!("{} is readable", status.display());
            true
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            warn!(
                "Cannot read {} - some processes may be missing or show owner '?'",
                status.display()
            );
            false
        }
        Err(e) => {
            debug!("Could not test {}: {}", status.display(), e);
            true
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("procfs root not found: {0}")]
    ProcRootMissing(String),

    #[error("cannot read global CPU counters: {0}")]
    StatUnreadable(String),
}
