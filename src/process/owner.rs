//! Process owner lookup.
//!
//! The real UID comes from the `Uid:` line of `/proc/<pid>/status`; names
//! are resolved through the passwd database and cached per UID, since a
//! handful of users own nearly every process and the lookup is not free.

use ahash::AHashMap as HashMap;
use nix::unistd::{Uid, User};
use std::path::Path;
use std::sync::RwLock as StdRwLock;
use tracing::debug;

use crate::error::{read_proc_file, SourceError};

/// Parses the real UID from /proc/<pid>/status content.
pub fn parse_status_uid(content: &str) -> Option<u32> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("Uid:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|uid| uid.parse().ok())
}

/// Reads the real UID of the process at `proc_path`.
pub fn read_uid(proc_path: &Path) -> Result<u32, SourceError> {
    let path = proc_path.join("status");
    let content = read_proc_file(&path)?;
    parse_status_uid(&content)
        .ok_or_else(|| SourceError::parse(path.display().to_string(), "no Uid line"))
}

/// Caching UID to user name resolver.
#[derive(Default)]
pub struct OwnerResolver {
    cache: StdRwLock<HashMap<u32, String>>,
}

impl OwnerResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the user name for `uid`, or the UID as text when it has no passwd entry.
    pub fn resolve(&self, uid: u32) -> String {
        if let Ok(cache) = self.cache.read() {
            if let Some(name) = cache.get(&uid) {
                return name.clone();
            }
        }

        let name = match User::from_uid(Uid::from_raw(uid)) {
            Ok(Some(user)) => user.name,
            Ok(None) => uid.to_string(),
            Err(e) => {
                debug!("Failed to lookup user for uid {}: {}", uid, e);
                uid.to_string()
            }
        };

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(uid, name.clone());
        }
        name
    }

    pub fn cached(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }
}
