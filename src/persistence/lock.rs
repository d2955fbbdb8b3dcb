//! Exclusive per-directory lock backed by a `.lock` file.
//!
//! The lock file is created with `create_new`, so only one holder can exist
//! at a time across threads and processes. It is removed when the guard drops.
//! A lock file older than the stale threshold is assumed to be left over from
//! a crashed process and is broken.

use anyhow::{bail, Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

pub const LOCK_FILE: &str = ".lock";

const RETRY_INTERVAL: Duration = Duration::from_millis(5);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const STALE_AFTER: Duration = Duration::from_secs(60);

/// Held lock on a directory; released on drop
#[derive(Debug)]
pub struct DirLock {
    path: PathBuf,
}

impl DirLock {
    /// Block until the lock on `dir` is acquired, creating `dir` if needed
    pub fn acquire(dir: &Path) -> Result<Self> {
        Self::acquire_with(dir, DEFAULT_TIMEOUT, STALE_AFTER)
    }

    pub fn acquire_with(dir: &Path, timeout: Duration, stale_after: Duration) -> Result<Self> {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        let path = dir.join(LOCK_FILE);
        let started = Instant::now();

        loop {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    // owner pid is informational only
                    let _ = writeln!(file, "{}", std::process::id());
                    return Ok(Self { path });
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                    if is_stale(&path, stale_after) {
                        log::warn!("event=lock_broken module=store path={}", path.display());
                        let _ = fs::remove_file(&path);
                        continue;
                    }
                    if started.elapsed() >= timeout {
                        bail!("Timed out waiting for lock: {}", path.display());
                    }
                    thread::sleep(RETRY_INTERVAL);
                }
                Err(err) => {
                    return Err(err).with_context(|| format!("Failed to create lock file: {}", path.display()));
                }
            }
        }
    }
}

impl Drop for DirLock {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            log::debug!("event=lock_release_failed module=store path={} error={}", self.path.display(), err);
        }
    }
}

fn is_stale(path: &Path, stale_after: Duration) -> bool {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(|modified| SystemTime::now().duration_since(modified).ok())
        .map(|age| age >= stale_after)
        .unwrap_or(false)
}
