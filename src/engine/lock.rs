//! Cross-process run lock for indexing and collection.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::types::{now_micros, IndexError, IndexResult};

/// Held while an indexing or collection run is active. The lock file is
/// removed when the guard drops.
///
/// The file records the holder's pid. A lock whose holder is no longer
/// running is taken over, so a crashed run does not block later ones.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    /// Create the lock file exclusively, breaking it first if its holder
    /// is gone.
    pub fn acquire(path: &Path) -> IndexResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = match create_lock_file(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let holder = match stale_holder(path) {
                    Some(pid) => pid,
                    None => return Err(IndexError::Locked(path.to_path_buf())),
                };
                log::warn!(
                    "Breaking stale run lock {} held by dead process {}",
                    path.display(),
                    holder
                );
                match fs::remove_file(path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => return Err(e.into()),
                }
                // Another process may have broken it first
                match create_lock_file(path) {
                    Ok(file) => file,
                    Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                        return Err(IndexError::Locked(path.to_path_buf()))
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Err(e) => return Err(e.into()),
        };

        writeln!(file, "{} {}", std::process::id(), now_micros())?;
        file.sync_all()?;
        log::debug!("Acquired run lock {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            log::warn!("Releasing run lock {} failed: {}", self.path.display(), e);
        }
    }
}

fn create_lock_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}

/// Pid of the lock holder if it is known to have exited.
///
/// An unreadable or malformed lock file is treated as held.
fn stale_holder(path: &Path) -> Option<u32> {
    let content = fs::read_to_string(path).ok()?;
    let pid: u32 = content.split_whitespace().next()?.parse().ok()?;
    (!is_process_alive(pid)).then_some(pid)
}

/// Whether a process with this pid is running. Assumes alive when it
/// cannot tell.
fn is_process_alive(pid: u32) -> bool {
    #[cfg(unix)]
    {
        if Path::new("/proc/self").exists() {
            return Path::new(&format!("/proc/{}", pid)).exists();
        }
        std::process::Command::new("kill")
            .args(["-0", &pid.to_string()])
            .output()
            .map(|o| o.status.success())
            .unwrap_or(true)
    }

    #[cfg(not(unix))]
    {
        let _ = pid;
        true
    }
}
