//! Single-writer lock for mutating commands.
//!
//! The lock is a JSON file next to the database naming the holding command,
//! its pid and when it started. A file whose pid is no longer running is
//! treated as abandoned and replaced.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const LOCK_FILE: &str = "write.lock";
const WAIT_TIMEOUT: Duration = Duration::from_secs(300);
const RETRY_DELAY: Duration = Duration::from_millis(250);

/// Who holds the lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockHolder {
    pub pid: u32,
    pub command: String,
    pub acquired_at: DateTime<Utc>,
}

impl LockHolder {
    fn current(command: &str) -> Self {
        Self {
            pid: std::process::id(),
            command: command.to_string(),
            acquired_at: Utc::now(),
        }
    }
}

/// Removes the lock file on drop.
#[derive(Debug)]
pub struct WriteLockGuard {
    path: PathBuf,
}

impl Drop for WriteLockGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Why the lock could not be taken on one attempt.
#[derive(Debug)]
enum Contention {
    Held(LockHolder),
    Abandoned,
    Unreadable,
}

/// The lock file used for a database.
fn lock_path_for(database: &Path) -> PathBuf {
    database
        .parent()
        .map_or_else(|| PathBuf::from(LOCK_FILE), |dir| dir.join(LOCK_FILE))
}

/// Take the write lock for `database` on behalf of `command`, waiting while
/// another live command holds it.
pub async fn acquire_beside(database: &Path, command: &str) -> anyhow::Result<WriteLockGuard> {
    let path = lock_path_for(database);
    let holder = LockHolder::current(command);
    let started = std::time::Instant::now();

    loop {
        let contention = match try_acquire(&path, &holder) {
            Ok(guard) => return Ok(guard),
            Err(contention) => contention,
        };
        match contention {
            Contention::Abandoned => {
                tracing::warn!(path = %path.display(), "Replacing abandoned write lock");
                let _ = std::fs::remove_file(&path);
                continue;
            }
            Contention::Held(other) if started.elapsed() >= WAIT_TIMEOUT => {
                anyhow::bail!(
                    "{} (pid {}) has held the write lock since {}",
                    other.command,
                    other.pid,
                    other.acquired_at.to_rfc3339()
                );
            }
            Contention::Unreadable if started.elapsed() >= WAIT_TIMEOUT => {
                anyhow::bail!("unreadable write lock at {}; remove it by hand", path.display());
            }
            Contention::Held(other) => {
                tracing::debug!(pid = other.pid, command = %other.command, "Write lock busy");
            }
            Contention::Unreadable => {}
        }
        tokio::time::sleep(RETRY_DELAY).await;
    }
}

fn try_acquire(path: &Path, holder: &LockHolder) -> Result<WriteLockGuard, Contention> {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match OpenOptions::new().create_new(true).write(true).open(path) {
        Ok(mut file) => {
            let body = serde_json::to_string(holder).map_err(|_| Contention::Unreadable)?;
            let _ = file.write_all(body.as_bytes());
            Ok(WriteLockGuard {
                path: path.to_path_buf(),
            })
        }
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => Err(inspect(path)),
        Err(_) => Err(Contention::Unreadable),
    }
}

fn inspect(path: &Path) -> Contention {
    let Ok(body) = std::fs::read_to_string(path) else {
        return Contention::Unreadable;
    };
    match serde_json::from_str::<LockHolder>(&body) {
        Ok(other) if is_running(other.pid) => Contention::Held(other),
        Ok(_) => Contention::Abandoned,
        Err(_) => Contention::Unreadable,
    }
}

fn is_running(pid: u32) -> bool {
    std::process::Command::new("kill")
        .arg("-0")
        .arg(pid.to_string())
        .status()
        .is_ok_and(|status| status.success())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn lock_file_names_its_holder() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let path = temp.path().join(".workload/write.lock");
        let holder = LockHolder::current("initialise");

        let guard = try_acquire(&path, &holder).expect("lock should acquire");
        let body = std::fs::read_to_string(&path).expect("lock file should exist");
        let stored: LockHolder = serde_json::from_str(&body).expect("lock file is json");
        assert_eq!(stored, holder);

        drop(guard);
        assert!(!path.exists());
    }

    #[test]
    fn live_holder_blocks_second_writer() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let path = temp.path().join("write.lock");

        let _guard =
            try_acquire(&path, &LockHolder::current("new-year")).expect("lock should acquire");
        match try_acquire(&path, &LockHolder::current("initialise")) {
            Err(Contention::Held(other)) => assert_eq!(other.command, "new-year"),
            other => panic!("expected a held lock, got {other:?}"),
        }
    }

    #[test]
    fn garbage_lock_is_unreadable() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let path = temp.path().join("write.lock");
        std::fs::write(&path, "12345").expect("write should succeed");

        assert!(matches!(inspect(&path), Contention::Unreadable));
    }

    #[tokio::test]
    async fn lock_sits_next_to_database() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let database = temp.path().join(".workload").join("workload.db");

        let guard = acquire_beside(&database, "standard-load")
            .await
            .expect("lock should acquire");
        assert!(temp.path().join(".workload/write.lock").is_file());
        drop(guard);
    }

    #[test]
    fn bare_database_name_locks_in_current_directory() {
        assert_eq!(lock_path_for(Path::new("workload.db")), PathBuf::from("write.lock"));
    }
}
