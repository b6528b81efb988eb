//! Log rotation: move today's logs into a dated backup directory, prune
//! expired backups and ask the server to reopen its log files.

use crate::config::RotatePlan;
use crate::daemon::signal::{read_pid, Reloader};
use crate::fs::listing::{list_entries, move_entry, remove_entry};
use crate::utils::errors::{Result, RotateError};
use chrono::{DateTime, Local};
use nix::unistd::Pid;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Every backup directory name contains this marker.
pub const BACKUP_MARKER: &str = "backup_log";

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Suffix appended to the backup directory and to each moved file, e.g. `_2024-03-05`.
pub fn date_tag(now: &DateTime<Local>) -> String {
    now.format("_%Y-%m-%d").to_string()
}

pub fn backup_dir_name(tag: &str) -> String {
    format!("{}{}", BACKUP_MARKER, tag)
}

/// Entries modified before the returned instant are expired.
pub fn retention_cutoff(now: SystemTime, days: u32) -> SystemTime {
    let window = Duration::from_secs(u64::from(days) * SECONDS_PER_DAY);
    now.checked_sub(window)
        .filter(|cutoff| *cutoff >= UNIX_EPOCH)
        .unwrap_or(UNIX_EPOCH)
}

/// What a rotation run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationReport {
    /// Today's backup directory
    pub backup_dir: PathBuf,

    /// Destination of every moved entry
    pub moved: Vec<PathBuf>,

    /// Expired backups that were deleted
    pub removed: Vec<PathBuf>,

    /// Process that was signalled, if the PID file was still there
    pub reloaded: Option<Pid>,
}

pub struct Rotator<R> {
    reloader: R,
}

impl<R: Reloader> Rotator<R> {
    pub fn new(reloader: R) -> Self {
        Self { reloader }
    }

    /// Rotate using the current local time.
    pub fn run(&self, plan: &RotatePlan) -> Result<RotationReport> {
        self.run_at(plan, Local::now())
    }

    /// Rotate as if the current time were `now`.
    ///
    /// Fails with [`RotateError::AlreadyRotated`] before touching anything
    /// when today's backup directory exists. Errors after that point abort
    /// the run and leave whatever was already moved or removed in place.
    pub fn run_at(&self, plan: &RotatePlan, now: DateTime<Local>) -> Result<RotationReport> {
        let tag = date_tag(&now);
        let cutoff = retention_cutoff(SystemTime::from(now), plan.retention_days);

        // The backup root may live inside the source directory
        let backup_root = std::fs::canonicalize(&plan.backup_dir)?;
        let mut sources = Vec::new();
        for entry in list_entries(&plan.source_dir, plan.keyword.as_deref())? {
            if entry.is_dir && backup_root.starts_with(std::fs::canonicalize(&entry.path)?) {
                debug!(path = %entry.path.display(), "Skipping directory holding the backup root");
                continue;
            }
            sources.push(entry);
        }
        let backup_dir = plan.backup_dir.join(backup_dir_name(&tag));

        if backup_dir.exists() {
            return Err(RotateError::AlreadyRotated(backup_dir));
        }

        info!(time = %now.format("%Y-%m-%d %H:%M:%S"), "Start working");
        std::fs::create_dir(&backup_dir)?;

        let mut moved = Vec::with_capacity(sources.len());
        for entry in sources {
            let dest = backup_dir.join(format!("{}{}", entry.name, tag));
            move_entry(&entry.path, &dest)?;
            info!(path = %dest.display(), "Backup file");
            moved.push(dest);
        }

        let mut removed = Vec::new();
        for entry in list_entries(&plan.backup_dir, Some(BACKUP_MARKER))? {
            if entry.path == backup_dir || entry.modified >= cutoff {
                continue;
            }
            remove_entry(&entry.path)?;
            info!(path = %entry.path.display(), "Removed expired backup");
            removed.push(entry.path);
        }

        let reloaded = if plan.pid_file.exists() {
            let pid = read_pid(&plan.pid_file)?;
            self.reloader.reload(pid)?;
            info!(pid = pid.as_raw(), signal = %plan.signal, "Reload signal sent");
            Some(pid)
        } else {
            None
        };

        Ok(RotationReport {
            backup_dir,
            moved,
            removed,
            reloaded,
        })
    }
}
