//! Configuration for the log rotation.
//!
//! Options come from an optional TOML file and are overridden by command-line
//! flags. Nothing touches the file system until [`RotateOptions::validate`]
//! has turned the raw options into a [`RotatePlan`].

use crate::utils::errors::{Result, RotateError};
use nix::sys::signal::Signal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Backups older than this many days are pruned when `days` is not set.
pub const DEFAULT_RETENTION_DAYS: u32 = 20;

/// Signal that asks nginx (and friends) to reopen their log files.
pub const DEFAULT_RELOAD_SIGNAL: Signal = Signal::SIGUSR1;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rotate: RotateOptions,
    pub log: LogConfig,
    pub schedule: ScheduleConfig,
}

/// Raw rotation options, any of which may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotateOptions {
    /// Directory holding the live log files
    pub source_dir: Option<PathBuf>,

    /// Root under which dated backup directories are created
    pub backup_dir: Option<PathBuf>,

    /// PID file of the process to signal
    pub pid_file: Option<PathBuf>,

    /// Only rotate entries whose name contains this substring
    pub keyword: Option<String>,

    /// Retention window in days
    pub days: Option<u32>,

    /// Reload signal name, e.g. `SIGUSR1` or `USR1`
    pub signal: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Colored output
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            ansi: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Six-field cron expression (seconds first). Unset means run once.
    pub cron: Option<String>,
}

/// Validated rotation settings. Every path was checked when this was built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotatePlan {
    pub source_dir: PathBuf,
    pub backup_dir: PathBuf,
    pub pid_file: PathBuf,
    pub keyword: Option<String>,
    pub retention_days: u32,
    pub signal: Signal,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| RotateError::Config(format!("{}: {}", path.display(), e)))
    }
}

impl RotateOptions {
    /// Layer `overrides` on top of `self`; set fields in `overrides` win.
    pub fn overlay(self, overrides: RotateOptions) -> RotateOptions {
        RotateOptions {
            source_dir: overrides.source_dir.or(self.source_dir),
            backup_dir: overrides.backup_dir.or(self.backup_dir),
            pid_file: overrides.pid_file.or(self.pid_file),
            keyword: overrides.keyword.or(self.keyword),
            days: overrides.days.or(self.days),
            signal: overrides.signal.or(self.signal),
        }
    }

    /// Check every precondition of a rotation run.
    pub fn validate(&self) -> Result<RotatePlan> {
        let source_dir = self.source_dir.clone().ok_or(RotateError::MissingOption("dir"))?;
        let backup_dir = self.backup_dir.clone().ok_or(RotateError::MissingOption("bak"))?;
        let pid_file = self.pid_file.clone().ok_or(RotateError::MissingOption("pid"))?;

        if !source_dir.is_dir() {
            return Err(RotateError::SourceDirNotFound(source_dir));
        }
        if !backup_dir.is_dir() {
            return Err(RotateError::BackupDirNotFound(backup_dir));
        }
        if !pid_file.is_file() {
            return Err(RotateError::PidFileNotFound(pid_file));
        }

        let signal = match &self.signal {
            Some(name) => parse_signal(name)?,
            None => DEFAULT_RELOAD_SIGNAL,
        };

        Ok(RotatePlan {
            source_dir,
            backup_dir,
            pid_file,
            keyword: self.keyword.clone().filter(|k| !k.is_empty()),
            retention_days: self.days.unwrap_or(DEFAULT_RETENTION_DAYS),
            signal,
        })
    }
}

/// Parse `SIGHUP`, `hup` or `HUP` style signal names.
pub fn parse_signal(name: &str) -> Result<Signal> {
    let upper = name.trim().to_ascii_uppercase();
    let full = if upper.starts_with("SIG") {
        upper
    } else {
        format!("SIG{}", upper)
    };
    Signal::from_str(&full).map_err(|_| RotateError::InvalidSignal(name.to_string()))
}
