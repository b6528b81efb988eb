//! Error types for log rotation.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RotateError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required option: --{0}")]
    MissingOption(&'static str),

    #[error("No such source directory: {}", .0.display())]
    SourceDirNotFound(PathBuf),

    #[error("No such backup directory: {}", .0.display())]
    BackupDirNotFound(PathBuf),

    #[error("No such PID file: {}", .0.display())]
    PidFileNotFound(PathBuf),

    #[error("Backup already exists today: {}", .0.display())]
    AlreadyRotated(PathBuf),

    #[error("Invalid PID {content:?} in {}", path.display())]
    InvalidPid { path: PathBuf, content: String },

    #[error("Invalid signal name: {0}")]
    InvalidSignal(String),

    #[error("Failed to send {signal} to PID {pid}: {source}")]
    Signal {
        signal: String,
        pid: i32,
        #[source]
        source: nix::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RotateError>;
