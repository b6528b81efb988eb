//! Reload signalling for the process named in a PID file.

use crate::utils::errors::{Result, RotateError};
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::path::Path;
use tracing::debug;

/// Asks a running process to reopen its log files.
pub trait Reloader {
    fn reload(&self, pid: Pid) -> Result<()>;
}

impl<R: Reloader + ?Sized> Reloader for &R {
    fn reload(&self, pid: Pid) -> Result<()> {
        (**self).reload(pid)
    }
}

/// Delivers a POSIX signal with `kill(2)`.
#[derive(Debug, Clone, Copy)]
pub struct SignalReloader {
    signal: Signal,
}

impl SignalReloader {
    pub fn new(signal: Signal) -> Self {
        Self { signal }
    }
}

impl Reloader for SignalReloader {
    fn reload(&self, pid: Pid) -> Result<()> {
        debug!(pid = pid.as_raw(), signal = %self.signal, "Sending reload signal");
        signal::kill(pid, self.signal).map_err(|source| RotateError::Signal {
            signal: self.signal.to_string(),
            pid: pid.as_raw(),
            source,
        })
    }
}

/// Read the PID stored in `path`. Surrounding whitespace is ignored.
pub fn read_pid(path: &Path) -> Result<Pid> {
    let content = std::fs::read_to_string(path)?;
    let invalid = || RotateError::InvalidPid {
        path: path.to_path_buf(),
        content: content.trim().to_string(),
    };

    let raw: i32 = content.trim().parse().map_err(|_| invalid())?;
    if raw <= 0 {
        return Err(invalid());
    }
    Ok(Pid::from_raw(raw))
}
