//! Process-facing pieces: reload signalling, scheduling and shutdown.

pub mod scheduler;
pub mod shutdown;
pub mod signal;

pub use scheduler::{run_blocking, RotationScheduler};
pub use shutdown::ShutdownCoordinator;
pub use signal::{read_pid, Reloader, SignalReloader};
