//! Log Rotate Library
//!
//! Moves web-server logs into dated backup directories, prunes backups past
//! a retention window and signals the server to reopen its log files.

pub mod config;
pub mod daemon;
pub mod fs;
pub mod rotate;
pub mod utils;

// Re-export commonly used types
pub use config::{Config, RotateOptions, RotatePlan};
pub use rotate::{RotationReport, Rotator};
pub use utils::errors::RotateError;
pub type Result<T> = std::result::Result<T, RotateError>;
