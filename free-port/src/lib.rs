//! Free TCP port allocation by ephemeral socket binding.

pub mod config;
pub mod error;
pub mod ports;

pub use config::PortConfig;
pub use error::{PortError, Result};
pub use ports::{free_ports, free_tcp_address, free_tcp_port, Port};
