use std::net::SocketAddr;

#[derive(thiserror::Error, Debug)]
pub enum PortError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read local address of socket bound to {addr}: {source}")]
    LocalAddr {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid host {0:?}")]
    InvalidHost(String),

    #[error("invalid port count {0:?}")]
    InvalidCount(String),
}

pub type Result<T> = std::result::Result<T, PortError>;
