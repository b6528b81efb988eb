//! Free TCP port allocation.
//!
//! Every function binds a listener to port 0, lets the OS pick an ephemeral
//! port, reads it back and releases the socket. The port is only free until
//! something else binds it.

use crate::error::{PortError, Result};
use std::net::{SocketAddr, TcpListener, ToSocketAddrs};
use tracing::debug;

pub type Port = u16;

/// Number of ports handed out by a batch request when none is given.
pub const DEFAULT_PORT_COUNT: usize = 10;

/// Host used for single-port requests: every interface.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Host used for batch requests.
pub const DEFAULT_BATCH_HOST: &str = "127.0.0.1";

/// Resolve `host` to a socket address with port 0, preferring IPv4.
fn resolve(host: &str) -> Result<SocketAddr> {
    let addrs: Vec<SocketAddr> = (host, 0)
        .to_socket_addrs()
        .map_err(|_| PortError::InvalidHost(host.to_string()))?
        .collect();

    addrs
        .iter()
        .find(|addr| addr.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| PortError::InvalidHost(host.to_string()))
}

/// Bind an ephemeral listener and return it with its assigned address.
fn bind_ephemeral(addr: SocketAddr) -> Result<(TcpListener, SocketAddr)> {
    let listener = TcpListener::bind(addr).map_err(|source| PortError::Bind { addr, source })?;
    let local = listener
        .local_addr()
        .map_err(|source| PortError::LocalAddr { addr, source })?;
    Ok((listener, local))
}

/// Ask the OS for one free TCP port on `host`.
pub fn free_tcp_port(host: &str) -> Result<Port> {
    let (_listener, local) = bind_ephemeral(resolve(host)?)?;
    debug!(port = local.port(), "Allocated free port");
    Ok(local.port())
}

/// Ask the OS for one free TCP port on `host` and format it as
/// `tcp://{ip}:{port}` using the address the socket was bound to.
pub fn free_tcp_address(host: &str) -> Result<String> {
    let (_listener, local) = bind_ephemeral(resolve(host)?)?;
    debug!(address = %local, "Allocated free address");
    Ok(format!("tcp://{}", local))
}

/// Ask the OS for `count` distinct free TCP ports on `host`.
///
/// All listeners stay open until the whole batch is allocated and are only
/// closed afterwards, so the OS cannot hand the same port out twice within
/// one call.
pub fn free_ports(host: &str, count: usize) -> Result<Vec<Port>> {
    let addr = resolve(host)?;
    let mut listeners = Vec::with_capacity(count);
    let mut ports = Vec::with_capacity(count);

    for _ in 0..count {
        let (listener, local) = bind_ephemeral(addr)?;
        ports.push(local.port());
        listeners.push(listener);
    }

    for listener in listeners {
        drop(listener);
    }

    debug!(count = ports.len(), host, "Allocated free port batch");
    Ok(ports)
}
