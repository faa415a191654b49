//! Host resolution and connection establishment.
//!
//! # Design
//! Resolution produces an ordered list of IPv4 candidates; connecting walks
//! that list and returns the first stream that comes up. Failed attempts are
//! collected rather than dropped so the caller sees why every candidate was
//! rejected. A failed `TcpStream::connect` never leaves a socket behind.
//!
//! The requested port is applied when each candidate is built from the
//! resolved IP. The resolver's own output is never patched afterwards.

use std::io;
use std::net::{IpAddr, SocketAddr, TcpStream, ToSocketAddrs};

use tracing::{debug, warn};

use crate::error::ExchangeError;

/// One resolved IPv4 endpoint eligible for a connection attempt.
///
/// Only the address is stored. Socket type and protocol are always TCP
/// stream, since every candidate is handed to `TcpStream::connect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub addr: SocketAddr,
}

impl Candidate {
    pub fn new(ip: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::new(ip, port),
        }
    }
}

/// Resolve `host` to IPv4 candidates on `port`, in resolver order.
pub fn resolve(host: &str, port: u16) -> Result<Vec<Candidate>, ExchangeError> {
    let resolved = (host, 0u16)
        .to_socket_addrs()
        .map_err(|source| ExchangeError::Resolution {
            host: host.to_string(),
            source,
        })?;

    let candidates: Vec<Candidate> = resolved
        .map(|addr| addr.ip())
        .filter(IpAddr::is_ipv4)
        .map(|ip| Candidate::new(ip, port))
        .collect();

    if candidates.is_empty() {
        return Err(ExchangeError::Resolution {
            host: host.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no IPv4 address"),
        });
    }

    debug!(host, port, candidates = candidates.len(), "host resolved");
    Ok(candidates)
}

/// Connect to the first candidate that accepts, trying them in order.
pub fn connect_first(host: &str, candidates: &[Candidate]) -> Result<TcpStream, ExchangeError> {
    let mut attempts = Vec::new();

    for candidate in candidates {
        debug!(addr = %candidate.addr, "connecting");
        match TcpStream::connect(candidate.addr) {
            Ok(stream) => {
                debug!(addr = %candidate.addr, failed = attempts.len(), "connected");
                return Ok(stream);
            }
            Err(e) => {
                warn!(addr = %candidate.addr, error = %e, "connect failed");
                attempts.push((candidate.addr, e));
            }
        }
    }

    Err(ExchangeError::Connection {
        host: host.to_string(),
        attempts,
    })
}

/// `resolve` followed by `connect_first`.
pub fn open(host: &str, port: u16) -> Result<TcpStream, ExchangeError> {
    let candidates = resolve(host, port)?;
    connect_first(host, &candidates)
}
