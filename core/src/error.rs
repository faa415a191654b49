//! Error types for a single HTTP exchange.
//!
//! # Design
//! Each stage of the exchange fails with its own variant so callers can tell
//! "the host does not exist" apart from "the peer hung up". `ErrorKind` is the
//! field-less projection used where only the category matters (the C ABI
//! maps it to error codes).

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Errors returned by the serializer, parser, connector and `Client`.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The host name could not be resolved to any IPv4 address.
    #[error("failed to resolve host {host}: {source}")]
    Resolution {
        host: String,
        #[source]
        source: io::Error,
    },

    /// Every resolved candidate refused or failed the connection.
    #[error("failed to connect to {host}: {} candidate(s) failed", .attempts.len())]
    Connection {
        host: String,
        attempts: Vec<(SocketAddr, io::Error)>,
    },

    /// The request cannot be put on the wire.
    #[error("malformed request: {0}")]
    MalformedRequest(&'static str),

    /// The request could not be written in full.
    #[error("failed to send request: {0}")]
    Transmission(#[source] io::Error),

    /// The read failed or the peer closed without sending anything.
    #[error("failed to receive response: {0}")]
    Receive(#[source] io::Error),

    /// The received bytes are not an HTTP response.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Category of an `ExchangeError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Resolution,
    Connection,
    MalformedRequest,
    Transmission,
    Receive,
    MalformedResponse,
}

impl ExchangeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExchangeError::Resolution { .. } => ErrorKind::Resolution,
            ExchangeError::Connection { .. } => ErrorKind::Connection,
            ExchangeError::MalformedRequest(_) => ErrorKind::MalformedRequest,
            ExchangeError::Transmission(_) => ErrorKind::Transmission,
            ExchangeError::Receive(_) => ErrorKind::Receive,
            ExchangeError::MalformedResponse(_) => ErrorKind::MalformedResponse,
        }
    }
}

/// Errors raised while loading an `ExchangeConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("max_receive_size must be greater than zero")]
    ZeroReceiveSize,

    #[error(
        "max_receive_size {0} exceeds the limit of {limit} bytes",
        limit = crate::config::MAX_RECEIVE_SIZE_LIMIT
    )]
    ReceiveSizeTooLarge(usize),
}
