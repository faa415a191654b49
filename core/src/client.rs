//! One-shot HTTP exchange over a fresh TCP connection.
//!
//! # Design
//! `Client` holds only its `ExchangeConfig` and carries no state between
//! calls. Each exchange runs a fixed sequence: serialize, resolve and
//! connect, send, one bounded read, parse. The first failing step ends the
//! exchange. The `TcpStream` is owned by the call and dropped (closed)
//! exactly once on every path.
//!
//! The request is serialized before the host is resolved, so a malformed
//! request never causes network traffic.
//!
//! The single read is a deliberate capacity limit: a response longer than
//! `max_receive_size`, or one that arrives in several segments, is parsed
//! from whatever the first read returned. `Received::filled_buffer` tells
//! the caller when the bound was hit.

use std::io::{self, Read, Write};
use std::net::TcpStream;

use tracing::debug;

use crate::config::{ExchangeConfig, MAX_RECEIVE_SIZE_LIMIT};
use crate::connect;
use crate::error::ExchangeError;
use crate::http::{HttpRequest, HttpResponse};
use crate::parse::parse_response;
use crate::serialize::serialize_request;

/// Synchronous, stateless client performing single-shot exchanges.
#[derive(Debug, Clone, Default)]
pub struct Client {
    config: ExchangeConfig,
}

/// Outcome of `Client::send`: the parsed response plus read accounting.
#[derive(Debug, Clone)]
pub struct Received {
    pub response: HttpResponse,
    pub bytes_read: usize,
    pub max_receive_size: usize,
}

impl Received {
    /// The read filled the whole buffer, so the response may be truncated.
    pub fn filled_buffer(&self) -> bool {
        self.bytes_read == self.max_receive_size
    }
}

impl Client {
    pub fn new(config: ExchangeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Perform one exchange and return the parsed response.
    pub fn exchange(
        &self,
        request: &HttpRequest,
        host: &str,
        port: u16,
    ) -> Result<HttpResponse, ExchangeError> {
        self.send(request, host, port).map(|received| received.response)
    }

    /// Perform one exchange and report how much of the receive bound was used.
    pub fn send(
        &self,
        request: &HttpRequest,
        host: &str,
        port: u16,
    ) -> Result<Received, ExchangeError> {
        let wire = serialize_request(request)?;
        let stream = connect::open(host, port)?;
        self.exchange_on(stream, &wire)
    }

    /// Run the send/receive/parse steps on an already connected stream.
    /// The stream is closed when this returns.
    fn exchange_on(&self, mut stream: TcpStream, wire: &[u8]) -> Result<Received, ExchangeError> {
        write_request(&mut stream, wire)?;
        let raw = read_once(&mut stream, self.config.max_receive_size)?;
        drop(stream);

        let bytes_read = raw.len();
        let response = parse_response(&raw)?;
        debug!(status = response.status, bytes_read, "response parsed");

        Ok(Received {
            response,
            bytes_read,
            max_receive_size: self.config.max_receive_size,
        })
    }
}

/// Exchange with the default configuration.
pub fn exchange(request: &HttpRequest, host: &str, port: u16) -> Result<HttpResponse, ExchangeError> {
    Client::default().exchange(request, host, port)
}

fn write_request(stream: &mut impl Write, wire: &[u8]) -> Result<(), ExchangeError> {
    stream.write_all(wire).map_err(|e| match e.kind() {
        io::ErrorKind::WriteZero => ExchangeError::Transmission(io::Error::new(
            io::ErrorKind::WriteZero,
            "short write",
        )),
        _ => ExchangeError::Transmission(e),
    })?;
    stream.flush().map_err(ExchangeError::Transmission)?;
    debug!(bytes = wire.len(), "request sent");
    Ok(())
}

/// A single bounded read. No loop: whatever arrives first is the response.
fn read_once(stream: &mut impl Read, max: usize) -> Result<Vec<u8>, ExchangeError> {
    let mut buf = receive_buffer(max)?;
    let n = loop {
        match stream.read(&mut buf) {
            Ok(n) => break n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ExchangeError::Receive(e)),
        }
    };
    if n == 0 {
        return Err(ExchangeError::Receive(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "peer closed without sending a response",
        )));
    }
    buf.truncate(n);
    debug!(bytes = n, max, "response received");
    Ok(buf)
}

/// Allocate the receive buffer without aborting on an oversized bound.
fn receive_buffer(max: usize) -> Result<Vec<u8>, ExchangeError> {
    if max > MAX_RECEIVE_SIZE_LIMIT {
        return Err(ExchangeError::Receive(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("receive bound {max} exceeds {MAX_RECEIVE_SIZE_LIMIT} bytes"),
        )));
    }
    let mut buf = Vec::new();
    buf.try_reserve_exact(max).map_err(|e| {
        ExchangeError::Receive(io::Error::new(io::ErrorKind::OutOfMemory, e.to_string()))
    })?;
    buf.resize(max, 0);
    Ok(buf)
}
