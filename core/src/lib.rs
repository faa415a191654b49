//! Single-shot HTTP/1.x exchange over a raw TCP connection.
//!
//! # Overview
//! Given an `HttpRequest`, a host and a port, `exchange` resolves the host,
//! connects to the first IPv4 candidate that accepts, writes the serialized
//! request, performs one bounded read and parses the result into an
//! `HttpResponse`.
//!
//! # Design
//! - The serializer (`serialize`) and parser (`parse`) are pure functions
//!   over in-memory bytes and can be used without any networking.
//! - `connect` owns resolution and the ordered candidate fallback.
//! - `Client` composes the steps; it is stateless apart from its config.
//! - Every failure is a distinct `ExchangeError` variant. Sockets are
//!   released by ownership on every path.
//! - No pooling, TLS, chunked decoding, timeouts or retries. Callers
//!   that need a deadline must impose it outside this crate.

pub mod client;
pub mod config;
pub mod connect;
pub mod error;
pub mod http;
pub mod parse;
pub mod serialize;

pub use client::{exchange, Client, Received};
pub use config::{ExchangeConfig, DEFAULT_MAX_RECEIVE_SIZE, MAX_RECEIVE_SIZE_LIMIT};
pub use connect::Candidate;
pub use error::{ConfigError, ErrorKind, ExchangeError};
pub use http::{HttpRequest, HttpResponse};
pub use parse::{parse_request, parse_response};
pub use serialize::serialize_request;
