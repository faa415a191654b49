//! Request serialization.

use tracing::trace;

use crate::error::ExchangeError;
use crate::http::HttpRequest;

/// Encode `request` as HTTP/1.x wire bytes.
///
/// Writes the request line, each header in stored order, the blank line, and
/// the body verbatim. Nothing is added or reordered; in particular no
/// `Content-Length` is computed.
pub fn serialize_request(request: &HttpRequest) -> Result<Vec<u8>, ExchangeError> {
    if request.method.is_empty() {
        return Err(ExchangeError::MalformedRequest("empty method"));
    }
    if request.path.is_empty() {
        return Err(ExchangeError::MalformedRequest("empty path"));
    }

    let body_len = request.body.as_ref().map_or(0, Vec::len);
    let mut out = Vec::with_capacity(head_len(request) + body_len);

    out.extend_from_slice(request.method.as_bytes());
    out.push(b' ');
    out.extend_from_slice(request.path.as_bytes());
    out.push(b' ');
    out.extend_from_slice(request.version.as_bytes());
    out.extend_from_slice(b"\r\n");

    for (name, value) in &request.headers {
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(b": ");
        out.extend_from_slice(value.as_bytes());
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(b"\r\n");

    if let Some(body) = &request.body {
        out.extend_from_slice(body);
    }

    trace!(bytes = out.len(), headers = request.headers.len(), "request serialized");
    Ok(out)
}

fn head_len(request: &HttpRequest) -> usize {
    let line = request.method.len() + request.path.len() + request.version.len() + 4;
    let headers: usize = request
        .headers
        .iter()
        .map(|(n, v)| n.len() + v.len() + 4)
        .sum();
    line + headers + 2
}
