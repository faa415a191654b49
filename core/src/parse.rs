//! Parsing of HTTP/1.x messages held in memory.
//!
//! # Design
//! The parser works on whatever a single receive produced, so it must cope
//! with buffers cut short at the read boundary. A buffer without the blank
//! line that ends the header block is treated as headers only. The body is
//! never checked against `Content-Length` and never de-chunked.
//!
//! `parse_request` is the mirror image of the serializer and is used by
//! test peers that need to look at what the client sent.

use tracing::debug;

use crate::error::ExchangeError;
use crate::http::{HttpRequest, HttpResponse};

const HEADER_END: &[u8] = b"\r\n\r\n";

/// Parse a raw response buffer.
pub fn parse_response(buf: &[u8]) -> Result<HttpResponse, ExchangeError> {
    if buf.is_empty() {
        return Err(ExchangeError::MalformedResponse("empty response".to_string()));
    }

    let (head, body) = split_head(buf);
    let mut lines = head.split("\r\n");

    let status_line = lines.next().unwrap_or_default();
    let (version, status, reason) = parse_status_line(status_line)?;
    let headers = parse_headers(lines);

    Ok(HttpResponse {
        version: version.to_string(),
        status,
        reason: reason.to_string(),
        headers,
        body: body.to_vec(),
    })
}

/// Parse a raw request buffer. An empty body is reported as `None`.
pub fn parse_request(buf: &[u8]) -> Result<HttpRequest, ExchangeError> {
    if buf.is_empty() {
        return Err(ExchangeError::MalformedRequest("empty request"));
    }

    let (head, body) = split_head(buf);
    let mut lines = head.split("\r\n");

    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.splitn(3, ' ');
    let method = parts.next().unwrap_or_default();
    let path = parts.next().unwrap_or_default();
    let version = parts.next().unwrap_or_default();
    if method.is_empty() {
        return Err(ExchangeError::MalformedRequest("empty method"));
    }
    if path.is_empty() {
        return Err(ExchangeError::MalformedRequest("empty path"));
    }

    Ok(HttpRequest {
        method: method.to_string(),
        path: path.to_string(),
        version: version.to_string(),
        headers: parse_headers(lines),
        body: (!body.is_empty()).then(|| body.to_vec()),
    })
}

/// Split at the first blank line. Without one, the whole buffer is head.
fn split_head(buf: &[u8]) -> (String, &[u8]) {
    match find(buf, HEADER_END) {
        Some(pos) => (
            String::from_utf8_lossy(&buf[..pos]).into_owned(),
            &buf[pos + HEADER_END.len()..],
        ),
        None => (String::from_utf8_lossy(buf).into_owned(), &buf[buf.len()..]),
    }
}

fn parse_status_line(line: &str) -> Result<(&str, u16, &str), ExchangeError> {
    let mut parts = line.splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    let code = parts.next().unwrap_or_default();
    let reason = parts.next().unwrap_or_default();

    if version.is_empty() {
        return Err(malformed_status(line));
    }
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed_status(line));
    }
    let status = code.parse::<u16>().map_err(|_| malformed_status(line))?;

    Ok((version, status, reason))
}

fn malformed_status(line: &str) -> ExchangeError {
    ExchangeError::MalformedResponse(format!("bad status line {line:?}"))
}

fn parse_headers<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<(String, String)> {
    let mut headers = Vec::new();
    for line in lines {
        // Only reachable without a blank line (truncated head).
        if line.is_empty() {
            break;
        }
        match line.split_once(':') {
            Some((name, _)) if name.trim().is_empty() => {
                debug!(line, "skipping header line with empty name")
            }
            Some((name, value)) => {
                let value = value.strip_prefix(' ').unwrap_or(value);
                headers.push((name.to_string(), value.to_string()));
            }
            None => debug!(line, "skipping header line without colon"),
        }
    }
    headers
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialize::serialize_request;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn ok_with_one_header_and_body() {
        let resp =
            parse_response(b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nhello").unwrap();
        assert_eq!(resp.version, "HTTP/1.1");
        assert_eq!(resp.status, 200);
        assert_eq!(resp.reason, "OK");
        assert_eq!(resp.headers, pairs(&[("Content-Type", "text/plain")]));
        assert_eq!(resp.body, b"hello");
    }

    #[test]
    fn not_found_without_headers() {
        let resp = parse_response(b"HTTP/1.1 404 Not Found\r\n\r\n").unwrap();
        assert_eq!(resp.status, 404);
        assert_eq!(resp.reason, "Not Found");
        assert!(resp.headers.is_empty());
        assert!(resp.body.is_empty());
    }

    #[test]
    fn empty_buffer_is_malformed() {
        let err = parse_response(b"").unwrap_err();
        assert!(matches!(err, ExchangeError::MalformedResponse(_)));
    }

    #[test]
    fn missing_blank_line_yields_headers_and_empty_body() {
        let resp = parse_response(b"HTTP/1.1 200 OK\r\nServer: x\r\nX-Partial: y").unwrap();
        assert_eq!(resp.headers, pairs(&[("Server", "x"), ("X-Partial", "y")]));
        assert!(resp.body.is_empty());
    }

    #[test]
    fn status_line_only() {
        let resp = parse_response(b"HTTP/1.0 204 No Content").unwrap();
        assert_eq!(resp.version, "HTTP/1.0");
        assert_eq!(resp.status, 204);
        assert!(resp.headers.is_empty());
    }

    #[test]
    fn missing_reason_is_empty() {
        let resp = parse_response(b"HTTP/1.1 200\r\n\r\n").unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.reason, "");
    }

    #[test]
    fn reason_keeps_inner_spaces() {
        let resp = parse_response(b"HTTP/1.1 503 Service Temporarily Unavailable\r\n\r\n").unwrap();
        assert_eq!(resp.reason, "Service Temporarily Unavailable");
    }

    #[test]
    fn non_numeric_status_is_malformed() {
        let err = parse_response(b"HTTP/1.1 abc OK\r\n\r\n").unwrap_err();
        assert!(matches!(err, ExchangeError::MalformedResponse(_)));
    }

    #[test]
    fn status_must_have_three_digits() {
        let cases: [&[u8]; 3] = [
            b"HTTP/1.1 20 OK\r\n\r\n",
            b"HTTP/1.1 2000 OK\r\n\r\n",
            b"HTTP/1.1 +20 OK\r\n\r\n",
        ];
        for raw in cases {
            let err = parse_response(raw).unwrap_err();
            assert!(matches!(err, ExchangeError::MalformedResponse(_)));
        }
    }

    #[test]
    fn garbage_is_malformed() {
        let err = parse_response(b"\x00\x01\x02").unwrap_err();
        assert!(matches!(err, ExchangeError::MalformedResponse(_)));
    }

    #[test]
    fn only_one_leading_space_is_trimmed() {
        let resp = parse_response(b"HTTP/1.1 200 OK\r\nA:  two\r\nB:none\r\nC: x: y\r\n\r\n").unwrap();
        assert_eq!(
            resp.headers,
            pairs(&[("A", " two"), ("B", "none"), ("C", "x: y")])
        );
    }

    #[test]
    fn body_is_taken_verbatim() {
        let resp =
            parse_response(b"HTTP/1.1 200 OK\r\nContent-Length: 99\r\n\r\nab\r\n\r\ncd\x00").unwrap();
        assert_eq!(resp.body, b"ab\r\n\r\ncd\x00");
    }

    #[test]
    fn header_line_without_colon_is_skipped() {
        let resp = parse_response(b"HTTP/1.1 200 OK\r\nbogus\r\nServer: x\r\n\r\n").unwrap();
        assert_eq!(resp.headers, pairs(&[("Server", "x")]));
    }

    #[test]
    fn header_line_with_empty_name_is_skipped() {
        let resp =
            parse_response(b"HTTP/1.1 200 OK\r\n: v\r\n  :w\r\nServer: x\r\n\r\n").unwrap();
        assert_eq!(resp.headers, pairs(&[("Server", "x")]));
        assert_eq!(resp.header("Server"), Some("x"));
    }

    #[test]
    fn request_round_trips_through_serializer() {
        let req = HttpRequest::new("PUT", "/items/7?x=1")
            .header("Host", "localhost")
            .header("X-Order", "first")
            .header("x-order", "second")
            .body("payload");
        let parsed = parse_request(&serialize_request(&req).unwrap()).unwrap();
        assert_eq!(parsed, req);
    }

    #[test]
    fn request_without_body_parses_to_none() {
        let parsed = parse_request(b"GET / HTTP/1.1\r\nHost: a\r\n\r\n").unwrap();
        assert_eq!(parsed.method, "GET");
        assert_eq!(parsed.headers, pairs(&[("Host", "a")]));
        assert!(parsed.body.is_none());
    }

    #[test]
    fn request_with_empty_method_is_malformed() {
        let err = parse_request(b" / HTTP/1.1\r\n\r\n").unwrap_err();
        assert!(matches!(err, ExchangeError::MalformedRequest("empty method")));
    }
}
