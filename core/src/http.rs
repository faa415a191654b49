//! HTTP message types exchanged over the wire.
//!
//! # Design
//! Requests and responses are plain data with owned fields. The serializer
//! turns an `HttpRequest` into bytes and the parser turns bytes back into an
//! `HttpResponse`; neither type knows about sockets.
//!
//! Header collections are ordered `(name, value)` pairs. Names keep the
//! casing the caller (or the peer) gave them; lookups compare
//! case-insensitively.

/// Protocol version used by the request builders.
pub const HTTP_1_1: &str = "HTTP/1.1";

/// An HTTP request described as plain data.
///
/// The body is sent verbatim. The caller is responsible for any
/// `Content-Length` header that should accompany it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub version: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            version: HTTP_1_1.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new("GET", path)
    }

    /// A `POST` carrying `body`. No `Content-Length` is added.
    pub fn post(path: &str, body: impl Into<Vec<u8>>) -> Self {
        Self::new("POST", path).body(body)
    }

    /// Append a header, keeping insertion order.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// An HTTP response parsed from a single receive buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub version: String,
    pub status: u16,
    pub reason: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Value of the first header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_to_http_1_1() {
        let req = HttpRequest::get("/index.html");
        assert_eq!(req.method, "GET");
        assert_eq!(req.path, "/index.html");
        assert_eq!(req.version, "HTTP/1.1");
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn builder_keeps_header_order() {
        let req = HttpRequest::get("/")
            .header("Host", "example.com")
            .header("Accept", "*/*")
            .header("host", "duplicate.example");
        let names: Vec<&str> = req.headers.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["Host", "Accept", "host"]);
    }

    #[test]
    fn post_does_not_inject_content_length() {
        let req = HttpRequest::post("/submit", "a=1");
        assert_eq!(req.method, "POST");
        assert_eq!(req.body.as_deref(), Some(&b"a=1"[..]));
        assert!(req.headers.is_empty());
    }

    #[test]
    fn response_header_lookup_ignores_case() {
        let resp = HttpResponse {
            version: "HTTP/1.1".to_string(),
            status: 200,
            reason: "OK".to_string(),
            headers: vec![
                ("Content-Type".to_string(), "text/plain".to_string()),
                ("content-type".to_string(), "text/html".to_string()),
            ],
            body: b"hi".to_vec(),
        };
        assert_eq!(resp.header("CONTENT-TYPE"), Some("text/plain"));
        assert_eq!(resp.header("Server"), None);
        assert_eq!(resp.body_text(), "hi");
    }
}
