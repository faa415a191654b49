//! In-process HTTP server used as the peer in exchange tests.
//!
//! `app()` builds the router and `run(listener)` serves it on a listener the
//! test already bound, so tests pick a random port and know it up front.
//!
//! Routes:
//! - `GET /hello` replies `hello` as `text/plain`.
//! - `POST /echo` returns the request body with the request's content type.
//! - `GET /headers` lists the request headers as JSON `SeenHeader`s.
//! - `GET /status/{code}` replies with an empty body and that status.
//! - `GET /bytes/{n}` replies with `n` bytes of `x`, up to `MAX_BYTES`.

use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// Largest body `/bytes/{n}` will produce.
pub const MAX_BYTES: usize = 1 << 20;

/// A request header as seen by the server, in arrival order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeenHeader {
    pub name: String,
    pub value: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/hello", get(hello))
        .route("/echo", post(echo))
        .route("/headers", get(headers))
        .route("/status/{code}", get(status))
        .route("/bytes/{n}", get(repeat_bytes))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn hello() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain")], "hello")
}

async fn echo(headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();
    ([(header::CONTENT_TYPE, content_type)], body)
}

async fn headers(headers: HeaderMap) -> Json<Vec<SeenHeader>> {
    let seen = headers
        .iter()
        .map(|(name, value)| SeenHeader {
            name: name.as_str().to_string(),
            value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
        })
        .collect();
    Json(seen)
}

async fn status(Path(code): Path<u16>) -> Result<StatusCode, StatusCode> {
    StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)
}

async fn repeat_bytes(Path(n): Path<usize>) -> Result<impl IntoResponse, StatusCode> {
    if n > MAX_BYTES {
        return Err(StatusCode::PAYLOAD_TOO_LARGE);
    }
    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], vec![b'x'; n]))
}
