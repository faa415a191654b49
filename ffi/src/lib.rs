//! C-ABI wrapper around `shttp-core`.
//!
//! # Overview
//! Exposes the single-shot exchange to C. `shttp` keeps the classic
//! contract: a response pointer on success, null on any failure.
//! `shttp_exchange` returns a result envelope instead, so C callers can tell
//! a DNS failure from a refused connection or a bad reply.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Requests are borrowed and copied; the C caller keeps ownership.
//! - The C caller owns every returned pointer and must release it with the
//!   matching `shttp_free_*` function.

pub mod types;

use std::os::raw::c_char;
use std::panic::catch_unwind;

use shttp_core::{Client, ExchangeConfig};
use tracing::debug;

use types::*;

// ---------------------------------------------------------------------------
// Exchange
// ---------------------------------------------------------------------------

/// Send `request` to `host:port` and return the parsed response.
///
/// Returns null if any argument is null or invalid, or if the exchange fails
/// at any stage. Free the result with `shttp_free_response`.
#[unsafe(no_mangle)]
pub extern "C" fn shttp(
    request: *const FfiHttpRequest,
    host: *const c_char,
    port: u16,
) -> *mut FfiHttpResponse {
    catch_unwind(|| {
        if request.is_null() {
            return std::ptr::null_mut();
        }
        let request = match unsafe { (*request).to_core() } {
            Ok(r) => r,
            Err(e) => {
                debug!(error = %e.message(), "rejecting request");
                return std::ptr::null_mut();
            }
        };
        let host = match unsafe { read_str(host, "host") } {
            Ok(h) => h,
            Err(_) => return std::ptr::null_mut(),
        };
        match shttp_core::exchange(&request, &host, port) {
            Ok(resp) => FfiHttpResponse::from_core(resp),
            Err(e) => {
                debug!(error = %e, "exchange failed");
                std::ptr::null_mut()
            }
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Send `request` to `host:port`, reading at most `max_receive_size` bytes
/// of response (0 selects the default of 65536). A bound above
/// `MAX_RECEIVE_SIZE_LIMIT` (64 MiB) fails with `InvalidArg` before any
/// network I/O.
///
/// Always returns a result; free it with `shttp_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn shttp_exchange(
    request: *const FfiHttpRequest,
    host: *const c_char,
    port: u16,
    max_receive_size: usize,
) -> *mut FfiExchangeResult {
    catch_unwind(|| {
        if request.is_null() {
            return FfiExchangeResult::failure(FfiErrorCode::NullArg, "null argument: request".to_string());
        }
        let request = match unsafe { (*request).to_core() } {
            Ok(r) => r,
            Err(e) => return FfiExchangeResult::from_convert(e),
        };
        let host = match unsafe { read_str(host, "host") } {
            Ok(h) => h,
            Err(e) => return FfiExchangeResult::from_convert(e),
        };

        let config = if max_receive_size == 0 {
            ExchangeConfig::default()
        } else {
            ExchangeConfig::with_max_receive_size(max_receive_size)
        };
        if let Err(e) = config.validate() {
            return FfiExchangeResult::failure(FfiErrorCode::InvalidArg, e.to_string());
        }
        match Client::new(config).exchange(&request, &host, port) {
            Ok(resp) => FfiExchangeResult::ok(resp),
            Err(e) => FfiExchangeResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| {
        FfiExchangeResult::failure(FfiErrorCode::Panic, "panic in shttp_exchange".to_string())
    })
}

// ---------------------------------------------------------------------------
// Memory management
// ---------------------------------------------------------------------------

/// Free a response returned by `shttp`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn shttp_free_response(response: *mut FfiHttpResponse) {
    let _ = catch_unwind(|| unsafe { FfiHttpResponse::free(response) });
}

/// Free a result returned by `shttp_exchange`, including its response.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn shttp_free_result(result: *mut FfiExchangeResult) {
    let _ = catch_unwind(|| unsafe { FfiExchangeResult::free(result) });
}

/// Free a string returned inside a result. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn shttp_free_string(s: *mut c_char) {
    let _ = catch_unwind(|| unsafe { free_c_string(s) });
}
