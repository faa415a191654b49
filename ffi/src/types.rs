//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, pointer plus length instead of `Vec`.
//! Requests are borrowed from the C caller and only read. Responses and
//! results are allocated here and handed over; the caller releases them with
//! the matching `shttp_free_*` function. Conversion functions live here to
//! keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use shttp_core::{ErrorKind, ExchangeError, HttpRequest, HttpResponse};

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

/// A single header as a name/value pair of NUL-terminated strings.
#[repr(C)]
pub struct FfiHeader {
    pub name: *mut c_char,
    pub value: *mut c_char,
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// An HTTP request owned by the C caller.
///
/// `version` may be null, meaning `HTTP/1.1`. `headers` may be null when
/// `headers_len` is 0, and `body` may be null when there is no body.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: *const c_char,
    pub path: *const c_char,
    pub version: *const c_char,
    pub headers: *const FfiHeader,
    pub headers_len: u32,
    pub body: *const u8,
    pub body_len: usize,
}

/// Why a C request could not be converted.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ConvertError {
    Null(&'static str),
    Utf8(&'static str),
}

impl ConvertError {
    pub(crate) fn message(&self) -> String {
        match self {
            ConvertError::Null(field) => format!("null argument: {field}"),
            ConvertError::Utf8(field) => format!("invalid UTF-8 in {field}"),
        }
    }
}

/// Read a required C string.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string.
pub(crate) unsafe fn read_str(ptr: *const c_char, field: &'static str) -> Result<String, ConvertError> {
    if ptr.is_null() {
        return Err(ConvertError::Null(field));
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map(str::to_string)
        .map_err(|_| ConvertError::Utf8(field))
}

impl FfiHttpRequest {
    /// Copy the C request into a core `HttpRequest`.
    ///
    /// # Safety
    /// Every non-null pointer must be valid for the lengths given.
    pub(crate) unsafe fn to_core(&self) -> Result<HttpRequest, ConvertError> {
        let method = unsafe { read_str(self.method, "method") }?;
        let path = unsafe { read_str(self.path, "path") }?;
        let version = if self.version.is_null() {
            shttp_core::http::HTTP_1_1.to_string()
        } else {
            unsafe { read_str(self.version, "version") }?
        };

        let mut headers = Vec::with_capacity(self.headers_len as usize);
        if self.headers_len > 0 {
            if self.headers.is_null() {
                return Err(ConvertError::Null("headers"));
            }
            let raw = unsafe { std::slice::from_raw_parts(self.headers, self.headers_len as usize) };
            for header in raw {
                let name = unsafe { read_str(header.name, "header name") }?;
                let value = unsafe { read_str(header.value, "header value") }?;
                headers.push((name, value));
            }
        }

        let body = if self.body.is_null() {
            None
        } else {
            Some(unsafe { std::slice::from_raw_parts(self.body, self.body_len) }.to_vec())
        };

        Ok(HttpRequest {
            method,
            path,
            version,
            headers,
            body,
        })
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// A parsed HTTP response handed to C. Free with `shttp_free_response`.
///
/// `body` is not NUL-terminated; use `body_len`.
#[repr(C)]
pub struct FfiHttpResponse {
    pub version: *mut c_char,
    pub status: u16,
    pub reason: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut u8,
    pub body_len: usize,
}

/// C strings cannot hold interior NULs, so they are dropped.
pub(crate) fn to_c_string(s: String) -> *mut c_char {
    let s = if s.contains('\0') { s.replace('\0', "") } else { s };
    CString::new(s).unwrap_or_default().into_raw()
}

/// # Safety
/// `ptr` must be null or come from `to_c_string`.
pub(crate) unsafe fn free_c_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

impl FfiHttpResponse {
    /// Convert a core `HttpResponse` into a heap-allocated `FfiHttpResponse`.
    pub(crate) fn from_core(resp: HttpResponse) -> *mut Self {
        let headers: Box<[FfiHeader]> = resp
            .headers
            .into_iter()
            .map(|(name, value)| FfiHeader {
                name: to_c_string(name),
                value: to_c_string(value),
            })
            .collect();
        let headers_len = headers.len() as u32;
        let headers = if headers.is_empty() {
            std::ptr::null_mut()
        } else {
            Box::into_raw(headers) as *mut FfiHeader
        };

        let body_len = resp.body.len();
        let body = if body_len == 0 {
            std::ptr::null_mut()
        } else {
            Box::into_raw(resp.body.into_boxed_slice()) as *mut u8
        };

        Box::into_raw(Box::new(FfiHttpResponse {
            version: to_c_string(resp.version),
            status: resp.status,
            reason: to_c_string(resp.reason),
            headers,
            headers_len,
            body,
            body_len,
        }))
    }

    /// Release a response created by `from_core`.
    ///
    /// # Safety
    /// `ptr` must be null or come from `from_core`, and not be freed twice.
    pub(crate) unsafe fn free(ptr: *mut Self) {
        if ptr.is_null() {
            return;
        }
        let resp = unsafe { Box::from_raw(ptr) };
        unsafe {
            free_c_string(resp.version);
            free_c_string(resp.reason);
        }
        if !resp.headers.is_null() {
            let slice = std::ptr::slice_from_raw_parts_mut(resp.headers, resp.headers_len as usize);
            let headers = unsafe { Box::from_raw(slice) };
            for header in headers.iter() {
                unsafe {
                    free_c_string(header.name);
                    free_c_string(header.value);
                }
            }
        }
        if !resp.body.is_null() {
            let slice = std::ptr::slice_from_raw_parts_mut(resp.body, resp.body_len);
            drop(unsafe { Box::from_raw(slice) });
        }
    }
}

// ---------------------------------------------------------------------------
// Result envelope
// ---------------------------------------------------------------------------

/// Error code for `FfiExchangeResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    NullArg = 1,
    InvalidArg = 2,
    Resolution = 3,
    Connection = 4,
    MalformedRequest = 5,
    Transmission = 6,
    Receive = 7,
    MalformedResponse = 8,
    Panic = 9,
}

impl From<ErrorKind> for FfiErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Resolution => FfiErrorCode::Resolution,
            ErrorKind::Connection => FfiErrorCode::Connection,
            ErrorKind::MalformedRequest => FfiErrorCode::MalformedRequest,
            ErrorKind::Transmission => FfiErrorCode::Transmission,
            ErrorKind::Receive => FfiErrorCode::Receive,
            ErrorKind::MalformedResponse => FfiErrorCode::MalformedResponse,
        }
    }
}

/// Result of `shttp_exchange`.
///
/// On success `error_code` is `Ok`, `error_message` is null and `response`
/// points to the parsed response. On failure `error_code` describes the
/// category, `error_message` is a human-readable C string and `response` is
/// null.
#[repr(C)]
pub struct FfiExchangeResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub response: *mut FfiHttpResponse,
}

impl FfiExchangeResult {
    pub(crate) fn ok(resp: HttpResponse) -> *mut Self {
        Box::into_raw(Box::new(FfiExchangeResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            response: FfiHttpResponse::from_core(resp),
        }))
    }

    pub(crate) fn from_error(err: ExchangeError) -> *mut Self {
        Self::failure(err.kind().into(), err.to_string())
    }

    pub(crate) fn from_convert(err: ConvertError) -> *mut Self {
        let code = match err {
            ConvertError::Null(_) => FfiErrorCode::NullArg,
            ConvertError::Utf8(_) => FfiErrorCode::InvalidArg,
        };
        Self::failure(code, err.message())
    }

    pub(crate) fn failure(error_code: FfiErrorCode, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiExchangeResult {
            error_code,
            error_message: to_c_string(msg),
            response: std::ptr::null_mut(),
        }))
    }

    /// # Safety
    /// `ptr` must be null or come from one of the constructors above.
    pub(crate) unsafe fn free(ptr: *mut Self) {
        if ptr.is_null() {
            return;
        }
        let result = unsafe { Box::from_raw(ptr) };
        unsafe {
            free_c_string(result.error_message);
            FfiHttpResponse::free(result.response);
        }
    }
}
