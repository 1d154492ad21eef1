//! FFI bindings for the SRI engine
//!
//! This module provides C-compatible functions for calling the engine from
//! other languages. Strings returned to the caller are allocated here and
//! must be freed with `sri_free_string`.

use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;
use std::slice;

use crate::encoder::SriReportEncoder;
use crate::engine::SriEngine;
use crate::error::SriError;
use crate::types::EpochsPerDay;

/// Return code: SRI computed
pub const SRI_OK: i32 = 0;
/// Return code: series does not use exactly two state codes
pub const SRI_INVALID_ENCODING: i32 = 1;
/// Return code: no epoch pair one day apart is scored on both sides
pub const SRI_INSUFFICIENT_DATA: i32 = 2;
/// Return code: null pointer or zero epochs per day
pub const SRI_INVALID_ARGUMENT: i32 = -1;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Borrow the caller's buffer; an empty series may pass NULL
unsafe fn values_from_raw<'a>(values: *const f64, len: usize) -> Option<&'a [f64]> {
    if len == 0 {
        return Some(&[]);
    }
    if values.is_null() {
        return None;
    }
    Some(slice::from_raw_parts(values, len))
}

fn error_code(err: &SriError) -> i32 {
    match err {
        SriError::InvalidEncoding { .. } => SRI_INVALID_ENCODING,
        SriError::InsufficientData { .. } => SRI_INSUFFICIENT_DATA,
        _ => SRI_INVALID_ARGUMENT,
    }
}

// ============================================================================
// Computation API
// ============================================================================

/// Compute the SRI and valid comparison-days of an epoch series.
///
/// Missing epochs are passed as NaN.
///
/// # Safety
/// - `values` must point to `len` readable doubles (may be NULL when `len` is 0).
/// - `out_sri` and `out_days` must be valid, writable pointers.
/// - Returns `SRI_OK` on success. On any other return `out_sri` is NaN (when
///   writable) and `sri_last_error` describes the failure. `out_days` is 0 for
///   a series no longer than one day and NaN on every other failure.
#[no_mangle]
pub unsafe extern "C" fn sri_compute(
    values: *const f64,
    len: usize,
    epochs_per_day: usize,
    out_sri: *mut f64,
    out_days: *mut f64,
) -> i32 {
    clear_last_error();

    if out_sri.is_null() || out_days.is_null() {
        set_last_error("Null output pointer");
        return SRI_INVALID_ARGUMENT;
    }
    *out_sri = f64::NAN;
    *out_days = f64::NAN;

    let values = match values_from_raw(values, len) {
        Some(v) => v,
        None => {
            set_last_error("Null values pointer");
            return SRI_INVALID_ARGUMENT;
        }
    };

    let result = EpochsPerDay::new(epochs_per_day)
        .and_then(|n| SriEngine::new().compute_slice(values, n));

    match result {
        Ok(analysis) if analysis.sri.is_nan() => {
            *out_days = analysis.days;
            set_last_error("No epoch pair one day apart is scored on both sides");
            SRI_INSUFFICIENT_DATA
        }
        Ok(analysis) => {
            *out_sri = analysis.sri;
            *out_days = analysis.days;
            SRI_OK
        }
        Err(e) => {
            set_last_error(&e.to_string());
            error_code(&e)
        }
    }
}

/// Compute the SRI and return a JSON report.
///
/// # Safety
/// - `values` must point to `len` readable doubles (may be NULL when `len` is 0).
/// - Returns a newly allocated string that must be freed with `sri_free_string`.
/// - Invalid encoding and insufficient data are reported in the JSON status.
/// - Returns NULL on other errors; call `sri_last_error` to get the message.
#[no_mangle]
pub unsafe extern "C" fn sri_report_json(
    values: *const f64,
    len: usize,
    epochs_per_day: usize,
) -> *mut c_char {
    clear_last_error();

    let values = match values_from_raw(values, len) {
        Some(v) => v,
        None => {
            set_last_error("Null values pointer");
            return ptr::null_mut();
        }
    };

    let n = match EpochsPerDay::new(epochs_per_day) {
        Ok(n) => n,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    let result = SriEngine::new().compute_slice(values, n);

    match SriReportEncoder::new().encode_to_json(result, None, n.get(), len) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by SRI functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by an SRI function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn sri_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next SRI function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn sri_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn sri_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
