//! FFI bindings for the wellness engine
//!
//! C-compatible entry points for the pure scoring API. All functions take and
//! return null-terminated C strings; returned strings are heap-allocated and
//! must be released with `wellness_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::config::EngineConfig;
use crate::pipeline::{report_from_json, risk_from_json};
use crate::symptoms::conditions;

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

unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Map a library result onto the C convention: string or NULL + last error
fn into_c_result<E: std::fmt::Display>(result: Result<String, E>) -> *mut c_char {
    match result {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Scoring API
// ============================================================================

/// Score a JSON array of symptom IDs.
///
/// # Safety
/// - `symptoms_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
/// - Returns NULL on error; call `wellness_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wellness_compute_risk(symptoms_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let Some(json) = cstr_to_string(symptoms_json) else {
        set_last_error("Invalid symptoms string pointer");
        return ptr::null_mut();
    };

    into_c_result(risk_from_json(&json))
}

/// Build a wellness report envelope from JSON logs and symptom history.
///
/// # Safety
/// - `logs_json` must be a valid null-terminated C string.
/// - `history_json` and `config_json` may be NULL (no history / default config).
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
/// - Returns NULL on error; call `wellness_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wellness_build_report(
    logs_json: *const c_char,
    history_json: *const c_char,
    config_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some(logs) = cstr_to_string(logs_json) else {
        set_last_error("Invalid logs string pointer");
        return ptr::null_mut();
    };
    let history = cstr_to_string(history_json);

    let config = match cstr_to_string(config_json) {
        Some(json) => match EngineConfig::from_json(&json) {
            Ok(config) => config,
            Err(e) => {
                set_last_error(&e.to_string());
                return ptr::null_mut();
            }
        },
        None => EngineConfig::default(),
    };

    into_c_result(report_from_json(&logs, history.as_deref(), &config))
}

/// Search the condition table; returns a JSON array.
///
/// # Safety
/// - `query` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
#[no_mangle]
pub unsafe extern "C" fn wellness_search_conditions(query: *const c_char) -> *mut c_char {
    clear_last_error();

    let Some(query) = cstr_to_string(query) else {
        set_last_error("Invalid query string pointer");
        return ptr::null_mut();
    };

    into_c_result(serde_json::to_string(&conditions::search(&query)))
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by a wellness function.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a wellness function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn wellness_free_string(ptr: *mut c_char) {
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
/// - The returned pointer is valid until the next wellness function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn wellness_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn wellness_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn sample_logs_json() -> CString {
        CString::new(
            r#"[
                {"date": "2024-01-15", "sleep_hours": 6.0, "exercise_minutes": 20,
                 "daily_steps": 6000, "diet_quality": 6, "stress_level": 6},
                {"log_date": "2024-01-14", "sleep_hours": 7.5, "stress_level": 4}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_ffi_compute_risk() {
        let symptoms = CString::new(r#"["chest_pain", "shortness_breath", "palpitations"]"#).unwrap();

        unsafe {
            let result = wellness_compute_risk(symptoms.as_ptr());
            assert!(!result.is_null());

            let result_str = CStr::from_ptr(result).to_str().unwrap();
            assert!(result_str.contains("\"high\""));
            assert!(result_str.contains("cardiovascular concern"));

            wellness_free_string(result);
        }
    }

    #[test]
    fn test_ffi_build_report() {
        let logs = sample_logs_json();

        unsafe {
            let result = wellness_build_report(logs.as_ptr(), ptr::null(), ptr::null());
            assert!(!result.is_null());

            let value: serde_json::Value =
                serde_json::from_str(CStr::from_ptr(result).to_str().unwrap()).unwrap();
            assert_eq!(value["report"]["averages"]["days"], 2);
            assert!(value["report"]["stability_score"].is_number());

            wellness_free_string(result);
        }
    }

    #[test]
    fn test_ffi_build_report_with_config() {
        let logs = sample_logs_json();
        let config = CString::new(r#"{"alert_threshold": 99.0}"#).unwrap();

        unsafe {
            let result = wellness_build_report(logs.as_ptr(), ptr::null(), config.as_ptr());
            assert!(!result.is_null());
            let value: serde_json::Value =
                serde_json::from_str(CStr::from_ptr(result).to_str().unwrap()).unwrap();
            assert_eq!(value["report"]["alert_triggered"], true);
            wellness_free_string(result);
        }
    }

    #[test]
    fn test_ffi_build_report_rejects_oversized_cooldown() {
        let logs = sample_logs_json();
        let config = CString::new(r#"{"cooldown_hours": 9223372036854775807}"#).unwrap();

        unsafe {
            let result = wellness_build_report(logs.as_ptr(), ptr::null(), config.as_ptr());
            assert!(result.is_null());
            let error_str = CStr::from_ptr(wellness_last_error()).to_str().unwrap();
            assert!(error_str.contains("cooldown_hours"));
        }
    }

    #[test]
    fn test_ffi_error_handling() {
        let invalid = CString::new("not json").unwrap();

        unsafe {
            let result = wellness_build_report(invalid.as_ptr(), ptr::null(), ptr::null());
            assert!(result.is_null());

            let error = wellness_last_error();
            assert!(!error.is_null());
            let error_str = CStr::from_ptr(error).to_str().unwrap();
            assert!(error_str.starts_with("Invalid JSON"));

            let empty = CString::new("[]").unwrap();
            assert!(wellness_compute_risk(empty.as_ptr()).is_null());
            let error_str = CStr::from_ptr(wellness_last_error()).to_str().unwrap();
            assert!(error_str.contains("empty"));
        }
    }

    #[test]
    fn test_ffi_null_pointer() {
        unsafe {
            assert!(wellness_compute_risk(ptr::null()).is_null());
            assert!(!wellness_last_error().is_null());
        }
    }

    #[test]
    fn test_ffi_search_conditions() {
        let query = CString::new("asthma").unwrap();
        unsafe {
            let result = wellness_search_conditions(query.as_ptr());
            assert!(!result.is_null());
            let value: serde_json::Value =
                serde_json::from_str(CStr::from_ptr(result).to_str().unwrap()).unwrap();
            assert!(value.as_array().map(|a| !a.is_empty()).unwrap_or(false));
            wellness_free_string(result);
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = wellness_version();
            assert!(!version.is_null());

            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert_eq!(version_str, crate::ENGINE_VERSION);
        }
    }
}
