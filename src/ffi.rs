//! FFI interface for the page side of the boundary
//!
//! Hosts that can hand over the rendered HTML of a tab run page requests
//! through these C-compatible functions. Requests and results travel as JSON.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use serde::Serialize;

use crate::extractors::PageSnapshot;
use crate::query::PageRequest;
use crate::template::{format_template, TemplateVars};

/// Result struct returned to the host
/// Both pointers are owned by Rust and must be freed via free_page_result
#[repr(C)]
pub struct PageResultFFI {
    /// JSON-serialized result (null-terminated)
    pub json_ptr: *mut c_char,
    /// Error message if evaluation failed (null-terminated), or null on success
    pub error_ptr: *mut c_char,
}

/// Evaluate a page request against rendered HTML.
///
/// # Arguments
/// * `html_ptr` - Pointer to HTML content (UTF-8, not necessarily null-terminated)
/// * `html_len` - Length of HTML content in bytes
/// * `base_url` - URL of the page for resolving links (null-terminated), may be null
/// * `request_json` - JSON-serialized PageRequest (null-terminated)
///
/// # Returns
/// PageResultFFI whose JSON is a PageValue, or `null` when nothing matched
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes
/// - `base_url` must be null or a valid null-terminated C string
/// - `request_json` must be a valid null-terminated C string
/// - Caller must free the result via `free_page_result`
#[no_mangle]
pub unsafe extern "C" fn evaluate_page_request(
    html_ptr: *const c_char,
    html_len: usize,
    base_url: *const c_char,
    request_json: *const c_char,
) -> PageResultFFI {
    let html = match read_html(html_ptr, html_len) {
        Ok(h) => h,
        Err(msg) => return make_error_result(msg),
    };

    let base_url = if base_url.is_null() {
        None
    } else {
        match CStr::from_ptr(base_url).to_str() {
            Ok(s) => Some(s),
            Err(_) => return make_error_result("Invalid UTF-8 in base URL"),
        }
    };

    let request_str = match read_cstr(request_json, "Request JSON") {
        Ok(s) => s,
        Err(msg) => return make_error_result(&msg),
    };

    let request: PageRequest = match serde_json::from_str(request_str) {
        Ok(r) => r,
        Err(e) => {
            return make_error_result(&format!("Failed to parse request JSON: {}", e));
        }
    };

    let snapshot = PageSnapshot::parse(&html, base_url);
    make_json_result(&snapshot.evaluate(&request))
}

/// Render a copy template with a link and title.
///
/// The JSON result is the rendered string.
///
/// # Safety
/// - All three arguments must be valid null-terminated C strings
/// - Caller must free the result via `free_page_result`
#[no_mangle]
pub unsafe extern "C" fn format_template_ffi(
    template: *const c_char,
    link: *const c_char,
    title: *const c_char,
) -> PageResultFFI {
    let (template, link, title) = match (
        read_cstr(template, "Template"),
        read_cstr(link, "Link"),
        read_cstr(title, "Title"),
    ) {
        (Ok(t), Ok(l), Ok(ti)) => (t, l, ti),
        (Err(msg), _, _) | (_, Err(msg), _) | (_, _, Err(msg)) => {
            return make_error_result(&msg)
        }
    };

    make_json_result(&format_template(template, &TemplateVars { link, title }))
}

/// Free a PageResultFFI returned by this module
///
/// # Safety
/// - `result` must have been returned by a function of this module
/// - Must only be called once per result
#[no_mangle]
pub unsafe extern "C" fn free_page_result(result: PageResultFFI) {
    if !result.json_ptr.is_null() {
        drop(CString::from_raw(result.json_ptr));
    }
    if !result.error_ptr.is_null() {
        drop(CString::from_raw(result.error_ptr));
    }
}

unsafe fn read_html(html_ptr: *const c_char, html_len: usize) -> Result<String, &'static str> {
    if html_ptr.is_null() || html_len == 0 {
        return Ok(String::new());
    }
    let slice = std::slice::from_raw_parts(html_ptr as *const u8, html_len);
    std::str::from_utf8(slice)
        .map(|s| s.to_string())
        .map_err(|_| "Invalid UTF-8 in HTML")
}

unsafe fn read_cstr<'a>(ptr: *const c_char, what: &str) -> Result<&'a str, String> {
    if ptr.is_null() {
        return Err(format!("{} is null", what));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| format!("Invalid UTF-8 in {}", what))
}

fn make_json_result<T: Serialize>(value: &T) -> PageResultFFI {
    match serde_json::to_string(value) {
        Ok(json) => match CString::new(json) {
            Ok(cstr) => PageResultFFI {
                json_ptr: cstr.into_raw(),
                error_ptr: ptr::null_mut(),
            },
            Err(_) => make_error_result("Result contains null bytes"),
        },
        Err(e) => make_error_result(&format!("Serialize error: {}", e)),
    }
}

// Helper to create error result
fn make_error_result(msg: &str) -> PageResultFFI {
    let error_cstr = CString::new(msg).unwrap_or_else(|_| c"Unknown error".to_owned());
    PageResultFFI {
        json_ptr: ptr::null_mut(),
        error_ptr: error_cstr.into_raw(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::PageValue;

    unsafe fn take(result: PageResultFFI) -> Result<String, String> {
        let out = if result.error_ptr.is_null() {
            Ok(CStr::from_ptr(result.json_ptr).to_str().unwrap().to_string())
        } else {
            Err(CStr::from_ptr(result.error_ptr).to_str().unwrap().to_string())
        };
        free_page_result(result);
        out
    }

    #[test]
    fn test_evaluate_page_request() {
        let html = r#"<div class="up-detail-top"><a class="up-name" href="/space/7">Bob</a></div>"#;
        let base = CString::new("https://www.bilibili.com/video/BV1").unwrap();
        let request = CString::new(
            r#"{"query": {"selector": ".up-detail-top"},
                "post": {"kind": "nested_link", "selector": "a.up-name"}}"#,
        )
        .unwrap();

        let json = unsafe {
            take(evaluate_page_request(
                html.as_ptr() as *const c_char,
                html.len(),
                base.as_ptr(),
                request.as_ptr(),
            ))
        }
        .unwrap();

        let value: Option<PageValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            Some(PageValue::Pair {
                text: "Bob".to_string(),
                detail: "https://www.bilibili.com/space/7".to_string(),
            })
        );
    }

    #[test]
    fn test_not_found_is_null() {
        let html = "<p>nothing</p>";
        let request = CString::new(r#"{"query": {"selector": ".title", "index": -1}}"#).unwrap();

        let json = unsafe {
            take(evaluate_page_request(
                html.as_ptr() as *const c_char,
                html.len(),
                ptr::null(),
                request.as_ptr(),
            ))
        }
        .unwrap();
        assert_eq!(json, "null");
    }

    #[test]
    fn test_bad_request() {
        let request = CString::new("{not json").unwrap();
        let err = unsafe {
            take(evaluate_page_request(ptr::null(), 0, ptr::null(), request.as_ptr()))
        }
        .unwrap_err();
        assert!(err.starts_with("Failed to parse request JSON"));

        let err = unsafe {
            take(evaluate_page_request(ptr::null(), 0, ptr::null(), ptr::null()))
        }
        .unwrap_err();
        assert_eq!(err, "Request JSON is null");
    }

    #[test]
    fn test_format_template_ffi() {
        let template = CString::new("- ${link}\n- ${title}").unwrap();
        let link = CString::new("https://a.b/c").unwrap();
        let title = CString::new("Hi").unwrap();

        let json = unsafe {
            take(format_template_ffi(template.as_ptr(), link.as_ptr(), title.as_ptr()))
        }
        .unwrap();
        let rendered: String = serde_json::from_str(&json).unwrap();
        assert_eq!(rendered, "- https://a.b/c\n- Hi");
    }
}
