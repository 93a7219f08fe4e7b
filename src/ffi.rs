//! FFI interface for host interop
//!
//! C-compatible entry points over the benchmark engine. Requests and
//! results cross the boundary as JSON.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::benchmark::{BenchmarkOptions, Engine};
use crate::config::EngineConfig;
use crate::cost::FetchMeasurements;
use crate::error::ConfigError;
use crate::preference::{BotType, SimulationMode};

/// Result struct returned to the host.
/// Both pointers are owned by Rust and must be freed via `free_waio_result`
#[repr(C)]
pub struct WaioResultFFI {
    /// JSON-serialized result (null-terminated)
    pub json_ptr: *mut c_char,
    /// Error message (null-terminated), or null on success
    pub error_ptr: *mut c_char,
}

#[derive(Debug, Error)]
pub enum FfiError {
    #[error("Request JSON is null")]
    NullRequest,

    #[error("Invalid UTF-8 in request JSON")]
    RequestEncoding,

    #[error("Failed to parse request JSON: {0}")]
    RequestJson(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Benchmark request sent by the host alongside the HTML
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkRequest {
    #[serde(flatten)]
    pub fetch: FetchMeasurements,
    pub url: Option<String>,
    pub bot: Option<BotType>,
    pub mode: SimulationMode,
    /// Overrides the default engine configuration
    pub config: Option<EngineConfig>,
}

impl BenchmarkRequest {
    fn options(&self) -> Result<BenchmarkOptions, FfiError> {
        let mut options = BenchmarkOptions {
            bot: self.bot,
            mode: self.mode,
            ..Default::default()
        };
        if let Some(url) = &self.url {
            options = options.with_url(url)?;
        }
        Ok(options)
    }

    fn engine(&self) -> Result<Engine, FfiError> {
        match &self.config {
            Some(config) => Ok(Engine::new(config.clone())?),
            None => Ok(Engine::default()),
        }
    }
}

/// Run both extractors and the cost model over one page.
///
/// # Arguments
/// * `html_ptr` - Pointer to HTML content (UTF-8, not necessarily null-terminated)
/// * `html_len` - Length of HTML content in bytes
/// * `request_json` - JSON-serialized `BenchmarkRequest` (null-terminated)
///
/// # Returns
/// `WaioResultFFI` with either json_ptr set (a `ComparisonResult`) or
/// error_ptr set. HTML that is not valid UTF-8 is not an error: every
/// field is reported unresolved.
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes
/// - `request_json` must be a valid null-terminated C string
/// - Caller must free the result via `free_waio_result`
#[no_mangle]
pub unsafe extern "C" fn waio_benchmark_ffi(
    html_ptr: *const c_char,
    html_len: usize,
    request_json: *const c_char,
) -> WaioResultFFI {
    let html = html_bytes(html_ptr, html_len);

    let outcome = read_request(request_json).and_then(|request| {
        let engine = request.engine()?;
        let options = request.options()?;
        Ok(engine.run_bytes(html, &request.fetch, &options))
    });

    match outcome {
        Ok(result) => to_ffi(&result),
        Err(e) => make_error_result(&e.to_string()),
    }
}

/// Heuristic extraction only
///
/// # Safety
/// Same as `waio_benchmark_ffi` for `html_ptr` / `html_len`
#[no_mangle]
pub unsafe extern "C" fn waio_heuristic_ffi(
    html_ptr: *const c_char,
    html_len: usize,
) -> WaioResultFFI {
    match std::str::from_utf8(html_bytes(html_ptr, html_len)) {
        Ok(html) => to_ffi(&Engine::default().extract_heuristic(html)),
        Err(_) => to_ffi(&crate::extractors::ExtractionResult::unresolved()),
    }
}

/// Explicit-marker extraction only
///
/// # Safety
/// Same as `waio_benchmark_ffi` for `html_ptr` / `html_len`
#[no_mangle]
pub unsafe extern "C" fn waio_markup_ffi(
    html_ptr: *const c_char,
    html_len: usize,
) -> WaioResultFFI {
    match std::str::from_utf8(html_bytes(html_ptr, html_len)) {
        Ok(html) => to_ffi(&Engine::default().extract_markup(html)),
        Err(_) => to_ffi(&crate::extractors::ExtractionResult::unresolved()),
    }
}

/// Free a `WaioResultFFI` returned by any entry point of this module
///
/// # Safety
/// - `result` must have been returned by this module
/// - Must only be called once per result
#[no_mangle]
pub unsafe extern "C" fn free_waio_result(result: WaioResultFFI) {
    if !result.json_ptr.is_null() {
        drop(CString::from_raw(result.json_ptr));
    }
    if !result.error_ptr.is_null() {
        drop(CString::from_raw(result.error_ptr));
    }
}

unsafe fn html_bytes<'a>(html_ptr: *const c_char, html_len: usize) -> &'a [u8] {
    if html_ptr.is_null() || html_len == 0 {
        &[]
    } else {
        std::slice::from_raw_parts(html_ptr as *const u8, html_len)
    }
}

unsafe fn read_request(request_json: *const c_char) -> Result<BenchmarkRequest, FfiError> {
    if request_json.is_null() {
        return Err(FfiError::NullRequest);
    }
    let raw = CStr::from_ptr(request_json)
        .to_str()
        .map_err(|_| FfiError::RequestEncoding)?;
    Ok(serde_json::from_str(raw)?)
}

fn to_ffi<T: Serialize>(value: &T) -> WaioResultFFI {
    match serde_json::to_string(value) {
        Ok(json) => match CString::new(json) {
            Ok(cstr) => WaioResultFFI {
                json_ptr: cstr.into_raw(),
                error_ptr: ptr::null_mut(),
            },
            Err(_) => make_error_result("Result JSON contains null bytes"),
        },
        Err(e) => make_error_result(&format!("Failed to serialize result: {}", e)),
    }
}

fn make_error_result(msg: &str) -> WaioResultFFI {
    // Interior NULs would truncate the message; drop them instead
    let error_cstr = CString::new(msg.replace('\0', "")).unwrap_or_default();
    WaioResultFFI {
        json_ptr: ptr::null_mut(),
        error_ptr: error_cstr.into_raw(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe fn take(result: WaioResultFFI) -> Result<serde_json::Value, String> {
        let outcome = if result.error_ptr.is_null() {
            let json = CStr::from_ptr(result.json_ptr).to_str().unwrap();
            Ok(serde_json::from_str(json).unwrap())
        } else {
            Err(CStr::from_ptr(result.error_ptr).to_str().unwrap().to_string())
        };
        free_waio_result(result);
        outcome
    }

    fn benchmark(html: &[u8], request: &str) -> Result<serde_json::Value, String> {
        let request = CString::new(request).unwrap();
        unsafe {
            take(waio_benchmark_ffi(
                html.as_ptr() as *const c_char,
                html.len(),
                request.as_ptr(),
            ))
        }
    }

    const PAGE: &str = r#"<html><body>
        <h1 data-ai-title="Marked">Heading</h1>
        <p data-ai-summary="Marked summary">Intro</p>
        <article data-ai-content="">Article body text for the main content field.</article>
    </body></html>"#;

    #[test]
    fn test_benchmark_round_trip() {
        let value = benchmark(
            PAGE.as_bytes(),
            r#"{"network_time_ms": 150.0, "status_code": 200, "url": "https://example.com/a"}"#,
        )
        .unwrap();

        assert_eq!(value["url"], "https://example.com/a");
        assert_eq!(value["merged"]["title"]["value"], "Marked");
        assert_eq!(value["merged"]["title"]["provenance"], "waio");
        assert_eq!(value["waio"]["metrics"]["network_time"], 150.0);
        assert_eq!(value["waio"]["metrics"]["cognitive_time"], 0.0);
        assert_eq!(value["gain_percent"], 100.0);
    }

    #[test]
    fn test_bot_and_mode_in_request() {
        let value = benchmark(
            PAGE.as_bytes(),
            r#"{"bot": "ClaudeBot", "mode": "Industry Consensus"}"#,
        )
        .unwrap();
        assert_eq!(value["bot"], "ClaudeBot");
        assert_eq!(value["simulation_mode"], "Industry Consensus");
    }

    #[test]
    fn test_request_errors_reported() {
        let err = benchmark(PAGE.as_bytes(), "{broken").unwrap_err();
        assert!(err.starts_with("Failed to parse request JSON"));

        let err = benchmark(PAGE.as_bytes(), r#"{"url": "no scheme here"}"#).unwrap_err();
        assert!(err.starts_with("Invalid URL"));

        let err = benchmark(
            PAGE.as_bytes(),
            r#"{"config": {"cost": {"baseline_ms": -1.0}}}"#,
        )
        .unwrap_err();
        assert!(err.contains("cost.baseline_ms"));

        let err = unsafe { take(waio_benchmark_ffi(ptr::null(), 0, ptr::null())) }.unwrap_err();
        assert_eq!(err, "Request JSON is null");
    }

    #[test]
    fn test_invalid_utf8_html_is_not_an_error() {
        let value = benchmark(&[0xff, 0xfe, 0x00, 0x41], "{}").unwrap();
        assert_eq!(value["merged"]["title"]["found"], false);
        assert_eq!(value["merged"]["main_content"]["found"], false);

        let bytes = [0xc3u8, 0x28];
        let value = unsafe {
            take(waio_markup_ffi(bytes.as_ptr() as *const c_char, bytes.len()))
        }
        .unwrap();
        assert_eq!(value["markup_detected"], false);
    }

    #[test]
    fn test_single_strategy_entry_points() {
        let heuristic = unsafe {
            take(waio_heuristic_ffi(PAGE.as_ptr() as *const c_char, PAGE.len()))
        }
        .unwrap();
        assert_eq!(heuristic["title"]["value"], "Heading");
        assert_eq!(heuristic["title"]["provenance"], "heuristic");

        let markup = unsafe { take(waio_markup_ffi(PAGE.as_ptr() as *const c_char, PAGE.len())) }
            .unwrap();
        assert_eq!(markup["summary"]["value"], "Marked summary");
        assert_eq!(markup["main_content"]["provenance"], "waio");
    }
}
