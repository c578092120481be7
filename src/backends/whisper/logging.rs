use std::ffi::CStr;
use std::os::raw::{c_char, c_void};
use std::sync::Once;

use tracing::{debug, warn};

// ggml_log_level values.
const GGML_LOG_LEVEL_WARN: u32 = 3;
const GGML_LOG_LEVEL_ERROR: u32 = 4;

/// Forward whisper.cpp's native log lines into `tracing`.
///
/// whisper.cpp writes to the process's stdio by default, which would interleave with the
/// JSON response stream. Routing it through `tracing` keeps it on the diagnostic stream.
unsafe extern "C" fn whisper_log_callback(
    level: u32,
    c_msg: *const c_char,
    _user_data: *mut c_void,
) {
    if c_msg.is_null() {
        return;
    }

    // SAFETY: whisper.cpp hands us a NUL-terminated string valid for this call.
    let msg = unsafe { CStr::from_ptr(c_msg) }.to_string_lossy();
    let msg = msg.trim_end();
    if msg.is_empty() {
        return;
    }

    match level {
        GGML_LOG_LEVEL_WARN | GGML_LOG_LEVEL_ERROR => warn!(target: "whisper_cpp", "{msg}"),
        _ => debug!(target: "whisper_cpp", "{msg}"),
    }
}

/// Ensure whisper logging is configured exactly once for the lifetime of the process.
pub fn init_whisper_logging() {
    static INIT: Once = Once::new();

    INIT.call_once(|| unsafe {
        whisper_rs::set_log_callback(Some(whisper_log_callback), std::ptr::null_mut());
    });
}
