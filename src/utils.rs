use wasm_bindgen::JsValue;

/// Current time in milliseconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
pub fn now_millis() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_millis() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}

/// Format a millisecond timestamp with the browser's locale.
pub fn format_timestamp(ts: f64) -> String {
    js_sys::Date::new(&JsValue::from_f64(ts))
        .to_locale_string("default", &JsValue::UNDEFINED)
        .into()
}
