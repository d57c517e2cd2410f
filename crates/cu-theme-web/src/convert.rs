//! JSON bridging between `JsValue` and `serde`

use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;

/// Serialize a JS value to JSON text. `None` for `undefined` and functions.
pub fn stringify(value: &JsValue) -> Option<String> {
    js_sys::JSON::stringify(value).ok()?.as_string()
}

/// Decode a JS value through its JSON form
pub fn from_js<T: DeserializeOwned>(value: &JsValue) -> Result<T, String> {
    let json = stringify(value).ok_or_else(|| "value has no JSON form".to_string())?;
    serde_json::from_str(&json).map_err(|e| e.to_string())
}

/// Build a plain JS object from a serializable value
pub fn to_js<T: Serialize>(value: &T) -> Result<JsValue, String> {
    let json = serde_json::to_string(value).map_err(|e| e.to_string())?;
    js_sys::JSON::parse(&json).map_err(|e| describe(&e))
}

/// Readable text for a thrown JS value
pub fn describe(error: &JsValue) -> String {
    if let Some(text) = error.as_string() {
        return text;
    }
    js_sys::Reflect::get(error, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .unwrap_or_else(|| format!("{:?}", error))
}
