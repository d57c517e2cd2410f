//! `chrome.*` extension API bindings
//!
//! Promise-returning calls are declared with `catch`: an API that is missing
//! or refuses the call throws synchronously, which surfaces as `Err` before
//! any promise exists.

use cu_theme_core::ThemeMessage;
use js_sys::{Function, Promise};
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::convert;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = get)]
    pub fn sync_get(keys: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = set)]
    pub fn sync_set(items: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = get)]
    pub fn local_get(keys: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = set)]
    pub fn local_set(items: &JsValue) -> Result<Promise, JsValue>;

    /// Listener receives `(changes, areaName)`
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "onChanged"], js_name = addListener)]
    pub fn add_storage_listener(
        listener: &Closure<dyn FnMut(JsValue, String)>,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "runtime"], js_name = getURL)]
    pub fn get_url(path: &str) -> Result<String, JsValue>;

    /// Listener receives `(message, sender, sendResponse)` and returns `true`
    /// to keep the response channel open
    #[wasm_bindgen(catch, js_namespace = ["chrome", "runtime", "onMessage"], js_name = addListener)]
    pub fn add_message_listener(
        listener: &Closure<dyn FnMut(JsValue, JsValue, Function) -> bool>,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = query)]
    pub fn query_tabs(query: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = sendMessage)]
    pub fn send_tab_message(tab_id: i32, message: &JsValue) -> Result<Promise, JsValue>;
}

/// The subset of `tabs.Tab` the extension reads
#[derive(Debug, Clone, Deserialize)]
pub struct TabInfo {
    pub id: Option<i32>,
}

/// Ids of tabs matching a `tabs.query` filter
pub async fn tab_ids(query: &serde_json::Value) -> Result<Vec<i32>, String> {
    let query = convert::to_js(query)?;
    let promise = query_tabs(&query).map_err(|e| convert::describe(&e))?;
    let tabs = JsFuture::from(promise)
        .await
        .map_err(|e| convert::describe(&e))?;
    let tabs: Vec<TabInfo> = convert::from_js(&tabs)?;
    Ok(tabs.into_iter().filter_map(|tab| tab.id).collect())
}

/// Send a command to one tab and wait for its answer
pub async fn send_to_tab(tab_id: i32, message: &ThemeMessage) -> Result<(), String> {
    let message = js_sys::JSON::parse(&message.to_json()).map_err(|e| convert::describe(&e))?;
    let promise = send_tab_message(tab_id, &message).map_err(|e| convert::describe(&e))?;
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| convert::describe(&e))
}
