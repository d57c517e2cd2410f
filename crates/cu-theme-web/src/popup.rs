//! Popup entry point
//!
//! A radio group named `mode` with one input per theme mode.

use std::rc::Rc;

use cu_theme_core::{EngineConfig, PreferenceStore, ThemeMessage, ThemeMode};
use serde_json::json;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Event, EventTarget, HtmlInputElement};

use crate::chrome;
use crate::convert;
use crate::logging::init_logging;
use crate::storage::{ChromeStorageArea, extension_store};

const MODE_INPUT: &str = "mode";

struct Popup {
    config: EngineConfig,
    store: PreferenceStore<ChromeStorageArea>,
    document: Document,
}

#[wasm_bindgen]
pub fn start_popup() {
    let config = crate::bundled_config();
    init_logging(&config);

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        tracing::warn!("No document, popup not started");
        return;
    };

    let popup = Rc::new(Popup {
        config,
        store: extension_store(),
        document,
    });

    {
        let popup = popup.clone();
        spawn_local(async move { popup.show_current_mode().await });
    }

    let target: EventTarget = match popup.document.body() {
        Some(body) => body.into(),
        None => popup.document.clone().into(),
    };
    let on_change = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let Some(mode) = selected_mode(&event) else {
            return;
        };
        let popup = popup.clone();
        spawn_local(async move { popup.select_mode(mode).await });
    });
    if let Err(e) = target.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref()) {
        tracing::warn!("Failed to listen for mode changes: {}", convert::describe(&e));
    }
    on_change.forget();
}

/// Mode picked by a `change` event on the radio group
fn selected_mode(event: &Event) -> Option<ThemeMode> {
    let input = event.target()?.dyn_into::<HtmlInputElement>().ok()?;
    if input.name() != MODE_INPUT {
        return None;
    }
    match input.value().parse() {
        Ok(mode) => Some(mode),
        Err(e) => {
            tracing::warn!("Ignoring mode input: {}", e);
            None
        }
    }
}

impl Popup {
    async fn show_current_mode(&self) {
        let mode = self.store.load_mode(&self.config.storage).await;
        let selector = format!(r#"input[name="{}"][value="{}"]"#, MODE_INPUT, mode.as_str());
        let input = self
            .document
            .query_selector(&selector)
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlInputElement>().ok());
        match input {
            Some(input) => input.set_checked(true),
            None => tracing::debug!(mode = mode.as_str(), "No radio for stored mode"),
        }
    }

    async fn select_mode(&self, mode: ThemeMode) {
        if let Err(e) = self.store.save_mode(&self.config.storage, mode).await {
            tracing::warn!("Failed to save theme mode: {}", e);
            return;
        }

        let tab_ids = match chrome::tab_ids(&json!({ "active": true, "currentWindow": true })).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::debug!("No active tab: {}", e);
                return;
            }
        };
        if let Some(&tab_id) = tab_ids.first() {
            if let Err(e) = chrome::send_to_tab(tab_id, &ThemeMessage::ApplyNow).await {
                tracing::debug!(tab_id, "Active tab did not take the command: {}", e);
            }
        }
    }
}
