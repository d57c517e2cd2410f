//! Background service worker entry points
//!
//! The worker's `chrome.runtime.onInstalled` and `chrome.action.onClicked`
//! listeners are registered synchronously by the JS shim, before the module
//! finishes loading, so no event is lost while it starts. Each listener waits
//! for the module and then calls the matching export here.

use cu_theme_core::{EngineConfig, PreferenceStore, ThemeMessage};
use serde_json::json;
use wasm_bindgen::prelude::*;

use crate::chrome;
use crate::logging::init_logging;
use crate::storage::{ChromeStorageArea, extension_store};

struct Background {
    config: EngineConfig,
    store: PreferenceStore<ChromeStorageArea>,
}

/// `chrome.runtime.onInstalled`: store the default mode if none is set
#[wasm_bindgen]
pub async fn on_installed() {
    Background::new().seed_defaults().await;
}

/// `chrome.action.onClicked`: advance the mode and tell open pages
#[wasm_bindgen]
pub async fn on_action_clicked() {
    Background::new().cycle_mode().await;
}

impl Background {
    fn new() -> Self {
        let config = crate::bundled_config();
        init_logging(&config);
        Self {
            config,
            store: extension_store(),
        }
    }

    async fn seed_defaults(&self) {
        if let Err(e) = self.store.seed_defaults(&self.config.storage).await {
            tracing::warn!("Failed to seed defaults: {}", e);
        }
    }

    async fn cycle_mode(&self) {
        match self.store.cycle_mode(&self.config.storage).await {
            Ok(_) => self.relay_apply_now().await,
            Err(e) => tracing::warn!("Failed to cycle theme mode: {}", e),
        }
    }

    /// Ask every matching page to re-apply right away
    async fn relay_apply_now(&self) {
        let tab_ids = match chrome::tab_ids(&json!({ "url": self.config.page_pattern })).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!("Failed to query tabs: {}", e);
                return;
            }
        };

        for tab_id in tab_ids {
            // Tabs without a live content script reject the message
            if let Err(e) = chrome::send_to_tab(tab_id, &ThemeMessage::ApplyNow).await {
                tracing::debug!(tab_id, "Tab did not take the command: {}", e);
            }
        }
    }
}
