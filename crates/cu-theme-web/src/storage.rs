//! `chrome.storage` preference areas

use std::future::Future;

use cu_theme_core::{PreferenceArea, PreferenceStore, StorageArea, StoreError, StoreItems};
use js_sys::{Array, Promise};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use crate::chrome;
use crate::convert;

/// One of the two extension storage areas
#[derive(Debug, Clone, Copy)]
pub struct ChromeStorageArea {
    area: StorageArea,
}

impl ChromeStorageArea {
    pub fn sync() -> Self {
        Self {
            area: StorageArea::Sync,
        }
    }

    pub fn local() -> Self {
        Self {
            area: StorageArea::Local,
        }
    }

    fn issue_get(&self, keys: &JsValue) -> Result<Promise, JsValue> {
        match self.area {
            StorageArea::Sync => chrome::sync_get(keys),
            _ => chrome::local_get(keys),
        }
    }

    fn issue_set(&self, items: &JsValue) -> Result<Promise, JsValue> {
        match self.area {
            StorageArea::Sync => chrome::sync_set(items),
            _ => chrome::local_set(items),
        }
    }
}

impl PreferenceArea for ChromeStorageArea {
    fn area(&self) -> StorageArea {
        self.area
    }

    fn get(
        &self,
        keys: &[String],
    ) -> Result<impl Future<Output = Result<StoreItems, StoreError>>, StoreError> {
        let keys: Array = keys.iter().map(|k| JsValue::from_str(k)).collect();
        let promise = self
            .issue_get(&keys)
            .map_err(|e| StoreError::Unavailable(convert::describe(&e)))?;

        Ok(async move {
            let items = JsFuture::from(promise)
                .await
                .map_err(|e| StoreError::Read(convert::describe(&e)))?;
            convert::from_js::<StoreItems>(&items).map_err(StoreError::Decode)
        })
    }

    fn set(
        &self,
        items: StoreItems,
    ) -> Result<impl Future<Output = Result<(), StoreError>>, StoreError> {
        let items = convert::to_js(&items).map_err(StoreError::Write)?;
        let promise = self
            .issue_set(&items)
            .map_err(|e| StoreError::Unavailable(convert::describe(&e)))?;

        Ok(async move {
            JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|e| StoreError::Write(convert::describe(&e)))
        })
    }
}

/// Sync-first store used by every extension context
pub fn extension_store() -> PreferenceStore<ChromeStorageArea> {
    PreferenceStore::new(ChromeStorageArea::sync(), ChromeStorageArea::local())
}
