//! `chrome.runtime` resource URLs

use cu_theme_core::{AssetError, ExtensionRuntime};

use crate::chrome;
use crate::convert;

#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeRuntime;

impl ExtensionRuntime for ChromeRuntime {
    fn resource_url(&self, path: &str) -> Result<String, AssetError> {
        // Throws once the extension has been reloaded under a live page
        chrome::get_url(path).map_err(|e| AssetError::Runtime(convert::describe(&e)))
    }
}
