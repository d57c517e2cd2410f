//! Logo asset overrides
//!
//! The store may name two extension-bundled images, one per mode. Paths are
//! turned into extension resource URLs by the runtime; anything that cannot
//! be converted counts as "no override" and the applier falls back to the
//! CSS filter.

use serde_json::Value;

use crate::config::StorageKeys;
use crate::error::AssetError;
use crate::store::StoreItems;

/// Converts bundled resource paths into loadable URLs
pub trait ExtensionRuntime {
    fn resource_url(&self, path: &str) -> Result<String, AssetError>;
}

/// Stored asset paths, absent when unset or empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogoPaths {
    pub dark: Option<String>,
    pub light: Option<String>,
}

impl LogoPaths {
    pub fn from_items(items: &StoreItems, keys: &StorageKeys) -> Self {
        Self {
            dark: non_empty_string(items.get(&keys.dark_logo_path)),
            light: non_empty_string(items.get(&keys.light_logo_path)),
        }
    }

    /// Resolve both paths independently
    pub fn resolve<R: ExtensionRuntime>(&self, runtime: &R) -> LogoAssets {
        LogoAssets {
            dark_url: resolve_asset_url(runtime, self.dark.as_deref()),
            light_url: resolve_asset_url(runtime, self.light.as_deref()),
        }
    }
}

/// Resolved override URLs handed to the applier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogoAssets {
    pub dark_url: Option<String>,
    pub light_url: Option<String>,
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Turn a stored path into a resource URL.
///
/// `None` means no override: either nothing is stored or the runtime could
/// not convert the path.
pub fn resolve_asset_url<R: ExtensionRuntime>(
    runtime: &R,
    stored_path: Option<&str>,
) -> Option<String> {
    let path = stored_path?;
    let result = if path.trim().is_empty() {
        Err(AssetError::EmptyPath)
    } else {
        runtime.resource_url(path)
    };

    match result {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::warn!("Ignoring logo override '{}': {}", path, e);
            None
        }
    }
}
