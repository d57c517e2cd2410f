//! Preference store access
//!
//! The extension keeps its preferences in the browser's key-value storage.
//! Two areas matter: a syncable primary and a local-only secondary. A primary
//! that cannot even start a request (it "throws" instead of returning a
//! pending read) is replaced by the secondary for that request; any later
//! failure degrades to defaults.

use std::collections::HashMap;
use std::future::Future;

use serde::Deserialize;
use serde_json::Value;

use crate::assets::LogoPaths;
use crate::config::StorageKeys;
use crate::error::StoreError;
use crate::mode::ThemeMode;

/// Raw key/value payload exchanged with a storage area
pub type StoreItems = serde_json::Map<String, Value>;

/// Browser storage areas that can emit change notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageArea {
    Sync,
    Local,
    Managed,
    Session,
}

impl StorageArea {
    /// Parse the area name reported by change notifications
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sync" => Some(StorageArea::Sync),
            "local" => Some(StorageArea::Local),
            "managed" => Some(StorageArea::Managed),
            "session" => Some(StorageArea::Session),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StorageArea::Sync => "sync",
            StorageArea::Local => "local",
            StorageArea::Managed => "managed",
            StorageArea::Session => "session",
        }
    }

    /// Areas the extension stores preferences in
    pub fn is_preference_area(&self) -> bool {
        matches!(self, StorageArea::Sync | StorageArea::Local)
    }
}

/// A single storage area.
///
/// The outer `Result` reports whether the request could be issued at all;
/// the returned future reports how it completed.
pub trait PreferenceArea {
    fn area(&self) -> StorageArea;

    fn get(
        &self,
        keys: &[String],
    ) -> Result<impl Future<Output = Result<StoreItems, StoreError>>, StoreError>;

    fn set(
        &self,
        items: StoreItems,
    ) -> Result<impl Future<Output = Result<(), StoreError>>, StoreError>;
}

/// Primary/secondary pair with fallback on unavailability
pub struct PreferenceStore<S> {
    primary: S,
    secondary: S,
}

impl<S: PreferenceArea> PreferenceStore<S> {
    pub fn new(primary: S, secondary: S) -> Self {
        Self { primary, secondary }
    }

    /// Read `keys`, never failing. Missing keys are simply absent from the result.
    pub async fn read(&self, keys: &[String]) -> StoreItems {
        let pending = match self.primary.get(keys) {
            Ok(pending) => pending,
            Err(err) if !err.is_unavailable() => {
                tracing::warn!("Preference read rejected, using defaults: {}", err);
                return StoreItems::new();
            }
            Err(err) => {
                tracing::debug!(
                    area = self.primary.area().name(),
                    "Primary store unavailable ({}), reading {}",
                    err,
                    self.secondary.area().name()
                );
                match self.secondary.get(keys) {
                    Ok(pending) => pending,
                    Err(err) => {
                        tracing::warn!("Secondary store unavailable as well: {}", err);
                        return StoreItems::new();
                    }
                }
            }
        };

        match pending.await {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!("Preference read failed, using defaults: {}", err);
                StoreItems::new()
            }
        }
    }

    /// Write `items`, falling back to the secondary area if the primary is unavailable
    pub async fn write(&self, items: StoreItems) -> Result<(), StoreError> {
        let pending = match self.primary.set(items.clone()) {
            Ok(pending) => pending,
            // The secondary would reject the same payload
            Err(err) if !err.is_unavailable() => return Err(err),
            Err(err) => {
                tracing::debug!(
                    area = self.primary.area().name(),
                    "Primary store unavailable ({}), writing {}",
                    err,
                    self.secondary.area().name()
                );
                self.secondary.set(items)?
            }
        };
        pending.await
    }

    /// Current stored mode, `Auto` when absent
    pub async fn load_mode(&self, keys: &StorageKeys) -> ThemeMode {
        let items = self.read(std::slice::from_ref(&keys.mode)).await;
        ThemeMode::from_value(items.get(&keys.mode))
    }

    /// Both optional asset path overrides
    pub async fn load_logo_paths(&self, keys: &StorageKeys) -> LogoPaths {
        let items = self.read(&keys.logo_keys()).await;
        LogoPaths::from_items(&items, keys)
    }

    pub async fn save_mode(&self, keys: &StorageKeys, mode: ThemeMode) -> Result<(), StoreError> {
        let mut items = StoreItems::new();
        items.insert(keys.mode.clone(), Value::String(mode.as_str().to_string()));
        self.write(items).await
    }

    /// Advance the stored mode one step through the toggle cycle
    pub async fn cycle_mode(&self, keys: &StorageKeys) -> Result<ThemeMode, StoreError> {
        let next = self.load_mode(keys).await.next();
        self.save_mode(keys, next).await?;
        tracing::info!("Theme mode cycled to {}", next);
        Ok(next)
    }

    /// Store the default mode if none is set. Returns whether anything was written.
    ///
    /// Asset paths default to absent and are never seeded.
    pub async fn seed_defaults(&self, keys: &StorageKeys) -> Result<bool, StoreError> {
        let items = self.read(&keys.all()).await;
        if items.get(&keys.mode).is_some_and(|v| !v.is_null()) {
            return Ok(false);
        }
        self.save_mode(keys, ThemeMode::default()).await?;
        tracing::info!("Seeded default theme mode");
        Ok(true)
    }
}

#[derive(Debug, Deserialize)]
struct ChangeRecord {
    #[serde(rename = "newValue", default)]
    new_value: Option<Value>,
}

/// One change notification: the area it came from and the new value per key.
///
/// A key mapped to `None` was removed.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreChange {
    pub area: StorageArea,
    changes: HashMap<String, Option<Value>>,
}

impl StoreChange {
    pub fn new(area: StorageArea) -> Self {
        Self {
            area,
            changes: HashMap::new(),
        }
    }

    /// Add a changed key
    pub fn with_value(mut self, key: impl Into<String>, value: Option<Value>) -> Self {
        self.changes.insert(key.into(), value);
        self
    }

    /// Parse the `{key: {oldValue, newValue}}` payload of a change notification
    pub fn from_json(area: StorageArea, json: &str) -> Result<Self, StoreError> {
        let records: HashMap<String, ChangeRecord> =
            serde_json::from_str(json).map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(Self {
            area,
            changes: records
                .into_iter()
                .map(|(key, record)| (key, record.new_value))
                .collect(),
        })
    }

    pub fn touches(&self, key: &str) -> bool {
        self.changes.contains_key(key)
    }

    pub fn new_value(&self, key: &str) -> Option<&Value> {
        self.changes.get(key).and_then(Option::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeArea;
    use futures::executor::block_on;
    use serde_json::json;

    fn store() -> (FakeArea, FakeArea, PreferenceStore<FakeArea>) {
        let sync = FakeArea::new(StorageArea::Sync);
        let local = FakeArea::new(StorageArea::Local);
        let store = PreferenceStore::new(sync.clone(), local.clone());
        (sync, local, store)
    }

    #[test]
    fn test_read_prefers_primary() {
        let (sync, local, store) = store();
        let keys = StorageKeys::default();
        sync.insert(&keys.mode, json!("dark"));
        local.insert(&keys.mode, json!("light"));

        assert_eq!(block_on(store.load_mode(&keys)), ThemeMode::Dark);
        assert_eq!(local.reads(), 0);
    }

    #[test]
    fn test_read_falls_back_to_secondary() {
        let (sync, local, store) = store();
        let keys = StorageKeys::default();
        sync.set_available(false);
        local.insert(&keys.mode, json!("light"));

        assert_eq!(block_on(store.load_mode(&keys)), ThemeMode::Light);
        assert_eq!(local.reads(), 1);
    }

    #[test]
    fn test_read_failure_after_issue_uses_defaults() {
        let (sync, local, store) = store();
        let keys = StorageKeys::default();
        sync.insert(&keys.mode, json!("dark"));
        sync.set_failing(true);

        assert_eq!(block_on(store.load_mode(&keys)), ThemeMode::Auto);
        // An issued-but-failed read is not an unavailable store
        assert_eq!(local.reads(), 0);
    }

    #[test]
    fn test_rejected_request_does_not_fall_back() {
        let (sync, local, store) = store();
        let keys = StorageKeys::default();
        sync.insert(&keys.mode, json!("dark"));
        local.insert(&keys.mode, json!("light"));
        sync.set_rejecting(true);

        assert_eq!(block_on(store.load_mode(&keys)), ThemeMode::Auto);
        assert_eq!(local.reads(), 0);

        let result = block_on(store.save_mode(&keys, ThemeMode::Dark));
        assert!(matches!(result, Err(StoreError::Write(_))));
        assert_eq!(local.value(&keys.mode), Some(json!("light")));
    }

    #[test]
    fn test_both_areas_unavailable() {
        let (sync, local, store) = store();
        sync.set_available(false);
        local.set_available(false);

        let items = block_on(store.read(&StorageKeys::default().all()));
        assert!(items.is_empty());
    }

    #[test]
    fn test_write_falls_back_to_secondary() {
        let (sync, local, store) = store();
        let keys = StorageKeys::default();
        sync.set_available(false);

        block_on(store.save_mode(&keys, ThemeMode::Dark)).unwrap();
        assert_eq!(local.value(&keys.mode), Some(json!("dark")));
        assert_eq!(sync.value(&keys.mode), None);
    }

    #[test]
    fn test_write_fails_when_no_area_available() {
        let (sync, local, store) = store();
        sync.set_available(false);
        local.set_available(false);

        let result = block_on(store.save_mode(&StorageKeys::default(), ThemeMode::Dark));
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[test]
    fn test_cycle_mode() {
        let (sync, _local, store) = store();
        let keys = StorageKeys::default();

        assert_eq!(block_on(store.cycle_mode(&keys)).unwrap(), ThemeMode::Dark);
        assert_eq!(block_on(store.cycle_mode(&keys)).unwrap(), ThemeMode::Light);
        assert_eq!(block_on(store.cycle_mode(&keys)).unwrap(), ThemeMode::Auto);
        assert_eq!(sync.value(&keys.mode), Some(json!("auto")));
    }

    #[test]
    fn test_seed_defaults_only_when_missing() {
        let (sync, _local, store) = store();
        let keys = StorageKeys::default();

        assert!(block_on(store.seed_defaults(&keys)).unwrap());
        assert_eq!(sync.value(&keys.mode), Some(json!("auto")));
        assert_eq!(sync.value(&keys.dark_logo_path), None);

        sync.insert(&keys.mode, json!("light"));
        assert!(!block_on(store.seed_defaults(&keys)).unwrap());
        assert_eq!(sync.value(&keys.mode), Some(json!("light")));
    }

    #[test]
    fn test_logo_paths_ignore_empty_strings() {
        let (sync, _local, store) = store();
        let keys = StorageKeys::default();
        sync.insert(&keys.dark_logo_path, json!("assets/dark.png"));
        sync.insert(&keys.light_logo_path, json!(""));

        let paths = block_on(store.load_logo_paths(&keys));
        assert_eq!(paths.dark.as_deref(), Some("assets/dark.png"));
        assert_eq!(paths.light, None);
    }

    #[test]
    fn test_change_from_json() {
        let change = StoreChange::from_json(
            StorageArea::Sync,
            r#"{
                "cuDarkTheme.mode": {"oldValue": "dark", "newValue": "light"},
                "cuDarkTheme.darkLogoPath": {"oldValue": "a.png"}
            }"#,
        )
        .unwrap();

        assert!(change.touches("cuDarkTheme.mode"));
        assert_eq!(change.new_value("cuDarkTheme.mode"), Some(&json!("light")));
        assert!(change.touches("cuDarkTheme.darkLogoPath"));
        assert_eq!(change.new_value("cuDarkTheme.darkLogoPath"), None);
        assert!(!change.touches("cuDarkTheme.lightLogoPath"));
    }

    #[test]
    fn test_change_from_invalid_json() {
        let result = StoreChange::from_json(StorageArea::Local, "[1, 2]");
        assert!(matches!(result, Err(StoreError::Decode(_))));
    }

    #[test]
    fn test_storage_area_names() {
        for area in [
            StorageArea::Sync,
            StorageArea::Local,
            StorageArea::Managed,
            StorageArea::Session,
        ] {
            assert_eq!(StorageArea::from_name(area.name()), Some(area));
        }
        assert!(StorageArea::Sync.is_preference_area());
        assert!(!StorageArea::Managed.is_preference_area());
        assert_eq!(StorageArea::from_name("cloud"), None);
    }
}
