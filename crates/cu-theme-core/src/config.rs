//! Engine configuration
//!
//! Class names, colors, storage keys and the other constants the engine
//! writes into the page. The extension bundles a RON copy of this structure;
//! any field missing from it keeps its default.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Values written to the document root and logo elements
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThemeStyle {
    /// Class left behind by the older class-based theme; always removed
    pub legacy_class: String,
    /// Class present on the root iff dark mode is active
    pub force_dark_class: String,
    /// Custom property carrying the dark page background
    pub background_property: String,
    /// Background value used in dark mode
    pub dark_background: String,
    /// Fallback filter for images without a dark override
    pub image_filter: String,
    /// Custom property holding `url(...)` on icon-font logos
    pub icon_property: String,
    /// Icon foreground in dark mode
    pub icon_dark_color: String,
    /// Icon foreground in light mode
    pub icon_light_color: String,
    /// Attribute holding an image's pre-theme source
    pub original_src_attribute: String,
    /// Attribute holding an icon's pre-theme custom property value
    pub original_icon_attribute: String,
}

impl Default for ThemeStyle {
    fn default() -> Self {
        Self {
            legacy_class: "cu-dark-mode".to_string(),
            force_dark_class: "cu-force-dark".to_string(),
            background_property: "--cu-bg".to_string(),
            dark_background: "#0e0f12".to_string(),
            image_filter: "invert(1) hue-rotate(180deg)".to_string(),
            icon_property: "--t-icon-start".to_string(),
            icon_dark_color: "#ffffff".to_string(),
            icon_light_color: "#000000".to_string(),
            original_src_attribute: "data-cu-original-src".to_string(),
            original_icon_attribute: "data-cu-original-icon-var".to_string(),
        }
    }
}

/// Preference store keys
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageKeys {
    pub mode: String,
    pub dark_logo_path: String,
    pub light_logo_path: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            mode: "cuDarkTheme.mode".to_string(),
            dark_logo_path: "cuDarkTheme.darkLogoPath".to_string(),
            light_logo_path: "cuDarkTheme.lightLogoPath".to_string(),
        }
    }
}

impl StorageKeys {
    /// Both asset path keys
    pub fn logo_keys(&self) -> [String; 2] {
        [self.dark_logo_path.clone(), self.light_logo_path.clone()]
    }

    /// Every key the extension owns
    pub fn all(&self) -> [String; 3] {
        [
            self.mode.clone(),
            self.dark_logo_path.clone(),
            self.light_logo_path.clone(),
        ]
    }
}

/// Top-level configuration shared by all extension contexts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub theme: ThemeStyle,
    pub storage: StorageKeys,
    /// Media query reporting the OS dark preference
    pub color_scheme_query: String,
    /// Tab URL pattern the background relays commands to
    pub page_pattern: String,
    /// Maximum tracing level for the console subscriber
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            theme: ThemeStyle::default(),
            storage: StorageKeys::default(),
            color_scheme_query: "(prefers-color-scheme: dark)".to_string(),
            page_pattern: "https://my.centraluniversity.ru/*".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse a RON document
    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parse a RON document, falling back to defaults when it is malformed
    pub fn from_ron_or_default(content: &str) -> Self {
        Self::from_ron(content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring bundled config: {}", e);
            Self::default()
        })
    }
}
