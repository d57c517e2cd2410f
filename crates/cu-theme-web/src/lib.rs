//! CU Dark Theme browser bindings
//!
//! Implements the engine's document, storage, runtime and color-scheme seams
//! over `web-sys` and the `chrome.*` extension APIs, and exports one entry
//! point per extension context:
//! - `start_content_script`: themes matching pages
//! - `on_installed` / `on_action_clicked`: background handlers that seed
//!   defaults and cycle the mode
//! - `start_popup`: the mode selection form
//!
//! Only the bundled configuration is available on native targets.

use cu_theme_core::EngineConfig;

#[cfg(target_arch = "wasm32")]
mod background;
#[cfg(target_arch = "wasm32")]
mod chrome;
#[cfg(target_arch = "wasm32")]
mod content;
#[cfg(target_arch = "wasm32")]
mod convert;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod logging;
#[cfg(target_arch = "wasm32")]
mod popup;
#[cfg(target_arch = "wasm32")]
mod runtime;
#[cfg(target_arch = "wasm32")]
mod storage;

#[cfg(target_arch = "wasm32")]
pub use background::{on_action_clicked, on_installed};
#[cfg(target_arch = "wasm32")]
pub use content::start_content_script;
#[cfg(target_arch = "wasm32")]
pub use popup::start_popup;

const BUNDLED_CONFIG: &str = include_str!("../theme.ron");

/// Configuration shipped with the extension
pub fn bundled_config() -> EngineConfig {
    EngineConfig::from_ron_or_default(BUNDLED_CONFIG)
}
