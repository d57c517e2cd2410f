//! Cross-context commands
//!
//! The background worker and the popup ask content scripts to re-apply the
//! theme after they change the stored mode. The content script answers once
//! the page has been updated.

use serde::{Deserialize, Serialize};

/// Commands understood by the content script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ThemeMessage {
    /// Re-read the store and re-apply everything
    #[serde(rename = "CU_DARK_THEME_APPLY_NOW")]
    ApplyNow,
}

impl ThemeMessage {
    /// Parse a runtime message. Messages meant for someone else yield `None`.
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }

    pub fn to_json(&self) -> String {
        match self {
            ThemeMessage::ApplyNow => r#"{"type":"CU_DARK_THEME_APPLY_NOW"}"#.to_string(),
        }
    }
}

/// Response sent once a command has been handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyAck {
    pub ok: bool,
}

impl ApplyAck {
    pub fn ok() -> Self {
        Self { ok: true }
    }

    pub fn to_json(&self) -> String {
        format!(r#"{{"ok":{}}}"#, self.ok)
    }
}
