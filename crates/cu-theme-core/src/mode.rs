//! Theme mode and the dark/light decision

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// User-selected theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Follow the OS color scheme
    #[default]
    Auto,
    Dark,
    Light,
}

impl ThemeMode {
    /// Stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Auto => "auto",
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }

    /// Next mode in the toggle cycle (auto -> dark -> light -> auto)
    pub fn next(self) -> Self {
        match self {
            ThemeMode::Auto => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Auto,
        }
    }

    /// Interpret a raw stored value. Absent, empty, or unknown values are `Auto`.
    pub fn from_value(value: Option<&serde_json::Value>) -> Self {
        let Some(raw) = value.and_then(|v| v.as_str()) else {
            return ThemeMode::Auto;
        };
        if raw.is_empty() {
            return ThemeMode::Auto;
        }
        raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Unknown stored theme mode '{}', using auto", raw);
            ThemeMode::Auto
        })
    }

    /// Whether this mode makes the OS signal relevant
    pub fn follows_os(&self) -> bool {
        *self == ThemeMode::Auto
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown mode string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown theme mode: {0}")]
pub struct ParseModeError(pub String);

impl FromStr for ThemeMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(ThemeMode::Auto),
            "dark" => Ok(ThemeMode::Dark),
            "light" => Ok(ThemeMode::Light),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

/// Map a mode and the live OS signal to the effective decision
pub fn resolve_is_dark(mode: ThemeMode, os_prefers_dark: bool) -> bool {
    match mode {
        ThemeMode::Dark => true,
        ThemeMode::Light => false,
        ThemeMode::Auto => os_prefers_dark,
    }
}
