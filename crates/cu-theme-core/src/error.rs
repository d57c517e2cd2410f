//! Error types for the theme engine
//!
//! None of these ever reach the host page: the engine logs them and degrades
//! to the fallback path for the step that failed.

/// Preference store errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The storage area could not start the request at all
    #[error("Storage area unavailable: {0}")]
    Unavailable(String),
    #[error("Storage read failed: {0}")]
    Read(String),
    #[error("Storage write failed: {0}")]
    Write(String),
    #[error("Storage payload could not be decoded: {0}")]
    Decode(String),
}

impl StoreError {
    /// Whether the failure happened before any request was issued
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

/// Asset path resolution errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    #[error("Asset path is empty")]
    EmptyPath,
    #[error("Extension runtime rejected asset path: {0}")]
    Runtime(String),
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(String),
}
