//! Per-page engine state
//!
//! The cached inputs every trigger reads instead of going back to the store.
//! Handlers lock it only for short, synchronous sections and never across an
//! await point.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::assets::LogoAssets;
use crate::mode::ThemeMode;

/// Last known inputs of the theme pipeline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeContext {
    /// Mode from the latest store read or change notification
    pub mode: ThemeMode,
    /// Override URLs from the latest asset resolution
    pub assets: LogoAssets,
    /// Completed pipeline passes, for diagnostics
    pub passes: u64,
    /// Last sequence number handed out for a mode observation
    mode_tickets: u64,
    /// Sequence number of the observation `mode` came from
    mode_observed: u64,
}

impl ThemeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished pass and return its sequence number
    pub fn record_pass(&mut self) -> u64 {
        self.passes += 1;
        self.passes
    }

    /// Reserve a sequence number for a mode observation about to be made
    pub fn next_mode_ticket(&mut self) -> u64 {
        self.mode_tickets += 1;
        self.mode_tickets
    }

    /// Take `mode` unless a later observation already landed.
    /// Returns whether the mode was taken.
    pub fn observe_mode(&mut self, ticket: u64, mode: ThemeMode) -> bool {
        if ticket < self.mode_observed {
            return false;
        }
        self.mode_observed = ticket;
        self.mode = mode;
        true
    }
}

pub type SharedThemeContext = Arc<Mutex<ThemeContext>>;

/// Create a new shared context
pub fn create_shared_context() -> SharedThemeContext {
    Arc::new(Mutex::new(ThemeContext::new()))
}
