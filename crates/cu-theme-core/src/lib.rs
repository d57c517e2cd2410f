//! CU Dark Theme Core
//!
//! Platform-independent theme synchronization engine:
//! - Mode: stored preference and the dark/light decision
//! - Store: primary/secondary preference areas with fallback
//! - Apply: idempotent root and logo theming over an abstract document
//! - Engine: the triggers that drive the apply pipeline

pub mod apply;
pub mod assets;
pub mod config;
pub mod context;
pub mod dom;
pub mod engine;
pub mod error;
pub mod message;
pub mod mode;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use apply::*;
pub use assets::*;
pub use config::*;
pub use context::*;
pub use dom::*;
pub use engine::*;
pub use error::*;
pub use message::*;
pub use mode::*;
pub use store::*;
