//! DOM theme application
//!
//! Every function here is idempotent: applying the same decision twice leaves
//! the document exactly as applying it once, so any trigger may call them at
//! any time without coordinating with the others.

pub mod logo;

pub use logo::{IconVariableLogo, ImageLogo, LogoStrategy, apply_strategy};

use crate::assets::LogoAssets;
use crate::config::ThemeStyle;
use crate::dom::{ThemeDocument, ThemeElement};

const COLOR_SCHEME: &str = "color-scheme";

/// Applies a dark/light decision to a document
pub struct ThemeApplier<'a> {
    style: &'a ThemeStyle,
}

impl<'a> ThemeApplier<'a> {
    pub fn new(style: &'a ThemeStyle) -> Self {
        Self { style }
    }

    /// Sync the root class and inline style with `is_dark`
    pub fn apply_theme<D: ThemeDocument>(&self, document: &D, is_dark: bool) {
        let Some(root) = document.root() else {
            tracing::trace!("No document root, skipping theme classes");
            return;
        };

        root.remove_class(&self.style.legacy_class);
        root.toggle_class(&self.style.force_dark_class, is_dark);
        root.set_style_property(COLOR_SCHEME, if is_dark { "dark" } else { "light" });
        if is_dark {
            root.set_style_property(
                &self.style.background_property,
                &self.style.dark_background,
            );
        } else {
            // Removed rather than set, so the page's own background shows through
            root.remove_style_property(&self.style.background_property);
        }
    }

    /// Theme every logo the strategies find. Returns the number of elements touched.
    pub fn apply_logos<D: ThemeDocument>(
        &self,
        document: &D,
        is_dark: bool,
        assets: &LogoAssets,
    ) -> usize {
        let images = ImageLogo::new(self.style);
        let icons = IconVariableLogo::new(self.style);
        let strategies: [&dyn LogoStrategy<D>; 2] = [&images, &icons];

        strategies
            .into_iter()
            .map(|strategy| apply_strategy(strategy, document, is_dark, assets))
            .sum()
    }
}
