//! Logo theming strategies
//!
//! Two kinds of logo exist on the pages: plain `<img>` elements and icon-font
//! links whose image comes from a custom property. Both follow the same
//! discipline: remember the pre-theme value once on the way into dark mode,
//! override it, and put it back in light mode. A logo that has never been
//! themed dark keeps whatever value the site gives it.

use crate::assets::LogoAssets;
use crate::config::ThemeStyle;
use crate::dom::{IMAGE_QUERIES, LogoQuery, ThemeDocument, ThemeElement, dedup_elements};

const FILTER: &str = "filter";
const COLOR: &str = "color";

/// Capability shared by every logo kind
pub trait LogoStrategy<D: ThemeDocument> {
    /// Elements this strategy themes, without duplicates
    fn candidates(&self, document: &D) -> Vec<D::Element>;

    /// Record the pre-theme value unless one is already recorded
    fn capture_original(&self, element: &D::Element);

    fn apply_dark(&self, element: &D::Element, assets: &LogoAssets);

    fn apply_light(&self, element: &D::Element, assets: &LogoAssets);
}

/// Run one strategy over the document. Returns the number of elements touched.
pub fn apply_strategy<D: ThemeDocument>(
    strategy: &dyn LogoStrategy<D>,
    document: &D,
    is_dark: bool,
    assets: &LogoAssets,
) -> usize {
    let elements = strategy.candidates(document);
    for element in &elements {
        if is_dark {
            // Before the first override touches the element
            strategy.capture_original(element);
            strategy.apply_dark(element, assets);
        } else {
            strategy.apply_light(element, assets);
        }
    }
    elements.len()
}

/// `<img>` logos, themed through `src` or a CSS filter
pub struct ImageLogo<'a> {
    style: &'a ThemeStyle,
}

impl<'a> ImageLogo<'a> {
    pub fn new(style: &'a ThemeStyle) -> Self {
        Self { style }
    }
}

fn set_source<E: ThemeElement>(element: &E, url: &str) {
    if element.image_source().as_deref() != Some(url) {
        element.set_image_source(url);
    }
}

impl<D: ThemeDocument> LogoStrategy<D> for ImageLogo<'_> {
    fn candidates(&self, document: &D) -> Vec<D::Element> {
        let found = IMAGE_QUERIES
            .iter()
            .flat_map(|query| document.query_all(*query))
            .filter(ThemeElement::is_image)
            .collect();
        dedup_elements(found)
    }

    fn capture_original(&self, element: &D::Element) {
        let attribute = &self.style.original_src_attribute;
        if element.attribute(attribute).is_some() {
            return;
        }
        if let Some(src) = element.image_source() {
            element.set_attribute(attribute, &src);
        }
    }

    fn apply_dark(&self, element: &D::Element, assets: &LogoAssets) {
        match assets.dark_url.as_deref() {
            Some(url) => {
                set_source(element, url);
                element.remove_style_property(FILTER);
            }
            None => element.set_style_property(FILTER, &self.style.image_filter),
        }
    }

    fn apply_light(&self, element: &D::Element, assets: &LogoAssets) {
        if let Some(url) = assets.light_url.as_deref() {
            set_source(element, url);
        } else if let Some(original) = element.attribute(&self.style.original_src_attribute) {
            set_source(element, &original);
        }
        element.remove_style_property(FILTER);
    }
}

/// Icon-font logos whose image is a `url(...)` in a custom property
pub struct IconVariableLogo<'a> {
    style: &'a ThemeStyle,
}

impl<'a> IconVariableLogo<'a> {
    pub fn new(style: &'a ThemeStyle) -> Self {
        Self { style }
    }
}

impl<D: ThemeDocument> LogoStrategy<D> for IconVariableLogo<'_> {
    fn candidates(&self, document: &D) -> Vec<D::Element> {
        let found = document
            .query_all(LogoQuery::IconVariable {
                property: &self.style.icon_property,
            })
            .into_iter()
            .filter(ThemeElement::is_styleable)
            .collect();
        dedup_elements(found)
    }

    fn capture_original(&self, element: &D::Element) {
        let attribute = &self.style.original_icon_attribute;
        if element.attribute(attribute).is_some() {
            return;
        }
        if let Some(current) = element.style_property(&self.style.icon_property) {
            element.set_attribute(attribute, &current);
        }
    }

    fn apply_dark(&self, element: &D::Element, assets: &LogoAssets) {
        if let Some(url) = assets.dark_url.as_deref() {
            element.set_style_property(&self.style.icon_property, &format!("url({url})"));
        }
        element.set_style_property(COLOR, &self.style.icon_dark_color);
        element.set_style_property(FILTER, "none");
    }

    fn apply_light(&self, element: &D::Element, assets: &LogoAssets) {
        let property = &self.style.icon_property;
        if let Some(url) = assets.light_url.as_deref() {
            element.set_style_property(property, &format!("url({url})"));
        } else if let Some(original) = element.attribute(&self.style.original_icon_attribute) {
            element.set_style_property(property, &original);
        }
        element.set_style_property(COLOR, &self.style.icon_light_color);
        element.remove_style_property(FILTER);
    }
}
