//! Document abstraction
//!
//! The engine never touches a concrete DOM. The wasm crate implements these
//! traits over `web-sys`; tests use an in-memory tree. Element handles are
//! cheap clones with interior mutability, like the browser's own handles,
//! and compare equal when they refer to the same node.

/// Element queries the applier issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogoQuery<'a> {
    /// Images whose `alt` or `src` mentions "logo"
    ImageByAttribute,
    /// Images nested under an element whose class mentions "logo"
    ImageInLogoContainer,
    /// Images nested under a link to the site root
    ImageInRootLink,
    /// Icon-font logos whose inline style sets `property`
    IconVariable { property: &'a str },
}

/// Queries that discover `<img>` logos
pub const IMAGE_QUERIES: [LogoQuery<'static>; 3] = [
    LogoQuery::ImageByAttribute,
    LogoQuery::ImageInLogoContainer,
    LogoQuery::ImageInRootLink,
];

impl LogoQuery<'_> {
    /// CSS selector text for this query
    pub fn selector(&self) -> String {
        match self {
            LogoQuery::ImageByAttribute => r#"img[alt*="logo" i], img[src*="logo" i]"#.to_string(),
            LogoQuery::ImageInLogoContainer => r#"[class*="logo" i] img"#.to_string(),
            LogoQuery::ImageInRootLink => r#"a[href="/" i] img"#.to_string(),
            LogoQuery::IconVariable { property } => format!(
                r#"header .header__logo-link a[style*="{property}"], .logo-link[style*="{property}"], .logo-link a[style*="{property}"]"#
            ),
        }
    }
}

/// A live element handle
pub trait ThemeElement: Clone + PartialEq {
    /// Whether this is an `<img>` element
    fn is_image(&self) -> bool;

    /// Whether this element carries inline style (HTML elements do)
    fn is_styleable(&self) -> bool;

    fn has_class(&self, name: &str) -> bool;
    fn remove_class(&self, name: &str);
    /// Add `name` if `present`, remove it otherwise
    fn toggle_class(&self, name: &str, present: bool);

    /// Inline style property value; `None` when unset or empty
    fn style_property(&self, name: &str) -> Option<String>;
    fn set_style_property(&self, name: &str, value: &str);
    fn remove_style_property(&self, name: &str);

    /// Attribute value; `None` when unset or empty
    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);

    /// Current image source, `None` for non-images
    fn image_source(&self) -> Option<String>;
    fn set_image_source(&self, url: &str);
}

/// The page document
pub trait ThemeDocument {
    type Element: ThemeElement;

    /// The document root (`<html>`), if any
    fn root(&self) -> Option<Self::Element>;

    /// Elements matching `query`, in document order
    fn query_all(&self, query: LogoQuery<'_>) -> Vec<Self::Element>;
}

/// Remove repeated handles, keeping the first occurrence
pub fn dedup_elements<E: PartialEq>(elements: Vec<E>) -> Vec<E> {
    let mut unique: Vec<E> = Vec::with_capacity(elements.len());
    for element in elements {
        if !unique.contains(&element) {
            unique.push(element);
        }
    }
    unique
}
