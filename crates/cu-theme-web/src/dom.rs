//! `web-sys` document and color-scheme signal

use cu_theme_core::{ColorSchemeSignal, LogoQuery, ThemeDocument, ThemeElement};
use wasm_bindgen::JsCast;
use web_sys::{CssStyleDeclaration, Document, Element, HtmlElement, HtmlImageElement, MediaQueryList};

use crate::convert;

/// The live page document
#[derive(Debug, Clone)]
pub struct WebDocument {
    document: Document,
}

impl WebDocument {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl ThemeDocument for WebDocument {
    type Element = WebElement;

    fn root(&self) -> Option<WebElement> {
        self.document.document_element().map(WebElement)
    }

    fn query_all(&self, query: LogoQuery<'_>) -> Vec<WebElement> {
        let nodes = match self.document.query_selector_all(&query.selector()) {
            Ok(nodes) => nodes,
            Err(e) => {
                tracing::debug!(?query, "Selector rejected: {}", convert::describe(&e));
                return Vec::new();
            }
        };

        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(WebElement)
            .collect()
    }
}

/// Element handle; equal when both wrap the same node
#[derive(Debug, Clone, PartialEq)]
pub struct WebElement(Element);

impl WebElement {
    fn style(&self) -> Option<CssStyleDeclaration> {
        self.0.dyn_ref::<HtmlElement>().map(HtmlElement::style)
    }

    fn image(&self) -> Option<&HtmlImageElement> {
        self.0.dyn_ref::<HtmlImageElement>()
    }
}

impl ThemeElement for WebElement {
    fn is_image(&self) -> bool {
        self.image().is_some()
    }

    fn is_styleable(&self) -> bool {
        self.style().is_some()
    }

    fn has_class(&self, name: &str) -> bool {
        self.0.class_list().contains(name)
    }

    fn remove_class(&self, name: &str) {
        let _ = self.0.class_list().remove_1(name);
    }

    fn toggle_class(&self, name: &str, present: bool) {
        let _ = self.0.class_list().toggle_with_force(name, present);
    }

    fn style_property(&self, name: &str) -> Option<String> {
        self.style()?
            .get_property_value(name)
            .ok()
            .filter(|value| !value.is_empty())
    }

    fn set_style_property(&self, name: &str, value: &str) {
        if let Some(style) = self.style() {
            if let Err(e) = style.set_property(name, value) {
                tracing::debug!("Failed to set {}: {}", name, convert::describe(&e));
            }
        }
    }

    fn remove_style_property(&self, name: &str) {
        if let Some(style) = self.style() {
            let _ = style.remove_property(name);
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name).filter(|value| !value.is_empty())
    }

    fn set_attribute(&self, name: &str, value: &str) {
        if let Err(e) = self.0.set_attribute(name, value) {
            tracing::debug!("Failed to set attribute {}: {}", name, convert::describe(&e));
        }
    }

    fn image_source(&self) -> Option<String> {
        self.image()
            .map(HtmlImageElement::src)
            .filter(|src| !src.is_empty())
    }

    fn set_image_source(&self, url: &str) {
        if let Some(image) = self.image() {
            image.set_src(url);
        }
    }
}

/// OS dark preference from a `matchMedia` query
#[derive(Debug, Clone)]
pub struct MediaQuerySignal {
    list: Option<MediaQueryList>,
}

impl MediaQuerySignal {
    pub fn new(list: Option<MediaQueryList>) -> Self {
        Self { list }
    }
}

impl ColorSchemeSignal for MediaQuerySignal {
    fn prefers_dark(&self) -> bool {
        self.list.as_ref().is_some_and(MediaQueryList::matches)
    }
}
