//! In-memory doubles for the browser seams

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::future::{Future, ready};
use std::rc::Rc;

use futures::channel::oneshot;

use crate::assets::ExtensionRuntime;
use crate::dom::{LogoQuery, ThemeDocument, ThemeElement};
use crate::engine::ColorSchemeSignal;
use crate::error::{AssetError, StoreError};
use crate::store::{PreferenceArea, StorageArea, StoreItems};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeNode {
    tag: String,
    parent: Option<usize>,
    attrs: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    style: BTreeMap<String, String>,
}

impl FakeNode {
    fn new(tag: &str, parent: Option<usize>) -> Self {
        Self {
            tag: tag.to_string(),
            parent,
            attrs: BTreeMap::new(),
            classes: BTreeSet::new(),
            style: BTreeMap::new(),
        }
    }

    fn class_contains(&self, needle: &str) -> bool {
        self.classes
            .iter()
            .any(|c| c.to_ascii_lowercase().contains(needle))
    }
}

type Tree = Rc<RefCell<Vec<FakeNode>>>;

/// Handle to a node of a [`FakeDocument`]
#[derive(Debug, Clone)]
pub struct FakeElement {
    tree: Tree,
    id: usize,
}

impl PartialEq for FakeElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.tree, &other.tree) && self.id == other.id
    }
}

impl FakeElement {
    fn with_node<T>(&self, f: impl FnOnce(&FakeNode) -> T) -> T {
        f(&self.tree.borrow()[self.id])
    }

    fn with_node_mut<T>(&self, f: impl FnOnce(&mut FakeNode) -> T) -> T {
        f(&mut self.tree.borrow_mut()[self.id])
    }

    pub fn attr(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn class(self, name: &str) -> Self {
        self.toggle_class(name, true);
        self
    }

    pub fn style(self, name: &str, value: &str) -> Self {
        self.set_style_property(name, value);
        self
    }
}

impl ThemeElement for FakeElement {
    fn is_image(&self) -> bool {
        self.with_node(|n| n.tag == "img")
    }

    fn is_styleable(&self) -> bool {
        true
    }

    fn has_class(&self, name: &str) -> bool {
        self.with_node(|n| n.classes.contains(name))
    }

    fn remove_class(&self, name: &str) {
        self.with_node_mut(|n| n.classes.remove(name));
    }

    fn toggle_class(&self, name: &str, present: bool) {
        self.with_node_mut(|n| {
            if present {
                n.classes.insert(name.to_string());
            } else {
                n.classes.remove(name);
            }
        });
    }

    fn style_property(&self, name: &str) -> Option<String> {
        self.with_node(|n| n.style.get(name).filter(|v| !v.is_empty()).cloned())
    }

    fn set_style_property(&self, name: &str, value: &str) {
        self.with_node_mut(|n| n.style.insert(name.to_string(), value.to_string()));
    }

    fn remove_style_property(&self, name: &str) {
        self.with_node_mut(|n| n.style.remove(name));
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.with_node(|n| n.attrs.get(name).filter(|v| !v.is_empty()).cloned())
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.with_node_mut(|n| n.attrs.insert(name.to_string(), value.to_string()));
    }

    fn image_source(&self) -> Option<String> {
        if self.is_image() {
            self.attribute("src")
        } else {
            None
        }
    }

    fn set_image_source(&self, url: &str) {
        self.set_attribute("src", url);
    }
}

/// Tree of nodes with an `<html>` root and a `<body>`
#[derive(Debug, Clone)]
pub struct FakeDocument {
    tree: Tree,
    root: Option<FakeElement>,
    body: FakeElement,
}

impl FakeDocument {
    pub fn new() -> Self {
        let tree: Tree = Rc::new(RefCell::new(vec![
            FakeNode::new("html", None),
            FakeNode::new("body", Some(0)),
        ]));
        Self {
            root: Some(FakeElement {
                tree: tree.clone(),
                id: 0,
            }),
            body: FakeElement {
                tree: tree.clone(),
                id: 1,
            },
            tree,
        }
    }

    /// A document without a root element
    pub fn detached() -> Self {
        let tree: Tree = Rc::new(RefCell::new(vec![FakeNode::new("body", None)]));
        Self {
            root: None,
            body: FakeElement {
                tree: tree.clone(),
                id: 0,
            },
            tree,
        }
    }

    pub fn body(&self) -> &FakeElement {
        &self.body
    }

    /// Append a new `tag` element under `parent`
    pub fn append(&self, parent: &FakeElement, tag: &str) -> FakeElement {
        let mut nodes = self.tree.borrow_mut();
        nodes.push(FakeNode::new(tag, Some(parent.id)));
        FakeElement {
            tree: self.tree.clone(),
            id: nodes.len() - 1,
        }
    }

    /// Copy of every node, for whole-document comparisons
    pub fn snapshot(&self) -> Vec<FakeNode> {
        self.tree.borrow().clone()
    }

    fn ancestors(nodes: &[FakeNode], id: usize) -> impl Iterator<Item = &FakeNode> {
        std::iter::successors(nodes[id].parent, move |&p| nodes[p].parent).map(move |p| &nodes[p])
    }

    fn matches(nodes: &[FakeNode], id: usize, query: LogoQuery<'_>) -> bool {
        let node = &nodes[id];
        let mentions_logo =
            |name: &str| node.attrs.get(name).is_some_and(|v| v.to_ascii_lowercase().contains("logo"));

        match query {
            LogoQuery::ImageByAttribute => {
                node.tag == "img" && (mentions_logo("alt") || mentions_logo("src"))
            }
            LogoQuery::ImageInLogoContainer => {
                node.tag == "img" && Self::ancestors(nodes, id).any(|a| a.class_contains("logo"))
            }
            LogoQuery::ImageInRootLink => {
                node.tag == "img"
                    && Self::ancestors(nodes, id)
                        .any(|a| a.tag == "a" && a.attrs.get("href").is_some_and(|h| h == "/"))
            }
            LogoQuery::IconVariable { property } => {
                if !node.style.contains_key(property) {
                    return false;
                }
                let in_header_link = node.tag == "a" && {
                    let mut chain = Self::ancestors(nodes, id);
                    chain.any(|a| a.classes.contains("header__logo-link"))
                        && chain.any(|a| a.tag == "header")
                };
                let in_logo_link = node.tag == "a"
                    && Self::ancestors(nodes, id).any(|a| a.classes.contains("logo-link"));
                in_header_link || node.classes.contains("logo-link") || in_logo_link
            }
        }
    }
}

impl ThemeDocument for FakeDocument {
    type Element = FakeElement;

    fn root(&self) -> Option<FakeElement> {
        self.root.clone()
    }

    fn query_all(&self, query: LogoQuery<'_>) -> Vec<FakeElement> {
        let nodes = self.tree.borrow();
        (0..nodes.len())
            .filter(|&id| Self::matches(&nodes, id, query))
            .map(|id| FakeElement {
                tree: self.tree.clone(),
                id,
            })
            .collect()
    }
}

#[derive(Debug)]
struct AreaState {
    items: StoreItems,
    available: bool,
    failing: bool,
    rejecting: bool,
    reads: usize,
    held: Option<(String, oneshot::Receiver<()>)>,
}

/// Storage area backed by a map. Clones share state.
#[derive(Debug, Clone)]
pub struct FakeArea {
    area: StorageArea,
    state: Rc<RefCell<AreaState>>,
}

impl FakeArea {
    pub fn new(area: StorageArea) -> Self {
        Self {
            area,
            state: Rc::new(RefCell::new(AreaState {
                items: StoreItems::new(),
                available: true,
                failing: false,
                rejecting: false,
                reads: 0,
                held: None,
            })),
        }
    }

    pub fn insert(&self, key: &str, value: serde_json::Value) {
        self.state.borrow_mut().items.insert(key.to_string(), value);
    }

    pub fn value(&self, key: &str) -> Option<serde_json::Value> {
        self.state.borrow().items.get(key).cloned()
    }

    /// Unavailable areas refuse to start requests
    pub fn set_available(&self, available: bool) {
        self.state.borrow_mut().available = available;
    }

    /// Failing areas start requests that then complete with an error
    pub fn set_failing(&self, failing: bool) {
        self.state.borrow_mut().failing = failing;
    }

    /// Rejecting areas refuse requests as malformed rather than unavailable
    pub fn set_rejecting(&self, rejecting: bool) {
        self.state.borrow_mut().rejecting = rejecting;
    }

    /// Reads issued so far
    pub fn reads(&self) -> usize {
        self.state.borrow().reads
    }

    /// Keep the next read that asks for `key` pending until the returned
    /// sender fires. The items are still taken when the read is issued.
    pub fn hold_next_read_of(&self, key: &str) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.state.borrow_mut().held = Some((key.to_string(), gate));
        release
    }
}

impl PreferenceArea for FakeArea {
    fn area(&self) -> StorageArea {
        self.area
    }

    fn get(
        &self,
        keys: &[String],
    ) -> Result<impl Future<Output = Result<StoreItems, StoreError>>, StoreError> {
        let mut state = self.state.borrow_mut();
        if !state.available {
            return Err(StoreError::Unavailable(self.area.name().to_string()));
        }
        if state.rejecting {
            return Err(StoreError::Read("invalid keys".to_string()));
        }
        state.reads += 1;
        let gate = match state.held.take() {
            Some((key, gate)) if keys.contains(&key) => Some(gate),
            other => {
                state.held = other;
                None
            }
        };
        let result = if state.failing {
            Err(StoreError::Read("quota exceeded".to_string()))
        } else {
            Ok(keys
                .iter()
                .filter_map(|k| state.items.get(k).map(|v| (k.clone(), v.clone())))
                .collect::<StoreItems>())
        };
        Ok(async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            result
        })
    }

    fn set(
        &self,
        items: StoreItems,
    ) -> Result<impl Future<Output = Result<(), StoreError>>, StoreError> {
        let mut state = self.state.borrow_mut();
        if !state.available {
            return Err(StoreError::Unavailable(self.area.name().to_string()));
        }
        if state.rejecting {
            return Err(StoreError::Write("payload not serializable".to_string()));
        }
        if state.failing {
            return Ok(ready(Err::<(), _>(StoreError::Write("quota exceeded".to_string()))));
        }
        state.items.extend(items);
        Ok(ready(Ok(())))
    }
}

/// Runtime producing `chrome-extension://cu-test/<path>` URLs
#[derive(Debug, Clone, Default)]
pub struct FakeRuntime {
    calls: Rc<Cell<usize>>,
    failing: Rc<Cell<bool>>,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }
}

impl ExtensionRuntime for FakeRuntime {
    fn resource_url(&self, path: &str) -> Result<String, AssetError> {
        self.calls.set(self.calls.get() + 1);
        if self.failing.get() {
            return Err(AssetError::Runtime("extension context invalidated".to_string()));
        }
        Ok(format!("chrome-extension://cu-test/{}", path.trim_start_matches('/')))
    }
}

/// OS preference that tests flip by hand
#[derive(Debug, Clone, Default)]
pub struct FakeSignal {
    dark: Rc<Cell<bool>>,
    reads: Rc<Cell<usize>>,
}

impl FakeSignal {
    pub fn new(dark: bool) -> Self {
        let signal = Self::default();
        signal.set(dark);
        signal
    }

    pub fn set(&self, dark: bool) {
        self.dark.set(dark);
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl ColorSchemeSignal for FakeSignal {
    fn prefers_dark(&self) -> bool {
        self.reads.set(self.reads.get() + 1);
        self.dark.get()
    }
}
