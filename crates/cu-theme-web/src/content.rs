//! Content script entry point
//!
//! Builds one engine per page and wires every browser trigger to it.

use std::rc::Rc;

use cu_theme_core::{StorageArea, StoreChange, ThemeEngine, ThemeMessage};
use js_sys::{Array, Function};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Event, HtmlElement, MediaQueryList, MutationObserver, MutationObserverInit};

use crate::chrome;
use crate::convert;
use crate::dom::{MediaQuerySignal, WebDocument};
use crate::logging::init_logging;
use crate::runtime::ChromeRuntime;
use crate::storage::{ChromeStorageArea, extension_store};

type PageEngine = ThemeEngine<WebDocument, ChromeStorageArea, ChromeRuntime, MediaQuerySignal>;

#[wasm_bindgen]
pub fn start_content_script() {
    let config = crate::bundled_config();
    init_logging(&config);

    let Some(window) = web_sys::window() else {
        tracing::warn!("No window, theme engine not started");
        return;
    };
    let Some(document) = window.document() else {
        tracing::warn!("No document, theme engine not started");
        return;
    };

    let media = window
        .match_media(&config.color_scheme_query)
        .ok()
        .flatten();

    let engine = Rc::new(ThemeEngine::new(
        config,
        WebDocument::new(document.clone()),
        extension_store(),
        ChromeRuntime,
        MediaQuerySignal::new(media.clone()),
    ));

    {
        let engine = engine.clone();
        spawn_local(async move { engine.attach().await });
    }

    listen_color_scheme(&engine, media);
    listen_storage(&engine);
    listen_messages(&engine);
    observe_mutations(&engine, &document);
}

fn listen_color_scheme(engine: &Rc<PageEngine>, media: Option<MediaQueryList>) {
    let Some(list) = media else {
        tracing::debug!("matchMedia unavailable, OS changes will not be followed");
        return;
    };

    let engine = engine.clone();
    let closure = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
        let engine = engine.clone();
        spawn_local(async move { engine.on_color_scheme_change().await });
    });
    if let Err(e) = list.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref()) {
        tracing::warn!("Failed to watch color scheme: {}", convert::describe(&e));
    }
    closure.forget();
}

fn listen_storage(engine: &Rc<PageEngine>) {
    let engine = engine.clone();
    let closure = Closure::<dyn FnMut(JsValue, String)>::new(move |changes: JsValue, area: String| {
        let Some(area) = StorageArea::from_name(&area) else {
            return;
        };
        let Some(json) = convert::stringify(&changes) else {
            return;
        };
        match StoreChange::from_json(area, &json) {
            Ok(change) => {
                let engine = engine.clone();
                spawn_local(async move { engine.on_store_change(&change).await });
            }
            Err(e) => tracing::warn!("Unreadable storage change: {}", e),
        }
    });
    if let Err(e) = chrome::add_storage_listener(&closure) {
        tracing::warn!("Failed to watch storage: {}", convert::describe(&e));
    }
    closure.forget();
}

fn listen_messages(engine: &Rc<PageEngine>) {
    let engine = engine.clone();
    let closure = Closure::<dyn FnMut(JsValue, JsValue, Function) -> bool>::new(
        move |message: JsValue, _sender: JsValue, send_response: Function| {
            let Some(message) = convert::stringify(&message).and_then(|json| ThemeMessage::from_json(&json))
            else {
                return false;
            };

            let engine = engine.clone();
            spawn_local(async move {
                let ack = engine.on_message(&message).await;
                let response = convert::to_js(&ack).unwrap_or(JsValue::UNDEFINED);
                if let Err(e) = send_response.call1(&JsValue::NULL, &response) {
                    tracing::debug!("Sender went away: {}", convert::describe(&e));
                }
            });
            // Response is sent asynchronously
            true
        },
    );
    if let Err(e) = chrome::add_message_listener(&closure) {
        tracing::warn!("Failed to listen for messages: {}", convert::describe(&e));
    }
    closure.forget();
}

fn observe_mutations(engine: &Rc<PageEngine>, document: &Document) {
    if let Some(body) = document.body() {
        start_observer(engine, &body);
        return;
    }

    let engine = engine.clone();
    let deferred = document.clone();
    let callback = Closure::once_into_js(move |_event: Event| match deferred.body() {
        Some(body) => start_observer(&engine, &body),
        None => tracing::warn!("No body after DOMContentLoaded, mutations not observed"),
    });
    if let Err(e) = document.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref()) {
        tracing::warn!("Failed to defer mutation observer: {}", convert::describe(&e));
    }
}

fn start_observer(engine: &Rc<PageEngine>, body: &HtmlElement) {
    let engine = engine.clone();
    let callback = Closure::<dyn FnMut(Array, MutationObserver)>::new(
        move |_records: Array, _observer: MutationObserver| engine.on_mutation(),
    );
    let observer = match MutationObserver::new(callback.as_ref().unchecked_ref()) {
        Ok(observer) => observer,
        Err(e) => {
            tracing::warn!("Failed to create mutation observer: {}", convert::describe(&e));
            return;
        }
    };

    let options = MutationObserverInit::new();
    options.set_child_list(true);
    options.set_subtree(true);
    if let Err(e) = observer.observe_with_options(body, &options) {
        tracing::warn!("Failed to observe body: {}", convert::describe(&e));
        return;
    }
    callback.forget();
}
