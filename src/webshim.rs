//! WASM-specific JavaScript bridge
//!
//! Binds the global `Plaid` widget object and the DOM document to the
//! `LinkWidget` / `Page` seams. Callback payloads cross the boundary as JSON.

#![cfg(target_arch = "wasm32")]

use std::rc::Rc;

use js_sys::{Object, Reflect};
use serde::de::DeserializeOwned;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::bootstrap::{Page, Trigger};
use crate::error::LinkError;
use crate::types::{EventMetadata, ExitError, ExitMetadata, LinkMetadata, LinkToken, PublicToken};
use crate::widget::{LinkHandlers, LinkWidget};

#[wasm_bindgen]
extern "C" {
    type PlaidHandler;

    // `catch` turns a missing `Plaid` global into an Err instead of a trap.
    #[wasm_bindgen(js_namespace = Plaid, js_name = create, catch)]
    fn plaid_create(config: &Object) -> Result<PlaidHandler, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn open(this: &PlaidHandler) -> Result<(), JsValue>;
}

/// The hosted widget loaded by `link-initialize.js`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaidWidget;

impl LinkWidget for PlaidWidget {
    fn open(&self, token: &LinkToken, handlers: Rc<dyn LinkHandlers>) -> Result<(), LinkError> {
        let config = Object::new();
        set(&config, "token", &JsValue::from_str(token.as_str()))?;

        let h = Rc::clone(&handlers);
        let on_success = Closure::<dyn FnMut(JsValue, JsValue)>::new(
            move |public_token: JsValue, metadata: JsValue| {
                let public_token = PublicToken::new(public_token.as_string().unwrap_or_default());
                match from_js::<LinkMetadata>(&metadata) {
                    Ok(metadata) => h.on_success(public_token, metadata),
                    Err(e) => log::error!("[link] unreadable success metadata: {e}"),
                }
            },
        );

        let h = Rc::clone(&handlers);
        let on_exit = Closure::<dyn FnMut(JsValue, JsValue)>::new(
            move |error: JsValue, metadata: JsValue| {
                let error = from_js::<Option<ExitError>>(&error).unwrap_or_else(|e| {
                    log::warn!("[link] unreadable exit error: {e}");
                    None
                });
                let metadata = from_js::<ExitMetadata>(&metadata).unwrap_or_default();
                h.on_exit(error, metadata);
            },
        );

        let h = handlers;
        let on_event = Closure::<dyn FnMut(JsValue, JsValue)>::new(
            move |event_name: JsValue, metadata: JsValue| {
                let event_name = event_name.as_string().unwrap_or_default();
                let metadata = from_js::<EventMetadata>(&metadata).unwrap_or_default();
                h.on_event(event_name, metadata);
            },
        );

        set(&config, "onSuccess", on_success.as_ref())?;
        set(&config, "onExit", on_exit.as_ref())?;
        set(&config, "onEvent", on_event.as_ref())?;

        // The widget may call back at any point after this returns.
        on_success.forget();
        on_exit.forget();
        on_event.forget();

        let handler = plaid_create(&config).map_err(js_err)?;
        handler.open().map_err(js_err)
    }
}

impl Page for web_sys::Document {
    type Trigger = web_sys::Element;

    fn query_selector(&self, selector: &str) -> Option<web_sys::Element> {
        web_sys::Document::query_selector(self, selector).ok().flatten()
    }
}

impl Trigger for web_sys::Element {
    fn on_click(&self, handler: Box<dyn Fn()>) -> Result<(), LinkError> {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
            handler();
        });
        self.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .map_err(js_err)?;
        // Lives as long as the page.
        closure.forget();
        Ok(())
    }
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), LinkError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(js_err)
}

fn from_js<T: DeserializeOwned>(value: &JsValue) -> Result<T, LinkError> {
    if value.is_null() || value.is_undefined() {
        return Ok(serde_json::from_str("null")?);
    }
    let json: String = js_sys::JSON::stringify(value)
        .map_err(js_err)?
        .into();
    Ok(serde_json::from_str(&json)?)
}

fn js_err(value: JsValue) -> LinkError {
    let msg = value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"));
    LinkError::Widget(msg)
}
