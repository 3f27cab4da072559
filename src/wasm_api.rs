//! Minimal JS -> Rust surface for the page.
//!
//! ```javascript
//! import init, { linkglue_start } from "./linkglue-web.js";
//! await init();
//! linkglue_start();          // uses #start
//! linkglue_start("#link");   // custom trigger
//! ```

#![cfg(target_arch = "wasm32")]

use wasm_bindgen::prelude::*;
use web_sys::window;

use crate::backend::HttpBackend;
use crate::bootstrap::{self, Bootstrap};
use crate::config::LinkConfig;
use crate::flow::LinkFlow;
use crate::platform::LocalSpawner;
use crate::webshim::PlaidWidget;

/// Wire the trigger element to the link flow.
///
/// Configuration: defaults, then `lk_*` query overrides from the page URL,
/// then `selector` if given. Endpoints resolve against the page origin.
/// Returns `true` when a click handler was attached.
#[wasm_bindgen]
pub fn linkglue_start(selector: Option<String>) -> Result<bool, JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let mut config = LinkConfig::default();
    if let Ok(search) = win.location().search() {
        if let Err(e) = config.apply_query(&search) {
            log::warn!("[link] ignoring page query overrides: {e}");
        }
    }
    if let Some(selector) = selector.filter(|s| !s.trim().is_empty()) {
        config.trigger_selector = selector;
    }
    // reqwest needs absolute URLs, even in the browser
    if config.base_url.is_empty() {
        if let Ok(origin) = win.location().origin() {
            config.base_url = origin;
        }
    }

    let backend = HttpBackend::new(&config).map_err(to_js)?;
    let flow = LinkFlow::new(config, backend, PlaidWidget, LocalSpawner);

    match bootstrap::start(&document, &flow).map_err(to_js)? {
        Bootstrap::Attached => Ok(true),
        Bootstrap::NoTrigger => Ok(false),
    }
}

fn to_js(e: crate::error::LinkError) -> JsValue {
    JsValue::from_str(&e.to_string())
}
