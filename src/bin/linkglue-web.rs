#![cfg_attr(target_arch = "wasm32", no_main)]

// Browser entry point for the link glue.
//
// JS side:
//   <script src="https://cdn.plaid.com/link/v2/stable/link-initialize.js"></script>
//   import init, { linkglue_start } from "./linkglue-web.js";
//   await init();
//   linkglue_start();

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Install the panic hook, console logger and debug mask once the module loads.
///
/// Wiring the trigger is left to `linkglue_start`, which the page calls when
/// its DOM is ready.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_start() {
    linkglue::platform::install_panic_hook();
    linkglue::platform::init_logging(log::Level::Info);
    linkglue::debug::init_from_url_and_storage_once();
    log::info!("[link] linkglue {} loaded", env!("CARGO_PKG_VERSION"));
}

// Native builds: just provide a stub main so `cargo build --all-features` doesn't explode.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("linkglue-web is only supported on wasm32 (browser) target.");
}
