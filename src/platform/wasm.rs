use std::sync::Once;

use futures::future::LocalBoxFuture;

use super::TaskSpawner;

/// Spawns onto the browser microtask queue.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalSpawner;

impl TaskSpawner for LocalSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

static LOGGER_INIT: Once = Once::new();

pub fn init_logging(level: log::Level) {
    LOGGER_INIT.call_once(|| {
        wasm_logger::init(wasm_logger::Config::new(level));
    });
}

pub fn install_panic_hook() {
    console_error_panic_hook::set_once();
}
