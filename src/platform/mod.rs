//! Platform abstraction (task spawning, logging setup).

use futures::future::LocalBoxFuture;

/// Runs detached, single-threaded work.
///
/// Everything in the link flow is `!Send`: the browser has one thread and the
/// native client drives it from a `LocalSet`.
pub trait TaskSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        mod wasm;
        pub use wasm::{init_logging, install_panic_hook, LocalSpawner};
    } else {
        mod native;
        pub use native::{init_logging, install_panic_hook, LocalSpawner};
    }
}
