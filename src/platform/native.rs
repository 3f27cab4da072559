//! Native platform implementation (tokio LocalSet, env_logger)

use futures::future::LocalBoxFuture;

use super::TaskSpawner;

/// Spawns onto the current `tokio::task::LocalSet`.
///
/// Panics (inside tokio) when called outside a `LocalSet`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalSpawner;

impl TaskSpawner for LocalSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        tokio::task::spawn_local(task);
    }
}

pub fn init_logging(level: log::Level) {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level.as_str().to_ascii_lowercase()),
    )
    .try_init();
}

pub fn install_panic_hook() {}
