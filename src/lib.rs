//! linkglue - browser glue for a hosted account-linking widget
//!
//! A click on the trigger element asks the backend for a link token, opens the
//! widget with it, and forwards the widget's public token and metadata to the
//! backend's exchange endpoint.
//!
//! ## Architecture
//!
//! - **Web** (`dom-web`, wasm32): DOM + `Plaid` global bindings in `webshim`,
//!   started from JS via `wasm_api::linkglue_start`
//! - **Native** (`native`): a CLI that drives the same backend client
//!
//! The flow itself only talks to the `LinkBackend`, `LinkWidget`, `Page` and
//! `TaskSpawner` seams, so it runs (and is tested) on both.
//!
//! ## Usage
//!
//! ```bash
//! cargo build --features native
//! cargo build --target wasm32-unknown-unknown --features dom-web --bin linkglue-web
//! ```

pub mod config;
pub mod error;
pub mod types;

// Debug logging categories (available on all platforms)
pub mod debug;

// Platform abstraction layer
pub mod platform;

pub mod backend;
pub mod bootstrap;
pub mod flow;
pub mod widget;

// WASM-specific JavaScript bridge (Plaid global, DOM)
#[cfg(target_arch = "wasm32")]
pub mod webshim;

// WASM-facing exports (JS -> Rust) are only built on wasm32.
#[cfg(target_arch = "wasm32")]
pub mod wasm_api;

// Re-export commonly used types
pub use backend::{HttpBackend, LinkBackend};
pub use bootstrap::{start, Bootstrap, Page, Trigger};
pub use config::{ExchangeFailure, LinkConfig, MissingTrigger};
pub use error::LinkError;
pub use flow::{ExchangeTask, LinkFlow};
pub use types::{
    ExchangeOutcome, ExchangeRequest, LinkAccount, LinkMetadata, LinkToken, PublicToken,
};
pub use widget::{LinkHandlers, LinkWidget};
