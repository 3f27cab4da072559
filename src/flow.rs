//! Link initiation and completion.
//!
//! Click → create link token → open widget → (widget success) → exchange.
//! Each network step is an explicit future; the click handler and the success
//! callback detach them through the configured [`TaskSpawner`].

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::future::LocalBoxFuture;
use futures::FutureExt;

use crate::backend::LinkBackend;
use crate::config::{ExchangeFailure, LinkConfig};
use crate::debug::{self, cat};
use crate::error::LinkError;
use crate::platform::TaskSpawner;
use crate::types::{
    to_log_json, EventMetadata, ExchangeOutcome, ExchangeRequest, ExitError, ExitMetadata,
    LinkMetadata, PublicToken,
};
use crate::widget::{LinkHandlers, LinkWidget};

/// Handle on the link flow. Cheap to clone; clones share everything.
#[derive(Clone)]
pub struct LinkFlow {
    inner: Rc<FlowInner>,
}

struct FlowInner {
    config: LinkConfig,
    backend: Rc<dyn LinkBackend>,
    widget: Rc<dyn LinkWidget>,
    spawner: Rc<dyn TaskSpawner>,
}

impl LinkFlow {
    pub fn new(
        config: LinkConfig,
        backend: impl LinkBackend + 'static,
        widget: impl LinkWidget + 'static,
        spawner: impl TaskSpawner + 'static,
    ) -> Self {
        LinkFlow {
            inner: Rc::new(FlowInner {
                config,
                backend: Rc::new(backend),
                widget: Rc::new(widget),
                spawner: Rc::new(spawner),
            }),
        }
    }

    pub fn config(&self) -> &LinkConfig {
        &self.inner.config
    }

    /// Request a link token and open the widget with it.
    ///
    /// Exactly one token request is made. The widget is opened only after that
    /// request resolved with a non-empty token.
    pub async fn start_link(&self) -> Result<(), LinkError> {
        debug::log(cat::TOKEN, "requesting link token");
        let token = self.inner.backend.create_link_token().await?;
        if token.is_empty() {
            return Err(LinkError::EmptyToken);
        }

        debug::log(cat::WIDGET, format!("opening widget with {}", token.masked()));
        let handlers: Rc<dyn LinkHandlers> = Rc::new(self.clone());
        self.inner.widget.open(&token, handlers)
    }

    /// Click handler body: run [`start_link`](Self::start_link) detached.
    ///
    /// A failure is logged once and goes no further; the page shows nothing.
    pub fn handle_click(&self) {
        debug::log(cat::BOOT, "trigger clicked");
        let flow = self.clone();
        self.inner.spawner.spawn(
            async move {
                if let Err(e) = flow.start_link().await {
                    log::error!("[link] could not start account linking: {e}");
                }
            }
            .boxed_local(),
        );
    }

    /// Build the exchange request for a successful session.
    ///
    /// Nothing is sent until the task is awaited or detached.
    pub fn exchange_task(&self, public_token: PublicToken, metadata: LinkMetadata) -> ExchangeTask {
        let request = ExchangeRequest::new(public_token, metadata);
        let backend = Rc::clone(&self.inner.backend);
        ExchangeTask {
            request: request.clone(),
            fut: async move { backend.exchange_public_token(&request).await }.boxed_local(),
        }
    }
}

impl LinkHandlers for LinkFlow {
    fn on_success(&self, public_token: PublicToken, metadata: LinkMetadata) {
        debug::log(
            cat::EXCHANGE,
            format!(
                "widget success: institution={:?} accounts={}",
                metadata.institution_id(),
                metadata.account_ids().len()
            ),
        );
        self.exchange_task(public_token, metadata)
            .detach(self.inner.spawner.as_ref(), self.inner.config.exchange_failure);
    }

    fn on_exit(&self, error: Option<ExitError>, metadata: ExitMetadata) {
        // Every exit is reported at error level, with or without an error object.
        log::error!(
            "[link] widget exited: {} {}",
            to_log_json(&error),
            to_log_json(&metadata)
        );
    }

    fn on_event(&self, event_name: String, metadata: EventMetadata) {
        log::info!("[link] Event: {event_name}");
        log::info!("[link] Metadata: {}", to_log_json(&metadata));
    }
}

/// Pending `POST /get_access_token`.
///
/// Await it to observe the result, or [`detach`](Self::detach) it with an
/// explicit policy for what happens to that result.
#[must_use = "an exchange task does nothing unless awaited or detached"]
pub struct ExchangeTask {
    request: ExchangeRequest,
    fut: LocalBoxFuture<'static, Result<ExchangeOutcome, LinkError>>,
}

impl ExchangeTask {
    pub fn request(&self) -> &ExchangeRequest {
        &self.request
    }

    pub fn detach(self, spawner: &dyn TaskSpawner, policy: ExchangeFailure) {
        match policy {
            // The result is dropped on purpose; a failed exchange leaves no trace.
            ExchangeFailure::Discard => spawner.spawn(
                async move {
                    let _ = self.await;
                }
                .boxed_local(),
            ),
            ExchangeFailure::Log => spawner.spawn(
                async move {
                    match self.await {
                        Ok(outcome) => {
                            log::info!("[link] exchange accepted (HTTP {})", outcome.status)
                        }
                        Err(e) => log::error!("[link] exchange failed: {e}"),
                    }
                }
                .boxed_local(),
            ),
        }
    }
}

impl Future for ExchangeTask {
    type Output = Result<ExchangeOutcome, LinkError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.fut.poll_unpin(cx)
    }
}
