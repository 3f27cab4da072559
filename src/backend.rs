//! Backend client for the two link endpoints.
//!
//! `HttpBackend` uses reqwest on both targets; on wasm32 reqwest goes through
//! the browser Fetch API, so cookies and CORS are handled by the page.

use async_trait::async_trait;

use crate::config::LinkConfig;
use crate::error::LinkError;
use crate::types::{ExchangeOutcome, ExchangeRequest, ExchangeResponse, LinkToken, TokenCreateResponse};

#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

/// The two calls the page makes against its backend.
#[async_trait(?Send)]
pub trait LinkBackend {
    /// `POST /link/token/create` with no body.
    async fn create_link_token(&self) -> Result<LinkToken, LinkError>;

    /// `POST /get_access_token` with the JSON-encoded request.
    async fn exchange_public_token(
        &self,
        request: &ExchangeRequest,
    ) -> Result<ExchangeOutcome, LinkError>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    token_url: String,
    exchange_url: String,
}

impl HttpBackend {
    pub fn new(config: &LinkConfig) -> Result<Self, LinkError> {
        #[cfg(not(target_arch = "wasm32"))]
        let client = {
            let mut builder = reqwest::Client::builder().tcp_nodelay(true);
            if let Some(ms) = config.timeout_ms {
                builder = builder.timeout(Duration::from_millis(ms));
            }
            builder.build()
        };

        #[cfg(target_arch = "wasm32")]
        let client = reqwest::Client::builder().build();

        let client =
            client.map_err(|e| LinkError::Transport(format!("could not build HTTP client: {e}")))?;

        Ok(HttpBackend {
            client,
            token_url: config.token_url(),
            exchange_url: config.exchange_url(),
        })
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    pub fn exchange_url(&self) -> &str {
        &self.exchange_url
    }
}

#[async_trait(?Send)]
impl LinkBackend for HttpBackend {
    async fn create_link_token(&self) -> Result<LinkToken, LinkError> {
        log::debug!("[backend] POST {}", self.token_url);

        let response = self
            .client
            .post(&self.token_url)
            .send()
            .await
            .map_err(|e| LinkError::Transport(format!("link token request failed: {e}")))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| LinkError::Transport(format!("link token response unreadable: {e}")))?;

        token_from_response(status, &body)
    }

    async fn exchange_public_token(
        &self,
        request: &ExchangeRequest,
    ) -> Result<ExchangeOutcome, LinkError> {
        log::debug!(
            "[backend] POST {} ({} accounts)",
            self.exchange_url,
            request
                .accounts
                .as_ref()
                .and_then(|a| a.as_array())
                .map_or(0, Vec::len)
        );

        // .json() also sets Content-Type: application/json
        let response = self
            .client
            .post(&self.exchange_url)
            .json(request)
            .send()
            .await
            .map_err(|e| LinkError::Transport(format!("exchange request failed: {e}")))?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        exchange_outcome(status, &body)
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Interpret the token endpoint's reply.
///
/// An `ErrorMsg` wins over the status code. A success without `LinkToken`
/// yields an empty token, which the flow refuses to open the widget with.
pub(crate) fn token_from_response(status: u16, body: &str) -> Result<LinkToken, LinkError> {
    let parsed: TokenCreateResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) if is_success(status) => return Err(LinkError::Decode(e.to_string())),
        Err(_) => {
            return Err(LinkError::Backend {
                status,
                message: fallback_message(status, body),
            })
        }
    };

    if let Some(message) = parsed.error_msg.filter(|m| !m.is_empty()) {
        return Err(LinkError::Backend { status, message });
    }
    if !is_success(status) {
        return Err(LinkError::Backend {
            status,
            message: fallback_message(status, body),
        });
    }

    Ok(LinkToken::new(parsed.link_token.unwrap_or_default()))
}

/// Interpret the exchange endpoint's reply. Only the status decides success.
pub(crate) fn exchange_outcome(status: u16, body: &str) -> Result<ExchangeOutcome, LinkError> {
    if is_success(status) {
        return Ok(ExchangeOutcome { status });
    }

    let message = serde_json::from_str::<ExchangeResponse>(body)
        .ok()
        .and_then(|r| r.error_msg)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback_message(status, body));

    Err(LinkError::Backend { status, message })
}

fn fallback_message(status: u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP {status}")
    } else {
        body.to_string()
    }
}
