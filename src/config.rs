use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[cfg(not(target_arch = "wasm32"))]
use anyhow::Context;
#[cfg(not(target_arch = "wasm32"))]
use clap::Args;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

pub const DEFAULT_TOKEN_PATH: &str = "/link/token/create";
pub const DEFAULT_EXCHANGE_PATH: &str = "/get_access_token";
pub const DEFAULT_TRIGGER_SELECTOR: &str = "#start";

/// What to do when the trigger element is not on the page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingTrigger {
    /// Log a warning and leave the page alone.
    #[default]
    Ignore,
    /// Report `LinkError::TriggerMissing` to the caller.
    Fail,
}

impl std::str::FromStr for MissingTrigger {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ignore" => Ok(MissingTrigger::Ignore),
            "fail" => Ok(MissingTrigger::Fail),
            _ => Err(anyhow!("Invalid missing_trigger '{s}'. Valid options: ignore, fail")),
        }
    }
}

impl std::fmt::Display for MissingTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingTrigger::Ignore => write!(f, "ignore"),
            MissingTrigger::Fail => write!(f, "fail"),
        }
    }
}

/// What happens to the result of a detached exchange request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeFailure {
    /// Drop the result, success or failure, without a trace.
    #[default]
    Discard,
    /// Log failures at error level and successes at info level.
    Log,
}

impl std::str::FromStr for ExchangeFailure {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "discard" | "ignore" => Ok(ExchangeFailure::Discard),
            "log" => Ok(ExchangeFailure::Log),
            _ => Err(anyhow!("Invalid exchange_failure '{s}'. Valid options: discard, log")),
        }
    }
}

impl std::fmt::Display for ExchangeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExchangeFailure::Discard => write!(f, "discard"),
            ExchangeFailure::Log => write!(f, "log"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Prefix for both endpoints. Empty means same origin.
    pub base_url: String,
    pub token_path: String,
    pub exchange_path: String,
    pub trigger_selector: String,
    pub missing_trigger: MissingTrigger,
    pub exchange_failure: ExchangeFailure,
    /// Per-request timeout; honored by the native client only.
    pub timeout_ms: Option<u64>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        LinkConfig {
            base_url: String::new(),
            token_path: DEFAULT_TOKEN_PATH.to_string(),
            exchange_path: DEFAULT_EXCHANGE_PATH.to_string(),
            trigger_selector: DEFAULT_TRIGGER_SELECTOR.to_string(),
            missing_trigger: MissingTrigger::default(),
            exchange_failure: ExchangeFailure::default(),
            timeout_ms: None,
        }
    }
}

/// Command-line / environment overrides for the native client.
/// Priority: CLI args > Environment variables > config file > Defaults
#[cfg(not(target_arch = "wasm32"))]
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// TOML config file
    #[arg(long, env = "LINK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend base URL (e.g. http://localhost:8080)
    #[arg(long, env = "LINK_BASE_URL")]
    pub base_url: Option<String>,

    /// Path of the link token endpoint
    #[arg(long, env = "LINK_TOKEN_PATH")]
    pub token_path: Option<String>,

    /// Path of the public token exchange endpoint
    #[arg(long, env = "LINK_EXCHANGE_PATH")]
    pub exchange_path: Option<String>,

    /// Request timeout in milliseconds (100-120000)
    #[arg(long, env = "LINK_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Exchange result handling: discard or log
    #[arg(long, env = "LINK_EXCHANGE_FAILURE", value_parser = clap::value_parser!(ExchangeFailure))]
    pub exchange_failure: Option<ExchangeFailure>,
}

/// Build the native configuration from a file (if any) plus overrides.
#[cfg(not(target_arch = "wasm32"))]
pub fn load(args: &ConfigArgs) -> Result<LinkConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            LinkConfig::from_toml_str(&raw)
                .with_context(|| format!("Invalid config file {}", path.display()))?
        }
        None => LinkConfig::default(),
    };

    if let Some(url) = &args.base_url {
        config.base_url = url.clone();
    }
    if let Some(path) = &args.token_path {
        config.token_path = path.clone();
    }
    if let Some(path) = &args.exchange_path {
        config.exchange_path = path.clone();
    }
    if let Some(ms) = args.timeout_ms {
        config.timeout_ms = Some(ms);
    }
    if let Some(policy) = args.exchange_failure {
        config.exchange_failure = policy;
    }

    config.validate()?;
    Ok(config)
}

impl LinkConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: LinkConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_base_url(&self.base_url, "base_url")?;
        validate_path(&self.token_path, "token_path")?;
        validate_path(&self.exchange_path, "exchange_path")?;
        if self.trigger_selector.trim().is_empty() {
            return Err(anyhow!("trigger_selector cannot be empty"));
        }
        if let Some(ms) = self.timeout_ms {
            validate_in_range(ms, 100, 120_000, "timeout_ms")?;
        }
        Ok(())
    }

    pub fn token_url(&self) -> String {
        join_url(&self.base_url, &self.token_path)
    }

    pub fn exchange_url(&self) -> String {
        join_url(&self.base_url, &self.exchange_path)
    }

    /// Apply page query overrides such as `lk_selector=%23link&lk_exchange_failure=log`.
    ///
    /// Unknown keys are ignored. Nothing is applied unless the result validates.
    pub fn apply_query(&mut self, qs: &str) -> Result<()> {
        let mut next = self.clone();
        for part in qs.trim_start_matches('?').split('&') {
            let mut it = part.splitn(2, '=');
            let key = it.next().unwrap_or_default().trim().to_ascii_lowercase();
            // form encoding: '+' is a space, a literal plus arrives as %2B
            let raw = it.next().unwrap_or_default().replace('+', " ");
            let value = urlencoding::decode(&raw)
                .map(|v| v.into_owned())
                .unwrap_or(raw);
            match key.as_str() {
                "lk_base" => next.base_url = value,
                "lk_token_path" => next.token_path = value,
                "lk_exchange_path" => next.exchange_path = value,
                "lk_selector" => next.trigger_selector = value,
                "lk_missing_trigger" => next.missing_trigger = value.parse()?,
                "lk_exchange_failure" => next.exchange_failure = value.parse()?,
                _ => {}
            }
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    pub fn print_summary(&self) {
        log::info!("Link configuration:");
        if self.base_url.is_empty() {
            log::info!("  Base URL: (same origin)");
        } else {
            log::info!("  Base URL: {}", self.base_url);
        }
        log::info!("  Token endpoint: {}", self.token_path);
        log::info!("  Exchange endpoint: {}", self.exchange_path);
        log::info!("  Trigger: {} (missing: {})", self.trigger_selector, self.missing_trigger);
        log::info!("  Exchange result: {}", self.exchange_failure);
        if let Some(ms) = self.timeout_ms {
            log::info!("  Timeout: {ms}ms");
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

fn validate_base_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() || url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must be empty or start with http:// or https://"))
    }
}

fn validate_path(path: &str, name: &str) -> Result<()> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with '/', got {path:?}"))
    }
}
