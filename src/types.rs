//! Wire and callback types exchanged with the backend and the link widget.
//!
//! Every record keeps unknown keys in a flattened `extra` map so that what the
//! widget hands us is relayed to the backend without losing fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::LinkError;

/// Short-lived session token authorizing a single widget session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkToken(String);

impl LinkToken {
    pub fn new(token: impl Into<String>) -> Self {
        LinkToken(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Loggable form: a short prefix plus the length, never the whole token.
    pub fn masked(&self) -> String {
        mask(&self.0)
    }
}

impl fmt::Debug for LinkToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LinkToken({})", self.masked())
    }
}

/// Opaque identifier returned by the widget on success, exchanged server-side.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicToken(String);

impl PublicToken {
    pub fn new(token: impl Into<String>) -> Self {
        PublicToken(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn masked(&self) -> String {
        mask(&self.0)
    }
}

impl fmt::Debug for PublicToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicToken({})", self.masked())
    }
}

fn mask(s: &str) -> String {
    let prefix: String = s.chars().take(8).collect();
    if prefix.len() == s.len() {
        format!("{prefix} ({} chars)", s.chars().count())
    } else {
        format!("{prefix}… ({} chars)", s.chars().count())
    }
}

/// Institution selected during the widget session.
///
/// The widget reports `institution_id`; older pages and tests send `id`.
/// Both are kept as-is so the record round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Institution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Institution {
    pub fn id(&self) -> Option<&str> {
        self.institution_id.as_deref().or(self.id.as_deref())
    }
}

/// One linked account, either a bare id or the widget's account object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkAccount {
    Id(String),
    Detailed(AccountDetails),
}

impl LinkAccount {
    pub fn id(&self) -> &str {
        match self {
            LinkAccount::Id(id) => id,
            LinkAccount::Detailed(details) => &details.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountDetails {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Metadata handed to the success callback.
///
/// The relayed fields stay raw JSON so `null` and absent keys reach the
/// backend exactly as the widget produced them. Typed views are available
/// through the accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkMetadata {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub institution: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub accounts: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub link_session_id: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LinkMetadata {
    pub fn institution(&self) -> Option<Institution> {
        self.institution
            .as_ref()
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn institution_id(&self) -> Option<String> {
        self.institution().and_then(|i| i.id().map(str::to_string))
    }

    /// Accounts that parse as a bare id or an account object; others are skipped.
    pub fn accounts(&self) -> Vec<LinkAccount> {
        match &self.accounts {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| serde_json::from_value(v.clone()).ok())
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn account_ids(&self) -> Vec<String> {
        self.accounts().iter().map(|a| a.id().to_string()).collect()
    }

    pub fn link_session_id(&self) -> Option<&str> {
        self.link_session_id.as_ref().and_then(Value::as_str)
    }
}

/// `null` becomes `Some(Value::Null)`; only a missing key is `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Body of `POST /get_access_token`.
///
/// Field order is part of the wire contract. Keys missing from the widget
/// metadata are omitted; `null` values are sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeRequest {
    pub public_token: PublicToken,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accounts: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_session_id: Option<Value>,
}

impl ExchangeRequest {
    pub fn new(public_token: PublicToken, metadata: LinkMetadata) -> Self {
        ExchangeRequest {
            public_token,
            accounts: metadata.accounts,
            institution: metadata.institution,
            link_session_id: metadata.link_session_id,
        }
    }

    pub fn to_json(&self) -> Result<String, LinkError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Result of an exchange call the backend accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeOutcome {
    pub status: u16,
}

/// Error object passed to the exit callback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExitError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Metadata passed to the exit callback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExitMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<Institution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Metadata attached to each widget event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Token endpoint response: `{"LinkToken": ...}` or `{"ErrorMsg": ...}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct TokenCreateResponse {
    #[serde(rename = "LinkToken", default)]
    pub link_token: Option<String>,
    #[serde(rename = "ErrorMsg", default)]
    pub error_msg: Option<String>,
}

/// Exchange endpoint response: `{}` or `{"ErrorMsg": ...}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ExchangeResponse {
    #[serde(rename = "ErrorMsg", default)]
    pub error_msg: Option<String>,
}

/// Compact JSON for log lines; falls back to a marker instead of failing.
pub(crate) fn to_log_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "<unserializable>".to_string())
}
