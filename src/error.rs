//! Error type shared by the link flow, the backend client and the DOM glue.

/// Everything that can go wrong between the trigger click and the exchange call.
///
/// Variants carry strings instead of source errors so the value can cross the
/// JS boundary and be compared in tests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    /// The request never produced an HTTP response (DNS, CORS, offline, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status or an `ErrorMsg` body.
    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    /// A response or callback payload did not have the expected JSON shape.
    #[error("could not decode payload: {0}")]
    Decode(String),

    /// The token endpoint succeeded but handed back no usable link token.
    #[error("backend returned an empty link token")]
    EmptyToken,

    /// The hosted widget could not be created or opened.
    #[error("link widget error: {0}")]
    Widget(String),

    /// No element matched the trigger selector.
    #[error("trigger element {selector:?} not found")]
    TriggerMissing { selector: String },
}

impl From<serde_json::Error> for LinkError {
    fn from(e: serde_json::Error) -> Self {
        LinkError::Decode(e.to_string())
    }
}
