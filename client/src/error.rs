//! API error taxonomy and the user-facing strings each failure maps to.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is caught at the call site and turned into one line of text
//! for the user. Nothing is retried. Transport failures get fixed strings,
//! server-reported failures are shown verbatim when the body carries a
//! message, and everything else falls back to the screen's own text.

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

use serde_json::Value;

/// Shown when the request exceeds the client-side timeout.
pub const TIMEOUT_MESSAGE: &str = "Connection timed out.";
/// Shown for any other transport failure.
pub const CONNECTION_MESSAGE: &str = "Connection error.";

/// Errors produced by backend calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request hit the client-side timeout.
    #[error("request timed out")]
    Timeout,

    /// The request never produced a response (DNS, refused, reset, TLS).
    #[error("connection failed: {0}")]
    Connection(String),

    /// The backend answered with a failure, optionally carrying a message.
    #[error("server returned HTTP {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Server { status: u16, message: Option<String> },

    /// The response body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The HTTP client or a request could not be constructed.
    #[error("request could not be built: {0}")]
    Build(String),

    /// An authenticated endpoint was called without a stored token.
    #[error("not logged in; run `login` first")]
    MissingToken,
}

impl ApiError {
    /// Normalize a transport-level `reqwest` failure.
    #[must_use]
    pub fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Connection(error.to_string())
        }
    }

    /// Build a server error from a status and a (possibly empty) JSON body.
    #[must_use]
    pub fn from_response(status: u16, body: &Value) -> Self {
        Self::Server { status, message: server_message(body) }
    }

    /// Whether the backend rejected the request with its own explanation
    /// (e.g. "face not recognized"), as opposed to a transport failure.
    #[must_use]
    pub fn is_domain_failure(&self) -> bool {
        matches!(self, Self::Server { message: Some(_), .. })
    }

    /// Map this error to the text shown to the user.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Timeout => TIMEOUT_MESSAGE.to_owned(),
            Self::Connection(_) => CONNECTION_MESSAGE.to_owned(),
            Self::Server { message: Some(message), .. } => message.clone(),
            Self::MissingToken => self.to_string(),
            Self::Server { message: None, .. } | Self::Decode(_) | Self::Build(_) => {
                fallback.to_owned()
            }
        }
    }
}

/// Pull the backend's explanation out of an error body.
///
/// The backend is inconsistent about the key: `error`, `message` and
/// `mensagem` all occur, so the first non-blank one wins.
#[must_use]
pub fn server_message(body: &Value) -> Option<String> {
    ["error", "message", "mensagem"]
        .iter()
        .filter_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}
