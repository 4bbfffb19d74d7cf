//! Custom error types for the dispatch layer
//!
//! Every failure the dispatcher can produce is delivered through the caller's
//! completion handler as a [`DispatchError`]. Nothing here is fatal to the
//! process.

use std::fmt;

/// Failure outcome of a single dispatched operation
#[derive(Debug)]
pub enum DispatchError {
    /// Server answered 401, or the exchange produced no status at all
    AuthenticationRequired,

    /// Server answered 503
    ServiceUnavailable,

    /// Any status the classifier has no dedicated branch for
    UnexpectedStatus {
        status: u16,
        request: String,
        status_text: String,
        details: String,
    },

    /// Transport failed after the request was submitted
    Transport(TransportError),

    /// Transport refused the request before anything was sent
    Submission(TransportError),

    /// Operation could not be turned into a wire payload
    Encoding { reason: String },

    /// Compensating actions are not provided by this dispatcher
    UndoUnsupported,
}

/// Transport-level error variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Request could not be built (bad URL, bad header value)
    InvalidRequest { reason: String },

    /// Connection dropped or could not be established
    ConnectionFailed { url: String, reason: String },

    /// Response arrived but its body could not be read
    BodyUnreadable { reason: String },
}

/// Configuration error variants
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to load configuration file
    LoadFailed { path: String, reason: String },

    /// Invalid configuration value
    InvalidValue { field: String, reason: String },

    /// Configuration parsing error
    ParseError { reason: String },
}

impl DispatchError {
    /// True for failures the caller may fix by re-authenticating and retrying
    pub fn is_authentication_required(&self) -> bool {
        matches!(self, DispatchError::AuthenticationRequired)
    }

    /// True for failures that are worth retrying later unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DispatchError::ServiceUnavailable | DispatchError::Transport(_)
        )
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::AuthenticationRequired => write!(f, "Authentication required."),
            DispatchError::ServiceUnavailable => write!(
                f,
                "Service temporarily unavailable. Is the server still booting?"
            ),
            DispatchError::UnexpectedStatus {
                status,
                request,
                status_text,
                details,
            } => {
                write!(
                    f,
                    "Unexpected HTTP response: {}\n\nRequest\n{}\n\nResponse\n\n{}\n{}",
                    status, request, status_text, details
                )
            }
            DispatchError::Transport(e) => write!(f, "{}", e),
            DispatchError::Submission(e) => write!(f, "Failed to submit request: {}", e),
            DispatchError::Encoding { reason } => {
                write!(f, "Failed to encode operation: {}", reason)
            }
            DispatchError::UndoUnsupported => write!(f, "Undo is not supported."),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::InvalidRequest { reason } => {
                write!(f, "Invalid request: {}", reason)
            }
            TransportError::ConnectionFailed { url, reason } => {
                write!(f, "Connection to {} failed: {}", url, reason)
            }
            TransportError::BodyUnreadable { reason } => {
                write!(f, "Failed to read response body: {}", reason)
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::LoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path, reason)
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
            ConfigError::ParseError { reason } => {
                write!(f, "Failed to parse config: {}", reason)
            }
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::Transport(e) | DispatchError::Submission(e) => Some(e),
            _ => None,
        }
    }
}
impl std::error::Error for TransportError {}
impl std::error::Error for ConfigError {}

// Conversions from anyhow::Error for codec failures
impl From<anyhow::Error> for DispatchError {
    fn from(err: anyhow::Error) -> Self {
        DispatchError::Encoding {
            reason: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            TransportError::InvalidRequest {
                reason: err.to_string(),
            }
        } else if err.is_body() || err.is_decode() {
            TransportError::BodyUnreadable {
                reason: err.to_string(),
            }
        } else {
            TransportError::ConnectionFailed {
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
                reason: err.to_string(),
            }
        }
    }
}
