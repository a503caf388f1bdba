//! Error types for the tracking client

use std::fmt;
use thiserror::Error;

/// Failure of a tracking operation
#[derive(Debug, Error)]
pub enum Error {
    /// Site id or API key missing at construction time
    #[error("invalid credentials: {0}")]
    InvalidCredentials(&'static str),

    /// The service answered with something other than 200
    #[error("tracking API returned status {status}")]
    Api { status: u16, body: String },

    /// The HTTP call itself did not complete
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("failed to encode request body: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Status code carried by an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

/// Broad category of a transport failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// DNS, TCP or TLS could not be established
    Connect,
    Timeout,
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// The HTTP call failed before a response status was available
#[derive(Debug, Clone, Error)]
#[error("transport error ({kind}): {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else {
            TransportErrorKind::Other
        };
        Self::new(kind, err.to_string())
    }
}
